//! Sitzungszustand: Geometrie, Perlen, Skalierung, Packing und History.

use super::history::{EditHistory, Snapshot};
use super::CommandLog;
use crate::core::{
    AttachmentStore, BeadId, BeadPlacement, PackingReport, PackingSettings, PackingSimulator,
    PathId, PathSet, PlacementRejection, RescaleEngine, StringKind, StringProvenance,
    StrokeBuilder, TipErase,
};
use crate::shared::EngineOptions;

/// Rückmeldung der letzten Bearbeitung für die Oberfläche.
#[derive(Debug, Clone, PartialEq)]
pub enum EditFeedback {
    /// Strich wurde als Pfad übernommen
    StrokeCommitted {
        /// Neuer Pfad
        path_id: PathId,
        /// Anzahl geteilter Segmente durch Fusion
        splits: usize,
    },
    /// Strich hatte zu wenige Punkte und wurde verworfen
    StrokeDiscarded,
    /// Ein Pfadende wurde radiert
    TipErased(TipErase),
    /// Perle wurde platziert
    BeadPlaced(BeadId),
    /// Platzierung wurde abgelehnt
    PlacementRejected(PlacementRejection),
    /// Drag beendet, Perle liegt kollisionsfrei
    DragSettled {
        /// Perle
        bead_id: BeadId,
        /// Perle wurde zur Kollisionsauflösung verschoben
        shifted: bool,
    },
    /// Kein freier Platz, Perle zurück an die Ausgangsposition
    DragReverted(BeadId),
    /// Drehung hätte eine Überlappung erzeugt
    RotationRejected(BeadId),
    /// Skalierungs-Baseline passte nicht und wurde neu erfasst
    ScaleRecaptured,
    /// Packing-Lauf beendet
    PackingFinished(PackingReport),
    /// Design geladen
    DesignLoaded {
        /// Anzahl Pfade
        paths: usize,
        /// Anzahl Perlen
        beads: usize,
    },
}

/// Gesamter Zustand einer Bearbeitungssitzung.
pub struct DesignState {
    /// Alle Pfade der Kette
    pub paths: PathSet,
    /// Alle gebundenen Perlen
    pub beads: AttachmentStore,
    /// Skalierungs-Baseline und Prozentwert
    pub rescale: RescaleEngine,
    /// Packing-Simulation
    pub packing: PackingSimulator,
    /// Aktiver Strich (zwischen BeginStroke und FinishStroke)
    pub active_stroke: Option<StrokeBuilder>,
    /// Herkunft der Geometrie
    pub provenance: StringProvenance,
    /// Laufzeit-Optionen
    pub options: EngineOptions,
    /// Undo/Redo-Verlauf
    pub history: EditHistory,
    /// Log aller ausgeführten Commands
    pub command_log: CommandLog,
    /// Rückmeldung der letzten Bearbeitung
    pub last_feedback: Option<EditFeedback>,
    /// Skalierungs-Slider wird gerade bewegt (ein Undo-Schritt pro Geste)
    pub scale_gesture_active: bool,
}

impl DesignState {
    /// Erstellt einen leeren Zustand mit Standard-Optionen.
    pub fn new() -> Self {
        Self::with_options(EngineOptions::default())
    }

    /// Erstellt einen leeren Zustand mit den angegebenen Optionen.
    pub fn with_options(options: EngineOptions) -> Self {
        Self {
            paths: PathSet::new(),
            beads: AttachmentStore::new(),
            rescale: RescaleEngine::new(),
            packing: PackingSimulator::with_settings(PackingSettings::from_options(&options)),
            active_stroke: None,
            provenance: StringProvenance::default(),
            history: EditHistory::new_with_capacity(options.history_depth),
            command_log: CommandLog::new(),
            last_feedback: None,
            scale_gesture_active: false,
            options,
        }
    }

    /// Gibt die Anzahl der Pfade zurück.
    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    /// Gibt die Anzahl der Perlen zurück.
    pub fn bead_count(&self) -> usize {
        self.beads.len()
    }

    /// Aktuell gezogene Perle.
    pub fn dragging(&self) -> Option<BeadId> {
        self.beads.dragged_bead()
    }

    /// Positionen und Orientierungen aller Perlen für den Renderer.
    pub fn placements(&self) -> Vec<BeadPlacement> {
        self.beads.placements(&self.paths)
    }

    /// Art der aktuellen Geometrie.
    pub fn string_kind(&self) -> StringKind {
        if self.paths.is_empty() {
            return StringKind::None;
        }
        self.provenance.kind()
    }

    /// Undo/Redo helpers
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Gibt zurück, ob ein Redo-Schritt verfügbar ist.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Erstellt einen Undo-Snapshot des aktuellen Zustands.
    pub fn record_undo_snapshot(&mut self) {
        let snap = Snapshot::from_state(self);
        self.history.record_snapshot(snap);
    }
}

impl Default for DesignState {
    fn default() -> Self {
        Self::new()
    }
}
