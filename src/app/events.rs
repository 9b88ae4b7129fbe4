//! DesignCommand-Enum für den Command-Datenfluss der Sitzung.

use crate::core::{BeadId, Footprint, PayloadHandle};
use glam::Vec2;
use std::path::PathBuf;

/// Mutierende Commands, die der Controller auf den `DesignState` anwendet.
///
/// Alle Punkte liegen in Ebenen-Koordinaten (`x`, `y` = Welt-z).
#[derive(Debug, Clone)]
pub enum DesignCommand {
    // ── Strich-Erstellung ───────────────────────────────────────────
    /// Neuen Strich beginnen (Start-Fusion wird hier ausgewertet)
    BeginStroke { point: Vec2 },
    /// Aktiven Strich verlängern
    ExtendStroke { point: Vec2 },
    /// Aktiven Strich abschließen (End-Fusion, Commit oder Verwerfen)
    FinishStroke,
    /// Aktiven Strich ohne Commit verwerfen
    CancelStroke,
    /// Radierer an einer Position anwenden
    EraseAt { point: Vec2 },
    /// Alle Pfade und Perlen entfernen
    ClearAll,
    /// Vorlagen-Pfade importieren (ersetzt die vorhandene Geometrie)
    ImportPaths { paths: Vec<Vec<Vec2>> },

    // ── Perlen ──────────────────────────────────────────────────────
    /// Perle am nächsten Pfadpunkt platzieren
    PlaceBead {
        point: Vec2,
        footprint: Footprint,
        payload: PayloadHandle,
    },
    /// Drag einer Perle beginnen
    BeginBeadDrag { bead_id: BeadId },
    /// Gezogene Perle an den nächsten Pfadpunkt binden
    DragBead { point: Vec2 },
    /// Drag beenden und Kollisionen auflösen
    ReleaseBead,
    /// Manuelle Orientierung setzen
    RotateBead { bead_id: BeadId, radians: f32 },
    /// Perle löschen
    DeleteBead { bead_id: BeadId },

    // ── Skalierung & Packing ────────────────────────────────────────
    /// Skalierung in Prozent (0..=100) aus der Baseline anwenden
    SetScale { percentage: f32 },
    /// Slider losgelassen: Packing mit skalierter Geschwindigkeit starten
    FinishScale,
    /// Design auf einen Zielpunkt zentrieren und anschließend packen
    FitRequested { target: Vec2 },
    /// Frame-Tick für das Packing
    Tick { dt: f32 },

    // ── History ─────────────────────────────────────────────────────
    /// Letzte Änderung rückgängig machen
    Undo,
    /// Rückgängig gemachte Änderung wiederholen
    Redo,

    // ── Persistenz ──────────────────────────────────────────────────
    /// Aktuelles Design an das Persistenz-Ziel übergeben
    SaveDesign,
    /// Design aus einer JSON-Datei laden, optional mit anschließendem Packing
    LoadDesign { path: PathBuf, pack: bool },
}

impl DesignCommand {
    /// `true` für den hochfrequenten Frame-Tick.
    pub fn is_frame_tick(&self) -> bool {
        matches!(self, Self::Tick { .. })
    }
}
