use super::DesignState;
use crate::core::{AttachmentStore, PathSet, RescaleEngine, StringProvenance};

/// Snapshot reduziert auf die für Undo/Redo relevanten Teile.
///
/// Enthält Pfade, Perlen und die Skalierungs-Baseline, damit nach einem
/// Undo Bindungen und Skalierung wieder zur Geometrie passen.
#[derive(Clone)]
pub struct Snapshot {
    /// Alle Pfade
    pub paths: PathSet,
    /// Alle Perlen inkl. Bindungen
    pub beads: AttachmentStore,
    /// Baseline und Skalierungs-Prozentwert
    pub rescale: RescaleEngine,
    /// Herkunftsmarker
    pub provenance: StringProvenance,
}

impl Snapshot {
    /// Erstellt einen Snapshot des aktuellen Zustands.
    pub fn from_state(state: &DesignState) -> Self {
        Self {
            paths: state.paths.clone(),
            beads: state.beads.clone(),
            rescale: state.rescale.clone(),
            provenance: state.provenance,
        }
    }

    /// Stellt den Snapshot wieder her.
    pub fn apply_to(self, state: &mut DesignState) {
        state.paths = self.paths;
        state.beads = self.beads;
        state.rescale = self.rescale;
        state.provenance = self.provenance;
        state.active_stroke = None;
        state.packing.stop();
    }
}

/// Einfacher Undo/Redo-Manager mit Snapshotting.
#[derive(Default)]
pub struct EditHistory {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    max_depth: usize,
}

impl EditHistory {
    /// Erstellt einen neuen History-Manager mit maximaler Tiefe.
    pub fn new_with_capacity(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::with_capacity(max_depth.min(64)),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Nimmt einen vorab erstellten Snapshot auf und leert den Redo-Stack.
    pub fn record_snapshot(&mut self, snap: Snapshot) {
        if self.undo_stack.len() >= self.max_depth {
            self.undo_stack.remove(0);
        }
        self.undo_stack.push(snap);
        self.redo_stack.clear();
    }

    /// Prüft ob Undo möglich ist.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Prüft ob Redo möglich ist.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Holt den letzten Undo-Eintrag und legt `current` auf den Redo-Stack.
    pub fn pop_undo_with_current(&mut self, current: Snapshot) -> Option<Snapshot> {
        let prev = self.undo_stack.pop()?;
        if self.redo_stack.len() >= self.max_depth {
            self.redo_stack.remove(0);
        }
        self.redo_stack.push(current);
        Some(prev)
    }

    /// Holt den letzten Redo-Eintrag und legt `current` auf den Undo-Stack.
    pub fn pop_redo_with_current(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.redo_stack.pop()?;
        if self.undo_stack.len() >= self.max_depth {
            self.undo_stack.remove(0);
        }
        self.undo_stack.push(current);
        Some(next)
    }

    /// Verwirft alle Einträge (z.B. nach dem Laden eines Designs).
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
