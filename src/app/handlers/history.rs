//! Handler für Undo/Redo-Operationen.

use crate::app::history::Snapshot;
use crate::app::DesignState;

/// Macht die letzte Änderung rückgängig. Gibt `true` zurück, wenn ein
/// Schritt angewendet wurde.
pub fn undo(state: &mut DesignState) -> bool {
    let current = Snapshot::from_state(state);
    let Some(previous) = state.history.pop_undo_with_current(current) else {
        log::debug!("Undo: nichts zu tun");
        return false;
    };
    restore(state, previous);
    log::info!(
        "Undo ausgeführt: {} Pfade, {} Perlen",
        state.path_count(),
        state.bead_count()
    );
    true
}

/// Wiederholt eine rückgängig gemachte Änderung.
pub fn redo(state: &mut DesignState) -> bool {
    let current = Snapshot::from_state(state);
    let Some(next) = state.history.pop_redo_with_current(current) else {
        log::debug!("Redo: nichts zu tun");
        return false;
    };
    restore(state, next);
    log::info!(
        "Redo ausgeführt: {} Pfade, {} Perlen",
        state.path_count(),
        state.bead_count()
    );
    true
}

/// Eine offene Slider-Geste endet mit jedem History-Schritt, damit der
/// nächste `SetScale` wieder einen eigenen Undo-Schritt anlegt.
fn restore(state: &mut DesignState, snapshot: Snapshot) {
    snapshot.apply_to(state);
    state.scale_gesture_active = false;
}
