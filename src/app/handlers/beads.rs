//! Handler für Perlen-Platzierung, Drag, Drehung und Löschen.

use crate::app::use_cases;
use crate::app::DesignState;
use crate::core::{BeadId, Footprint, PayloadHandle};
use glam::Vec2;

/// Platziert eine Perle.
pub fn place(state: &mut DesignState, point: Vec2, footprint: Footprint, payload: PayloadHandle) {
    use_cases::beads::place_bead(state, point, footprint, payload);
}

/// Beginnt das Ziehen einer Perle.
pub fn begin_drag(state: &mut DesignState, bead_id: BeadId) {
    use_cases::beads::begin_drag(state, bead_id);
}

/// Zieht die aktive Perle zur übergebenen Position.
pub fn drag(state: &mut DesignState, point: Vec2) {
    use_cases::beads::drag_to(state, point);
}

/// Beendet den Drag.
pub fn release(state: &mut DesignState) {
    use_cases::beads::release(state);
}

/// Dreht eine Perle.
pub fn rotate(state: &mut DesignState, bead_id: BeadId, radians: f32) {
    use_cases::beads::rotate(state, bead_id, radians);
}

/// Löscht eine Perle.
pub fn delete(state: &mut DesignState, bead_id: BeadId) {
    use_cases::beads::delete(state, bead_id);
}
