//! Use-Cases für Perlen: Platzieren, Ziehen, Drehen, Löschen.

use crate::app::history::Snapshot;
use crate::app::{DesignState, EditFeedback};
use crate::core::{BeadId, DragRelease, Footprint, PayloadHandle, ReleaseSettings};
use glam::Vec2;

/// Platziert eine Perle am nächsten Pfadpunkt im engen Platzierungs-Radius.
pub fn place_bead(
    state: &mut DesignState,
    point: Vec2,
    footprint: Footprint,
    payload: PayloadHandle,
) {
    state.packing.stop();
    let snapshot = Snapshot::from_state(state);
    let radius = state.options.placement_radius;

    let feedback = match state
        .beads
        .place(&state.paths, point, footprint, payload, radius)
    {
        Ok(id) => {
            state.history.record_snapshot(snapshot);
            EditFeedback::BeadPlaced(id)
        }
        Err(rejection) => {
            log::debug!("Platzierung bei {:?} abgelehnt: {}", point, rejection);
            EditFeedback::PlacementRejected(rejection)
        }
    };
    state.last_feedback = Some(feedback);
}

/// Beginnt das Ziehen einer Perle.
pub fn begin_drag(state: &mut DesignState, bead_id: BeadId) {
    if state.beads.get(bead_id).is_none() {
        log::warn!("Drag für unbekannte Perle {:?} ignoriert", bead_id);
        return;
    }
    state.packing.stop();
    state.record_undo_snapshot();
    state.beads.begin_drag(bead_id);
}

/// Bindet die gezogene Perle an den nächsten Punkt aller Pfade.
pub fn drag_to(state: &mut DesignState, point: Vec2) {
    let radius = state.options.drag_snap_radius;
    if !state.beads.drag_to(&state.paths, point, radius) {
        log::trace!("Drag bei {:?}: kein Pfad in Reichweite", point);
    }
}

/// Beendet den Drag und löst Kollisionen auf.
pub fn release(state: &mut DesignState) {
    let Some(bead_id) = state.beads.dragged_bead() else {
        log::debug!("ReleaseBead ohne aktiven Drag ignoriert");
        return;
    };
    let settings = ReleaseSettings::from_options(&state.options);

    let feedback = match state.beads.release_drag(&state.paths, settings) {
        DragRelease::Settled { shifted } => EditFeedback::DragSettled { bead_id, shifted },
        DragRelease::Reverted => {
            log::info!("Perle {:?} ohne freien Platz, zurückgesetzt", bead_id);
            EditFeedback::DragReverted(bead_id)
        }
        DragRelease::NotDragging => return,
    };
    state.last_feedback = Some(feedback);
}

/// Setzt die Orientierung einer Perle; bei Kollision wird abgelehnt.
pub fn rotate(state: &mut DesignState, bead_id: BeadId, radians: f32) {
    let snapshot = Snapshot::from_state(state);
    if state.beads.rotate(&state.paths, bead_id, radians) {
        state.history.record_snapshot(snapshot);
    } else if state.beads.get(bead_id).is_some() {
        state.last_feedback = Some(EditFeedback::RotationRejected(bead_id));
    }
}

/// Löscht eine Perle.
pub fn delete(state: &mut DesignState, bead_id: BeadId) {
    if state.beads.get(bead_id).is_none() {
        log::debug!("Löschen: Perle {:?} existiert nicht", bead_id);
        return;
    }
    state.packing.stop();
    state.record_undo_snapshot();
    state.beads.remove(bead_id);
    log::info!("Perle {:?} gelöscht", bead_id);
}
