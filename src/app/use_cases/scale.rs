//! Use-Cases für Skalierung, Zentrierung und Packing.

use crate::app::{DesignState, EditFeedback};
use crate::core::{PackingReport, PackingRequest, PackingStatus, RescaleOutcome};
use glam::Vec2;

/// Wendet eine Skalierung aus der Baseline an.
///
/// Eine Slider-Geste ergibt genau einen Undo-Schritt.
pub fn set_scale(state: &mut DesignState, percentage: f32) {
    if state.paths.is_empty() {
        log::debug!("SetScale ohne Geometrie ignoriert");
        return;
    }
    state.packing.stop();
    if !state.scale_gesture_active {
        state.record_undo_snapshot();
        state.scale_gesture_active = true;
    }

    match state.rescale.apply_scale(&mut state.paths, percentage) {
        RescaleOutcome::Applied { factor } => {
            log::debug!("Skalierung {:.1} % (Faktor {:.3})", percentage, factor);
        }
        RescaleOutcome::Recaptured => {
            state.last_feedback = Some(EditFeedback::ScaleRecaptured);
        }
        RescaleOutcome::NoGeometry => {}
    }
}

/// Beendet die Slider-Geste und startet das Packing mit passender Geschwindigkeit.
pub fn finish_scale(state: &mut DesignState) {
    state.scale_gesture_active = false;
    start_packing(state, scaled_request(state));
}

/// Packing-Parameter zur aktuellen Skalierung und Basisgeschwindigkeit.
pub fn scaled_request(state: &DesignState) -> PackingRequest {
    PackingRequest::for_scale_with(state.options.packing_base_speed, state.rescale.percentage())
}

/// Zentriert das Design auf `target` und packt anschließend die Perlen.
///
/// Die Größe der Kette bleibt unverändert; die Baseline wird mitverschoben.
/// Ein laufender Packing-Lauf wird nur neu parametriert, seine Uhr läuft weiter.
pub fn fit_to(state: &mut DesignState, target: Vec2) {
    let Some(centroid) = state.paths.centroid() else {
        log::debug!("Fit ohne Geometrie ignoriert");
        return;
    };
    state.record_undo_snapshot();

    let delta = target - centroid;
    state.paths.translate(delta);
    state.rescale.translate_baseline(delta);
    log::info!("Design um {:?} verschoben", delta);

    start_packing(state, scaled_request(state));
}

/// Startet (oder parametriert) einen Packing-Lauf, sofern Perlen vorhanden sind.
pub fn start_packing(state: &mut DesignState, request: PackingRequest) {
    if state.beads.is_empty() || state.paths.is_empty() {
        return;
    }
    state.packing.start(&state.paths, &mut state.beads, request);
}

/// Führt einen Packing-Schritt aus und liefert den Bericht eines beendeten Laufs.
pub fn tick(state: &mut DesignState, dt: f32) -> Option<PackingReport> {
    match state.packing.tick(&state.paths, &mut state.beads, dt) {
        PackingStatus::Finished(report) => {
            state.last_feedback = Some(EditFeedback::PackingFinished(report));
            Some(report)
        }
        PackingStatus::Idle | PackingStatus::Active => None,
    }
}
