//! Use-Cases für Pfad-Bearbeitung: Zeichnen, Radieren, Leeren, Import.

use crate::app::history::Snapshot;
use crate::app::{DesignState, EditFeedback};
use crate::core::{
    erase_nearest_tip, looks_like_preset, EraseSettings, Path, StrokeBuilder, StrokeCommit,
    StrokeSettings,
};
use glam::Vec2;

/// Beginnt einen neuen Strich. Ein laufendes Packing wird abgebrochen.
pub fn begin_stroke(state: &mut DesignState, point: Vec2) {
    state.packing.stop();
    if state.active_stroke.is_some() {
        log::warn!("Neuer Strich begonnen, vorheriger Strich wird verworfen");
    }
    let settings = StrokeSettings::from_options(&state.options);
    state.active_stroke = Some(StrokeBuilder::begin(&state.paths, point, settings));
}

/// Verlängert den aktiven Strich.
pub fn extend_stroke(state: &mut DesignState, point: Vec2) {
    match state.active_stroke.as_mut() {
        Some(stroke) => stroke.extend(point),
        None => log::debug!("ExtendStroke ohne aktiven Strich ignoriert"),
    }
}

/// Schließt den aktiven Strich ab.
///
/// Bei einem Commit werden Bindungen geteilter Pfade angepasst und die
/// Skalierungs-Baseline neu erfasst.
pub fn finish_stroke(state: &mut DesignState) {
    let Some(stroke) = state.active_stroke.take() else {
        log::debug!("FinishStroke ohne aktiven Strich ignoriert");
        return;
    };

    let snapshot = Snapshot::from_state(state);
    match stroke.finish(&mut state.paths) {
        StrokeCommit::Committed { path_id, splits } => {
            state.history.record_snapshot(snapshot);
            for split in &splits {
                state
                    .beads
                    .on_vertex_inserted(split.path_id, split.segment_index, split.t);
            }
            state.provenance.has_pen = true;
            state.rescale.capture_baseline(&state.paths);
            state.last_feedback = Some(EditFeedback::StrokeCommitted {
                path_id,
                splits: splits.len(),
            });
        }
        StrokeCommit::Discarded => {
            state.last_feedback = Some(EditFeedback::StrokeDiscarded);
        }
    }
}

/// Verwirft den aktiven Strich ohne Änderung der Geometrie.
pub fn cancel_stroke(state: &mut DesignState) {
    if state.active_stroke.take().is_some() {
        log::debug!("Aktiver Strich verworfen");
    }
}

/// Radiert das nächstgelegene Pfadende an `point`.
///
/// Die Trefferschwelle wächst mit der aktuellen Skalierung.
pub fn erase_at(state: &mut DesignState, point: Vec2) {
    state.packing.stop();
    let settings = EraseSettings {
        threshold: state.options.erase_threshold(state.rescale.percentage()),
        protection_margin: state.options.erase_protection_margin,
    };

    let snapshot = Snapshot::from_state(state);
    let Some(erased) = erase_nearest_tip(&mut state.paths, &mut state.beads, point, settings)
    else {
        return;
    };

    state.history.record_snapshot(snapshot);
    if state.paths.is_empty() {
        state.rescale.reset();
        state.provenance.clear();
    } else {
        state.rescale.capture_baseline(&state.paths);
    }
    state.last_feedback = Some(EditFeedback::TipErased(erased));
}

/// Entfernt alle Pfade, Perlen und die Skalierung.
pub fn clear_all(state: &mut DesignState) {
    if state.paths.is_empty() && state.beads.is_empty() {
        log::debug!("ClearAll: nichts zu tun");
        return;
    }
    state.record_undo_snapshot();
    state.packing.stop();
    state.active_stroke = None;
    state.paths.clear();
    state.beads.clear();
    state.rescale.reset();
    state.provenance.clear();
    log::info!("Design geleert");
}

/// Ersetzt die Geometrie durch importierte Vorlagen-Pfade.
///
/// Perlen der alten Geometrie werden verworfen.
pub fn import_paths(state: &mut DesignState, paths: Vec<Vec<Vec2>>) {
    state.record_undo_snapshot();
    state.packing.stop();
    state.active_stroke = None;
    state.beads.clear();

    let uniform = paths.iter().filter(|points| looks_like_preset(points)).count();
    let accepted = state.paths.replace_all(paths.into_iter().map(Path::new));
    state.provenance.clear();
    state.provenance.has_preset = accepted > 0;
    state.rescale.reset();
    if accepted > 0 {
        state.rescale.capture_baseline(&state.paths);
    }
    log::info!(
        "{} Vorlagen-Pfade importiert ({} gleichmäßig abgetastet)",
        accepted,
        uniform
    );
}
