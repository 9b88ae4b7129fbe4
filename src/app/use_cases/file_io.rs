//! Use-Case-Funktionen für Speichern und Laden von Designs.
//! Dateisystem-Zugriffe laufen über `app::persistence`.

use crate::app::persistence::{load_design_file, SavedDesign};
use crate::app::{DesignState, EditFeedback};
use crate::core::{PackingRequest, Path, StringProvenance};
use std::path::Path as FilePath;

/// Erfasst den aktuellen Stand für die Persistenz.
pub fn capture_design(state: &DesignState) -> SavedDesign {
    SavedDesign::capture(state)
}

/// Lädt ein Design aus einer JSON-Datei.
pub fn load_design(state: &mut DesignState, path: &FilePath, pack: bool) -> anyhow::Result<()> {
    let design = load_design_file(path)?;
    restore_design(state, design, pack);
    log::info!("Design geladen aus: {}", path.display());
    Ok(())
}

/// Stellt ein gespeichertes Design wieder her.
///
/// Reihenfolge: Pfade, Baseline aus dem gespeicherten Prozentwert, Perlen
/// (auf die neuen Pfad-IDs umgebogen und bereinigt), optional Packing.
pub fn restore_design(state: &mut DesignState, design: SavedDesign, pack: bool) {
    state.packing.stop();
    state.active_stroke = None;
    state.scale_gesture_active = false;
    state.history.clear();

    let id_map = state
        .paths
        .replace_all_remapped(design.paths.into_iter().map(Path::new));
    if state.paths.is_empty() {
        state.rescale.reset();
    } else {
        state
            .rescale
            .restore_from_percentage(&state.paths, design.scale_percentage);
    }

    // Verworfene Pfade verschieben die IDs der folgenden
    state.beads.clear();
    let mut unbound = 0usize;
    for mut bead in design.beads {
        match id_map.get(bead.binding.path_id).copied().flatten() {
            Some(path_id) => {
                bead.binding.path_id = path_id;
                state.beads.insert_restored(bead);
            }
            None => unbound += 1,
        }
    }
    let dropped = unbound + state.beads.sanitize(&state.paths).len();
    if dropped > 0 {
        log::warn!("{} Perlen beim Laden verworfen", dropped);
    }
    state.provenance = StringProvenance::from_kind(design.string_kind);

    state.last_feedback = Some(EditFeedback::DesignLoaded {
        paths: state.paths.len(),
        beads: state.beads.len(),
    });
    log::info!(
        "Design wiederhergestellt: {} Pfade, {} Perlen, Skalierung {:.1} %",
        state.paths.len(),
        state.beads.len(),
        state.rescale.percentage()
    );

    if pack {
        let request = PackingRequest::settle(state.options.packing_base_speed);
        super::scale::start_packing(state, request);
    }
}
