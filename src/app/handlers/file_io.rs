//! Handler für Speichern und Laden von Designs.

use crate::app::persistence::SavedDesign;
use crate::app::use_cases;
use crate::app::DesignState;
use std::path::Path;

/// Erfasst das aktuelle Design für das Persistenz-Ziel.
pub fn capture(state: &DesignState) -> SavedDesign {
    use_cases::file_io::capture_design(state)
}

/// Lädt ein Design aus dem übergebenen Dateipfad.
pub fn load(state: &mut DesignState, path: &Path, pack: bool) -> anyhow::Result<()> {
    use_cases::file_io::load_design(state, path, pack)
}
