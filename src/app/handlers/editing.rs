//! Handler für Strich-Erfassung, Radierer, Leeren und Vorlagen-Import.

use crate::app::use_cases;
use crate::app::DesignState;
use glam::Vec2;

/// Beginnt einen neuen Strich an der übergebenen Position.
pub fn begin_stroke(state: &mut DesignState, point: Vec2) {
    use_cases::editing::begin_stroke(state, point);
}

/// Verlängert den aktiven Strich.
pub fn extend_stroke(state: &mut DesignState, point: Vec2) {
    use_cases::editing::extend_stroke(state, point);
}

/// Schließt den aktiven Strich ab.
pub fn finish_stroke(state: &mut DesignState) {
    use_cases::editing::finish_stroke(state);
}

/// Verwirft den aktiven Strich.
pub fn cancel_stroke(state: &mut DesignState) {
    use_cases::editing::cancel_stroke(state);
}

/// Radiert das nächstgelegene Pfadende.
pub fn erase_at(state: &mut DesignState, point: Vec2) {
    use_cases::editing::erase_at(state, point);
}

/// Entfernt die gesamte Geometrie.
pub fn clear_all(state: &mut DesignState) {
    use_cases::editing::clear_all(state);
}

/// Importiert Vorlagen-Pfade.
pub fn import_paths(state: &mut DesignState, paths: Vec<Vec<Vec2>>) {
    use_cases::editing::import_paths(state, paths);
}
