//! Handler für Skalierung, Fit und Packing-Ticks.

use crate::app::use_cases;
use crate::app::DesignState;
use crate::core::PackingReport;
use glam::Vec2;

/// Setzt die Skalierung in Prozent.
pub fn set_scale(state: &mut DesignState, percentage: f32) {
    use_cases::scale::set_scale(state, percentage);
}

/// Beendet die Skalierungs-Geste.
pub fn finish_scale(state: &mut DesignState) {
    use_cases::scale::finish_scale(state);
}

/// Zentriert das Design und packt.
pub fn fit(state: &mut DesignState, target: Vec2) {
    use_cases::scale::fit_to(state, target);
}

/// Frame-Tick.
pub fn tick(state: &mut DesignState, dt: f32) -> Option<PackingReport> {
    use_cases::scale::tick(state, dt)
}
