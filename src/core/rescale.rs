//! Gleichmäßige Skalierung aller Pfade um den Schwerpunkt einer Baseline.
//!
//! Die Baseline ist eine tiefe Kopie aller Punktlisten bei Skalierung 0 %.
//! Perlen-Bindungen bleiben unverändert; ihre Weltpositionen folgen aus
//! `(segment_index, t)` automatisch der skalierten Geometrie.

use super::path_set::PathSet;
use crate::shared::options::SCALE_FACTOR_SPAN;
use crate::shared::polyline;
use glam::Vec2;

/// Skalierungsfaktor zu einem Prozentwert: `1 + (p / 100) * 4`, `p` in `[0, 100]`.
pub fn scale_factor(percentage: f32) -> f32 {
    1.0 + (percentage.clamp(0.0, 100.0) / 100.0) * SCALE_FACTOR_SPAN
}

/// Ergebnis von `RescaleEngine::apply_scale`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RescaleOutcome {
    /// Geometrie wurde mit `factor` aus der Baseline skaliert
    Applied {
        /// Verwendeter Faktor
        factor: f32,
    },
    /// Baseline passte nicht zur Topologie und wurde neu erfasst (Skalierung 0 %)
    Recaptured,
    /// Keine Geometrie vorhanden
    NoGeometry,
}

/// Erfasste Ausgangsgeometrie.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleBaseline {
    paths: Vec<Vec<Vec2>>,
}

impl ScaleBaseline {
    /// Tiefe Kopie aller Punktlisten.
    pub fn capture(path_set: &PathSet) -> Self {
        Self {
            paths: path_set.point_lists(),
        }
    }

    /// Punktlisten der Baseline.
    pub fn paths(&self) -> &[Vec<Vec2>] {
        &self.paths
    }

    /// Schwerpunkt aller Baseline-Punkte.
    pub fn centroid(&self) -> Option<Vec2> {
        polyline::centroid(self.paths.iter().flatten())
    }

    /// Prüft, ob Pfad- und Punktanzahl mit dem PathSet übereinstimmen.
    pub fn matches(&self, path_set: &PathSet) -> bool {
        self.paths.len() == path_set.len()
            && self
                .paths
                .iter()
                .zip(path_set.paths())
                .all(|(base, path)| base.len() == path.point_count())
    }
}

/// Verwaltet Baseline und aktuellen Skalierungs-Prozentwert.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RescaleEngine {
    baseline: Option<ScaleBaseline>,
    percentage: f32,
}

impl RescaleEngine {
    /// Erstellt eine Engine ohne Baseline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Aktueller Skalierungs-Prozentwert.
    pub fn percentage(&self) -> f32 {
        self.percentage
    }

    /// Aktueller Skalierungsfaktor.
    pub fn factor(&self) -> f32 {
        scale_factor(self.percentage)
    }

    /// Erfasste Baseline, falls vorhanden.
    pub fn baseline(&self) -> Option<&ScaleBaseline> {
        self.baseline.as_ref()
    }

    /// `true` wenn eine Baseline existiert und zur Topologie passt.
    pub fn is_in_sync(&self, path_set: &PathSet) -> bool {
        self.baseline
            .as_ref()
            .is_some_and(|baseline| baseline.matches(path_set))
    }

    /// Erfasst die aktuelle Geometrie als neue Baseline und setzt die Skalierung auf 0 %.
    pub fn capture_baseline(&mut self, path_set: &PathSet) {
        self.baseline = Some(ScaleBaseline::capture(path_set));
        self.percentage = 0.0;
        log::debug!(
            "Skalierungs-Baseline erfasst: {} Pfade, {} Punkte",
            path_set.len(),
            path_set.point_count()
        );
    }

    /// Verwirft die Baseline (z.B. nach dem Leeren aller Pfade).
    pub fn reset(&mut self) {
        self.baseline = None;
        self.percentage = 0.0;
    }

    /// Skaliert alle Punkte aus der Baseline um deren Schwerpunkt.
    ///
    /// Passt die Baseline nicht mehr zur Topologie, ist das ein Programmierfehler:
    /// Debug-Builds brechen ab, Release-Builds erfassen die Baseline neu und
    /// setzen die Skalierung auf 0 %.
    pub fn apply_scale(&mut self, path_set: &mut PathSet, percentage: f32) -> RescaleOutcome {
        if path_set.is_empty() {
            return RescaleOutcome::NoGeometry;
        }

        let Some(baseline) = self.baseline.as_ref() else {
            // Erste Nutzung: aktuelle Geometrie gilt als 0 %
            self.capture_baseline(path_set);
            return self.apply_scale(path_set, percentage);
        };

        if !baseline.matches(path_set) {
            debug_assert!(
                false,
                "Baseline passt nicht zur Topologie: {:?} vs {:?}",
                baseline.paths.iter().map(Vec::len).collect::<Vec<_>>(),
                path_set.topology()
            );
            log::warn!("Baseline passt nicht zur Topologie, wird neu erfasst");
            self.capture_baseline(path_set);
            return RescaleOutcome::Recaptured;
        }

        let Some(centroid) = baseline.centroid() else {
            return RescaleOutcome::NoGeometry;
        };
        let factor = scale_factor(percentage);
        path_set.map_points(|path_id, index, point| {
            baseline
                .paths
                .get(path_id)
                .and_then(|points| points.get(index))
                .map_or(point, |base| centroid + (*base - centroid) * factor)
        });
        self.percentage = percentage.clamp(0.0, 100.0);
        RescaleOutcome::Applied { factor }
    }

    /// Rekonstruiert die Baseline aus skalierter Geometrie und gespeichertem Prozentwert.
    ///
    /// Skalierung um den Schwerpunkt erhält den Schwerpunkt, daher wird der
    /// Schwerpunkt der aktuellen Punkte verwendet.
    pub fn restore_from_percentage(&mut self, path_set: &PathSet, percentage: f32) {
        let factor = scale_factor(percentage);
        let Some(centroid) = path_set.centroid() else {
            self.reset();
            return;
        };
        let paths = path_set
            .paths()
            .iter()
            .map(|path| {
                path.points()
                    .iter()
                    .map(|point| centroid + (*point - centroid) / factor)
                    .collect()
            })
            .collect();
        self.baseline = Some(ScaleBaseline { paths });
        self.percentage = percentage.clamp(0.0, 100.0);
        log::debug!(
            "Baseline aus Skalierung {:.1} % rekonstruiert (Faktor {:.3})",
            self.percentage,
            factor
        );
    }

    /// Verschiebt die Baseline mit, wenn die Geometrie verschoben wurde.
    pub fn translate_baseline(&mut self, delta: Vec2) {
        if let Some(baseline) = self.baseline.as_mut() {
            for point in baseline.paths.iter_mut().flatten() {
                *point += delta;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Path;
    use approx::assert_relative_eq;

    fn triangle_set() -> PathSet {
        PathSet::from_paths([Path::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(3.0, 0.0),
            Vec2::new(0.0, 3.0),
        ])])
    }

    #[test]
    fn test_scale_factor_grenzen() {
        assert_relative_eq!(scale_factor(0.0), 1.0);
        assert_relative_eq!(scale_factor(50.0), 3.0);
        assert_relative_eq!(scale_factor(100.0), 5.0);
        assert_relative_eq!(scale_factor(250.0), 5.0);
        assert_relative_eq!(scale_factor(-10.0), 1.0);
    }

    #[test]
    fn test_apply_scale_um_schwerpunkt() {
        let mut set = triangle_set();
        let mut engine = RescaleEngine::new();
        engine.capture_baseline(&set);

        let outcome = engine.apply_scale(&mut set, 25.0);
        assert_eq!(outcome, RescaleOutcome::Applied { factor: 2.0 });

        let points = set.get(0).expect("Pfad").points();
        // Schwerpunkt (1, 1) bleibt fix
        assert_relative_eq!(points[0].x, -1.0, epsilon = 1e-6);
        assert_relative_eq!(points[1].x, 5.0, epsilon = 1e-6);
        assert_relative_eq!(points[2].y, 5.0, epsilon = 1e-6);
        let centroid = set.centroid().expect("Schwerpunkt");
        assert_relative_eq!(centroid.x, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_erste_nutzung_erfasst_baseline() {
        let mut set = triangle_set();
        let mut engine = RescaleEngine::new();
        assert!(!engine.is_in_sync(&set));
        engine.apply_scale(&mut set, 0.0);
        assert!(engine.is_in_sync(&set));
    }

    #[test]
    fn test_restore_from_percentage_rekonstruiert_baseline() {
        let mut set = triangle_set();
        let mut engine = RescaleEngine::new();
        engine.capture_baseline(&set);
        engine.apply_scale(&mut set, 60.0);

        let mut restored = RescaleEngine::new();
        restored.restore_from_percentage(&set, 60.0);
        assert_relative_eq!(restored.percentage(), 60.0);

        let original = triangle_set();
        let baseline = restored.baseline().expect("Baseline");
        for (a, b) in baseline.paths()[0].iter().zip(original.get(0).expect("Pfad").points()) {
            assert_relative_eq!(a.x, b.x, epsilon = 1e-5);
            assert_relative_eq!(a.y, b.y, epsilon = 1e-5);
        }
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "Baseline passt nicht"))]
    fn test_topologie_aenderung_erfasst_baseline_neu() {
        let mut set = triangle_set();
        let mut engine = RescaleEngine::new();
        engine.capture_baseline(&set);
        engine.apply_scale(&mut set, 40.0);

        set.insert_vertex(0, 1, Vec2::new(1.0, 0.0));
        let outcome = engine.apply_scale(&mut set, 80.0);

        assert_eq!(outcome, RescaleOutcome::Recaptured);
        assert_relative_eq!(engine.percentage(), 0.0);
        assert!(engine.is_in_sync(&set));
    }

    #[test]
    fn test_translate_baseline() {
        let mut set = triangle_set();
        let mut engine = RescaleEngine::new();
        engine.capture_baseline(&set);

        set.translate(Vec2::new(10.0, 0.0));
        engine.translate_baseline(Vec2::new(10.0, 0.0));
        engine.apply_scale(&mut set, 0.0);

        assert_relative_eq!(set.get(0).expect("Pfad").points()[0].x, 10.0, epsilon = 1e-5);
    }
}
