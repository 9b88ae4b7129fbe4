//! Erfassung eines Zeichenstrichs bis zum Commit als neuer Pfad.
//!
//! Anfang und Ende docken innerhalb des Andock-Radius an bestehende Pfade an.
//! Landet ein Andockpunkt im Inneren eines Segments, wird der bestehende Pfad
//! dort geteilt. Zwischen weit auseinanderliegenden Zeigerpositionen werden
//! Punkte interpoliert.

use super::nearest::{nearest_on_paths, PathHit, PathHitKind};
use super::path::Path;
use super::path_set::{PathId, PathSet};
use crate::shared::options::{EngineOptions, FUSE_RADIUS, STROKE_DENSITY, STROKE_START_TRIM_RADIUS};
use crate::shared::polyline::interpolate_between;
use glam::Vec2;

/// Radius, mit dem ein bereits angedockter Startpunkt beim Commit wiedergefunden wird.
const START_REFIND_RADIUS: f32 = 0.001;
/// Segmentanteile näher als dieser Wert an 0 oder 1 liegen auf einem Punkt.
const SPLIT_T_EPSILON: f32 = 1e-4;

/// Parameter der Strich-Erfassung.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeSettings {
    /// Maximaler Punktabstand
    pub density: f32,
    /// Andock-Radius für Anfang und Ende
    pub fuse_radius: f32,
    /// Start-Trim-Radius
    pub start_trim_radius: f32,
}

impl Default for StrokeSettings {
    fn default() -> Self {
        Self {
            density: STROKE_DENSITY,
            fuse_radius: FUSE_RADIUS,
            start_trim_radius: STROKE_START_TRIM_RADIUS,
        }
    }
}

impl StrokeSettings {
    /// Übernimmt die Werte aus den Engine-Optionen.
    pub fn from_options(options: &EngineOptions) -> Self {
        Self {
            density: options.stroke_density,
            fuse_radius: options.fuse_radius,
            start_trim_radius: options.stroke_start_trim_radius,
        }
    }
}

/// Ein durch Andocken geteiltes Segment eines bestehenden Pfads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexSplit {
    /// Geteilter Pfad
    pub path_id: PathId,
    /// Geteiltes Segment (neuer Punkt liegt bei Index `segment_index + 1`)
    pub segment_index: usize,
    /// Segmentanteil des neuen Punkts
    pub t: f32,
}

/// Ergebnis von `StrokeBuilder::finish`.
#[derive(Debug, Clone, PartialEq)]
pub enum StrokeCommit {
    /// Neuer Pfad übernommen
    Committed {
        /// ID des neuen Pfads
        path_id: PathId,
        /// Durch Andocken geteilte Segmente, in Ausführungsreihenfolge
        splits: Vec<VertexSplit>,
    },
    /// Strich hatte weniger als 2 Punkte
    Discarded,
}

/// Laufender Zeichenstrich.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeBuilder {
    points: Vec<Vec2>,
    start_fuse: Option<PathHit>,
    settings: StrokeSettings,
}

impl StrokeBuilder {
    /// Beginnt einen Strich; der Startpunkt dockt ggf. an einen bestehenden Pfad an.
    pub fn begin(path_set: &PathSet, point: Vec2, settings: StrokeSettings) -> Self {
        let fuse = nearest_on_paths(path_set, point, settings.fuse_radius);
        let start = fuse.map_or(point, |hit| hit.point);
        if let Some(hit) = fuse {
            log::debug!("Strich-Anfang dockt an Pfad {} an", hit.path_id);
        }
        Self {
            points: vec![start],
            start_fuse: fuse,
            settings,
        }
    }

    /// Bisher erfasste Punkte.
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// `true` wenn der Anfang an einen bestehenden Pfad angedockt ist.
    pub fn is_start_fused(&self) -> bool {
        self.start_fuse.is_some()
    }

    /// Verarbeitet eine neue Zeigerposition.
    ///
    /// Solange nur der Startpunkt existiert und der Zeiger in dessen Nähe
    /// bleibt, wird nichts angehängt. Größere Lücken werden mit gleichmäßig
    /// verteilten Zwischenpunkten aufgefüllt.
    pub fn extend(&mut self, point: Vec2) {
        let Some(&last) = self.points.last() else {
            self.points.push(point);
            return;
        };

        if self.points.len() == 1 && last.distance(point) < self.settings.start_trim_radius {
            return;
        }

        if last.distance(point) > self.settings.density {
            self.points
                .extend(interpolate_between(last, point, self.settings.density));
        }
    }

    /// Schließt den Strich ab und übernimmt ihn als neuen Pfad.
    ///
    /// Das Ende dockt ggf. an: überstehende Punkte innerhalb des Andock-Radius
    /// werden entfernt (mindestens ein Punkt bleibt) und der exakte
    /// Andockpunkt angehängt.
    pub fn finish(mut self, path_set: &mut PathSet) -> StrokeCommit {
        let Some(&last) = self.points.last() else {
            return StrokeCommit::Discarded;
        };

        let end_fuse = nearest_on_paths(path_set, last, self.settings.fuse_radius);
        if let Some(hit) = end_fuse {
            while self.points.len() > 1
                && self
                    .points
                    .last()
                    .is_some_and(|p| p.distance(hit.point) < self.settings.fuse_radius)
            {
                self.points.pop();
            }
            self.points.push(hit.point);
        }

        if self.points.len() < 2 {
            log::debug!("Strich mit {} Punkt(en) verworfen", self.points.len());
            return StrokeCommit::Discarded;
        }

        let mut splits = Vec::new();
        if let Some(hit) = end_fuse {
            if let Some(split) = split_at_hit(path_set, &hit) {
                splits.push(split);
            }
        }
        if let Some(hit) = self.start_fuse.filter(PathHit::is_segment_interior) {
            // Ein End-Split kann das Segment des Starts verschoben haben
            if let Some(split) = split_at_point(path_set, hit.path_id, self.points[0]) {
                splits.push(split);
            }
        }

        let point_count = self.points.len();
        match path_set.push_path(Path::new(self.points)) {
            Some(path_id) => {
                log::info!(
                    "Strich übernommen als Pfad {} ({} Punkte, {} Splits)",
                    path_id,
                    point_count,
                    splits.len()
                );
                StrokeCommit::Committed { path_id, splits }
            }
            None => StrokeCommit::Discarded,
        }
    }
}

/// Teilt das getroffene Segment, wenn der Treffer in dessen Innerem liegt.
fn split_at_hit(path_set: &mut PathSet, hit: &PathHit) -> Option<VertexSplit> {
    let PathHitKind::Segment { segment_index, t } = hit.kind else {
        return None;
    };
    if !path_set.insert_vertex(hit.path_id, segment_index + 1, hit.point) {
        return None;
    }
    log::debug!(
        "Pfad {} an Segment {} (t = {:.3}) geteilt",
        hit.path_id,
        segment_index,
        t
    );
    Some(VertexSplit {
        path_id: hit.path_id,
        segment_index,
        t,
    })
}

/// Teilt einen Pfad an einem bereits auf ihm liegenden Punkt.
///
/// Ohne Totzone: nach einem vorherigen Split darf der Punkt beliebig nahe an
/// einem Segmentende liegen, solange er nicht mit einem Punkt zusammenfällt.
fn split_at_point(path_set: &mut PathSet, path_id: PathId, point: Vec2) -> Option<VertexSplit> {
    let projection = path_set.get(path_id)?.project(point)?;
    if projection.distance > START_REFIND_RADIUS {
        log::debug!("Strich-Anfang liegt nicht mehr auf Pfad {}", path_id);
        return None;
    }
    if projection.t <= SPLIT_T_EPSILON || projection.t >= 1.0 - SPLIT_T_EPSILON {
        return None;
    }
    let hit = PathHit {
        path_id,
        kind: PathHitKind::Segment {
            segment_index: projection.segment_index,
            t: projection.t,
        },
        point: projection.point,
        distance: projection.distance,
    };
    split_at_hit(path_set, &hit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn draw(path_set: &PathSet, from: Vec2, to: Vec2, moves: usize) -> StrokeBuilder {
        let mut stroke = StrokeBuilder::begin(path_set, from, StrokeSettings::default());
        for i in 1..=moves {
            stroke.extend(from.lerp(to, i as f32 / moves as f32));
        }
        stroke
    }

    #[test]
    fn test_start_trim_ignoriert_kleine_bewegungen() {
        let set = PathSet::new();
        let mut stroke = StrokeBuilder::begin(&set, Vec2::ZERO, StrokeSettings::default());
        stroke.extend(Vec2::new(0.3, 0.0));
        assert_eq!(stroke.points().len(), 1);
        stroke.extend(Vec2::new(0.6, 0.0));
        assert!(stroke.points().len() > 1);
    }

    #[test]
    fn test_interpolation_haelt_dichte_ein() {
        let set = PathSet::new();
        let stroke = draw(&set, Vec2::ZERO, Vec2::new(5.0, 0.0), 5);
        for pair in stroke.points().windows(2) {
            assert!(pair[0].distance(pair[1]) <= 0.05 + 1e-5);
        }
    }

    #[test]
    fn test_einzelpunkt_wird_verworfen() {
        let mut set = PathSet::new();
        let stroke = StrokeBuilder::begin(&set, Vec2::ZERO, StrokeSettings::default());
        assert_eq!(stroke.finish(&mut set), StrokeCommit::Discarded);
        assert!(set.is_empty());
    }

    #[test]
    fn test_ende_auf_segmentmitte_teilt_pfad() {
        let mut set = PathSet::from_paths([Path::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
        ])]);

        let stroke = draw(&set, Vec2::new(2.0, 3.0), Vec2::new(2.0, 0.0), 30);
        let commit = stroke.finish(&mut set);

        let StrokeCommit::Committed { path_id, splits } = commit else {
            panic!("Commit erwartet");
        };
        assert_eq!(path_id, 1);
        assert_eq!(set.get(0).expect("Pfad").point_count(), 3);
        assert_eq!(splits.len(), 1);
        assert_eq!(splits[0].segment_index, 0);
        assert_relative_eq!(splits[0].t, 0.5, epsilon = 1e-5);

        let new_path = set.get(1).expect("Pfad");
        assert_eq!(new_path.last_point(), Some(Vec2::new(2.0, 0.0)));
        // Überhang innerhalb des Andock-Radius wurde entfernt
        let before_last = new_path.points()[new_path.point_count() - 2];
        assert!(before_last.distance(Vec2::new(2.0, 0.0)) >= 1.0 - 1e-5);
    }

    #[test]
    fn test_anfang_dockt_an_punkt_an() {
        let mut set = PathSet::from_paths([Path::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
        ])]);
        let stroke = draw(&set, Vec2::new(4.3, 0.2), Vec2::new(8.0, 0.0), 10);
        assert!(stroke.is_start_fused());
        assert_eq!(stroke.points()[0], Vec2::new(4.0, 0.0));

        let commit = stroke.finish(&mut set);
        let StrokeCommit::Committed { splits, .. } = commit else {
            panic!("Commit erwartet");
        };
        assert!(splits.is_empty());
        assert_eq!(set.topology(), vec![2, set.get(1).expect("Pfad").point_count()]);
        assert_eq!(set.junction_partners(0, crate::core::EndpointRole::End).len(), 1);
    }

    #[test]
    fn test_anfang_auf_segmentmitte_teilt_ebenfalls() {
        let mut set = PathSet::from_paths([Path::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
        ])]);
        let stroke = draw(&set, Vec2::new(1.0, 0.5), Vec2::new(1.0, 5.0), 20);
        let commit = stroke.finish(&mut set);
        let StrokeCommit::Committed { splits, .. } = commit else {
            panic!("Commit erwartet");
        };
        assert_eq!(splits.len(), 1);
        assert_relative_eq!(splits[0].t, 0.25, epsilon = 1e-5);
        assert_eq!(set.get(0).expect("Pfad").point_count(), 3);
    }

    #[test]
    fn test_anfang_und_ende_im_selben_segment_teilen_beide() {
        let mut set = PathSet::from_paths([Path::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
        ])]);
        let mut stroke = draw(&set, Vec2::new(2.0, 0.0), Vec2::new(2.0, 3.0), 10);
        for i in 0..=30 {
            stroke.extend(Vec2::new(2.1, 3.0 - 0.1 * i as f32));
        }

        let commit = stroke.finish(&mut set);
        let StrokeCommit::Committed { splits, .. } = commit else {
            panic!("Commit erwartet");
        };

        // End-Split bei x = 2.1; der Start liegt danach bei t = 2.0 / 2.1 > 0.95
        assert_eq!(splits.len(), 2);
        assert_relative_eq!(splits[0].t, 0.21, epsilon = 1e-3);
        assert_eq!(splits[1].segment_index, 0);
        assert_relative_eq!(splits[1].t, 2.0 / 2.1, epsilon = 1e-3);

        let base = set.get(0).expect("Pfad");
        assert_eq!(base.point_count(), 4);
        assert_relative_eq!(base.points()[1].x, 2.0, epsilon = 1e-5);
        assert_relative_eq!(base.points()[2].x, 2.1, epsilon = 1e-3);
    }
}
