//! Nearest-Point-Abfrage über alle Pfade eines `PathSet`.
//!
//! Jeder Punkt ist Kandidat, jedes nicht-entartete Segment steuert seine
//! geklemmte Lotprojektion bei. Segment-Treffer nahe einem Segmentende
//! (Projektionsparameter außerhalb `[0.05, 0.95]`) werden verworfen; dort
//! greift der Punkt-Kandidat. Ein Kandidat muss strikt näher liegen als der
//! bisher beste, der mit dem Suchradius startet.

use super::path::Path;
use super::path_set::{PathId, PathSet};
use crate::shared::options::{SEGMENT_DEADBAND_MAX, SEGMENT_DEADBAND_MIN};
use crate::shared::polyline::projection_parameter;
use glam::Vec2;

/// Art des Treffers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathHitKind {
    /// Bestehender Punkt des Pfads
    Vertex {
        /// Index des Punkts
        vertex_index: usize,
    },
    /// Punkt im Inneren eines Segments
    Segment {
        /// Index des Segments
        segment_index: usize,
        /// Segmentanteil in `[0.05, 0.95]`
        t: f32,
    },
}

/// Ergebnis einer Nearest-Point-Abfrage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathHit {
    /// Getroffener Pfad
    pub path_id: PathId,
    /// Punkt- oder Segment-Treffer
    pub kind: PathHitKind,
    /// Nächster Punkt auf dem Pfad
    pub point: Vec2,
    /// Abstand zum Abfragepunkt
    pub distance: f32,
}

impl PathHit {
    /// Übersetzt den Treffer in eine `(segment_index, t)`-Bindung.
    ///
    /// Ein Punkt-Treffer bindet an `t = 0` des Segments, das an ihm beginnt;
    /// der letzte Punkt bindet an `t = 1` des letzten Segments.
    pub fn binding(&self, path: &Path) -> (usize, f32) {
        match self.kind {
            PathHitKind::Segment { segment_index, t } => (segment_index, t),
            PathHitKind::Vertex { vertex_index } => {
                let last_segment = path.segment_count().saturating_sub(1);
                if vertex_index >= path.segment_count() {
                    (last_segment, 1.0)
                } else {
                    (vertex_index, 0.0)
                }
            }
        }
    }

    /// `true` wenn der Treffer im Inneren eines Segments liegt.
    pub fn is_segment_interior(&self) -> bool {
        matches!(self.kind, PathHitKind::Segment { .. })
    }
}

/// Sucht den nächsten Punkt auf irgendeinem Pfad innerhalb von `radius`.
pub fn nearest_on_paths(path_set: &PathSet, query: Vec2, radius: f32) -> Option<PathHit> {
    let mut best_distance = radius;
    let mut best: Option<PathHit> = None;

    for (path_id, path) in path_set.iter() {
        if !path.is_usable() {
            continue;
        }

        for (vertex_index, vertex) in path.points().iter().enumerate() {
            let distance = vertex.distance(query);
            if distance < best_distance {
                best_distance = distance;
                best = Some(PathHit {
                    path_id,
                    kind: PathHitKind::Vertex { vertex_index },
                    point: *vertex,
                    distance,
                });
            }
        }

        for (segment_index, segment) in path.segments().iter().enumerate() {
            if segment.is_degenerate() {
                continue;
            }
            let t = projection_parameter(segment.start, segment.end, query).clamp(0.0, 1.0);
            if !(SEGMENT_DEADBAND_MIN..=SEGMENT_DEADBAND_MAX).contains(&t) {
                continue;
            }
            let point = segment.point_at(t);
            let distance = point.distance(query);
            if distance < best_distance {
                best_distance = distance;
                best = Some(PathHit {
                    path_id,
                    kind: PathHitKind::Segment { segment_index, t },
                    point,
                    distance,
                });
            }
        }
    }

    best
}
