//! Einzelner Pfad (Polyline) mit abgeleiteter Bogenlängen-Segmentierung.
//!
//! Die Punkte sind privat: jede Mutation baut die Segmentliste neu auf,
//! sodass nie eine veraltete Segmentierung gelesen werden kann.
//! Segment `i` verbindet immer Punkt `i` mit Punkt `i + 1`.

use crate::shared::options::{CLOSURE_EPSILON, DEGENERATE_SEGMENT_LENGTH};
use crate::shared::polyline::projection_parameter;
use glam::Vec2;

/// Abgeleitetes Segment zwischen zwei aufeinanderfolgenden Punkten.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSegment {
    /// Startpunkt (Punkt `i`)
    pub start: Vec2,
    /// Endpunkt (Punkt `i + 1`)
    pub end: Vec2,
    /// Normierte Richtung; `Vec2::ZERO` bei entartetem Segment
    pub direction: Vec2,
    /// Segmentlänge
    pub length: f32,
    /// Bogenlänge vom Pfadanfang bis `start`
    pub start_dist: f32,
    /// Bogenlänge vom Pfadanfang bis `end`
    pub end_dist: f32,
}

impl PathSegment {
    /// Entartete Segmente werden von allen Abfragen übersprungen.
    pub fn is_degenerate(&self) -> bool {
        self.length < DEGENERATE_SEGMENT_LENGTH
    }

    /// Punkt bei Segmentanteil `t` (0 = start, 1 = end).
    pub fn point_at(&self, t: f32) -> Vec2 {
        self.start.lerp(self.end, t)
    }
}

/// Ergebnis einer Projektion auf den Pfad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathProjection {
    /// Segment des nächsten Punkts
    pub segment_index: usize,
    /// Segmentanteil (geklemmt auf [0, 1])
    pub t: f32,
    /// Nächster Punkt auf dem Pfad
    pub point: Vec2,
    /// Abstand zwischen Abfragepunkt und `point`
    pub distance: f32,
    /// Bogenlänge von `point`
    pub arc_distance: f32,
}

/// Geordnete Polyline mit Bogenlängen-Cache.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    points: Vec<Vec2>,
    segments: Vec<PathSegment>,
    total_length: f32,
}

impl Path {
    /// Erstellt einen Pfad aus einer Punktliste und berechnet die Segmente.
    pub fn new(points: Vec<Vec2>) -> Self {
        let mut path = Self {
            points,
            segments: Vec::new(),
            total_length: 0.0,
        };
        path.rebuild_segments();
        path
    }

    /// Read-only Sicht auf alle Punkte.
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Anzahl der Punkte.
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Ein Pfad mit weniger als 2 Punkten ist ungültig und wird nicht abgefragt.
    pub fn is_usable(&self) -> bool {
        self.points.len() >= 2
    }

    /// Alle abgeleiteten Segmente.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Segment per Index.
    pub fn segment(&self, index: usize) -> Option<&PathSegment> {
        self.segments.get(index)
    }

    /// Anzahl der Segmente (`point_count - 1`, mindestens 0).
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Gesamte Bogenlänge.
    pub fn total_length(&self) -> f32 {
        self.total_length
    }

    /// Erster Punkt (Pfad-Anfang).
    pub fn first_point(&self) -> Option<Vec2> {
        self.points.first().copied()
    }

    /// Letzter Punkt (Pfad-Ende).
    pub fn last_point(&self) -> Option<Vec2> {
        self.points.last().copied()
    }

    /// Geschlossen, wenn Anfang und Ende näher als `CLOSURE_EPSILON` liegen.
    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) if self.points.len() >= 2 => {
                first.distance(*last) < CLOSURE_EPSILON
            }
            _ => false,
        }
    }

    // ── Mutation ────────────────────────────────────────────────────

    /// Hängt einen Punkt an. Die Verdichtung ist Sache des Aufrufers.
    pub fn append_point(&mut self, point: Vec2) {
        self.points.push(point);
        self.rebuild_segments();
    }

    /// Fügt einen Punkt an `index` ein (0..=len). Gibt `false` bei ungültigem Index zurück.
    pub fn insert_point(&mut self, index: usize, point: Vec2) -> bool {
        if index > self.points.len() {
            return false;
        }
        self.points.insert(index, point);
        self.rebuild_segments();
        true
    }

    /// Entfernt den ersten Punkt.
    pub fn remove_first(&mut self) -> Option<Vec2> {
        if self.points.is_empty() {
            return None;
        }
        let removed = self.points.remove(0);
        self.rebuild_segments();
        Some(removed)
    }

    /// Entfernt den letzten Punkt.
    pub fn remove_last(&mut self) -> Option<Vec2> {
        let removed = self.points.pop();
        if removed.is_some() {
            self.rebuild_segments();
        }
        removed
    }

    /// Verschiebt alle Punkte um `delta`.
    pub fn translate(&mut self, delta: Vec2) {
        self.map_points(|_, p| p + delta);
    }

    /// Schreibt jeden Punkt neu, ohne die Topologie zu ändern.
    pub fn map_points(&mut self, mut f: impl FnMut(usize, Vec2) -> Vec2) {
        for (index, point) in self.points.iter_mut().enumerate() {
            *point = f(index, *point);
        }
        self.rebuild_segments();
    }

    fn rebuild_segments(&mut self) {
        self.segments.clear();
        let mut dist = 0.0f32;
        for pair in self.points.windows(2) {
            let (start, end) = (pair[0], pair[1]);
            let length = start.distance(end);
            let direction = if length < DEGENERATE_SEGMENT_LENGTH {
                Vec2::ZERO
            } else {
                (end - start) / length
            };
            self.segments.push(PathSegment {
                start,
                end,
                direction,
                length,
                start_dist: dist,
                end_dist: dist + length,
            });
            dist += length;
        }
        self.total_length = dist;
    }

    // ── Bogenlängen-Abfragen ────────────────────────────────────────

    /// Bringt eine Bogenlänge in den gültigen Bereich:
    /// geschlossene Pfade wickeln modulo Gesamtlänge, offene werden geklemmt.
    pub fn normalize_distance(&self, distance: f32) -> f32 {
        if self.total_length <= 0.0 {
            return 0.0;
        }
        if self.is_closed() {
            distance.rem_euclid(self.total_length)
        } else {
            distance.clamp(0.0, self.total_length)
        }
    }

    /// Kürzeste vorzeichenbehaftete Bogenlängen-Differenz von `from` nach `to`.
    ///
    /// Auf geschlossenen Pfaden wird über die Naht gewickelt (|Ergebnis| ≤ L/2).
    pub fn signed_delta(&self, from: f32, to: f32) -> f32 {
        let delta = to - from;
        if !self.is_closed() || self.total_length <= 0.0 {
            return delta;
        }
        let half = self.total_length * 0.5;
        if delta > half {
            delta - self.total_length
        } else if delta < -half {
            delta + self.total_length
        } else {
            delta
        }
    }

    /// Segment und Segmentanteil an einer Bogenlänge.
    ///
    /// Linearer Scan: das erste nicht-entartete Segment, dessen
    /// `[start_dist, end_dist]` die Distanz inklusiv enthält, gewinnt.
    pub fn locate(&self, distance: f32) -> Option<(usize, f32)> {
        if !self.is_usable() {
            return None;
        }
        let d = self.normalize_distance(distance);

        let mut last_valid = None;
        for (index, segment) in self.segments.iter().enumerate() {
            if segment.is_degenerate() {
                continue;
            }
            if d >= segment.start_dist && d <= segment.end_dist {
                let t = ((d - segment.start_dist) / segment.length).clamp(0.0, 1.0);
                return Some((index, t));
            }
            if d < segment.start_dist {
                // Distanz liegt in einer Lücke aus entarteten Segmenten davor
                return Some((index, 0.0));
            }
            last_valid = Some(index);
        }

        Some(last_valid.map_or((0, 0.0), |index| (index, 1.0)))
    }

    /// Wie `locate`, aber mit `(0, 0.0)` als Rückfall für ungültige Pfade.
    pub fn binding_at(&self, distance: f32) -> (usize, f32) {
        self.locate(distance).unwrap_or((0, 0.0))
    }

    /// Weltposition an einer Bogenlänge.
    pub fn position_at(&self, distance: f32) -> Option<Vec2> {
        let (index, t) = self.locate(distance)?;
        self.position_of(index, t)
    }

    /// Position und normierte Tangente an einer Bogenlänge.
    pub fn state_at(&self, distance: f32) -> Option<(Vec2, Vec2)> {
        let (index, t) = self.locate(distance)?;
        Some((self.position_of(index, t)?, self.tangent_of(index)))
    }

    /// Weltposition zu `(segment_index, t)`.
    pub fn position_of(&self, segment_index: usize, t: f32) -> Option<Vec2> {
        self.segments
            .get(segment_index)
            .map(|segment| segment.point_at(t.clamp(0.0, 1.0)))
    }

    /// Bogenlänge zu `(segment_index, t)`.
    pub fn distance_of(&self, segment_index: usize, t: f32) -> Option<f32> {
        self.segments
            .get(segment_index)
            .map(|segment| segment.start_dist + t.clamp(0.0, 1.0) * segment.length)
    }

    /// Normierte Tangente eines Segments.
    ///
    /// Entartete Segmente übernehmen die Richtung des nächsten gültigen Nachbarn,
    /// ohne jeden gültigen Nachbarn wird `+x` geliefert.
    pub fn tangent_of(&self, segment_index: usize) -> Vec2 {
        let count = self.segments.len();
        if segment_index < count && !self.segments[segment_index].is_degenerate() {
            return self.segments[segment_index].direction;
        }
        for offset in 1..count {
            if let Some(before) = segment_index.checked_sub(offset) {
                if let Some(segment) = self.segments.get(before) {
                    if !segment.is_degenerate() {
                        return segment.direction;
                    }
                }
            }
            if let Some(segment) = self.segments.get(segment_index + offset) {
                if !segment.is_degenerate() {
                    return segment.direction;
                }
            }
        }
        Vec2::X
    }

    /// Orientierung (Radiant) der Tangente eines Segments.
    pub fn orientation_of(&self, segment_index: usize) -> f32 {
        let tangent = self.tangent_of(segment_index);
        tangent.y.atan2(tangent.x)
    }

    /// Nächster Punkt auf dem Pfad (geklemmte Lotprojektion über alle Segmente).
    pub fn project(&self, point: Vec2) -> Option<PathProjection> {
        if !self.is_usable() {
            return None;
        }

        let mut best: Option<PathProjection> = None;
        for (index, segment) in self.segments.iter().enumerate() {
            if segment.is_degenerate() {
                continue;
            }
            let t = projection_parameter(segment.start, segment.end, point).clamp(0.0, 1.0);
            let on_path = segment.point_at(t);
            let distance = on_path.distance(point);
            if best.is_none_or(|b| distance < b.distance) {
                best = Some(PathProjection {
                    segment_index: index,
                    t,
                    point: on_path,
                    distance,
                    arc_distance: segment.start_dist + t * segment.length,
                });
            }
        }

        best.or_else(|| {
            // Nur entartete Segmente: alle Punkte fallen zusammen
            let first = self.points[0];
            Some(PathProjection {
                segment_index: 0,
                t: 0.0,
                point: first,
                distance: first.distance(point),
                arc_distance: 0.0,
            })
        })
    }

    /// Bogenlänge des nächsten Punkts auf dem Pfad.
    pub fn project_point(&self, point: Vec2) -> Option<f32> {
        self.project(point).map(|p| p.arc_distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn straight(length: f32, steps: usize) -> Path {
        Path::new(
            (0..=steps)
                .map(|i| Vec2::new(length * i as f32 / steps as f32, 0.0))
                .collect(),
        )
    }

    fn square_loop() -> Path {
        Path::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(4.0, 4.0),
            Vec2::new(0.0, 4.0),
            Vec2::new(0.0, 0.0),
        ])
    }

    #[test]
    fn test_segmentierung_und_gesamtlaenge() {
        let path = straight(10.0, 10);
        assert_eq!(path.segment_count(), 10);
        assert_relative_eq!(path.total_length(), 10.0, epsilon = 1e-5);
        let seg = path.segment(3).expect("Segment erwartet");
        assert_relative_eq!(seg.start_dist, 3.0, epsilon = 1e-5);
        assert_relative_eq!(seg.end_dist, 4.0, epsilon = 1e-5);
        assert_eq!(seg.direction, Vec2::X);
    }

    #[test]
    fn test_is_closed_nach_abstand_erster_letzter_punkt() {
        assert!(square_loop().is_closed());
        assert!(!straight(10.0, 10).is_closed());
        let almost = Path::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(3.0, 0.0),
            Vec2::new(3.0, 3.0),
            Vec2::new(0.0, 0.4),
        ]);
        assert!(almost.is_closed());
    }

    #[test]
    fn test_position_at_klemmt_offene_pfade() {
        let path = straight(10.0, 10);
        assert_eq!(path.position_at(-3.0), Some(Vec2::new(0.0, 0.0)));
        let end = path.position_at(25.0).expect("Position erwartet");
        assert_relative_eq!(end.x, 10.0, epsilon = 1e-5);
        let mid = path.position_at(4.5).expect("Position erwartet");
        assert_relative_eq!(mid.x, 4.5, epsilon = 1e-5);
    }

    #[test]
    fn test_position_at_wickelt_geschlossene_pfade() {
        let path = square_loop();
        assert_relative_eq!(path.total_length(), 16.0);
        let wrapped = path.position_at(18.0).expect("Position erwartet");
        assert_relative_eq!(wrapped.x, 2.0, epsilon = 1e-5);
        assert_relative_eq!(wrapped.y, 0.0, epsilon = 1e-5);
        let negative = path.position_at(-2.0).expect("Position erwartet");
        assert_relative_eq!(negative.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(negative.y, 2.0, epsilon = 1e-5);
    }

    #[test]
    fn test_grenze_bevorzugt_erstes_segment() {
        let path = straight(2.0, 2);
        assert_eq!(path.locate(1.0), Some((0, 1.0)));
    }

    #[test]
    fn test_entartete_segmente_werden_uebersprungen() {
        let path = Path::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(2.0, 0.0),
        ]);
        assert!(path.segment(1).expect("Segment erwartet").is_degenerate());
        let (index, t) = path.locate(1.5).expect("Treffer erwartet");
        assert_eq!(index, 2);
        assert_relative_eq!(t, 0.5);
        assert_eq!(path.tangent_of(1), Vec2::X);
    }

    #[test]
    fn test_project_point_liefert_bogenlaenge() {
        let path = square_loop();
        let d = path.project_point(Vec2::new(4.5, 1.0)).expect("Projektion erwartet");
        assert_relative_eq!(d, 5.0, epsilon = 1e-5);
        assert!(Path::new(vec![Vec2::ZERO]).project_point(Vec2::ONE).is_none());
    }

    #[test]
    fn test_signed_delta_wickelt_ueber_naht() {
        let path = square_loop();
        assert_relative_eq!(path.signed_delta(15.0, 1.0), 2.0);
        assert_relative_eq!(path.signed_delta(1.0, 15.0), -2.0);
        let open = straight(10.0, 10);
        assert_relative_eq!(open.signed_delta(9.0, 1.0), -8.0);
    }

    #[test]
    fn test_mutation_baut_segmente_neu_auf() {
        let mut path = straight(2.0, 2);
        path.append_point(Vec2::new(3.0, 0.0));
        assert_eq!(path.segment_count(), 3);
        assert!(path.insert_point(1, Vec2::new(0.5, 0.0)));
        assert_eq!(path.segment_count(), 4);
        assert_eq!(path.remove_first(), Some(Vec2::ZERO));
        assert_relative_eq!(path.total_length(), 2.5, epsilon = 1e-5);
        path.translate(Vec2::new(0.0, 1.0));
        assert_eq!(path.first_point(), Some(Vec2::new(0.5, 1.0)));
    }
}
