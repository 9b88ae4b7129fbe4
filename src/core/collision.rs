//! Exakter Überlappungstest zweier gedrehter Rechtecke (Separating Axis Theorem).
//!
//! Geprüft werden die vier Kantennormalen beider Rechtecke. Intervalle, die
//! sich nur berühren, gelten als getrennt: zwei achsparallele Rechtecke im
//! Abstand `d` überlappen genau dann, wenn `d < (w1 + w2) / 2`.

use glam::Vec2;

/// Gedrehtes Rechteck (Footprint einer Perle in der Ebene).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedRect {
    /// Mittelpunkt
    pub center: Vec2,
    /// Ausdehnung entlang der lokalen x-Achse (Tangente)
    pub width: f32,
    /// Ausdehnung entlang der lokalen y-Achse (Normale)
    pub height: f32,
    /// Drehung in Radiant
    pub rotation: f32,
}

impl OrientedRect {
    /// Erstellt ein gedrehtes Rechteck.
    pub fn new(center: Vec2, width: f32, height: f32, rotation: f32) -> Self {
        Self {
            center,
            width,
            height,
            rotation,
        }
    }

    /// Lokale Achsen `(u, v)`: `u` zeigt entlang der Drehung, `v = perp(u)`.
    pub fn axes(&self) -> [Vec2; 2] {
        let u = Vec2::from_angle(self.rotation);
        [u, u.perp()]
    }

    /// Die vier Ecken in Weltkoordinaten.
    pub fn corners(&self) -> [Vec2; 4] {
        let [u, v] = self.axes();
        let half_u = u * (self.width * 0.5);
        let half_v = v * (self.height * 0.5);
        [
            self.center + half_u + half_v,
            self.center + half_u - half_v,
            self.center - half_u - half_v,
            self.center - half_u + half_v,
        ]
    }

    /// Projektion aller Ecken auf `axis` als `(min, max)`.
    fn project(&self, axis: Vec2) -> (f32, f32) {
        let corners = self.corners();
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for corner in corners {
            let value = corner.dot(axis);
            min = min.min(value);
            max = max.max(value);
        }
        (min, max)
    }

    /// Radius des Umkreises (halbe Diagonale).
    pub fn bounding_radius(&self) -> f32 {
        0.5 * (self.width * self.width + self.height * self.height).sqrt()
    }
}

/// Prüft, ob sich zwei gedrehte Rechtecke echt überlappen.
pub fn rects_overlap(a: &OrientedRect, b: &OrientedRect) -> bool {
    // Schneller Ausschluss über Umkreise
    let reach = a.bounding_radius() + b.bounding_radius();
    if a.center.distance_squared(b.center) >= reach * reach {
        return false;
    }

    let [au, av] = a.axes();
    let [bu, bv] = b.axes();
    for axis in [au, av, bu, bv] {
        let (a_min, a_max) = a.project(axis);
        let (b_min, b_max) = b.project(axis);
        if a_max <= b_min || b_max <= a_min {
            return false;
        }
    }
    true
}
