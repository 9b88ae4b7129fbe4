//! Perle: ein an eine Pfadposition gebundenes Objekt mit Footprint.

use super::collision::OrientedRect;
use super::path::Path;
use super::path_set::{PathId, PathSet};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Eindeutige ID einer Perle innerhalb einer Sitzung.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BeadId(pub u64);

/// Opaker Verweis auf den Katalog-Eintrag (Modell, Farbe, Material).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayloadHandle(pub u64);

/// Abmessungen einer Perle in der Ebene.
///
/// Die Katalogwerte sind richtungslos: die längere Kante liegt immer entlang
/// der Pfad-Tangente, die kürzere quer dazu.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    /// Breite laut Katalog
    pub width: f32,
    /// Höhe laut Katalog
    pub height: f32,
}

impl Footprint {
    /// Erstellt einen Footprint.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Ausdehnung entlang der Tangente (längere Kante).
    pub fn length(&self) -> f32 {
        self.width.max(self.height)
    }

    /// Ausdehnung quer zur Tangente (kürzere Kante).
    pub fn breadth(&self) -> f32 {
        self.width.min(self.height)
    }

    /// Halbe größere Kantenlänge.
    pub fn half_extent(&self) -> f32 {
        self.length() * 0.5
    }

    /// Kollisions-Rechteck mit der längeren Kante entlang `rotation`.
    pub fn rect_at(&self, center: Vec2, rotation: f32) -> OrientedRect {
        OrientedRect::new(center, self.length(), self.breadth(), rotation)
    }
}

/// Anbindung an einen Pfad: Segment und Segmentanteil.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathBinding {
    /// Pfad, an dem die Perle hängt
    pub path_id: PathId,
    /// Segment innerhalb des Pfads
    pub segment_index: usize,
    /// Segmentanteil in `[0, 1]`
    pub t: f32,
}

impl PathBinding {
    /// Erstellt eine Bindung; `t` wird auf `[0, 1]` geklemmt.
    pub fn new(path_id: PathId, segment_index: usize, t: f32) -> Self {
        Self {
            path_id,
            segment_index,
            t: t.clamp(0.0, 1.0),
        }
    }

    /// Bindung an einer Bogenlänge des Pfads.
    pub fn at_distance(path_id: PathId, path: &Path, distance: f32) -> Self {
        let (segment_index, t) = path.binding_at(distance);
        Self::new(path_id, segment_index, t)
    }
}

/// Eine an einen Pfad gebundene Perle.
///
/// Die Weltposition wird nie gespeichert, sondern immer aus
/// `(segment_index, t)` und der aktuellen Pfadgeometrie abgeleitet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bead {
    /// Eindeutige ID
    pub id: BeadId,
    /// Anbindung an den Pfad
    pub binding: PathBinding,
    /// Abmessungen
    pub footprint: Footprint,
    /// Manuell gesetzte Orientierung; `None` folgt der Pfad-Tangente
    #[serde(default)]
    pub rotation_override: Option<f32>,
    /// Katalog-Verweis
    pub payload: PayloadHandle,
}

impl Bead {
    /// Weltposition der Perle.
    pub fn position(&self, path_set: &PathSet) -> Option<Vec2> {
        path_set
            .get(self.binding.path_id)?
            .position_of(self.binding.segment_index, self.binding.t)
    }

    /// Orientierung in Radiant (Tangente oder manueller Override).
    pub fn orientation(&self, path_set: &PathSet) -> f32 {
        if let Some(rotation) = self.rotation_override {
            return rotation;
        }
        path_set
            .get(self.binding.path_id)
            .map_or(0.0, |path| path.orientation_of(self.binding.segment_index))
    }

    /// Bogenlänge der Perle auf ihrem Pfad.
    pub fn arc_distance(&self, path_set: &PathSet) -> Option<f32> {
        path_set
            .get(self.binding.path_id)?
            .distance_of(self.binding.segment_index, self.binding.t)
    }

    /// Kollisions-Rechteck in Weltkoordinaten.
    pub fn rect(&self, path_set: &PathSet) -> Option<OrientedRect> {
        Some(
            self.footprint
                .rect_at(self.position(path_set)?, self.orientation(path_set)),
        )
    }

    /// Prüft, ob die Bindung auf ein gültiges Segment zeigt.
    pub fn has_valid_binding(&self, path_set: &PathSet) -> bool {
        path_set
            .get(self.binding.path_id)
            .is_some_and(|path| self.binding.segment_index < path.segment_count())
            && (0.0..=1.0).contains(&self.binding.t)
    }
}

/// Render-Sicht einer Perle: alles, was der Renderer pro Frame braucht.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeadPlacement {
    /// ID der Perle
    pub id: BeadId,
    /// Weltposition
    pub position: Vec2,
    /// Orientierung in Radiant
    pub orientation: f32,
    /// Abmessungen
    pub footprint: Footprint,
    /// Katalog-Verweis
    pub payload: PayloadHandle,
}
