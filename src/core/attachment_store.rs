//! Verwaltung aller Perlen und ihrer Pfad-Bindungen.
//!
//! Nach jeder abgeschlossenen Operation gilt: keine zwei Perlen auf demselben
//! Pfad überlappen sich. Während eines Drags ist die Kollisionsprüfung
//! ausgesetzt; `release_drag` stellt den Zustand wieder her.

use super::bead::{Bead, BeadId, BeadPlacement, Footprint, PathBinding, PayloadHandle};
use super::collision::{rects_overlap, OrientedRect};
use super::nearest::nearest_on_paths;
use super::path::Path;
use super::path_set::{PathId, PathSet};
use crate::shared::options::{EngineOptions, RELEASE_REFINE_ITERATIONS, RELEASE_SEARCH_STEP};
use glam::Vec2;
use std::fmt;

/// Grund für eine abgelehnte Platzierung.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementRejection {
    /// Kein Pfad innerhalb des Platzierungsradius
    NotNearPath,
    /// Die Perle würde eine bestehende Perle auf demselben Pfad überlappen
    Occupied,
}

impl fmt::Display for PlacementRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotNearPath => write!(f, "kein Pfad in Reichweite"),
            Self::Occupied => write!(f, "Position bereits belegt"),
        }
    }
}

impl std::error::Error for PlacementRejection {}

/// Ergebnis von `release_drag`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragRelease {
    /// Perle liegt kollisionsfrei; `shifted` wenn sie dafür verschoben wurde
    Settled {
        /// Perle wurde entlang des Pfads verschoben
        shifted: bool,
    },
    /// Kein freier Platz gefunden, Perle zurück an die Ausgangsposition
    Reverted,
    /// Es lief kein Drag
    NotDragging,
}

/// Parameter der Freiplatz-Suche beim Loslassen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReleaseSettings {
    /// Schrittweite der Vorwärts/Rückwärts-Suche
    pub search_step: f32,
    /// Iterationen der Binärsuche
    pub refine_iterations: u32,
}

impl Default for ReleaseSettings {
    fn default() -> Self {
        Self {
            search_step: RELEASE_SEARCH_STEP,
            refine_iterations: RELEASE_REFINE_ITERATIONS,
        }
    }
}

impl ReleaseSettings {
    /// Übernimmt die Werte aus den Engine-Optionen.
    pub fn from_options(options: &EngineOptions) -> Self {
        Self {
            search_step: options.release_search_step,
            refine_iterations: options.release_refine_iterations,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragSession {
    bead_id: BeadId,
    origin: PathBinding,
    origin_override: Option<f32>,
}

/// Tangential ausgerichtetes Kandidaten-Rechteck an einer Bogenlänge.
pub(crate) fn candidate_rect(path: &Path, distance: f32, footprint: Footprint) -> Option<OrientedRect> {
    let (position, tangent) = path.state_at(distance)?;
    Some(footprint.rect_at(position, tangent.y.atan2(tangent.x)))
}

/// Alle Perlen einer Sitzung.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttachmentStore {
    beads: Vec<Bead>,
    next_id: u64,
    drag: Option<DragSession>,
}

impl AttachmentStore {
    /// Erstellt einen leeren Store.
    pub fn new() -> Self {
        Self {
            beads: Vec::new(),
            next_id: 1,
            drag: None,
        }
    }

    /// Anzahl der Perlen.
    pub fn len(&self) -> usize {
        self.beads.len()
    }

    /// Gibt `true` zurück, wenn keine Perlen vorhanden sind.
    pub fn is_empty(&self) -> bool {
        self.beads.is_empty()
    }

    /// Read-only Sicht auf alle Perlen.
    pub fn beads(&self) -> &[Bead] {
        &self.beads
    }

    /// Iteriert über alle Perlen.
    pub fn iter(&self) -> impl Iterator<Item = &Bead> {
        self.beads.iter()
    }

    /// Perle per ID.
    pub fn get(&self, id: BeadId) -> Option<&Bead> {
        self.beads.iter().find(|bead| bead.id == id)
    }

    /// Alle Perlen auf einem Pfad.
    pub fn beads_on_path(&self, path_id: PathId) -> impl Iterator<Item = &Bead> {
        self.beads
            .iter()
            .filter(move |bead| bead.binding.path_id == path_id)
    }

    fn index_of(&self, id: BeadId) -> Option<usize> {
        self.beads.iter().position(|bead| bead.id == id)
    }

    fn allocate_id(&mut self) -> BeadId {
        let id = BeadId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        id
    }

    // ── Platzierung & Verwaltung ────────────────────────────────────

    /// Platziert eine neue Perle am nächsten Pfadpunkt innerhalb von `radius`.
    pub fn place(
        &mut self,
        path_set: &PathSet,
        point: Vec2,
        footprint: Footprint,
        payload: PayloadHandle,
        radius: f32,
    ) -> Result<BeadId, PlacementRejection> {
        let hit =
            nearest_on_paths(path_set, point, radius).ok_or(PlacementRejection::NotNearPath)?;
        let path = path_set
            .get(hit.path_id)
            .ok_or(PlacementRejection::NotNearPath)?;
        let (segment_index, t) = hit.binding(path);
        let binding = PathBinding::new(hit.path_id, segment_index, t);

        let rect = footprint.rect_at(hit.point, path.orientation_of(segment_index));
        if self.rect_collides(path_set, hit.path_id, &rect, None) {
            log::debug!(
                "Platzierung abgelehnt: Pfad {} bei {:?} belegt",
                hit.path_id,
                hit.point
            );
            return Err(PlacementRejection::Occupied);
        }

        let id = self.allocate_id();
        self.beads.push(Bead {
            id,
            binding,
            footprint,
            rotation_override: None,
            payload,
        });
        log::debug!("Perle {:?} auf Pfad {} platziert", id, hit.path_id);
        Ok(id)
    }

    /// Übernimmt eine wiederhergestellte Perle unverändert.
    ///
    /// Kollidiert die ID mit einer vorhandenen Perle, wird eine neue vergeben.
    pub fn insert_restored(&mut self, mut bead: Bead) -> BeadId {
        if self.get(bead.id).is_some() || bead.id.0 == 0 {
            bead.id = self.allocate_id();
        } else {
            self.next_id = self.next_id.max(bead.id.0 + 1);
        }
        let id = bead.id;
        self.beads.push(bead);
        id
    }

    /// Entfernt eine Perle.
    pub fn remove(&mut self, id: BeadId) -> Option<Bead> {
        let index = self.index_of(id)?;
        if self.drag.is_some_and(|session| session.bead_id == id) {
            self.drag = None;
        }
        Some(self.beads.remove(index))
    }

    /// Entfernt alle Perlen.
    pub fn clear(&mut self) {
        self.beads.clear();
        self.drag = None;
    }

    /// Setzt die Bindung einer Perle; die Orientierung folgt danach wieder der Tangente.
    pub fn rebind(&mut self, id: BeadId, binding: PathBinding) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let bead = &mut self.beads[index];
        bead.binding = binding;
        bead.rotation_override = None;
        true
    }

    /// Dreht eine Perle manuell. Wird abgelehnt (und zurückgenommen), wenn sie dadurch kollidiert.
    pub fn rotate(&mut self, path_set: &PathSet, id: BeadId, radians: f32) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let previous = self.beads[index].rotation_override;
        self.beads[index].rotation_override = Some(radians);

        if self.bead_collides(path_set, &self.beads[index]) {
            self.beads[index].rotation_override = previous;
            log::debug!("Drehung von {:?} abgelehnt: Kollision", id);
            return false;
        }
        true
    }

    // ── Kollision ───────────────────────────────────────────────────

    /// Prüft ein Rechteck gegen alle Perlen auf `path_id` (optional ohne `ignore`).
    pub fn rect_collides(
        &self,
        path_set: &PathSet,
        path_id: PathId,
        rect: &OrientedRect,
        ignore: Option<BeadId>,
    ) -> bool {
        self.beads_on_path(path_id)
            .filter(|other| Some(other.id) != ignore)
            .filter_map(|other| other.rect(path_set))
            .any(|other_rect| rects_overlap(rect, &other_rect))
    }

    fn bead_collides(&self, path_set: &PathSet, bead: &Bead) -> bool {
        bead.rect(path_set).is_some_and(|rect| {
            self.rect_collides(path_set, bead.binding.path_id, &rect, Some(bead.id))
        })
    }

    /// Prüft, ob eine Perle aktuell eine andere auf demselben Pfad überlappt.
    pub fn collides(&self, path_set: &PathSet, id: BeadId) -> bool {
        self.get(id)
            .is_some_and(|bead| self.bead_collides(path_set, bead))
    }

    /// Alle überlappenden Paare auf gemeinsamen Pfaden (IDs aufsteigend sortiert).
    pub fn overlapping_pairs(&self, path_set: &PathSet) -> Vec<(BeadId, BeadId)> {
        let rects: Vec<(usize, Option<OrientedRect>)> = self
            .beads
            .iter()
            .map(|bead| (bead.binding.path_id, bead.rect(path_set)))
            .collect();

        let mut pairs = Vec::new();
        for i in 0..self.beads.len() {
            for j in (i + 1)..self.beads.len() {
                let (path_a, Some(rect_a)) = rects[i] else {
                    continue;
                };
                let (path_b, Some(rect_b)) = rects[j] else {
                    continue;
                };
                if path_a == path_b && rects_overlap(&rect_a, &rect_b) {
                    let (a, b) = (self.beads[i].id, self.beads[j].id);
                    pairs.push((a.min(b), a.max(b)));
                }
            }
        }
        pairs.sort_unstable();
        pairs
    }

    /// Render-Sicht aller Perlen mit gültiger Bindung.
    pub fn placements(&self, path_set: &PathSet) -> Vec<BeadPlacement> {
        self.beads
            .iter()
            .filter_map(|bead| {
                Some(BeadPlacement {
                    id: bead.id,
                    position: bead.position(path_set)?,
                    orientation: bead.orientation(path_set),
                    footprint: bead.footprint,
                    payload: bead.payload,
                })
            })
            .collect()
    }

    // ── Drag ────────────────────────────────────────────────────────

    /// Beginnt einen Drag. Die Ausgangsbindung wird für ein Zurücksetzen gemerkt.
    pub fn begin_drag(&mut self, id: BeadId) -> bool {
        let Some(bead) = self.get(id) else {
            return false;
        };
        self.drag = Some(DragSession {
            bead_id: id,
            origin: bead.binding,
            origin_override: bead.rotation_override,
        });
        true
    }

    /// ID der aktuell gezogenen Perle.
    pub fn dragged_bead(&self) -> Option<BeadId> {
        self.drag.map(|session| session.bead_id)
    }

    /// Bewegt die gezogene Perle an den nächsten Pfadpunkt (auch auf andere Pfade).
    ///
    /// Kollisionen werden während des Drags ignoriert.
    pub fn drag_to(&mut self, path_set: &PathSet, point: Vec2, radius: f32) -> bool {
        let Some(session) = self.drag else {
            return false;
        };
        let Some(hit) = nearest_on_paths(path_set, point, radius) else {
            return false;
        };
        let Some(path) = path_set.get(hit.path_id) else {
            return false;
        };
        let (segment_index, t) = hit.binding(path);
        self.rebind(
            session.bead_id,
            PathBinding::new(hit.path_id, segment_index, t),
        )
    }

    /// Bricht den Drag ab und stellt die Ausgangsbindung wieder her.
    pub fn cancel_drag(&mut self) -> bool {
        let Some(session) = self.drag.take() else {
            return false;
        };
        self.restore_origin(&session);
        true
    }

    fn restore_origin(&mut self, session: &DragSession) {
        if let Some(index) = self.index_of(session.bead_id) {
            self.beads[index].binding = session.origin;
            self.beads[index].rotation_override = session.origin_override;
        }
    }

    /// Beendet den Drag und löst eine eventuelle Kollision auf.
    ///
    /// Sucht vom aktuellen Punkt aus abwechselnd vorwärts und rückwärts in
    /// festen Schritten bis zur halben Pfadlänge nach freiem Platz und
    /// verfeinert den ersten Fund per Binärsuche. Ohne Fund wird die
    /// Ausgangsbindung wiederhergestellt.
    pub fn release_drag(&mut self, path_set: &PathSet, settings: ReleaseSettings) -> DragRelease {
        let Some(session) = self.drag.take() else {
            return DragRelease::NotDragging;
        };
        let Some(bead) = self.get(session.bead_id).cloned() else {
            return DragRelease::NotDragging;
        };

        if !self.bead_collides(path_set, &bead) {
            return DragRelease::Settled { shifted: false };
        }

        match self.find_free_distance(path_set, &bead, settings) {
            Some(distance) => {
                if let Some(path) = path_set.get(bead.binding.path_id) {
                    let binding = PathBinding::at_distance(bead.binding.path_id, path, distance);
                    self.rebind(bead.id, binding);
                }
                log::debug!("Perle {:?} nach Drag auf freien Platz verschoben", bead.id);
                DragRelease::Settled { shifted: true }
            }
            None => {
                self.restore_origin(&session);
                log::info!(
                    "Kein freier Platz für Perle {:?}, zurück an Ausgangsposition",
                    bead.id
                );
                DragRelease::Reverted
            }
        }
    }

    fn find_free_distance(
        &self,
        path_set: &PathSet,
        bead: &Bead,
        settings: ReleaseSettings,
    ) -> Option<f32> {
        let path_id = bead.binding.path_id;
        let path = path_set.get(path_id)?;
        let start = bead.arc_distance(path_set)?;
        let step = settings.search_step;
        if step <= 0.0 {
            return None;
        }

        let is_free = |offset: f32| {
            candidate_rect(path, start + offset, bead.footprint)
                .is_some_and(|rect| !self.rect_collides(path_set, path_id, &rect, Some(bead.id)))
        };

        let max_search = path.total_length() * 0.5;
        let mut k = 1u32;
        loop {
            let reach = step * k as f32;
            if reach >= max_search {
                return None;
            }
            for direction in [1.0f32, -1.0] {
                if !is_free(direction * reach) {
                    continue;
                }
                // Zwischen letzter Kollision und erstem freien Punkt verfeinern
                let mut blocked = reach - step;
                let mut free = reach;
                for _ in 0..settings.refine_iterations {
                    let mid = 0.5 * (blocked + free);
                    if is_free(direction * mid) {
                        free = mid;
                    } else {
                        blocked = mid;
                    }
                }
                return Some(path.normalize_distance(start + direction * free));
            }
            k += 1;
        }
    }

    // ── Bindungspflege bei Strukturänderungen ───────────────────────

    /// Ein Pfad wurde entfernt: dessen Perlen fallen weg, höhere Pfad-IDs rücken nach.
    pub fn on_path_removed(&mut self, path_id: PathId) -> Vec<BeadId> {
        let mut removed = Vec::new();
        self.beads.retain(|bead| {
            let keep = bead.binding.path_id != path_id;
            if !keep {
                removed.push(bead.id);
            }
            keep
        });
        for bead in &mut self.beads {
            if bead.binding.path_id > path_id {
                bead.binding.path_id -= 1;
            }
        }
        if let Some(session) = self.drag {
            if removed.contains(&session.bead_id) {
                self.drag = None;
            }
        }
        if !removed.is_empty() {
            log::info!(
                "{} Perlen mit Pfad {} entfernt",
                removed.len(),
                path_id
            );
        }
        removed
    }

    /// Segment `segment_index` wurde bei `split_t` durch einen neuen Punkt geteilt.
    ///
    /// Perlen behalten ihre Weltposition.
    pub fn on_vertex_inserted(&mut self, path_id: PathId, segment_index: usize, split_t: f32) {
        let split_t = split_t.clamp(f32::EPSILON, 1.0 - f32::EPSILON);
        for bead in self.beads.iter_mut() {
            let binding = &mut bead.binding;
            if binding.path_id != path_id {
                continue;
            }
            if binding.segment_index > segment_index {
                binding.segment_index += 1;
            } else if binding.segment_index == segment_index {
                if binding.t <= split_t {
                    binding.t = (binding.t / split_t).clamp(0.0, 1.0);
                } else {
                    binding.segment_index += 1;
                    binding.t = ((binding.t - split_t) / (1.0 - split_t)).clamp(0.0, 1.0);
                }
            }
        }
    }

    /// Der erste Punkt eines Pfads wurde entfernt: alle Segment-Indizes rücken nach.
    pub fn on_leading_vertex_removed(&mut self, path_id: PathId) {
        for bead in self.beads.iter_mut() {
            let binding = &mut bead.binding;
            if binding.path_id != path_id {
                continue;
            }
            if binding.segment_index == 0 {
                binding.t = 0.0;
            } else {
                binding.segment_index -= 1;
            }
        }
    }

    /// Klemmt alle Bindungen in gültige Bereiche und entfernt Perlen ohne Pfad.
    pub fn sanitize(&mut self, path_set: &PathSet) -> Vec<BeadId> {
        let mut removed = Vec::new();
        self.beads.retain_mut(|bead| {
            let Some(path) = path_set.get(bead.binding.path_id) else {
                removed.push(bead.id);
                return false;
            };
            let segment_count = path.segment_count();
            if segment_count == 0 {
                removed.push(bead.id);
                return false;
            }
            if bead.binding.segment_index >= segment_count {
                bead.binding.segment_index = segment_count - 1;
                bead.binding.t = 1.0;
            }
            bead.binding.t = if bead.binding.t.is_finite() {
                bead.binding.t.clamp(0.0, 1.0)
            } else {
                0.0
            };
            true
        });
        if !removed.is_empty() {
            log::warn!("{} Perlen ohne gültigen Pfad verworfen", removed.len());
        }
        removed
    }
}
