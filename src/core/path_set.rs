//! Geordnete Sammlung aller Pfade plus Endpunkt-Junction-Index.

use super::path::Path;
use crate::shared::options::JUNCTION_KEY_PRECISION;
use crate::shared::polyline;
use glam::Vec2;
use indexmap::IndexMap;

/// Index eines Pfads innerhalb des `PathSet`.
///
/// Positionen werden nach dem Entfernen eines Pfads wiederverwendet;
/// Bindungen müssen dann umgehängt werden.
pub type PathId = usize;

/// Auf 3 Nachkommastellen gerundete Endpunkt-Koordinaten.
pub type JunctionKey = (i64, i64);

/// Welches Ende eines Pfads gemeint ist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointRole {
    /// Erster Punkt
    Start,
    /// Letzter Punkt
    End,
}

/// Eintrag im Junction-Index: ein Pfadende an einer gerundeten Koordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JunctionEntry {
    /// Pfad, dessen Ende hier liegt
    pub path_id: PathId,
    /// Anfang oder Ende
    pub role: EndpointRole,
    /// Bogenlänge des Endpunkts (0 oder Gesamtlänge)
    pub distance: f32,
}

/// Ergebnis von `PathSet::remove_tip`.
#[derive(Debug, Clone, PartialEq)]
pub enum TipRemoval {
    /// Punkt entfernt, Pfad hat weiterhin mindestens 2 Punkte
    Shortened {
        /// Entfernter Endpunkt
        removed: Vec2,
    },
    /// Pfad fiel unter 2 Punkte und wurde entfernt
    PathRemoved {
        /// Der entfernte Restpfad
        path: Path,
    },
}

/// Rundet eine Koordinate zum Junction-Schlüssel.
pub fn junction_key(point: Vec2) -> JunctionKey {
    (
        (point.x * JUNCTION_KEY_PRECISION).round() as i64,
        (point.y * JUNCTION_KEY_PRECISION).round() as i64,
    )
}

/// Alle committeten Pfade einer Sitzung.
///
/// Enthält ausschließlich nutzbare Pfade (≥ 2 Punkte); Operationen, die einen
/// Pfad darunter drücken würden, entfernen ihn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathSet {
    paths: Vec<Path>,
    junctions: IndexMap<JunctionKey, Vec<JunctionEntry>>,
}

impl PathSet {
    /// Erstellt ein leeres PathSet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Erstellt ein PathSet aus Pfaden; ungültige Pfade werden verworfen.
    pub fn from_paths(paths: impl IntoIterator<Item = Path>) -> Self {
        let mut set = Self::new();
        set.replace_all(paths);
        set
    }

    /// Anzahl der Pfade.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Gibt `true` zurück, wenn keine Pfade vorhanden sind.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Pfad per ID.
    pub fn get(&self, path_id: PathId) -> Option<&Path> {
        self.paths.get(path_id)
    }

    /// Read-only Sicht auf alle Pfade.
    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    /// Iteriert über `(PathId, &Path)`.
    pub fn iter(&self) -> impl Iterator<Item = (PathId, &Path)> {
        self.paths.iter().enumerate()
    }

    /// Fügt einen Pfad hinzu. Pfade mit weniger als 2 Punkten werden abgelehnt.
    pub fn push_path(&mut self, path: Path) -> Option<PathId> {
        if !path.is_usable() {
            log::debug!(
                "Pfad mit {} Punkten verworfen (mindestens 2 erforderlich)",
                path.point_count()
            );
            return None;
        }
        self.paths.push(path);
        self.rebuild_junctions();
        Some(self.paths.len() - 1)
    }

    /// Entfernt einen Pfad. Höhere IDs rücken um eins nach.
    pub fn remove_path(&mut self, path_id: PathId) -> Option<Path> {
        if path_id >= self.paths.len() {
            return None;
        }
        let removed = self.paths.remove(path_id);
        self.rebuild_junctions();
        Some(removed)
    }

    /// Entfernt alle Pfade.
    pub fn clear(&mut self) {
        self.paths.clear();
        self.junctions.clear();
    }

    /// Ersetzt alle Pfade. Gibt die Anzahl übernommener Pfade zurück.
    pub fn replace_all(&mut self, paths: impl IntoIterator<Item = Path>) -> usize {
        self.replace_all_remapped(paths);
        self.paths.len()
    }

    /// Ersetzt alle Pfade und liefert pro Eingabe-Index die neue ID
    /// (`None` für verworfene Pfade mit weniger als 2 Punkten).
    pub fn replace_all_remapped(
        &mut self,
        paths: impl IntoIterator<Item = Path>,
    ) -> Vec<Option<PathId>> {
        let mut kept = Vec::new();
        let id_map: Vec<Option<PathId>> = paths
            .into_iter()
            .map(|path| {
                if !path.is_usable() {
                    return None;
                }
                kept.push(path);
                Some(kept.len() - 1)
            })
            .collect();

        let rejected = id_map.len() - kept.len();
        if rejected > 0 {
            log::warn!("{} ungültige Pfade (< 2 Punkte) verworfen", rejected);
        }
        self.paths = kept;
        self.rebuild_junctions();
        id_map
    }

    /// Fügt einen Punkt an `index` in einen Pfad ein (Segment-Split beim Andocken).
    pub fn insert_vertex(&mut self, path_id: PathId, index: usize, point: Vec2) -> bool {
        let Some(path) = self.paths.get_mut(path_id) else {
            return false;
        };
        if !path.insert_point(index, point) {
            return false;
        }
        self.rebuild_junctions();
        true
    }

    /// Entfernt einen Endpunkt. Fällt der Pfad unter 2 Punkte, wird er entfernt.
    pub fn remove_tip(&mut self, path_id: PathId, role: EndpointRole) -> Option<TipRemoval> {
        let path = self.paths.get_mut(path_id)?;
        let removed = match role {
            EndpointRole::Start => path.remove_first()?,
            EndpointRole::End => path.remove_last()?,
        };

        let result = if path.is_usable() {
            TipRemoval::Shortened { removed }
        } else {
            TipRemoval::PathRemoved {
                path: self.paths.remove(path_id),
            }
        };
        self.rebuild_junctions();
        Some(result)
    }

    /// Schreibt alle Punkte neu, ohne die Topologie zu ändern.
    pub fn map_points(&mut self, mut f: impl FnMut(PathId, usize, Vec2) -> Vec2) {
        for (path_id, path) in self.paths.iter_mut().enumerate() {
            path.map_points(|index, point| f(path_id, index, point));
        }
        self.rebuild_junctions();
    }

    /// Verschiebt die gesamte Geometrie um `delta`.
    pub fn translate(&mut self, delta: Vec2) {
        self.map_points(|_, _, point| point + delta);
    }

    /// Punktanzahl pro Pfad; zwei PathSets mit gleicher Topologie sind punktweise vergleichbar.
    pub fn topology(&self) -> Vec<usize> {
        self.paths.iter().map(Path::point_count).collect()
    }

    /// Gesamtzahl aller Punkte.
    pub fn point_count(&self) -> usize {
        self.paths.iter().map(Path::point_count).sum()
    }

    /// Iteriert über alle Punkte aller Pfade.
    pub fn all_points(&self) -> impl Iterator<Item = &Vec2> {
        self.paths.iter().flat_map(|path| path.points().iter())
    }

    /// Kopie aller Punktlisten.
    pub fn point_lists(&self) -> Vec<Vec<Vec2>> {
        self.paths.iter().map(|path| path.points().to_vec()).collect()
    }

    /// Schwerpunkt aller Punkte.
    pub fn centroid(&self) -> Option<Vec2> {
        polyline::centroid(self.all_points())
    }

    /// Bounding-Box aller Punkte als `(min, max)`.
    pub fn bounds(&self) -> Option<(Vec2, Vec2)> {
        polyline::bounds(self.all_points())
    }

    /// Alle Pfadenden als `(PathId, Rolle, Position)`.
    pub fn tips(&self) -> Vec<(PathId, EndpointRole, Vec2)> {
        let mut tips = Vec::with_capacity(self.paths.len() * 2);
        for (path_id, path) in self.iter() {
            if let Some(first) = path.first_point() {
                tips.push((path_id, EndpointRole::Start, first));
            }
            if let Some(last) = path.last_point() {
                tips.push((path_id, EndpointRole::End, last));
            }
        }
        tips
    }

    // ── Junction-Index ──────────────────────────────────────────────

    /// Read-only Sicht auf den Junction-Index.
    pub fn junctions(&self) -> &IndexMap<JunctionKey, Vec<JunctionEntry>> {
        &self.junctions
    }

    /// Alle Pfadenden an (gerundet) derselben Koordinate.
    pub fn junction_at(&self, point: Vec2) -> &[JunctionEntry] {
        self.junctions
            .get(&junction_key(point))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Andere Pfadenden, die sich mit dem angegebenen Ende eine Junction teilen.
    pub fn junction_partners(&self, path_id: PathId, role: EndpointRole) -> Vec<JunctionEntry> {
        let Some(path) = self.paths.get(path_id) else {
            return Vec::new();
        };
        let point = match role {
            EndpointRole::Start => path.first_point(),
            EndpointRole::End => path.last_point(),
        };
        let Some(point) = point else {
            return Vec::new();
        };
        self.junction_at(point)
            .iter()
            .filter(|entry| !(entry.path_id == path_id && entry.role == role))
            .copied()
            .collect()
    }

    fn rebuild_junctions(&mut self) {
        self.junctions.clear();
        for (path_id, path) in self.paths.iter().enumerate() {
            let (Some(first), Some(last)) = (path.first_point(), path.last_point()) else {
                continue;
            };
            self.junctions
                .entry(junction_key(first))
                .or_default()
                .push(JunctionEntry {
                    path_id,
                    role: EndpointRole::Start,
                    distance: 0.0,
                });
            self.junctions
                .entry(junction_key(last))
                .or_default()
                .push(JunctionEntry {
                    path_id,
                    role: EndpointRole::End,
                    distance: path.total_length(),
                });
        }
    }
}
