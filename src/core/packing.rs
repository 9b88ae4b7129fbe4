//! Kinematisches Zusammenrücken aller Perlen zu einem Zielpunkt pro Pfad.
//!
//! Zustandsmaschine `Idle → Active → (Converged | TimedOut) → Idle`, getrieben
//! durch explizite `tick(dt)`-Aufrufe. Jede Perle bewegt sich entlang ihres
//! Pfads in Richtung des höchsten Punkts (maximales `y`). Jeder Schritt wird
//! gegen alle anderen Perlen desselben Pfads geprüft; blockierte Schritte
//! werden per Binärsuche auf den größten freien Teilschritt verkürzt.
//! Perlen überholen einander nie.
//!
//! Überlappen beim Start Perlen auf einem Pfad (etwa nach dem Verkleinern),
//! werden sie vorab um die mittlere Perle herum nebeneinander verteilt,
//! sofern sie auf den Pfad passen.

use super::attachment_store::{candidate_rect, AttachmentStore};
use super::bead::{BeadId, Footprint, PathBinding};
use super::collision::rects_overlap;
use super::path::Path;
use super::path_set::{PathId, PathSet};
use super::rescale::scale_factor;
use crate::shared::options::{
    EngineOptions, PACKING_ARRIVAL_EPSILON, PACKING_BASE_SPEED, PACKING_MAX_DT,
    PACKING_MOVEMENT_EPSILON, PACKING_REFINE_ITERATIONS, PACKING_SPREAD_GAP,
    PACKING_TARGET_SAMPLES, PACKING_TIMEOUT_SECS,
};

/// Phase eines Packing-Laufs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PackingPhase {
    /// Kein Lauf aktiv
    #[default]
    Idle,
    /// Lauf aktiv, Perlen bewegen sich
    Active,
    /// Keine Perle konnte sich mehr bewegen
    Converged,
    /// Zeitlimit erreicht
    TimedOut,
}

/// Start-Parameter eines Laufs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackingRequest {
    /// Geschwindigkeit in Einheiten pro Sekunde
    pub speed: f32,
    /// Ergebnis nach Abschluss persistieren
    pub persist: bool,
}

impl PackingRequest {
    /// Geschwindigkeit passend zur Skalierung: `9 * Faktor`, mit Persistierung.
    pub fn for_scale(percentage: f32) -> Self {
        Self::for_scale_with(PACKING_BASE_SPEED, percentage)
    }

    /// Wie [`Self::for_scale`], aber mit eigener Basisgeschwindigkeit.
    pub fn for_scale_with(base_speed: f32, percentage: f32) -> Self {
        Self {
            speed: base_speed * scale_factor(percentage),
            persist: true,
        }
    }

    /// Lauf mit fester Geschwindigkeit ohne Persistierung.
    pub fn settle(speed: f32) -> Self {
        Self {
            speed,
            persist: false,
        }
    }
}

impl Default for PackingRequest {
    fn default() -> Self {
        Self::settle(PACKING_BASE_SPEED)
    }
}

/// Abschlussbericht eines Laufs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackingReport {
    /// `Converged` oder `TimedOut`
    pub phase: PackingPhase,
    /// Ergebnis soll persistiert werden
    pub persist: bool,
    /// Simulierte Zeit in Sekunden
    pub elapsed: f32,
    /// Anzahl ausgeführter Ticks
    pub ticks: u32,
}

/// Rückgabe eines `tick`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PackingStatus {
    /// Kein Lauf aktiv
    Idle,
    /// Lauf läuft weiter
    Active,
    /// Lauf in diesem Tick beendet
    Finished(PackingReport),
}

/// Tuning-Parameter der Simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackingSettings {
    /// Obergrenze für den Zeitschritt
    pub max_dt: f32,
    /// Timeout in Sekunden simulierter Zeit
    pub timeout_secs: f32,
    /// Ankunftstoleranz
    pub arrival_epsilon: f32,
    /// Bewegungsschwelle für Fortschritt
    pub movement_epsilon: f32,
    /// Iterationen der Binärsuche
    pub refine_iterations: u32,
    /// Abtastintervalle der Zielbestimmung
    pub target_samples: usize,
    /// Lücke zwischen Perlen beim Auseinanderziehen
    pub spread_gap: f32,
}

impl Default for PackingSettings {
    fn default() -> Self {
        Self {
            max_dt: PACKING_MAX_DT,
            timeout_secs: PACKING_TIMEOUT_SECS,
            arrival_epsilon: PACKING_ARRIVAL_EPSILON,
            movement_epsilon: PACKING_MOVEMENT_EPSILON,
            refine_iterations: PACKING_REFINE_ITERATIONS,
            target_samples: PACKING_TARGET_SAMPLES,
            spread_gap: PACKING_SPREAD_GAP,
        }
    }
}

impl PackingSettings {
    /// Übernimmt die Werte aus den Engine-Optionen.
    pub fn from_options(options: &EngineOptions) -> Self {
        Self {
            max_dt: options.packing_max_dt,
            timeout_secs: options.packing_timeout_secs,
            arrival_epsilon: options.packing_arrival_epsilon,
            movement_epsilon: options.packing_movement_epsilon,
            refine_iterations: options.packing_refine_iterations,
            target_samples: options.packing_target_samples,
            spread_gap: options.packing_spread_gap,
        }
    }
}

/// Bogenlänge des höchsten Punkts (maximales `y`) entlang eines Pfads.
///
/// Abgetastet an `samples + 1` gleichmäßig verteilten Stellen; bei
/// Gleichstand gewinnt die erste.
pub fn top_of_path(path: &Path, samples: usize) -> f32 {
    let samples = samples.max(1);
    let total = path.total_length();
    let mut best_y = f32::NEG_INFINITY;
    let mut best_distance = 0.0;
    for i in 0..=samples {
        let distance = total * i as f32 / samples as f32;
        if let Some(position) = path.position_at(distance) {
            if position.y > best_y {
                best_y = position.y;
                best_distance = distance;
            }
        }
    }
    path.normalize_distance(best_distance)
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PackingEntry {
    bead_id: BeadId,
    path_id: PathId,
    footprint: Footprint,
    distance: f32,
    target: f32,
}

/// Frame-getriebener Packing-Simulator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackingSimulator {
    phase: PackingPhase,
    speed: f32,
    persist: bool,
    elapsed: f32,
    ticks: u32,
    entries: Vec<PackingEntry>,
    settings: PackingSettings,
    last_report: Option<PackingReport>,
}

impl PackingSimulator {
    /// Erstellt einen Simulator mit Standard-Parametern.
    pub fn new() -> Self {
        Self::with_settings(PackingSettings::default())
    }

    /// Erstellt einen Simulator mit eigenen Parametern.
    pub fn with_settings(settings: PackingSettings) -> Self {
        Self {
            settings,
            speed: PACKING_BASE_SPEED,
            ..Self::default()
        }
    }

    /// Aktuelle Phase.
    pub fn phase(&self) -> PackingPhase {
        self.phase
    }

    /// `true` solange ein Lauf aktiv ist.
    pub fn is_active(&self) -> bool {
        self.phase == PackingPhase::Active
    }

    /// Simulierte Zeit des aktuellen Laufs.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Aktuelle Geschwindigkeit.
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Bericht des zuletzt beendeten Laufs.
    pub fn last_report(&self) -> Option<PackingReport> {
        self.last_report
    }

    /// Zielbogenlänge einer Perle im aktuellen Lauf.
    pub fn target_of(&self, id: BeadId) -> Option<f32> {
        self.entries
            .iter()
            .find(|entry| entry.bead_id == id)
            .map(|entry| entry.target)
    }

    /// Startet einen Lauf.
    ///
    /// Läuft bereits einer, werden nur Geschwindigkeit und Persistierung
    /// übernommen und die Ziele neu berechnet. Gibt `true` zurück, wenn ein
    /// neuer Lauf gestartet wurde.
    ///
    /// In beiden Fällen werden Pfade mit überlappenden Perlen zuerst
    /// auseinandergezogen.
    pub fn start(
        &mut self,
        path_set: &PathSet,
        store: &mut AttachmentStore,
        request: PackingRequest,
    ) -> bool {
        self.speed = request.speed.max(0.0);
        self.persist = request.persist;
        self.spread_overlapping(path_set, store);
        self.refresh_entries(path_set, store);

        if self.phase == PackingPhase::Active {
            log::debug!(
                "Packing läuft bereits, Parameter aktualisiert (Geschwindigkeit {:.2})",
                self.speed
            );
            return false;
        }

        self.phase = PackingPhase::Active;
        self.elapsed = 0.0;
        self.ticks = 0;
        log::info!(
            "Packing gestartet: {} Perlen, Geschwindigkeit {:.2}",
            self.entries.len(),
            self.speed
        );
        true
    }

    /// Bricht einen laufenden Lauf ohne Bericht ab.
    pub fn stop(&mut self) {
        if self.phase == PackingPhase::Active {
            log::debug!("Packing abgebrochen nach {:.2}s", self.elapsed);
        }
        self.phase = PackingPhase::Idle;
        self.entries.clear();
    }

    /// Verteilt die Perlen aller Pfade mit Überlappungen. Gibt die Anzahl
    /// der neu verteilten Pfade zurück.
    pub fn spread_overlapping(&self, path_set: &PathSet, store: &mut AttachmentStore) -> usize {
        let pairs = store.overlapping_pairs(path_set);
        let mut path_ids: Vec<PathId> = pairs
            .iter()
            .filter_map(|(a, _)| store.get(*a).map(|bead| bead.binding.path_id))
            .collect();
        path_ids.sort_unstable();
        path_ids.dedup();

        path_ids
            .into_iter()
            .filter(|path_id| self.spread_path(path_set, store, *path_id))
            .count()
    }

    /// Reiht die Perlen eines Pfads in Bogenlängen-Reihenfolge lückenlos um
    /// die mittlere Perle auf und schiebt die Reihe bei Bedarf in den Pfad
    /// hinein. Verworfen, wenn die Perlen nicht auf den Pfad passen oder
    /// danach nicht weniger Paare überlappen.
    fn spread_path(&self, path_set: &PathSet, store: &mut AttachmentStore, path_id: PathId) -> bool {
        let Some(path) = path_set.get(path_id) else {
            return false;
        };
        let overlaps_on_path = |store: &AttachmentStore| {
            store
                .overlapping_pairs(path_set)
                .iter()
                .filter(|(a, _)| store.get(*a).is_some_and(|bead| bead.binding.path_id == path_id))
                .count()
        };

        let mut row: Vec<(BeadId, f32, f32)> = store
            .beads_on_path(path_id)
            .filter_map(|bead| {
                let half = bead.footprint.half_extent() + 0.5 * self.settings.spread_gap;
                Some((bead.id, bead.arc_distance(path_set)?, half))
            })
            .collect();
        if row.len() < 2 {
            return false;
        }
        row.sort_by(|a, b| a.1.total_cmp(&b.1));

        let total: f32 = row.iter().map(|(_, _, half)| 2.0 * half).sum();
        let length = path.total_length();
        if total > length {
            log::debug!(
                "Pfad {}: Perlen ({:.2}) passen nicht auf {:.2}, keine Verteilung",
                path_id,
                total,
                length
            );
            return false;
        }

        let median = row.len() / 2;
        let mut offsets = vec![0.0f32; row.len()];
        let mut cursor = -row[median].2;
        for i in (0..median).rev() {
            cursor -= row[i].2;
            offsets[i] = cursor;
            cursor -= row[i].2;
        }
        cursor = row[median].2;
        for i in (median + 1)..row.len() {
            cursor += row[i].2;
            offsets[i] = cursor;
            cursor += row[i].2;
        }

        let last = row.len() - 1;
        let mut anchor = row[median].1;
        let lower = anchor + offsets[0] - row[0].2;
        let upper = anchor + offsets[last] + row[last].2;
        if lower < 0.0 {
            anchor -= lower;
        } else if upper > length {
            anchor -= upper - length;
        }

        let before = overlaps_on_path(store);
        let backup = store.clone();
        for ((id, _, _), offset) in row.iter().zip(&offsets) {
            store.rebind(*id, PathBinding::at_distance(path_id, path, anchor + offset));
        }

        let after = overlaps_on_path(store);
        if after >= before {
            *store = backup;
            return false;
        }
        log::debug!(
            "Pfad {}: {} Perlen verteilt, Überlappungen {} → {}",
            path_id,
            row.len(),
            before,
            after
        );
        true
    }

    fn refresh_entries(&mut self, path_set: &PathSet, store: &AttachmentStore) {
        let samples = self.settings.target_samples;
        self.entries = store
            .iter()
            .filter_map(|bead| {
                let path = path_set.get(bead.binding.path_id)?;
                Some(PackingEntry {
                    bead_id: bead.id,
                    path_id: bead.binding.path_id,
                    footprint: bead.footprint,
                    distance: bead.arc_distance(path_set)?,
                    target: top_of_path(path, samples),
                })
            })
            .collect();
    }

    /// Führt einen Simulationsschritt aus.
    pub fn tick(
        &mut self,
        path_set: &PathSet,
        store: &mut AttachmentStore,
        dt: f32,
    ) -> PackingStatus {
        if self.phase != PackingPhase::Active {
            return PackingStatus::Idle;
        }

        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.elapsed += dt;
        self.ticks += 1;

        if self.elapsed >= self.settings.timeout_secs {
            return self.finish(PackingPhase::TimedOut);
        }

        let step_length = self.speed * dt.min(self.settings.max_dt);
        if step_length <= 0.0 {
            return PackingStatus::Active;
        }

        // Positionen aus dem Store übernehmen (Pfade können sich geändert haben)
        for entry in &mut self.entries {
            if let Some(distance) = store.get(entry.bead_id).and_then(|b| b.arc_distance(path_set)) {
                entry.distance = distance;
            }
        }

        let mut order: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                let path = path_set.get(entry.path_id)?;
                Some((index, path.signed_delta(entry.distance, entry.target)))
            })
            .collect();
        order.sort_by(|a, b| a.1.abs().total_cmp(&b.1.abs()));

        let mut moved = false;
        for (index, delta) in order {
            if delta.abs() < self.settings.arrival_epsilon {
                continue;
            }
            let entry = self.entries[index];
            let Some(path) = path_set.get(entry.path_id) else {
                continue;
            };

            let direction = delta.signum();
            let wanted = step_length.min(delta.abs());
            let Some(advance) = self.largest_free_step(path_set, store, path, &entry, direction, wanted)
            else {
                continue;
            };
            if advance <= self.settings.movement_epsilon {
                continue;
            }

            let new_distance = path.normalize_distance(entry.distance + direction * advance);
            store.rebind(
                entry.bead_id,
                PathBinding::at_distance(entry.path_id, path, new_distance),
            );
            self.entries[index].distance = new_distance;
            moved = true;
        }

        if moved {
            return PackingStatus::Active;
        }

        if self.has_same_path_overlap(path_set, store) {
            // Unlösbare Konfiguration: weiterlaufen bis zum Timeout
            return PackingStatus::Active;
        }
        self.finish(PackingPhase::Converged)
    }

    /// Größter freier Teilschritt bis `wanted` in Richtung `direction`.
    fn largest_free_step(
        &self,
        path_set: &PathSet,
        store: &AttachmentStore,
        path: &Path,
        entry: &PackingEntry,
        direction: f32,
        wanted: f32,
    ) -> Option<f32> {
        let is_free = |advance: f32| self.is_free(path_set, store, path, entry, direction * advance);

        if is_free(wanted) {
            return Some(wanted);
        }

        let mut low = 0.0f32;
        let mut high = wanted;
        let mut valid = None;
        for _ in 0..self.settings.refine_iterations {
            let mid = 0.5 * (low + high);
            if is_free(mid) {
                valid = Some(mid);
                low = mid;
            } else {
                high = mid;
            }
        }
        valid
    }

    /// Prüft einen vorzeichenbehafteten Schritt gegen alle anderen Perlen auf dem Pfad.
    fn is_free(
        &self,
        path_set: &PathSet,
        store: &AttachmentStore,
        path: &Path,
        entry: &PackingEntry,
        signed_advance: f32,
    ) -> bool {
        let candidate = entry.distance + signed_advance;
        let Some(rect) = candidate_rect(path, candidate, entry.footprint) else {
            return false;
        };

        for other in store.beads_on_path(entry.path_id) {
            if other.id == entry.bead_id {
                continue;
            }
            let Some(other_distance) = other.arc_distance(path_set) else {
                continue;
            };
            // Reihenfolge erhalten: die Perle darf keine andere überspringen
            let offset = path.signed_delta(entry.distance, other_distance);
            if offset != 0.0
                && offset.signum() == signed_advance.signum()
                && offset.abs() <= signed_advance.abs()
            {
                return false;
            }
            if other
                .rect(path_set)
                .is_some_and(|other_rect| rects_overlap(&rect, &other_rect))
            {
                return false;
            }
        }
        true
    }

    fn has_same_path_overlap(&self, path_set: &PathSet, store: &AttachmentStore) -> bool {
        !store.overlapping_pairs(path_set).is_empty()
    }

    fn finish(&mut self, phase: PackingPhase) -> PackingStatus {
        let report = PackingReport {
            phase,
            persist: self.persist,
            elapsed: self.elapsed,
            ticks: self.ticks,
        };
        log::info!(
            "Packing beendet: {:?} nach {:.2}s ({} Ticks)",
            phase,
            self.elapsed,
            self.ticks
        );
        self.phase = PackingPhase::Idle;
        self.entries.clear();
        self.last_report = Some(report);
        PackingStatus::Finished(report)
    }
}
