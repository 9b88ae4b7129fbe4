//! Zentrale Konfiguration für die Perlenketten-Engine.
//!
//! `EngineOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use serde::{Deserialize, Serialize};

// ── Pfad-Geometrie ──────────────────────────────────────────────────

/// Abstand zwischen erstem und letztem Punkt, unter dem ein Pfad als geschlossen gilt.
pub const CLOSURE_EPSILON: f32 = 0.5;
/// Segmente kürzer als dieser Wert werden von allen Abfragen übersprungen.
pub const DEGENERATE_SEGMENT_LENGTH: f32 = 0.0001;
/// Dezimalstellen, auf die Endpunkt-Koordinaten für den Junction-Index gerundet werden.
pub const JUNCTION_KEY_PRECISION: f32 = 1000.0;

// ── Nearest-Point-Abfragen ──────────────────────────────────────────

/// Enger Radius für das Platzieren von Perlen.
pub const PLACEMENT_RADIUS: f32 = 0.5;
/// Radius, in dem Strich-Anfang und -Ende an bestehende Pfade andocken.
pub const FUSE_RADIUS: f32 = 1.0;
/// Weiter Radius für das Ziehen von Perlen (auch über Pfade hinweg).
pub const DRAG_SNAP_RADIUS: f32 = 10.0;
/// Segment-Treffer mit Projektionsparameter unterhalb dieser Grenze werden verworfen.
pub const SEGMENT_DEADBAND_MIN: f32 = 0.05;
/// Segment-Treffer mit Projektionsparameter oberhalb dieser Grenze werden verworfen.
pub const SEGMENT_DEADBAND_MAX: f32 = 0.95;

// ── Strich-Erfassung ────────────────────────────────────────────────

/// Maximaler Punktabstand beim Zeichnen; größere Lücken werden interpoliert.
pub const STROKE_DENSITY: f32 = 0.05;
/// Solange der Zeiger näher als dieser Wert am Startpunkt bleibt, wird nichts angehängt.
pub const STROKE_START_TRIM_RADIUS: f32 = 0.5;

// ── Drag-Release ────────────────────────────────────────────────────

/// Schrittweite der Vorwärts/Rückwärts-Suche nach freiem Platz.
pub const RELEASE_SEARCH_STEP: f32 = 0.1;
/// Iterationen der Binärsuche zwischen letzter Kollision und erstem freien Platz.
pub const RELEASE_REFINE_ITERATIONS: u32 = 8;

// ── Radierer ────────────────────────────────────────────────────────

/// Basis-Trefferschwelle für Pfad-Enden bei Skalierung 0 %.
pub const ERASE_BASE_THRESHOLD: f32 = 0.5;
/// Zuwachs der Trefferschwelle pro Skalierungs-Prozentpunkt.
pub const ERASE_THRESHOLD_PER_PERCENT: f32 = 0.015;
/// Zusätzlicher Schutzabstand um Perlen, innerhalb dessen nicht radiert wird.
pub const ERASE_PROTECTION_MARGIN: f32 = 0.8;

// ── Packing ─────────────────────────────────────────────────────────

/// Basisgeschwindigkeit (Einheiten pro Sekunde) bei Skalierung 0 %.
pub const PACKING_BASE_SPEED: f32 = 9.0;
/// Obergrenze für den Zeitschritt eines Ticks in Sekunden.
pub const PACKING_MAX_DT: f32 = 0.05;
/// Simulierte Zeit in Sekunden, nach der ein Lauf als `TimedOut` endet.
pub const PACKING_TIMEOUT_SECS: f32 = 10.0;
/// Perlen näher als dieser Wert am Ziel bewegen sich nicht mehr.
pub const PACKING_ARRIVAL_EPSILON: f32 = 0.01;
/// Bewegungen unterhalb dieses Werts zählen nicht als Fortschritt.
pub const PACKING_MOVEMENT_EPSILON: f32 = 0.001;
/// Iterationen der Binärsuche bei blockiertem Schritt.
pub const PACKING_REFINE_ITERATIONS: u32 = 3;
/// Anzahl der Abtastintervalle bei der Zielbestimmung (ergibt `n + 1` Stützstellen).
pub const PACKING_TARGET_SAMPLES: usize = 50;
/// Lücke zwischen zwei Perlen beim Auseinanderziehen überlappender Pfade.
pub const PACKING_SPREAD_GAP: f32 = 0.01;

// ── Skalierung ──────────────────────────────────────────────────────

/// Maximaler Zuwachs des Skalierungsfaktors bei 100 % (Faktor 1 + 4 = 5).
pub const SCALE_FACTOR_SPAN: f32 = 4.0;

// ── Undo/Redo ───────────────────────────────────────────────────────

/// Standard-Tiefe des Undo-Stacks.
pub const HISTORY_DEPTH: usize = 100;

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit änderbaren Engine-Optionen.
/// Wird als `bead_string_editor.toml` gespeichert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineOptions {
    // ── Abfrage-Radien ──────────────────────────────────────────
    /// Radius für das Platzieren von Perlen
    pub placement_radius: f32,
    /// Andock-Radius für Strich-Anfang und -Ende
    pub fuse_radius: f32,
    /// Snap-Radius beim Ziehen von Perlen
    pub drag_snap_radius: f32,

    // ── Strich ──────────────────────────────────────────────────
    /// Maximaler Punktabstand beim Zeichnen
    pub stroke_density: f32,
    /// Start-Trim-Radius beim Zeichnen
    pub stroke_start_trim_radius: f32,

    // ── Drag-Release ────────────────────────────────────────────
    /// Schrittweite der Freiplatz-Suche
    pub release_search_step: f32,
    /// Iterationen der Verfeinerung
    #[serde(default = "default_release_refine_iterations")]
    pub release_refine_iterations: u32,

    // ── Radierer ────────────────────────────────────────────────
    /// Basis-Trefferschwelle
    pub erase_base_threshold: f32,
    /// Zuwachs pro Skalierungs-Prozentpunkt
    pub erase_threshold_per_percent: f32,
    /// Schutzabstand um Perlen
    pub erase_protection_margin: f32,

    // ── Packing ─────────────────────────────────────────────────
    /// Basisgeschwindigkeit
    pub packing_base_speed: f32,
    /// Maximaler Zeitschritt
    pub packing_max_dt: f32,
    /// Timeout in Sekunden simulierter Zeit
    pub packing_timeout_secs: f32,
    /// Ankunftstoleranz
    pub packing_arrival_epsilon: f32,
    /// Bewegungsschwelle
    pub packing_movement_epsilon: f32,
    /// Iterationen der Binärsuche
    #[serde(default = "default_packing_refine_iterations")]
    pub packing_refine_iterations: u32,
    /// Abtastintervalle für die Zielbestimmung
    #[serde(default = "default_packing_target_samples")]
    pub packing_target_samples: usize,
    /// Lücke beim Auseinanderziehen
    #[serde(default = "default_packing_spread_gap")]
    pub packing_spread_gap: f32,

    // ── Undo/Redo ───────────────────────────────────────────────
    /// Maximale Undo-Tiefe
    #[serde(default = "default_history_depth")]
    pub history_depth: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            placement_radius: PLACEMENT_RADIUS,
            fuse_radius: FUSE_RADIUS,
            drag_snap_radius: DRAG_SNAP_RADIUS,

            stroke_density: STROKE_DENSITY,
            stroke_start_trim_radius: STROKE_START_TRIM_RADIUS,

            release_search_step: RELEASE_SEARCH_STEP,
            release_refine_iterations: RELEASE_REFINE_ITERATIONS,

            erase_base_threshold: ERASE_BASE_THRESHOLD,
            erase_threshold_per_percent: ERASE_THRESHOLD_PER_PERCENT,
            erase_protection_margin: ERASE_PROTECTION_MARGIN,

            packing_base_speed: PACKING_BASE_SPEED,
            packing_max_dt: PACKING_MAX_DT,
            packing_timeout_secs: PACKING_TIMEOUT_SECS,
            packing_arrival_epsilon: PACKING_ARRIVAL_EPSILON,
            packing_movement_epsilon: PACKING_MOVEMENT_EPSILON,
            packing_refine_iterations: PACKING_REFINE_ITERATIONS,
            packing_target_samples: PACKING_TARGET_SAMPLES,
            packing_spread_gap: PACKING_SPREAD_GAP,

            history_depth: HISTORY_DEPTH,
        }
    }
}

/// Serde-Default für `release_refine_iterations` (Abwärtskompatibilität bestehender TOML-Dateien).
fn default_release_refine_iterations() -> u32 {
    RELEASE_REFINE_ITERATIONS
}

/// Serde-Default für `packing_refine_iterations`.
fn default_packing_refine_iterations() -> u32 {
    PACKING_REFINE_ITERATIONS
}

/// Serde-Default für `packing_target_samples`.
fn default_packing_target_samples() -> usize {
    PACKING_TARGET_SAMPLES
}

fn default_packing_spread_gap() -> f32 {
    PACKING_SPREAD_GAP
}

/// Serde-Default für `history_depth`.
fn default_history_depth() -> usize {
    HISTORY_DEPTH
}

impl EngineOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Trefferschwelle des Radierers für Pfad-Enden.
    ///
    /// Wächst mit der Skalierung, damit das Radieren bei großen Ketten griffig bleibt.
    pub fn erase_threshold(&self, scale_percentage: f32) -> f32 {
        self.erase_base_threshold + scale_percentage.max(0.0) * self.erase_threshold_per_percent
    }
}
