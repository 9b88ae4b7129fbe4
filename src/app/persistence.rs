//! Übergabe an die Persistenz: gespeichertes Design und Ziel-Trait.
//!
//! Das Speicher-Backend selbst ist extern; hier liegen nur das
//! serialisierbare Format und eine einfache JSON-Datei-Implementierung.

use super::DesignState;
use crate::core::{Bead, StringKind};
use anyhow::{bail, Context};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Aktuelle Format-Version von `SavedDesign`.
pub const SAVED_DESIGN_VERSION: u32 = 1;

/// Serialisierbarer Stand eines Designs.
///
/// Punkte liegen skaliert vor; die Baseline wird beim Laden aus
/// `scale_percentage` rekonstruiert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedDesign {
    /// Format-Version
    pub version: u32,
    /// Punktlisten aller Pfade
    pub paths: Vec<Vec<Vec2>>,
    /// Alle Perlen inkl. Bindung
    #[serde(default)]
    pub beads: Vec<Bead>,
    /// Skalierung in Prozent
    #[serde(default)]
    pub scale_percentage: f32,
    /// Herkunft der Geometrie
    #[serde(default)]
    pub string_kind: StringKind,
}

impl SavedDesign {
    /// Erfasst den aktuellen Stand einer Sitzung.
    pub fn capture(state: &DesignState) -> Self {
        Self {
            version: SAVED_DESIGN_VERSION,
            paths: state.paths.point_lists(),
            beads: state.beads.beads().to_vec(),
            scale_percentage: state.rescale.percentage(),
            string_kind: state.string_kind(),
        }
    }

    /// Serialisiert das Design als JSON.
    pub fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(self).context("Design konnte nicht serialisiert werden")
    }

    /// Liest ein Design aus JSON und prüft Version und Wertebereiche.
    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        let design: Self =
            serde_json::from_str(content).context("Design-JSON ist fehlerhaft")?;
        design.validate()?;
        Ok(design)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.version == 0 || self.version > SAVED_DESIGN_VERSION {
            bail!(
                "Nicht unterstützte Design-Version {} (erwartet 1..={})",
                self.version,
                SAVED_DESIGN_VERSION
            );
        }
        if !self.scale_percentage.is_finite() {
            bail!("Ungültige Skalierung: {}", self.scale_percentage);
        }
        if self
            .paths
            .iter()
            .flatten()
            .any(|point| !point.is_finite())
        {
            bail!("Design enthält nicht-endliche Koordinaten");
        }
        if let Some(bead) = self
            .beads
            .iter()
            .find(|bead| !(bead.footprint.width > 0.0 && bead.footprint.height > 0.0))
        {
            bail!("Perle {:?} hat einen ungültigen Footprint", bead.id);
        }
        Ok(())
    }
}

/// Liest ein Design aus einer JSON-Datei.
pub fn load_design_file(path: &Path) -> anyhow::Result<SavedDesign> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Design-Datei nicht lesbar: {}", path.display()))?;
    SavedDesign::from_json(&content)
}

/// Ziel für gespeicherte Designs (externes Speicher-Backend).
pub trait DesignSink {
    /// Übernimmt ein Design zur dauerhaften Speicherung.
    fn persist(&mut self, design: &SavedDesign) -> anyhow::Result<()>;
}

/// Schreibt jedes übergebene Design als JSON in eine feste Datei.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    /// Erstellt ein Datei-Ziel.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Zieldatei.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DesignSink for JsonFileSink {
    fn persist(&mut self, design: &SavedDesign) -> anyhow::Result<()> {
        let content = design.to_json()?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Design-Datei nicht schreibbar: {}", self.path.display()))?;
        log::info!(
            "Design gespeichert nach: {} ({} Pfade, {} Perlen)",
            self.path.display(),
            design.paths.len(),
            design.beads.len()
        );
        Ok(())
    }
}
