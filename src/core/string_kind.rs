//! Herkunft der Ketten-Geometrie: frei gezeichnet, Vorlage oder gemischt.
//!
//! Reine Metadaten ohne Einfluss auf Geometrie oder Perlen.

use crate::shared::polyline::coefficient_of_variation;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Mindestanzahl an Punkten, ab der die Abstands-Heuristik greift.
const PRESET_MIN_POINTS: usize = 10;
/// Anzahl der ausgewerteten Punktabstände.
const PRESET_SAMPLE_SPACINGS: usize = 50;
/// Variationskoeffizient, unter dem Abstände als gleichmäßig gelten.
const PRESET_MAX_CV: f32 = 0.3;

/// Art der Ketten-Geometrie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StringKind {
    /// Keine Geometrie
    #[default]
    None,
    /// Ausschließlich frei gezeichnet
    Pen,
    /// Ausschließlich aus Vorlagen
    Preset,
    /// Beides
    Mixed,
}

/// Herkunftsmarker einer Sitzung.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StringProvenance {
    /// Mindestens ein Strich wurde gezeichnet
    pub has_pen: bool,
    /// Mindestens eine Vorlage wurde importiert
    pub has_preset: bool,
}

impl StringProvenance {
    /// Leitet die Art aus den Markern ab.
    pub fn kind(&self) -> StringKind {
        match (self.has_pen, self.has_preset) {
            (false, false) => StringKind::None,
            (true, false) => StringKind::Pen,
            (false, true) => StringKind::Preset,
            (true, true) => StringKind::Mixed,
        }
    }

    /// Setzt die Marker aus einer gespeicherten Art.
    pub fn from_kind(kind: StringKind) -> Self {
        Self {
            has_pen: matches!(kind, StringKind::Pen | StringKind::Mixed),
            has_preset: matches!(kind, StringKind::Preset | StringKind::Mixed),
        }
    }

    /// Setzt beide Marker zurück.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Heuristik: gleichmäßig abgetastete Punkte stammen vermutlich aus einer Vorlage.
///
/// Wertet die ersten 50 Punktabstände aus; ein Variationskoeffizient unter
/// 0.3 gilt als Vorlage. Bei weniger als 10 Punkten keine Aussage.
pub fn looks_like_preset(points: &[Vec2]) -> bool {
    if points.len() < PRESET_MIN_POINTS {
        return false;
    }
    let spacings: Vec<f32> = points
        .windows(2)
        .take(PRESET_SAMPLE_SPACINGS)
        .map(|w| w[0].distance(w[1]))
        .collect();
    coefficient_of_variation(&spacings).is_some_and(|cv| cv < PRESET_MAX_CV)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_aus_markern() {
        let mut provenance = StringProvenance::default();
        assert_eq!(provenance.kind(), StringKind::None);
        provenance.has_pen = true;
        assert_eq!(provenance.kind(), StringKind::Pen);
        provenance.has_preset = true;
        assert_eq!(provenance.kind(), StringKind::Mixed);
        assert_eq!(StringProvenance::from_kind(StringKind::Mixed), provenance);
    }

    #[test]
    fn test_gleichmaessige_abstaende_gelten_als_vorlage() {
        let even: Vec<Vec2> = (0..20).map(|i| Vec2::new(i as f32 * 0.5, 0.0)).collect();
        assert!(looks_like_preset(&even));

        let uneven: Vec<Vec2> = (0..20)
            .map(|i| Vec2::new((i * i) as f32 * 0.1, 0.0))
            .collect();
        assert!(!looks_like_preset(&uneven));

        assert!(!looks_like_preset(&even[..5]));
    }
}
