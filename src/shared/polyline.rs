//! Reine Geometrie-Funktionen für Polylines.
//!
//! Layer-neutral: kann von `core` und `app` importiert werden ohne
//! Zirkel-Abhängigkeiten zu erzeugen.

use glam::Vec2;

/// Approximierte Länge einer Polyline.
pub fn polyline_length(points: &[Vec2]) -> f32 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Schwerpunkt (arithmetisches Mittel) einer Punktmenge.
///
/// Leere Eingabe liefert `None`.
pub fn centroid<'a>(points: impl IntoIterator<Item = &'a Vec2>) -> Option<Vec2> {
    let mut sum = Vec2::ZERO;
    let mut count = 0usize;
    for p in points {
        sum += *p;
        count += 1;
    }
    (count > 0).then(|| sum / count as f32)
}

/// Achsenparallele Bounding-Box einer Punktmenge als `(min, max)`.
pub fn bounds<'a>(points: impl IntoIterator<Item = &'a Vec2>) -> Option<(Vec2, Vec2)> {
    let mut iter = points.into_iter();
    let first = *iter.next()?;
    Some(iter.fold((first, first), |(min, max), p| (min.min(*p), max.max(*p))))
}

/// Projiziert `point` auf die Strecke `start`→`end`.
///
/// Liefert den ungeklemmten Projektionsparameter; bei entarteter Strecke 0.
pub fn projection_parameter(start: Vec2, end: Vec2, point: Vec2) -> f32 {
    let delta = end - start;
    let len_sq = delta.length_squared();
    if len_sq <= f32::EPSILON {
        return 0.0;
    }
    (point - start).dot(delta) / len_sq
}

/// Gleichmäßig verteilte Zwischenpunkte zwischen `from` und `to` (exklusive beider Enden).
///
/// Liefert `floor(distance / spacing)` Punkte bei `t = i / (n + 1)`.
pub fn interpolate_between(from: Vec2, to: Vec2, spacing: f32) -> Vec<Vec2> {
    if spacing <= 0.0 {
        return Vec::new();
    }
    let count = (from.distance(to) / spacing).floor() as usize;
    (1..=count)
        .map(|i| from.lerp(to, i as f32 / (count + 1) as f32))
        .collect()
}

/// Variationskoeffizient (Standardabweichung / Mittelwert) einer Wertemenge.
pub fn coefficient_of_variation(values: &[f32]) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    let mean = values.iter().sum::<f32>() / values.len() as f32;
    if mean <= f32::EPSILON {
        return None;
    }
    let variance =
        values.iter().map(|v| (v - mean) * (v - mean)).sum::<f32>() / values.len() as f32;
    Some(variance.sqrt() / mean)
}
