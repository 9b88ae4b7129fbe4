use approx::assert_relative_eq;
use bead_string_editor::{
    scale_factor, AttachmentStore, Footprint, Path, PathSet, PayloadHandle, RescaleEngine,
    RescaleOutcome,
};
use glam::Vec2;

fn small_design() -> PathSet {
    PathSet::from_paths([
        Path::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(0.5, 0.25),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.5, -0.25),
            Vec2::new(2.0, 0.0),
        ]),
        Path::new(vec![Vec2::new(1.0, 1.0), Vec2::new(1.0, 2.0), Vec2::new(1.25, 2.5)]),
    ])
}

#[test]
fn test_skalierungsfaktor_grenzen() {
    assert_eq!(scale_factor(0.0), 1.0);
    assert_eq!(scale_factor(50.0), 3.0);
    assert_eq!(scale_factor(100.0), 5.0);
    assert_eq!(scale_factor(-20.0), 1.0);
    assert_eq!(scale_factor(250.0), 5.0);
}

#[test]
fn test_rundreise_null_hundert_null() {
    let original = small_design();
    let mut set = original.clone();
    let mut engine = RescaleEngine::new();
    engine.capture_baseline(&set);

    assert_eq!(
        engine.apply_scale(&mut set, 100.0),
        RescaleOutcome::Applied { factor: 5.0 }
    );
    assert_relative_eq!(
        set.get(0).map(Path::total_length).unwrap_or_default(),
        original.get(0).map(Path::total_length).unwrap_or_default() * 5.0,
        epsilon = 1e-4
    );

    engine.apply_scale(&mut set, 0.0);
    for (scaled, base) in set.all_points().zip(original.all_points()) {
        assert_relative_eq!(scaled.x, base.x, epsilon = 1e-6);
        assert_relative_eq!(scaled.y, base.y, epsilon = 1e-6);
    }
    assert_eq!(engine.percentage(), 0.0);
}

#[test]
fn test_schwerpunkt_bleibt_erhalten() {
    let mut set = small_design();
    let centroid = set.centroid().expect("Schwerpunkt erwartet");
    let mut engine = RescaleEngine::new();

    engine.apply_scale(&mut set, 60.0);
    let scaled_centroid = set.centroid().expect("Schwerpunkt erwartet");
    assert_relative_eq!(scaled_centroid.x, centroid.x, epsilon = 1e-4);
    assert_relative_eq!(scaled_centroid.y, centroid.y, epsilon = 1e-4);
}

#[test]
fn test_bindungen_unveraendert_positionen_folgen() {
    let mut set = small_design();
    let mut store = AttachmentStore::new();
    let id = store
        .place(&set, Vec2::new(1.0, 1.5), Footprint::new(0.2, 0.2), PayloadHandle(3), 0.5)
        .expect("Platzierung erwartet");
    let binding_before = store.get(id).map(|b| b.binding).expect("Bindung");
    let centroid = set.centroid().expect("Schwerpunkt erwartet");
    let position_before = store.get(id).and_then(|b| b.position(&set)).expect("Position");

    let mut engine = RescaleEngine::new();
    engine.apply_scale(&mut set, 25.0);

    let bead = store.get(id).expect("Perle erwartet");
    assert_eq!(bead.binding, binding_before);
    let position_after = bead.position(&set).expect("Position");
    let expected = centroid + (position_before - centroid) * 2.0;
    assert_relative_eq!(position_after.x, expected.x, epsilon = 1e-4);
    assert_relative_eq!(position_after.y, expected.y, epsilon = 1e-4);
}

#[test]
fn test_baseline_aus_gespeichertem_prozentwert() {
    let original = small_design();
    let mut scaled = original.clone();
    let mut engine = RescaleEngine::new();
    engine.apply_scale(&mut scaled, 40.0);

    // Neue Sitzung: nur skalierte Punkte und Prozentwert bekannt
    let mut restored = RescaleEngine::new();
    restored.restore_from_percentage(&scaled, 40.0);
    assert_eq!(restored.percentage(), 40.0);
    assert!(restored.is_in_sync(&scaled));

    restored.apply_scale(&mut scaled, 0.0);
    for (point, base) in scaled.all_points().zip(original.all_points()) {
        assert_relative_eq!(point.x, base.x, epsilon = 1e-4);
        assert_relative_eq!(point.y, base.y, epsilon = 1e-4);
    }
}

#[test]
fn test_verschobene_baseline_folgt_geometrie() {
    let mut set = small_design();
    let mut engine = RescaleEngine::new();
    engine.apply_scale(&mut set, 50.0);

    let delta = Vec2::new(3.0, -2.0);
    set.translate(delta);
    engine.translate_baseline(delta);
    let centroid = set.centroid().expect("Schwerpunkt erwartet");

    engine.apply_scale(&mut set, 50.0);
    let after = set.centroid().expect("Schwerpunkt erwartet");
    assert_relative_eq!(after.x, centroid.x, epsilon = 1e-4);
    assert_relative_eq!(after.y, centroid.y, epsilon = 1e-4);
}

#[test]
fn test_leere_geometrie_wird_nicht_skaliert() {
    let mut set = PathSet::new();
    let mut engine = RescaleEngine::new();
    assert_eq!(engine.apply_scale(&mut set, 50.0), RescaleOutcome::NoGeometry);
}
