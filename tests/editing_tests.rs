use approx::assert_relative_eq;
use bead_string_editor::{
    nearest_on_paths, AttachmentStore, BeadId, DragRelease, EngineOptions, Footprint, Path,
    PathHitKind, PathSet, PayloadHandle, PlacementRejection, ReleaseSettings, StrokeBuilder,
    StrokeCommit, StrokeSettings,
};
use bead_string_editor::core::{erase_nearest_tip, EraseSettings};
use glam::Vec2;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn horizontal(from: f32, to: f32, y: f32, points: usize) -> Path {
    Path::new(
        (0..points)
            .map(|i| {
                let x = from + (to - from) * i as f32 / (points - 1) as f32;
                Vec2::new(x, y)
            })
            .collect(),
    )
}

fn bead_footprint() -> Footprint {
    Footprint::new(1.0, 0.5)
}

fn assert_no_same_path_overlap(set: &PathSet, store: &AttachmentStore) {
    let pairs = store.overlapping_pairs(set);
    assert!(pairs.is_empty(), "Überlappende Perlen: {pairs:?}");
}

#[test]
fn test_nearest_point_auf_segmentmitte() {
    let set = PathSet::from_paths([Path::new(vec![
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(2.0, 0.0),
    ])]);

    let hit = nearest_on_paths(&set, Vec2::new(0.5, 0.1), 1.0).expect("Treffer erwartet");

    match hit.kind {
        PathHitKind::Segment { segment_index, t } => {
            assert_eq!(segment_index, 0);
            assert_relative_eq!(t, 0.5, epsilon = 1e-5);
        }
        other => panic!("Unerwarteter Treffer: {other:?}"),
    }
    assert_relative_eq!(hit.distance, 0.1, epsilon = 1e-5);
}

#[test]
fn test_strich_ende_auf_segmentmitte_teilt_pfad() {
    init_logger();
    let mut set = PathSet::from_paths([Path::new(vec![Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0)])]);

    let mut stroke = StrokeBuilder::begin(&set, Vec2::new(2.0, 4.0), StrokeSettings::default());
    for i in 1..=40 {
        stroke.extend(Vec2::new(2.0, 4.0 - i as f32 * 0.1));
    }

    match stroke.finish(&mut set) {
        StrokeCommit::Committed { path_id, splits } => {
            assert_eq!(path_id, 1);
            assert_eq!(splits.len(), 1);
        }
        other => panic!("Unerwartetes Commit-Ergebnis: {other:?}"),
    }

    let split_path = set.get(0).expect("Pfad 0 erwartet");
    assert_eq!(split_path.point_count(), 3);
    let new_path = set.get(1).expect("Pfad 1 erwartet");
    let end = new_path.last_point().expect("Endpunkt erwartet");
    assert_relative_eq!(end.x, 2.0, epsilon = 1e-4);
    assert_relative_eq!(end.y, 0.0, epsilon = 1e-4);
}

#[test]
fn test_split_behaelt_perlen_positionen() {
    let mut set = PathSet::from_paths([Path::new(vec![Vec2::new(0.0, 0.0), Vec2::new(8.0, 0.0)])]);
    let mut store = AttachmentStore::new();
    let left = store
        .place(&set, Vec2::new(1.0, 0.0), bead_footprint(), PayloadHandle(1), 0.5)
        .expect("Platzierung links erwartet");
    let right = store
        .place(&set, Vec2::new(7.0, 0.0), bead_footprint(), PayloadHandle(2), 0.5)
        .expect("Platzierung rechts erwartet");
    let before: Vec<Vec2> = [left, right]
        .iter()
        .map(|id| store.get(*id).and_then(|b| b.position(&set)).expect("Position"))
        .collect();

    let mut stroke = StrokeBuilder::begin(&set, Vec2::new(4.0, 3.0), StrokeSettings::default());
    for i in 1..=30 {
        stroke.extend(Vec2::new(4.0, 3.0 - i as f32 * 0.1));
    }
    let StrokeCommit::Committed { splits, .. } = stroke.finish(&mut set) else {
        panic!("Commit erwartet");
    };
    for split in &splits {
        store.on_vertex_inserted(split.path_id, split.segment_index, split.t);
    }

    for (id, expected) in [left, right].iter().zip(before) {
        let bead = store.get(*id).expect("Perle erwartet");
        assert!(bead.has_valid_binding(&set));
        let position = bead.position(&set).expect("Position erwartet");
        assert_relative_eq!(position.x, expected.x, epsilon = 1e-4);
        assert_relative_eq!(position.y, expected.y, epsilon = 1e-4);
    }
    assert_eq!(store.get(right).map(|b| b.binding.segment_index), Some(1));
}

#[test]
fn test_platzierung_abseits_und_belegt() {
    let set = PathSet::from_paths([horizontal(0.0, 10.0, 0.0, 11)]);
    let mut store = AttachmentStore::new();

    assert_eq!(
        store.place(&set, Vec2::new(5.0, 3.0), bead_footprint(), PayloadHandle(1), 0.5),
        Err(PlacementRejection::NotNearPath)
    );

    store
        .place(&set, Vec2::new(5.0, 0.0), bead_footprint(), PayloadHandle(1), 0.5)
        .expect("Erste Platzierung erwartet");
    assert_eq!(
        store.place(&set, Vec2::new(5.4, 0.0), bead_footprint(), PayloadHandle(2), 0.5),
        Err(PlacementRejection::Occupied)
    );
    store
        .place(&set, Vec2::new(6.2, 0.0), bead_footprint(), PayloadHandle(3), 0.5)
        .expect("Platzierung mit Abstand erwartet");
    assert_no_same_path_overlap(&set, &store);
}

#[test]
fn test_kreuzende_pfade_duerfen_ueberlappen() {
    let set = PathSet::from_paths([
        horizontal(0.0, 10.0, 0.0, 11),
        Path::new((0..11).map(|i| Vec2::new(5.0, -5.0 + i as f32)).collect()),
    ]);
    let mut store = AttachmentStore::new();
    store
        .place(&set, Vec2::new(5.2, 0.0), bead_footprint(), PayloadHandle(1), 0.5)
        .expect("Platzierung auf Pfad 0 erwartet");
    store
        .place(&set, Vec2::new(5.0, 0.3), bead_footprint(), PayloadHandle(2), 0.5)
        .expect("Platzierung auf Pfad 1 trotz Überlappung erwartet");
    assert_no_same_path_overlap(&set, &store);
}

#[test]
fn test_drag_auf_belegten_platz_wird_aufgeloest() {
    init_logger();
    let set = PathSet::from_paths([horizontal(0.0, 10.0, 0.0, 101)]);
    let mut store = AttachmentStore::new();
    let anchor = store
        .place(&set, Vec2::new(5.0, 0.0), bead_footprint(), PayloadHandle(1), 0.5)
        .expect("Anker erwartet");
    let moving = store
        .place(&set, Vec2::new(1.0, 0.0), bead_footprint(), PayloadHandle(2), 0.5)
        .expect("Bewegte Perle erwartet");

    assert!(store.begin_drag(moving));
    assert!(store.drag_to(&set, Vec2::new(5.3, 0.2), 10.0));
    assert!(store.collides(&set, moving));

    let release = store.release_drag(&set, ReleaseSettings::default());
    assert_eq!(release, DragRelease::Settled { shifted: true });
    assert_no_same_path_overlap(&set, &store);

    let anchor_x = store
        .get(anchor)
        .and_then(|b| b.position(&set))
        .map(|p| p.x)
        .expect("Anker-Position");
    let moved_x = store
        .get(moving)
        .and_then(|b| b.position(&set))
        .map(|p| p.x)
        .expect("Position");
    assert!((moved_x - anchor_x).abs() >= 0.999);
    assert!((moved_x - anchor_x).abs() < 1.2);
}

#[test]
fn test_drag_wechselt_pfad() {
    let set = PathSet::from_paths([horizontal(0.0, 10.0, 0.0, 11), horizontal(0.0, 10.0, 3.0, 11)]);
    let mut store = AttachmentStore::new();
    let id = store
        .place(&set, Vec2::new(2.5, 0.0), bead_footprint(), PayloadHandle(1), 0.5)
        .expect("Platzierung erwartet");

    store.begin_drag(id);
    store.drag_to(&set, Vec2::new(2.5, 2.8), 10.0);
    assert_eq!(
        store.release_drag(&set, ReleaseSettings::default()),
        DragRelease::Settled { shifted: false }
    );
    assert_eq!(store.get(id).map(|b| b.binding.path_id), Some(1));
}

#[test]
fn test_radierer_kuerzt_und_schuetzt() {
    let mut set = PathSet::from_paths([horizontal(0.0, 10.0, 0.0, 11)]);
    let mut store = AttachmentStore::new();
    let settings = EraseSettings {
        threshold: EngineOptions::default().erase_threshold(0.0),
        protection_margin: 0.8,
    };

    let erased = erase_nearest_tip(&mut set, &mut store, Vec2::new(10.2, 0.0), settings)
        .expect("Radieren erwartet");
    assert!(!erased.path_removed);
    assert_eq!(set.get(0).map(Path::point_count), Some(10));

    store
        .place(&set, Vec2::new(0.5, 0.0), bead_footprint(), PayloadHandle(1), 0.5)
        .expect("Platzierung am Anfang erwartet");
    assert!(erase_nearest_tip(&mut set, &mut store, Vec2::new(-0.1, 0.0), settings).is_none());
    assert_eq!(set.get(0).map(Path::point_count), Some(10));
}

#[test]
fn test_radierer_entfernt_pfad_und_perlen() {
    let mut set = PathSet::from_paths([
        horizontal(0.0, 2.0, 0.0, 3),
        horizontal(0.0, 10.0, 5.0, 11),
    ]);
    let mut store = AttachmentStore::new();
    let survivor = store
        .place(&set, Vec2::new(5.0, 5.0), bead_footprint(), PayloadHandle(1), 0.5)
        .expect("Platzierung erwartet");
    let settings = EraseSettings {
        threshold: 0.5,
        protection_margin: 0.8,
    };

    erase_nearest_tip(&mut set, &mut store, Vec2::new(2.1, 0.0), settings).expect("Radieren");
    let erased =
        erase_nearest_tip(&mut set, &mut store, Vec2::new(1.1, 0.0), settings).expect("Radieren");
    assert!(erased.path_removed);
    assert_eq!(set.len(), 1);

    let bead = store.get(survivor).expect("Perle erwartet");
    assert_eq!(bead.binding.path_id, 0);
    assert!(bead.has_valid_binding(&set));
    assert!(store.get(BeadId(999)).is_none());
}
