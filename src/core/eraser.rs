//! Radierer: kürzt Pfade punktweise von ihren Enden her.
//!
//! Nur das Pfadende, das dem Radierer am nächsten liegt, wird angefasst.
//! Enden in der Nähe einer Perle (oder deren Segment) sind geschützt.

use super::attachment_store::AttachmentStore;
use super::path_set::{EndpointRole, PathId, PathSet, TipRemoval};
use glam::Vec2;

/// Ergebnis eines erfolgreichen Radier-Schritts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TipErase {
    /// Betroffener Pfad (ID vor einer eventuellen Entfernung)
    pub path_id: PathId,
    /// Angefasstes Ende
    pub role: EndpointRole,
    /// Pfad fiel unter 2 Punkte und wurde entfernt
    pub path_removed: bool,
}

/// Parameter eines Radier-Schritts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EraseSettings {
    /// Maximaler Abstand zwischen Radierer und Pfadende
    pub threshold: f32,
    /// Zusätzlicher Schutzabstand um Perlen
    pub protection_margin: f32,
}

/// Prüft, ob ein Pfadende radiert werden darf.
fn tip_is_protected(
    path_set: &PathSet,
    store: &AttachmentStore,
    path_id: PathId,
    role: EndpointRole,
    tip: Vec2,
    protection_margin: f32,
) -> bool {
    let Some(path) = path_set.get(path_id) else {
        return true;
    };
    let tip_segment = match role {
        EndpointRole::Start => 0,
        EndpointRole::End => path.segment_count().saturating_sub(1),
    };

    store.iter().any(|bead| {
        if bead.binding.path_id == path_id && bead.binding.segment_index == tip_segment {
            return true;
        }
        bead.position(path_set).is_some_and(|position| {
            position.distance(tip) < bead.footprint.half_extent() + protection_margin
        })
    })
}

/// Entfernt den nächstgelegenen Endpunkt, falls nah genug und nicht geschützt.
///
/// Bindungen der Perlen werden an die geänderte Topologie angepasst.
pub fn erase_nearest_tip(
    path_set: &mut PathSet,
    store: &mut AttachmentStore,
    eraser: Vec2,
    settings: EraseSettings,
) -> Option<TipErase> {
    let (path_id, role, tip) = path_set
        .tips()
        .into_iter()
        .min_by(|a, b| a.2.distance(eraser).total_cmp(&b.2.distance(eraser)))?;

    if tip.distance(eraser) >= settings.threshold {
        return None;
    }
    if tip_is_protected(path_set, store, path_id, role, tip, settings.protection_margin) {
        log::debug!("Pfadende {:?} von Pfad {} geschützt", role, path_id);
        return None;
    }

    let removal = path_set.remove_tip(path_id, role)?;
    let path_removed = matches!(removal, TipRemoval::PathRemoved { .. });
    if path_removed {
        store.on_path_removed(path_id);
        log::info!("Pfad {} vollständig radiert", path_id);
    } else if role == EndpointRole::Start {
        store.on_leading_vertex_removed(path_id);
    }

    Some(TipErase {
        path_id,
        role,
        path_removed,
    })
}
