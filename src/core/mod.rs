//! Core-Domänentypen: Pfade, Perlen, Abfragen, Kollision, Skalierung, Packing.

pub mod attachment_store;
pub mod bead;
pub mod collision;
pub mod eraser;
pub mod nearest;
pub mod packing;
/// Core-Datenmodelle der Ketten-Geometrie
///
/// - Path: einzelne Polyline mit Bogenlängen-Cache
/// - PathSet: alle Pfade plus Junction-Index
pub mod path;
pub mod path_set;
pub mod rescale;
pub mod stroke;
pub mod string_kind;

pub use attachment_store::{AttachmentStore, DragRelease, PlacementRejection, ReleaseSettings};
pub use bead::{Bead, BeadId, BeadPlacement, Footprint, PathBinding, PayloadHandle};
pub use collision::{rects_overlap, OrientedRect};
pub use eraser::{erase_nearest_tip, EraseSettings, TipErase};
pub use nearest::{nearest_on_paths, PathHit, PathHitKind};
pub use packing::{
    PackingPhase, PackingReport, PackingRequest, PackingSettings, PackingSimulator, PackingStatus,
};
pub use path::{Path, PathProjection, PathSegment};
pub use path_set::{EndpointRole, JunctionEntry, PathId, PathSet, TipRemoval};
pub use rescale::{scale_factor, RescaleEngine, RescaleOutcome, ScaleBaseline};
pub use stroke::{StrokeBuilder, StrokeCommit, StrokeSettings, VertexSplit};
pub use string_kind::{looks_like_preset, StringKind, StringProvenance};
