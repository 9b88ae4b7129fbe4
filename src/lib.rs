//! Bead String Editor Library.
//! Pfad-Geometrie, Perlen-Bindung, Kollision, Skalierung und Packing als Library.

pub mod app;
pub mod core;
pub mod shared;

pub use app::{
    CommandLog, DesignCommand, DesignController, DesignSink, DesignState, EditFeedback,
    JsonFileSink, SavedDesign,
};
pub use core::{
    nearest_on_paths, rects_overlap, scale_factor, AttachmentStore, Bead, BeadId,
    BeadPlacement, DragRelease, EndpointRole, Footprint, OrientedRect, PackingPhase,
    PackingReport, PackingRequest, PackingSimulator, PackingStatus, Path, PathBinding, PathHit,
    PathHitKind, PathId, PathSet, PayloadHandle, PlacementRejection, ReleaseSettings,
    RescaleEngine, RescaleOutcome, StringKind, StrokeBuilder, StrokeCommit, StrokeSettings,
};
pub use shared::EngineOptions;
