//! Geteilte, layer-neutrale Bausteine.
//!
//! Enthält Optionen und reine Geometrie-Helfer, die von `core` und `app`
//! gleichermaßen genutzt werden.

pub mod options;
pub mod polyline;

pub use options::EngineOptions;
pub use options::{CLOSURE_EPSILON, FUSE_RADIUS, PLACEMENT_RADIUS};
