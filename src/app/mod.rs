//! Application-Layer: Controller, State, Events, Use-Cases und Persistenz-Übergabe.

pub mod command_log;
pub mod controller;
pub mod events;
pub mod handlers;
pub mod history;
pub mod persistence;
/// Sitzungszustand
///
/// Hält Geometrie, Perlen, Skalierung, Packing und Undo/Redo einer Sitzung.
pub mod state;
pub mod use_cases;

pub use command_log::{CommandLog, LoggedCommand};
pub use controller::DesignController;
pub use events::DesignCommand;
pub use history::{EditHistory, Snapshot};
pub use persistence::{DesignSink, JsonFileSink, SavedDesign, SAVED_DESIGN_VERSION};
pub use state::{DesignState, EditFeedback};
