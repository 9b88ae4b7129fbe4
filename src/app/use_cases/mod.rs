//! Use-Cases der Application-Layer-Orchestrierung.

pub mod beads;
pub mod editing;
pub mod file_io;
pub mod scale;
