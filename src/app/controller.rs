//! Design-Controller für zentrale Command-Verarbeitung.

use super::persistence::DesignSink;
use super::{DesignCommand, DesignState};
use crate::core::PackingReport;
use anyhow::bail;

/// Orchestriert Commands und Use-Cases auf den DesignState.
///
/// Hält optional ein Persistenz-Ziel, an das gespeicherte Designs und
/// persistierende Packing-Ergebnisse übergeben werden.
#[derive(Default)]
pub struct DesignController {
    sink: Option<Box<dyn DesignSink>>,
}

impl DesignController {
    /// Erstellt einen Controller ohne Persistenz-Ziel.
    pub fn new() -> Self {
        Self { sink: None }
    }

    /// Erstellt einen Controller mit Persistenz-Ziel.
    pub fn with_sink(sink: Box<dyn DesignSink>) -> Self {
        Self { sink: Some(sink) }
    }

    /// Setzt oder entfernt das Persistenz-Ziel.
    pub fn set_sink(&mut self, sink: Option<Box<dyn DesignSink>>) {
        self.sink = sink;
    }

    /// Gibt zurück, ob ein Persistenz-Ziel gesetzt ist.
    pub fn has_sink(&self) -> bool {
        self.sink.is_some()
    }

    /// Führt mutierende Commands auf dem DesignState aus.
    /// Dispatcht an Feature-Handler in `handlers/`.
    pub fn handle_command(
        &mut self,
        state: &mut DesignState,
        command: DesignCommand,
    ) -> anyhow::Result<()> {
        state.command_log.record(&command);
        use super::handlers;

        match command {
            // === Strich & Radierer ===
            DesignCommand::BeginStroke { point } => handlers::editing::begin_stroke(state, point),
            DesignCommand::ExtendStroke { point } => {
                handlers::editing::extend_stroke(state, point)
            }
            DesignCommand::FinishStroke => handlers::editing::finish_stroke(state),
            DesignCommand::CancelStroke => handlers::editing::cancel_stroke(state),
            DesignCommand::EraseAt { point } => handlers::editing::erase_at(state, point),
            DesignCommand::ClearAll => handlers::editing::clear_all(state),
            DesignCommand::ImportPaths { paths } => handlers::editing::import_paths(state, paths),

            // === Perlen ===
            DesignCommand::PlaceBead {
                point,
                footprint,
                payload,
            } => handlers::beads::place(state, point, footprint, payload),
            DesignCommand::BeginBeadDrag { bead_id } => handlers::beads::begin_drag(state, bead_id),
            DesignCommand::DragBead { point } => handlers::beads::drag(state, point),
            DesignCommand::ReleaseBead => handlers::beads::release(state),
            DesignCommand::RotateBead { bead_id, radians } => {
                handlers::beads::rotate(state, bead_id, radians)
            }
            DesignCommand::DeleteBead { bead_id } => handlers::beads::delete(state, bead_id),

            // === Skalierung & Packing ===
            DesignCommand::SetScale { percentage } => handlers::scale::set_scale(state, percentage),
            DesignCommand::FinishScale => handlers::scale::finish_scale(state),
            DesignCommand::FitRequested { target } => handlers::scale::fit(state, target),
            DesignCommand::Tick { dt } => {
                if let Some(report) = handlers::scale::tick(state, dt) {
                    self.forward_packing_report(state, report)?;
                }
            }

            // === History ===
            DesignCommand::Undo => {
                handlers::history::undo(state);
            }
            DesignCommand::Redo => {
                handlers::history::redo(state);
            }

            // === Persistenz ===
            DesignCommand::SaveDesign => {
                let design = handlers::file_io::capture(state);
                let Some(sink) = self.sink.as_mut() else {
                    bail!("Kein Persistenz-Ziel gesetzt, Design nicht gespeichert");
                };
                sink.persist(&design)?;
            }
            DesignCommand::LoadDesign { path, pack } => {
                handlers::file_io::load(state, &path, pack)?
            }
        }

        Ok(())
    }

    /// Übergibt das Ergebnis eines persistierenden Packing-Laufs an das Ziel.
    fn forward_packing_report(
        &mut self,
        state: &DesignState,
        report: PackingReport,
    ) -> anyhow::Result<()> {
        log::info!(
            "Packing beendet: {:?} nach {:.2}s ({} Ticks)",
            report.phase,
            report.elapsed,
            report.ticks
        );
        if !report.persist {
            return Ok(());
        }
        match self.sink.as_mut() {
            Some(sink) => sink.persist(&super::handlers::file_io::capture(state)),
            None => {
                log::debug!("Packing-Ergebnis nicht persistiert: kein Ziel gesetzt");
                Ok(())
            }
        }
    }
}
