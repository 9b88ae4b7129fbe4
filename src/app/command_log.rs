//! Command-Log aller ausgeführten Design-Commands (Diagnose und Tests).
//!
//! Frame-Ticks werden nicht aufgezeichnet. Jeder Eintrag trägt eine
//! fortlaufende Nummer, die auch nach dem Kürzen des Logs weiterzählt.

use super::DesignCommand;

/// Ein aufgezeichneter Command mit fortlaufender Nummer.
#[derive(Debug, Clone)]
pub struct LoggedCommand {
    /// Laufende Nummer ab 0
    pub sequence: u64,
    /// Der ausgeführte Command
    pub command: DesignCommand,
}

/// Speichert ausgeführte Commands in Reihenfolge.
#[derive(Default)]
pub struct CommandLog {
    entries: Vec<LoggedCommand>,
    next_sequence: u64,
}

impl CommandLog {
    const MAX_ENTRIES: usize = 1000;

    /// Erstellt ein leeres Command-Log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fügt einen ausgeführten Command hinzu.
    /// Begrenzt auf MAX_ENTRIES; die ältere Hälfte wird dann verworfen.
    pub fn record(&mut self, command: &DesignCommand) {
        if command.is_frame_tick() {
            return;
        }
        if self.entries.len() >= Self::MAX_ENTRIES {
            self.entries.drain(..Self::MAX_ENTRIES / 2);
        }
        self.entries.push(LoggedCommand {
            sequence: self.next_sequence,
            command: command.clone(),
        });
        self.next_sequence += 1;
    }

    /// Gibt die Anzahl der geloggten Commands zurück.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Gibt `true` zurück, wenn keine Commands vorhanden sind.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Anzahl aller jemals aufgezeichneten Commands.
    pub fn total_recorded(&self) -> u64 {
        self.next_sequence
    }

    /// Anzahl der beim Kürzen verworfenen Commands.
    pub fn dropped(&self) -> u64 {
        self.entries.first().map_or(self.next_sequence, |entry| entry.sequence)
    }

    /// Liefert eine read-only Sicht auf alle Einträge.
    pub fn entries(&self) -> &[LoggedCommand] {
        &self.entries
    }

    /// Zuletzt aufgezeichneter Command.
    pub fn last(&self) -> Option<&DesignCommand> {
        self.entries.last().map(|entry| &entry.command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_ticks_werden_nicht_aufgezeichnet() {
        let mut log = CommandLog::new();
        log.record(&DesignCommand::Tick { dt: 0.016 });
        log.record(&DesignCommand::FinishScale);
        log.record(&DesignCommand::Tick { dt: 0.016 });

        assert_eq!(log.len(), 1);
        assert_eq!(log.total_recorded(), 1);
        assert!(matches!(log.last(), Some(DesignCommand::FinishScale)));
    }

    #[test]
    fn test_kuerzen_behaelt_fortlaufende_nummern() {
        let mut log = CommandLog::new();
        for i in 0..=CommandLog::MAX_ENTRIES {
            log.record(&DesignCommand::ExtendStroke {
                point: Vec2::new(i as f32, 0.0),
            });
        }

        assert_eq!(log.len(), CommandLog::MAX_ENTRIES / 2 + 1);
        assert_eq!(log.dropped(), (CommandLog::MAX_ENTRIES / 2) as u64);
        assert_eq!(log.total_recorded(), CommandLog::MAX_ENTRIES as u64 + 1);
        assert!(log
            .entries()
            .windows(2)
            .all(|pair| pair[1].sequence == pair[0].sequence + 1));
    }
}
