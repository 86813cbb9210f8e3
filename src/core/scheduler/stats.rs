//! Loop statistics
//!
//! Cumulative counters for the cooperative loop, updated once per tick from
//! the tick summary. Counters wrap on overflow.

/// What one scheduler tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickSummary {
    /// Command byte consumed this tick, if any
    pub command: Option<u8>,
    /// Whether the command forced a status report
    pub forced_report: bool,
    /// GPS bytes drained, `None` when the ingest gate was closed
    pub ingested: Option<usize>,
    /// Whether the periodic report fired
    pub periodic_report: bool,
}

/// Cumulative loop counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LoopStats {
    pub ticks: u32,
    pub commands: u32,
    pub ingest_runs: u32,
    pub bytes_ingested: u32,
    pub periodic_reports: u32,
    pub forced_reports: u32,
    pub tick_errors: u32,
}

impl LoopStats {
    /// Fold one tick into the counters
    pub fn record(&mut self, tick: &TickSummary) {
        self.ticks = self.ticks.wrapping_add(1);
        if tick.command.is_some() {
            self.commands = self.commands.wrapping_add(1);
        }
        if tick.forced_report {
            self.forced_reports = self.forced_reports.wrapping_add(1);
        }
        if let Some(bytes) = tick.ingested {
            self.ingest_runs = self.ingest_runs.wrapping_add(1);
            self.bytes_ingested = self.bytes_ingested.wrapping_add(bytes as u32);
        }
        if tick.periodic_report {
            self.periodic_reports = self.periodic_reports.wrapping_add(1);
        }
    }

    /// Count a tick that ended in an error
    pub fn record_error(&mut self) {
        self.ticks = self.ticks.wrapping_add(1);
        self.tick_errors = self.tick_errors.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_counts() {
        let mut stats = LoopStats::default();
        stats.record(&TickSummary::default());
        stats.record(&TickSummary {
            command: Some(b'H'),
            forced_report: true,
            ingested: Some(42),
            periodic_report: false,
        });
        stats.record(&TickSummary {
            ingested: Some(0),
            periodic_report: true,
            ..TickSummary::default()
        });

        assert_eq!(stats.ticks, 3);
        assert_eq!(stats.commands, 1);
        assert_eq!(stats.forced_reports, 1);
        assert_eq!(stats.ingest_runs, 2);
        assert_eq!(stats.bytes_ingested, 42);
        assert_eq!(stats.periodic_reports, 1);
    }

    #[test]
    fn test_record_error() {
        let mut stats = LoopStats::default();
        stats.record_error();
        assert_eq!(stats.ticks, 1);
        assert_eq!(stats.tick_errors, 1);
    }
}
