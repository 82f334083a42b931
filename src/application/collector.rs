//! Table collector: owns one stage's entity table while it is being filled.

use tracing::{error, info, warn};

use super::run_report::{ItemOutcome, ScrapeError, Stage, StageReport};
use crate::domain::EntityTable;

/// Accumulates records and per-identifier outcomes for one stage
#[derive(Debug)]
pub struct TableCollector<T> {
    table: EntityTable<T>,
    report: StageReport,
    total: usize,
    processed: usize,
    log_interval: usize,
}

impl<T> TableCollector<T> {
    pub fn new(stage: Stage, total: usize, log_interval: usize) -> Self {
        Self {
            table: EntityTable::new(),
            report: StageReport::new(stage),
            total,
            processed: 0,
            log_interval: log_interval.max(1),
        }
    }

    /// Record one identifier's result. Failures are logged and kept in the
    /// report; they never stop the stage.
    pub fn append(&mut self, identifier: &str, result: Result<Vec<T>, ScrapeError>) {
        let stage = self.report.stage;
        let outcome = match result {
            Ok(rows) if rows.is_empty() => {
                warn!("No {} found for {}", stage.label(), identifier);
                ItemOutcome::Skipped { reason: "page yielded no records".to_string() }
            }
            Ok(rows) => {
                let records = rows.len();
                self.table.extend(rows);
                ItemOutcome::Success { records }
            }
            Err(e) => {
                error!("Failed to get {} for {}: {}", stage.label(), identifier, e);
                ItemOutcome::Failed { kind: e.kind(), error: e.to_string() }
            }
        };
        self.report.record(identifier, outcome);
        self.tick();
    }

    /// Record an identifier that was deliberately not fetched
    pub fn skip(&mut self, identifier: &str, reason: &str) {
        warn!("Skipping {} for {}: {}", self.report.stage.label(), identifier, reason);
        self.report.record(identifier, ItemOutcome::Skipped { reason: reason.to_string() });
        self.tick();
    }

    pub fn finalize(self) -> (EntityTable<T>, StageReport) {
        info!(
            "Collected {} {} rows ({} ok, {} skipped, {} failed)",
            self.table.len(),
            self.report.stage.label(),
            self.report.succeeded(),
            self.report.skipped(),
            self.report.failed()
        );
        (self.table, self.report)
    }

    fn tick(&mut self) {
        self.processed += 1;
        if self.processed % self.log_interval == 0 || self.processed == self.total {
            info!(
                "Processing {} {}/{}",
                self.report.stage.label(),
                self.processed,
                self.total
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::run_report::FailureKind;
    use crate::infrastructure::FetchError;

    #[test]
    fn test_failures_do_not_stop_collection() {
        let mut collector: TableCollector<u32> = TableCollector::new(Stage::Tracks, 3, 10);
        collector.append("a", Ok(vec![1, 2]));
        collector.append(
            "b",
            Err(FetchError::Status { status_code: 500, url: "http://x/b".into() }.into()),
        );
        collector.append("c", Ok(vec![3]));

        let (table, report) = collector.finalize();
        assert_eq!(table.rows(), &[1, 2, 3]);
        assert_eq!(report.succeeded(), 2);
        assert!(matches!(
            report.outcome_of("b"),
            Some(ItemOutcome::Failed { kind: FailureKind::Fetch, .. })
        ));
    }

    #[test]
    fn test_empty_success_is_skip() {
        let mut collector: TableCollector<u32> = TableCollector::new(Stage::Albums, 1, 1);
        collector.append("a", Ok(vec![]));
        let (table, report) = collector.finalize();
        assert!(table.is_empty());
        assert_eq!(report.skipped(), 1);
    }
}
