mod text;

use serde::{Deserialize, Serialize};

use super::ledger::ErrorRecord;
use super::scheduler::{ProcessingResult, RunStatistics};

/// Headline counters for a finished run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_processed: usize,
    pub high_priority_count: usize,
    pub elapsed_seconds: f64,
    pub batches_processed: usize,
    pub errors_count: usize,
    pub messages_sent: usize,
    pub total_notified_accounts: usize,
    pub failed_notifications: usize,
}

impl RunSummary {
    /// Successfully processed accounts per second, when any time elapsed.
    pub fn throughput(&self) -> Option<f64> {
        (self.elapsed_seconds > 0.0).then(|| self.total_processed as f64 / self.elapsed_seconds)
    }

    pub fn is_empty_run(&self) -> bool {
        self.total_processed == 0 && self.errors_count == 0
    }
}

/// Final output of a run: summary, a short result preview, and every error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub summary: RunSummary,
    pub preview: Vec<ProcessingResult>,
    pub errors: Vec<ErrorRecord>,
}

impl RunReport {
    pub fn from_statistics(statistics: RunStatistics, preview: Vec<ProcessingResult>) -> Self {
        let summary = RunSummary {
            total_processed: statistics.total_processed,
            high_priority_count: statistics.high_priority_count,
            elapsed_seconds: statistics.elapsed.as_secs_f64(),
            batches_processed: statistics.batches_processed,
            errors_count: statistics.errors.len(),
            messages_sent: statistics.messages_sent,
            total_notified_accounts: statistics.total_notified_accounts,
            failed_notifications: statistics.failed_notifications,
        };

        Self {
            summary,
            preview,
            errors: statistics.errors.into_records(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
