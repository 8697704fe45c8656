use std::time::Duration;

use super::super::ledger::ErrorLedger;

/// Counters produced by a single `process_batch` call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchStatistics {
    pub processed: usize,
    pub high_priority: usize,
    pub errors: ErrorLedger,
    pub messages_sent: usize,
    pub notified_accounts: usize,
    pub failed_notifications: usize,
}

/// Accumulator for one scheduler run; batches are merged in as they finish.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStatistics {
    pub total_processed: usize,
    pub high_priority_count: usize,
    pub batches_processed: usize,
    pub elapsed: Duration,
    pub errors: ErrorLedger,
    pub messages_sent: usize,
    pub total_notified_accounts: usize,
    pub failed_notifications: usize,
}

impl RunStatistics {
    /// Starts a run with the failures discovered while building the queue.
    pub fn with_build_errors(errors: ErrorLedger) -> Self {
        Self {
            errors,
            ..Self::default()
        }
    }

    pub fn merge(&mut self, batch: BatchStatistics) {
        self.total_processed += batch.processed;
        self.high_priority_count += batch.high_priority;
        self.batches_processed += 1;
        self.errors.append(batch.errors);
        self.messages_sent += batch.messages_sent;
        self.total_notified_accounts += batch.notified_accounts;
        self.failed_notifications += batch.failed_notifications;
    }
}
