//! Metric recording helpers built on the `metrics` facade.
//!
//! Without an installed recorder every call is a no-op, so library users and
//! tests pay nothing. The CLI installs a Prometheus recorder on demand.

use metrics::{describe_counter, describe_histogram};

use crate::workflows::recovery::ProcessingStage;

pub const ACCOUNTS_PROCESSED: &str = "debt_recovery_accounts_processed_total";
pub const HIGH_PRIORITY: &str = "debt_recovery_high_priority_total";
pub const PROCESSING_ERRORS: &str = "debt_recovery_processing_errors_total";
pub const NOTIFICATIONS: &str = "debt_recovery_notifications_total";
pub const RUN_DURATION: &str = "debt_recovery_run_duration_seconds";

/// Registers descriptions with whichever recorder is installed.
pub fn register_metrics() {
    describe_counter!(ACCOUNTS_PROCESSED, "Accounts rescored successfully");
    describe_counter!(
        HIGH_PRIORITY,
        "Processed accounts whose priority exceeded the threshold"
    );
    describe_counter!(PROCESSING_ERRORS, "Isolated per-account failures by stage");
    describe_counter!(NOTIFICATIONS, "Notifier calls by outcome");
    describe_histogram!(RUN_DURATION, "Wall time of a complete scheduler run");
}

pub fn record_processed(high_priority: bool) {
    metrics::counter!(ACCOUNTS_PROCESSED).increment(1);
    if high_priority {
        metrics::counter!(HIGH_PRIORITY).increment(1);
    }
}

pub fn record_error(stage: ProcessingStage) {
    metrics::counter!(PROCESSING_ERRORS, "stage" => stage.label()).increment(1);
}

pub fn record_notification(delivered: bool) {
    let outcome = if delivered { "delivered" } else { "failed" };
    metrics::counter!(NOTIFICATIONS, "outcome" => outcome).increment(1);
}

pub fn record_run_duration(seconds: f64) {
    metrics::histogram!(RUN_DURATION).record(seconds);
}
