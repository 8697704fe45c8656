use std::fmt;

use super::RunReport;
use crate::workflows::recovery::scheduler::ProcessingResult;

const ERROR_SAMPLE: usize = 3;
const TOP_PROCESSED: usize = 5;
const RULE_WIDTH: usize = 50;

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = &self.summary;
        let rule = "=".repeat(RULE_WIDTH);

        writeln!(f, "{rule}")?;
        writeln!(f, "Recovery run complete")?;
        writeln!(f, "{rule}")?;
        writeln!(f, "Accounts processed: {}", summary.total_processed)?;
        writeln!(f, "High priority accounts: {}", summary.high_priority_count)?;
        writeln!(f, "Processing time: {:.2} seconds", summary.elapsed_seconds)?;
        writeln!(f, "Batches completed: {}", summary.batches_processed)?;
        writeln!(
            f,
            "Notifications: {} sent covering {} accounts",
            summary.messages_sent, summary.total_notified_accounts
        )?;
        if summary.failed_notifications > 0 {
            writeln!(f, "Failed notifications: {}", summary.failed_notifications)?;
        }

        if summary.errors_count > 0 {
            writeln!(f, "Errors encountered: {}", summary.errors_count)?;
            writeln!(f, "\nFirst errors")?;
            for error in self.errors.iter().take(ERROR_SAMPLE) {
                writeln!(
                    f,
                    "- account {} ({}): {}",
                    error.account_id, error.stage, error.error_message
                )?;
            }
        } else {
            writeln!(f, "No processing errors")?;
        }

        if summary.is_empty_run() {
            writeln!(f, "(No accounts were available to process.)")?;
        }

        let top: Vec<_> = self
            .preview
            .iter()
            .filter_map(ProcessingResult::as_success)
            .take(TOP_PROCESSED)
            .collect();
        if !top.is_empty() {
            writeln!(f, "\nTop processed accounts")?;
            for (rank, processed) in top.iter().enumerate() {
                writeln!(
                    f,
                    "{}. {} - priority {:.0} (risk {} {}, debt {})",
                    rank + 1,
                    processed.account_name,
                    processed.priority_score,
                    processed.risk_score,
                    processed.risk_level,
                    processed.debt_amount
                )?;
            }
        }

        if let Some(throughput) = summary.throughput() {
            writeln!(f, "\nThroughput: {throughput:.1} accounts/second")?;
        }

        write!(f, "{rule}")
    }
}
