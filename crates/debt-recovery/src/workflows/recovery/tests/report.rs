use std::time::Duration;

use super::common::*;
use crate::workflows::recovery::domain::AccountId;
use crate::workflows::recovery::ledger::{ErrorLedger, ProcessingStage};
use crate::workflows::recovery::report::RunReport;
use crate::workflows::recovery::scheduler::{FailedAccount, ProcessingResult, RunStatistics};

fn statistics_with_errors(errors: usize) -> RunStatistics {
    let mut ledger = ErrorLedger::new();
    for id in 0..errors {
        ledger.record(
            AccountId(100 + id as u64),
            format!("failure {id}"),
            ProcessingStage::AccountProcessing,
        );
    }
    RunStatistics {
        total_processed: 6,
        high_priority_count: 2,
        batches_processed: 2,
        elapsed: Duration::from_secs(2),
        errors: ledger,
        messages_sent: 2,
        total_notified_accounts: 2,
        failed_notifications: 0,
    }
}

#[test]
fn summary_mirrors_run_statistics() {
    let report = RunReport::from_statistics(statistics_with_errors(4), Vec::new());

    assert_eq!(report.summary.total_processed, 6);
    assert_eq!(report.summary.errors_count, 4);
    assert_eq!(report.summary.elapsed_seconds, 2.0);
    assert_eq!(report.summary.throughput(), Some(3.0));
    assert_eq!(report.errors.len(), 4);
    assert!(!report.summary.is_empty_run());
}

#[test]
fn text_report_samples_errors_and_top_accounts() {
    let mut preview: Vec<_> = (1..=6)
        .map(|id| ProcessingResult::Success(processed(id, 1_000 * id as i64)))
        .collect();
    preview.insert(
        1,
        ProcessingResult::Error(FailedAccount {
            account_id: AccountId(99),
            priority_score: 1.0,
            error_message: "missing".to_string(),
            processed_at: chrono::Utc::now(),
        }),
    );
    let report = RunReport::from_statistics(statistics_with_errors(4), preview);

    let text = report.to_string();

    assert!(text.contains("Accounts processed: 6"));
    assert!(text.contains("Errors encountered: 4"));
    assert!(text.contains("account 102 (account_processing): failure 2"));
    assert!(!text.contains("failure 3"));
    assert!(text.contains("5. Account 5"));
    assert!(!text.contains("Account 6"));
    assert!(text.contains("Throughput: 3.0 accounts/second"));
    assert!(!text.contains("No accounts"));
}

#[test]
fn text_report_flags_empty_runs() {
    let report = RunReport::from_statistics(RunStatistics::default(), Vec::new());
    let text = report.to_string();

    assert!(text.contains("No processing errors"));
    assert!(text.contains("(No accounts were available to process.)"));
    assert!(!text.contains("Throughput"));
}

#[test]
fn json_report_tags_result_status() {
    let preview = vec![ProcessingResult::Success(processed(1, 500))];
    let report = RunReport::from_statistics(statistics_with_errors(1), preview);

    let value: serde_json::Value =
        serde_json::from_str(&report.to_json().expect("serializes")).expect("valid json");

    assert_eq!(value["summary"]["total_processed"], 6);
    assert_eq!(value["preview"][0]["status"], "success");
    assert_eq!(value["preview"][0]["risk_level"], "CRITICAL");
    assert_eq!(value["errors"][0]["stage"], "account_processing");
    assert_eq!(value["errors"][0]["account_id"], 100);
}
