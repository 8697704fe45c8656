use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use debt_recovery::config::AppConfig;
use debt_recovery::error::AppError;
use debt_recovery::recording;
use debt_recovery::telemetry;
use debt_recovery::workflows::import::AccountCsvImporter;
use debt_recovery::workflows::recovery::{
    AccountRepository, BatchScheduler, LoggingNotifier, Notifier, OutboxNotifier, QueuePreview,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::info;

use crate::cli::{PreviewArgs, RunArgs};
use crate::infra::{InMemoryAccountRepository, TracingProgress};

pub(crate) fn run_recovery(args: RunArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    config.processing = config
        .processing
        .with_overrides(args.batch_size, args.threshold)?;
    telemetry::init(&config.telemetry)?;

    let metrics = if args.metrics {
        Some(install_metrics()?)
    } else {
        None
    };

    let records = AccountCsvImporter::from_path(&args.accounts)?;
    info!(
        accounts = records.len(),
        path = %args.accounts.display(),
        environment = ?config.environment,
        "accounts imported"
    );

    let repository = Arc::new(InMemoryAccountRepository::from_records(records));
    let notifier: Arc<dyn Notifier> = match &args.outbox {
        Some(path) => Arc::new(OutboxNotifier::new(open_outbox(path)?)),
        None => Arc::new(LoggingNotifier),
    };
    let scheduler = BatchScheduler::new(repository, notifier, config.processing)?
        .with_observer(Arc::new(TracingProgress));

    let report = scheduler.run_all()?;
    if args.json {
        println!("{}", report.to_json()?);
    } else {
        println!("{report}");
    }

    if let Some(handle) = metrics {
        eprintln!("{}", handle.render());
    }

    Ok(())
}

pub(crate) fn run_preview(args: PreviewArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let records = AccountCsvImporter::from_path(&args.accounts)?;
    let repository = Arc::new(InMemoryAccountRepository::from_records(records));
    let scheduler = BatchScheduler::new(
        Arc::clone(&repository),
        Arc::new(LoggingNotifier),
        config.processing,
    )?;

    let preview = scheduler.preview(repository.accounts()?, args.top_k);
    print!("{}", render_preview(&preview));
    Ok(())
}

fn install_metrics() -> Result<PrometheusHandle, AppError> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|err| AppError::Metrics(err.to_string()))?;
    recording::register_metrics();
    Ok(handle)
}

fn open_outbox(path: &Path) -> Result<File, AppError> {
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

fn render_preview(preview: &QueuePreview) -> String {
    let mut output = format!(
        "Top {} of {} queued accounts\n",
        preview.top.len(),
        preview.queued
    );
    for (rank, entry) in preview.top.iter().enumerate() {
        output.push_str(&format!(
            "{}. account {} - priority {:.0}\n",
            rank + 1,
            entry.account_id,
            entry.priority
        ));
    }
    if !preview.errors.is_empty() {
        output.push_str(&format!(
            "{} accounts could not be ranked\n",
            preview.errors.len()
        ));
        for error in preview.errors.iter() {
            output.push_str(&format!(
                "- account {}: {}\n",
                error.account_id, error.error_message
            ));
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use debt_recovery::workflows::recovery::{
        AccountId, ErrorLedger, PriorityEntry, ProcessingStage,
    };

    #[test]
    fn preview_lists_ranked_accounts_and_failures() {
        let mut errors = ErrorLedger::new();
        errors.record(
            AccountId(4),
            "negative debt",
            ProcessingStage::PriorityCalculation,
        );
        let preview = QueuePreview {
            queued: 3,
            top: vec![
                PriorityEntry {
                    priority: 21_550_000.0,
                    account_id: AccountId(2),
                },
                PriorityEntry {
                    priority: 120_000.0,
                    account_id: AccountId(1),
                },
            ],
            errors,
        };

        let rendered = render_preview(&preview);

        assert!(rendered.starts_with("Top 2 of 3 queued accounts"));
        assert!(rendered.contains("1. account 2 - priority 21550000"));
        assert!(rendered.contains("2. account 1 - priority 120000"));
        assert!(rendered.contains("- account 4: negative debt"));
    }

    #[test]
    fn empty_preview_has_only_header() {
        let rendered = render_preview(&QueuePreview::default());
        assert_eq!(rendered, "Top 0 of 0 queued accounts\n");
    }
}
