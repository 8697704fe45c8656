mod result;
mod stats;

pub use result::{FailedAccount, ProcessedAccount, ProcessingResult};
pub use stats::{BatchStatistics, RunStatistics};

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::domain::AccountId;
use super::ledger::{ErrorLedger, ProcessingStage};
use super::notifier::Notifier;
use super::queue::{
    composite_priority, PriorityEntry, PriorityError, PriorityQueue, PriorityQueueBuilder,
    QueueBuild,
};
use super::report::RunReport;
use super::repository::{AccountRecord, AccountRepository, RepositoryError};
use super::scoring::{ScoringEngine, ScoringError};
use crate::config::{ConfigError, ProcessingConfig};
use crate::recording;

/// Number of results carried in a run report's preview.
pub const PREVIEW_LENGTH: usize = 10;

/// Coarse lifecycle of a single run. Runs are single-shot and never resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    BuildingQueue,
    ProcessingBatches,
    Done,
}

/// Optional progress sink. Absence of an observer is simply a no-op.
pub trait ProgressObserver: Send + Sync {
    fn phase_changed(&self, _phase: RunPhase) {}

    fn batch_started(&self, batch_number: usize, remaining: usize);
}

/// Results and counters from one `process_batch` call.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub results: Vec<ProcessingResult>,
    pub statistics: BatchStatistics,
}

/// Dry-run view of the queue: the highest-ranked accounts, nothing processed.
#[derive(Debug, Clone, Default)]
pub struct QueuePreview {
    pub queued: usize,
    pub top: Vec<PriorityEntry>,
    pub errors: ErrorLedger,
}

/// Failure while handling a popped account.
#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("account {0} could not be found")]
    MissingAccount(AccountId),
    #[error("failed to load account: {0}")]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Priority(#[from] PriorityError),
}

struct AccountFailure {
    best_effort_priority: f64,
    error: ProcessingError,
}

/// Walks the priority queue in bounded batches, rescoring every account.
pub struct BatchScheduler<R, N: ?Sized> {
    repository: Arc<R>,
    notifier: Arc<N>,
    engine: ScoringEngine<R>,
    builder: PriorityQueueBuilder<R>,
    config: ProcessingConfig,
    observer: Option<Arc<dyn ProgressObserver>>,
}

impl<R, N> BatchScheduler<R, N>
where
    R: AccountRepository,
    N: Notifier + ?Sized,
{
    /// Fails on an invalid configuration; nothing is clamped.
    pub fn new(
        repository: Arc<R>,
        notifier: Arc<N>,
        config: ProcessingConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let engine = ScoringEngine::new(Arc::clone(&repository));
        let builder = PriorityQueueBuilder::new(engine.clone());

        Ok(Self {
            repository,
            notifier,
            engine,
            builder,
            config,
            observer: None,
        })
    }

    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn config(&self) -> &ProcessingConfig {
        &self.config
    }

    pub fn build_queue<I>(&self, records: I) -> QueueBuild
    where
        I: IntoIterator<Item = AccountRecord>,
    {
        let build = self.builder.build(records);
        for record in build.errors.iter() {
            recording::record_error(record.stage);
        }
        build
    }

    pub fn preview<I>(&self, records: I, top_k: usize) -> QueuePreview
    where
        I: IntoIterator<Item = AccountRecord>,
    {
        let QueueBuild { queue, errors } = self.build_queue(records);
        QueuePreview {
            queued: queue.len(),
            top: queue.top(top_k),
            errors,
        }
    }

    /// Pops up to `batch_size` entries and processes each in isolation.
    ///
    /// Every popped account yields exactly one result. Successes above the
    /// threshold are forwarded to the notifier once the whole batch is done.
    pub fn process_batch(&self, queue: &mut PriorityQueue, batch_size: usize) -> BatchOutcome {
        let mut statistics = BatchStatistics::default();
        let mut results = Vec::with_capacity(batch_size.min(queue.len()));

        while results.len() < batch_size {
            let Some(entry) = queue.pop() else {
                break;
            };

            match self.process_account(entry) {
                Ok(processed) => {
                    let high_priority =
                        processed.priority_score > self.config.high_priority_threshold;
                    statistics.processed += 1;
                    if high_priority {
                        statistics.high_priority += 1;
                    }
                    recording::record_processed(high_priority);
                    results.push(ProcessingResult::Success(processed));
                }
                Err(AccountFailure {
                    best_effort_priority,
                    error,
                }) => {
                    let error_message = error.to_string();
                    warn!(account_id = %entry.account_id, error = %error_message, "account processing failed");
                    statistics.errors.record(
                        entry.account_id,
                        error_message.clone(),
                        ProcessingStage::AccountProcessing,
                    );
                    recording::record_error(ProcessingStage::AccountProcessing);
                    results.push(ProcessingResult::Error(FailedAccount {
                        account_id: entry.account_id,
                        priority_score: best_effort_priority,
                        error_message,
                        processed_at: Utc::now(),
                    }));
                }
            }
        }

        self.notify_high_priority(&results, &mut statistics);

        BatchOutcome {
            results,
            statistics,
        }
    }

    /// Builds the queue once, then drains it batch by batch.
    pub fn run<I>(&self, records: I) -> RunReport
    where
        I: IntoIterator<Item = AccountRecord>,
    {
        let started = Instant::now();

        self.signal_phase(RunPhase::BuildingQueue);
        let QueueBuild { mut queue, errors } = self.build_queue(records);
        info!(
            queued = queue.len(),
            excluded = errors.len(),
            batch_size = self.config.batch_size,
            threshold = self.config.high_priority_threshold,
            "starting recovery run"
        );

        let mut statistics = RunStatistics::with_build_errors(errors);
        let mut preview = Vec::with_capacity(PREVIEW_LENGTH);

        self.signal_phase(RunPhase::ProcessingBatches);
        while !queue.is_empty() {
            let batch_number = statistics.batches_processed + 1;
            if let Some(observer) = &self.observer {
                observer.batch_started(batch_number, queue.len());
            }

            let BatchOutcome {
                results,
                statistics: batch,
            } = self.process_batch(&mut queue, self.config.batch_size);

            let room = PREVIEW_LENGTH.saturating_sub(preview.len());
            preview.extend(results.into_iter().take(room));
            statistics.merge(batch);
        }

        statistics.elapsed = started.elapsed();
        self.signal_phase(RunPhase::Done);
        recording::record_run_duration(statistics.elapsed.as_secs_f64());

        info!(
            processed = statistics.total_processed,
            high_priority = statistics.high_priority_count,
            batches = statistics.batches_processed,
            errors = statistics.errors.len(),
            elapsed_seconds = statistics.elapsed.as_secs_f64(),
            "recovery run complete"
        );

        RunReport::from_statistics(statistics, preview)
    }

    /// Loads every account from the repository and runs over them.
    pub fn run_all(&self) -> Result<RunReport, RepositoryError> {
        let records = self.repository.accounts()?;
        Ok(self.run(records))
    }

    fn process_account(&self, entry: PriorityEntry) -> Result<ProcessedAccount, AccountFailure> {
        let record = match self.repository.fetch(entry.account_id) {
            Ok(Some(record)) => record,
            Ok(None) => {
                return Err(AccountFailure {
                    best_effort_priority: entry.priority,
                    error: ProcessingError::MissingAccount(entry.account_id),
                })
            }
            Err(err) => {
                return Err(AccountFailure {
                    best_effort_priority: entry.priority,
                    error: err.into(),
                })
            }
        };

        self.rescore(&record).map_err(|error| AccountFailure {
            best_effort_priority: best_effort_priority(&record, entry),
            error,
        })
    }

    // The fresh score wins over the one used to rank the queue, even if that
    // reorders accounts inside the current batch.
    fn rescore(&self, record: &AccountRecord) -> Result<ProcessedAccount, ProcessingError> {
        let account = &record.account;
        let outcome = self.engine.score(account)?;
        let priority_score = composite_priority(outcome.total_score, account)?;

        Ok(ProcessedAccount {
            account_id: account.id,
            account_name: account.name.clone(),
            priority_score,
            risk_score: outcome.total_score,
            risk_level: outcome.risk_level,
            debt_amount: account.total_debt_amount,
            payment_status: account.payment_status,
            processed_at: Utc::now(),
        })
    }

    fn notify_high_priority(
        &self,
        results: &[ProcessingResult],
        statistics: &mut BatchStatistics,
    ) {
        let threshold = self.config.high_priority_threshold;
        let high_priority: Vec<ProcessedAccount> = results
            .iter()
            .filter_map(ProcessingResult::as_success)
            .filter(|processed| processed.priority_score > threshold)
            .cloned()
            .collect();

        if high_priority.is_empty() {
            return;
        }

        match self.notifier.notify(&high_priority) {
            Ok(receipt) => {
                debug!(
                    submitted = high_priority.len(),
                    accepted = receipt.count,
                    "notifier accepted batch"
                );
                statistics.messages_sent += 1;
                statistics.notified_accounts += receipt.count;
                recording::record_notification(true);
            }
            Err(err) => {
                warn!(
                    submitted = high_priority.len(),
                    error = %err,
                    "notifier rejected high-priority batch"
                );
                statistics.failed_notifications += 1;
                recording::record_notification(false);
            }
        }
    }

    fn signal_phase(&self, phase: RunPhase) {
        debug!(?phase, "recovery run phase");
        if let Some(observer) = &self.observer {
            observer.phase_changed(phase);
        }
    }
}

fn best_effort_priority(record: &AccountRecord, entry: PriorityEntry) -> f64 {
    record
        .risk_score
        .as_ref()
        .and_then(|stored| composite_priority(stored.total_score, &record.account).ok())
        .unwrap_or(entry.priority)
}
