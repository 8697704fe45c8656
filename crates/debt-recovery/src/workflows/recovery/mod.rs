//! Debt recovery prioritization: risk scoring, priority ranking, and batch processing.
//!
//! Accounts are ranked by composite priority (risk score x outstanding debt) and
//! drained in bounded batches. Each popped account is rescored, failures are
//! isolated per account, and high-priority successes are handed to a notifier.

pub mod domain;
pub mod ledger;
pub mod notifier;
pub mod queue;
pub mod report;
pub mod repository;
pub mod scheduler;
pub mod scoring;

#[cfg(test)]
mod tests;

pub use domain::{
    Account, AccountId, ContractType, EmploymentStatus, FamilySituation, IndustrySector,
    PaymentStatus, RiskFactor, RiskLevel, RiskScore,
};
pub use ledger::{ErrorLedger, ErrorRecord, ProcessingStage};
pub use notifier::{
    LoggingNotifier, NotificationReceipt, Notifier, NotifierError, OutboxEnvelope, OutboxNotifier,
    PartnerSyncItem,
};
pub use queue::{
    composite_priority, PriorityEntry, PriorityError, PriorityQueue, PriorityQueueBuilder,
    QueueBuild,
};
pub use report::{RunReport, RunSummary};
pub use repository::{AccountRecord, AccountRepository, RepositoryError, UpsertStatus};
pub use scheduler::{
    BatchOutcome, BatchScheduler, BatchStatistics, FailedAccount, ProcessedAccount,
    ProcessingError, ProcessingResult, ProgressObserver, QueuePreview, RunPhase, RunStatistics,
    PREVIEW_LENGTH,
};
pub use scoring::{risk_level_for, ScoreCard, ScoreOutcome, ScoringEngine, ScoringError};
