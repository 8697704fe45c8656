use serde::{Deserialize, Serialize};

use super::domain::{Account, AccountId, RiskScore};

/// Account joined with its currently stored score, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub account: Account,
    pub risk_score: Option<RiskScore>,
}

impl AccountRecord {
    pub fn unscored(account: Account) -> Self {
        Self {
            account,
            risk_score: None,
        }
    }
}

/// Whether an upsert inserted a new score or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertStatus {
    Created,
    Updated,
}

/// Storage abstraction so scoring and scheduling can be exercised in isolation.
///
/// Scores are keyed uniquely by account id; `upsert_score` must never duplicate.
pub trait AccountRepository: Send + Sync {
    fn accounts(&self) -> Result<Vec<AccountRecord>, RepositoryError>;
    fn fetch(&self, id: AccountId) -> Result<Option<AccountRecord>, RepositoryError>;
    fn upsert_score(&self, score: RiskScore) -> Result<UpsertStatus, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("account {0} not found")]
    NotFound(AccountId),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
