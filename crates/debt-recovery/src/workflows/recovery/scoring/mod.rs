mod rules;
mod weights;

pub use rules::risk_level_for;
pub use weights::{factor_weight, max_weighted_score};

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{Account, AccountId, RiskFactor, RiskLevel, RiskScore};
use super::repository::{AccountRepository, RepositoryError, UpsertStatus};

/// Applies the weighted multi-factor rubric and persists the result.
pub struct ScoringEngine<R> {
    repository: Arc<R>,
}

impl<R> Clone for ScoringEngine<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R> ScoringEngine<R>
where
    R: AccountRepository,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Pure rubric evaluation; nothing is persisted.
    pub fn evaluate(&self, account: &Account) -> ScoreCard {
        ScoreCard::for_account(account)
    }

    /// Scores the account and upserts the stored score, one write per call.
    pub fn score(&self, account: &Account) -> Result<ScoreOutcome, ScoringError> {
        let card = self.evaluate(account);
        let calculated_at = Utc::now();

        let status = self
            .repository
            .upsert_score(RiskScore {
                account_id: account.id,
                total_score: card.total_score,
                risk_level: card.risk_level,
                factor_breakdown: card.factor_breakdown.clone(),
                calculated_at,
            })
            .map_err(|source| ScoringError::Persistence {
                account_id: account.id,
                source,
            })?;

        debug!(
            account_id = %account.id,
            total_score = card.total_score,
            risk_level = %card.risk_level,
            ?status,
            "risk score stored"
        );

        Ok(ScoreOutcome {
            account_id: account.id,
            total_score: card.total_score,
            risk_level: card.risk_level,
            factor_breakdown: card.factor_breakdown,
            calculated_at,
            created: status == UpsertStatus::Created,
        })
    }
}

/// Deterministic rubric output for one account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub total_score: f64,
    pub risk_level: RiskLevel,
    pub factor_breakdown: BTreeMap<RiskFactor, u8>,
}

impl ScoreCard {
    pub fn for_account(account: &Account) -> Self {
        let factor_breakdown = rules::normalize_factors(account);
        let total_score = rules::weighted_total(&factor_breakdown);

        Self {
            total_score,
            risk_level: risk_level_for(total_score),
            factor_breakdown,
        }
    }
}

/// Result of a persisted scoring pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreOutcome {
    pub account_id: AccountId,
    pub total_score: f64,
    pub risk_level: RiskLevel,
    pub factor_breakdown: BTreeMap<RiskFactor, u8>,
    pub calculated_at: DateTime<Utc>,
    pub created: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("failed to store risk score for account {account_id}: {source}")]
    Persistence {
        account_id: AccountId,
        #[source]
        source: RepositoryError,
    },
}
