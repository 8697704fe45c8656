use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

use super::domain::{Account, AccountId};
use super::ledger::{ErrorLedger, ProcessingStage};
use super::repository::{AccountRecord, AccountRepository};
use super::scoring::{ScoringEngine, ScoringError};

/// Heap entry ranking an account by composite priority (risk score x debt).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriorityEntry {
    pub priority: f64,
    pub account_id: AccountId,
}

impl Eq for PriorityEntry {}

impl Ord for PriorityEntry {
    // Higher priority first; equal priorities favour the lower id.
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .total_cmp(&other.priority)
            .then_with(|| other.account_id.cmp(&self.account_id))
    }
}

impl PartialOrd for PriorityEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Max-priority queue of accounts. Extraction removes entries for good.
#[derive(Debug, Clone, Default)]
pub struct PriorityQueue {
    heap: BinaryHeap<PriorityEntry>,
}

impl PriorityQueue {
    pub fn from_entries(entries: Vec<PriorityEntry>) -> Self {
        // `From<Vec<_>>` heapifies in O(n).
        Self {
            heap: BinaryHeap::from(entries),
        }
    }

    pub fn pop(&mut self) -> Option<PriorityEntry> {
        self.heap.pop()
    }

    pub fn peek(&self) -> Option<&PriorityEntry> {
        self.heap.peek()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Highest `k` entries in descending order, leaving the queue untouched.
    pub fn top(&self, k: usize) -> Vec<PriorityEntry> {
        let mut entries: Vec<PriorityEntry> = self.heap.iter().copied().collect();
        entries.sort_unstable_by(|a, b| b.cmp(a));
        entries.truncate(k);
        entries
    }
}

/// Failure to derive a composite priority for one account.
#[derive(Debug, thiserror::Error)]
pub enum PriorityError {
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error("debt amount {amount} for account {account_id} cannot be prioritized")]
    InvalidDebtAmount {
        account_id: AccountId,
        amount: Decimal,
    },
    #[error("account {0} appears more than once in the input")]
    DuplicateAccount(AccountId),
}

/// Multiplies a risk score by the account's outstanding debt.
pub fn composite_priority(risk_score: f64, account: &Account) -> Result<f64, PriorityError> {
    let invalid = || PriorityError::InvalidDebtAmount {
        account_id: account.id,
        amount: account.total_debt_amount,
    };

    if account.total_debt_amount < Decimal::ZERO {
        return Err(invalid());
    }

    let debt = account.total_debt_amount.to_f64().ok_or_else(invalid)?;
    let priority = risk_score * debt;
    if priority.is_finite() {
        Ok(priority)
    } else {
        Err(invalid())
    }
}

/// Queue plus the accounts that could not be ranked.
#[derive(Debug, Default)]
pub struct QueueBuild {
    pub queue: PriorityQueue,
    pub errors: ErrorLedger,
}

/// Ranks accounts, preferring stored scores and scoring on demand otherwise.
pub struct PriorityQueueBuilder<R> {
    engine: ScoringEngine<R>,
}

impl<R> PriorityQueueBuilder<R>
where
    R: AccountRepository,
{
    pub fn new(engine: ScoringEngine<R>) -> Self {
        Self { engine }
    }

    pub fn calculate_priority(&self, record: &AccountRecord) -> Result<f64, PriorityError> {
        let risk_score = match &record.risk_score {
            Some(stored) => stored.total_score,
            None => self.engine.score(&record.account)?.total_score,
        };
        composite_priority(risk_score, &record.account)
    }

    /// Accounts that fail are recorded and left out; they never abort the build.
    ///
    /// Each account id is queued at most once. Later records for an id already
    /// seen are recorded as duplicates and never scored.
    pub fn build<I>(&self, records: I) -> QueueBuild
    where
        I: IntoIterator<Item = AccountRecord>,
    {
        let mut entries = Vec::new();
        let mut errors = ErrorLedger::new();
        let mut seen = HashSet::new();

        for record in records {
            let account_id = record.account.id;
            let priority = if seen.insert(account_id) {
                self.calculate_priority(&record)
            } else {
                Err(PriorityError::DuplicateAccount(account_id))
            };
            match priority {
                Ok(priority) => entries.push(PriorityEntry {
                    priority,
                    account_id,
                }),
                Err(err) => {
                    warn!(%account_id, error = %err, "excluding account from priority queue");
                    errors.record(account_id, err.to_string(), ProcessingStage::PriorityCalculation);
                }
            }
        }

        debug!(
            queued = entries.len(),
            excluded = errors.len(),
            "priority queue built"
        );

        QueueBuild {
            queue: PriorityQueue::from_entries(entries),
            errors,
        }
    }
}
