use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use debt_recovery::workflows::recovery::{
    AccountId, AccountRecord, AccountRepository, ProgressObserver, RepositoryError, RiskScore,
    RunPhase, UpsertStatus,
};
use tracing::{debug, info};

/// Process-local store seeded from an import; scores live only for the run.
#[derive(Default, Clone)]
pub(crate) struct InMemoryAccountRepository {
    records: Arc<Mutex<HashMap<AccountId, AccountRecord>>>,
}

impl InMemoryAccountRepository {
    pub(crate) fn from_records(records: Vec<AccountRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|record| (record.account.id, record))
            .collect();
        Self {
            records: Arc::new(Mutex::new(records)),
        }
    }
}

impl AccountRepository for InMemoryAccountRepository {
    fn accounts(&self) -> Result<Vec<AccountRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut records: Vec<AccountRecord> = guard.values().cloned().collect();
        records.sort_by_key(|record| record.account.id);
        Ok(records)
    }

    fn fetch(&self, id: AccountId) -> Result<Option<AccountRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    fn upsert_score(&self, score: RiskScore) -> Result<UpsertStatus, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard
            .get_mut(&score.account_id)
            .ok_or(RepositoryError::NotFound(score.account_id))?;
        let status = match record.risk_score {
            Some(_) => UpsertStatus::Updated,
            None => UpsertStatus::Created,
        };
        record.risk_score = Some(score);
        Ok(status)
    }
}

/// Emits run progress as log lines.
pub(crate) struct TracingProgress;

impl ProgressObserver for TracingProgress {
    fn phase_changed(&self, phase: RunPhase) {
        debug!(?phase, "run phase changed");
    }

    fn batch_started(&self, batch_number: usize, remaining: usize) {
        info!(batch = batch_number, remaining, "processing batch");
    }
}
