use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use rust_decimal::Decimal;

use crate::config::ProcessingConfig;
use crate::workflows::recovery::domain::{
    Account, AccountId, ContractType, EmploymentStatus, FamilySituation, IndustrySector,
    PaymentStatus, RiskLevel, RiskScore,
};
use crate::workflows::recovery::notifier::{NotificationReceipt, Notifier, NotifierError};
use crate::workflows::recovery::repository::{
    AccountRecord, AccountRepository, RepositoryError, UpsertStatus,
};
use crate::workflows::recovery::scheduler::{
    BatchScheduler, ProcessedAccount, ProgressObserver, RunPhase,
};

/// Weighted score of [`low_risk_account`]: 2*9 + 1*9 + 1*8 + 1*7 + 2*6 + 1*6.
pub(super) const LOW_RISK_TOTAL: f64 = 60.0;

/// Weighted score of [`critical_account`]: 10*9 + 10*9 + 10*8 + 9*7 + 9*6 + 9*6.
pub(super) const CRITICAL_TOTAL: f64 = 431.0;

/// Government employee, permanent contract, healthcare, dual income, no late payments.
pub(super) fn low_risk_account(id: u64) -> Account {
    Account {
        id: AccountId(id),
        name: format!("Low Risk {id}"),
        total_debt_amount: Decimal::new(2000, 0),
        monthly_income: Decimal::new(8000, 0),
        late_payments_count: 0,
        employment_status: EmploymentStatus::Government,
        contract_type: ContractType::Permanent,
        industry_sector: IndustrySector::Healthcare,
        family_situation: FamilySituation::MarriedDualIncome,
        payment_status: PaymentStatus::Unpaid,
    }
}

/// Unemployed freelancer with no income and a long record of missed payments.
pub(super) fn critical_account(id: u64) -> Account {
    Account {
        id: AccountId(id),
        name: format!("Critical {id}"),
        total_debt_amount: Decimal::new(50_000, 0),
        monthly_income: Decimal::ZERO,
        late_payments_count: 8,
        employment_status: EmploymentStatus::Unemployed,
        contract_type: ContractType::Freelance,
        industry_sector: IndustrySector::Hospitality,
        family_situation: FamilySituation::SingleWithDependents,
        payment_status: PaymentStatus::Partial,
    }
}

/// Low-risk profile whose debt stays within one month of income, so the score is always 60.
pub(super) fn account_with_debt(id: u64, debt: i64) -> Account {
    Account {
        total_debt_amount: Decimal::new(debt, 0),
        monthly_income: Decimal::new(debt.max(1), 0),
        ..low_risk_account(id)
    }
}

pub(super) fn stored_score(account_id: AccountId, total_score: f64) -> RiskScore {
    RiskScore {
        account_id,
        total_score,
        risk_level: RiskLevel::Medium,
        factor_breakdown: BTreeMap::new(),
        calculated_at: Utc::now(),
    }
}

pub(super) fn config(batch_size: usize, threshold: f64) -> ProcessingConfig {
    ProcessingConfig::new(batch_size, threshold).expect("valid processing config")
}

pub(super) fn build_scheduler(
    accounts: Vec<Account>,
    batch_size: usize,
    threshold: f64,
) -> (
    BatchScheduler<MemoryRepository, MemoryNotifier>,
    Arc<MemoryRepository>,
    Arc<MemoryNotifier>,
) {
    let repository = Arc::new(MemoryRepository::with_accounts(accounts));
    let notifier = Arc::new(MemoryNotifier::default());
    let scheduler = BatchScheduler::new(
        repository.clone(),
        notifier.clone(),
        config(batch_size, threshold),
    )
    .expect("scheduler builds");
    (scheduler, repository, notifier)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    records: Arc<Mutex<HashMap<AccountId, AccountRecord>>>,
    unreachable: Arc<Mutex<HashSet<AccountId>>>,
    upserts: Arc<Mutex<Vec<AccountId>>>,
}

impl MemoryRepository {
    pub(super) fn with_accounts(accounts: Vec<Account>) -> Self {
        let repository = Self::default();
        for account in accounts {
            repository.insert(AccountRecord::unscored(account));
        }
        repository
    }

    pub(super) fn insert(&self, record: AccountRecord) {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .insert(record.account.id, record);
    }

    pub(super) fn remove(&self, id: AccountId) {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .remove(&id);
    }

    pub(super) fn fail_fetch_for(&self, id: AccountId) {
        self.unreachable
            .lock()
            .expect("repository mutex poisoned")
            .insert(id);
    }

    pub(super) fn score_for(&self, id: AccountId) -> Option<RiskScore> {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .get(&id)
            .and_then(|record| record.risk_score.clone())
    }

    pub(super) fn upserts(&self) -> Vec<AccountId> {
        self.upserts.lock().expect("repository mutex poisoned").clone()
    }
}

impl AccountRepository for MemoryRepository {
    fn accounts(&self) -> Result<Vec<AccountRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut records: Vec<AccountRecord> = guard.values().cloned().collect();
        records.sort_by_key(|record| record.account.id);
        Ok(records)
    }

    fn fetch(&self, id: AccountId) -> Result<Option<AccountRecord>, RepositoryError> {
        if self
            .unreachable
            .lock()
            .expect("repository mutex poisoned")
            .contains(&id)
        {
            return Err(RepositoryError::Unavailable("replica lagging".to_string()));
        }
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    fn upsert_score(&self, score: RiskScore) -> Result<UpsertStatus, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard
            .get_mut(&score.account_id)
            .ok_or(RepositoryError::NotFound(score.account_id))?;
        self.upserts
            .lock()
            .expect("repository mutex poisoned")
            .push(score.account_id);
        let status = if record.risk_score.is_some() {
            UpsertStatus::Updated
        } else {
            UpsertStatus::Created
        };
        record.risk_score = Some(score);
        Ok(status)
    }
}

/// Serves records normally but refuses every score write.
pub(super) struct ReadOnlyRepository {
    pub(super) inner: MemoryRepository,
}

impl AccountRepository for ReadOnlyRepository {
    fn accounts(&self) -> Result<Vec<AccountRecord>, RepositoryError> {
        self.inner.accounts()
    }

    fn fetch(&self, id: AccountId) -> Result<Option<AccountRecord>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn upsert_score(&self, _score: RiskScore) -> Result<UpsertStatus, RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }
}

pub(super) struct UnavailableRepository;

impl AccountRepository for UnavailableRepository {
    fn accounts(&self) -> Result<Vec<AccountRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: AccountId) -> Result<Option<AccountRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn upsert_score(&self, _score: RiskScore) -> Result<UpsertStatus, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    batches: Arc<Mutex<Vec<Vec<ProcessedAccount>>>>,
}

impl MemoryNotifier {
    pub(super) fn batches(&self) -> Vec<Vec<ProcessedAccount>> {
        self.batches.lock().expect("notifier mutex poisoned").clone()
    }

    pub(super) fn notified_ids(&self) -> Vec<AccountId> {
        self.batches()
            .iter()
            .flatten()
            .map(|account| account.account_id)
            .collect()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, accounts: &[ProcessedAccount]) -> Result<NotificationReceipt, NotifierError> {
        if accounts.is_empty() {
            return Ok(NotificationReceipt::empty());
        }
        self.batches
            .lock()
            .expect("notifier mutex poisoned")
            .push(accounts.to_vec());
        Ok(NotificationReceipt {
            count: accounts.len(),
        })
    }
}

pub(super) struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn notify(&self, _accounts: &[ProcessedAccount]) -> Result<NotificationReceipt, NotifierError> {
        Err(NotifierError::Transport("broker offline".to_string()))
    }
}

#[derive(Default)]
pub(super) struct RecordingObserver {
    phases: Mutex<Vec<RunPhase>>,
    batches: Mutex<Vec<(usize, usize)>>,
}

impl RecordingObserver {
    pub(super) fn phases(&self) -> Vec<RunPhase> {
        self.phases.lock().expect("observer mutex poisoned").clone()
    }

    pub(super) fn batches(&self) -> Vec<(usize, usize)> {
        self.batches.lock().expect("observer mutex poisoned").clone()
    }
}

impl ProgressObserver for RecordingObserver {
    fn phase_changed(&self, phase: RunPhase) {
        self.phases
            .lock()
            .expect("observer mutex poisoned")
            .push(phase);
    }

    fn batch_started(&self, batch_number: usize, remaining: usize) {
        self.batches
            .lock()
            .expect("observer mutex poisoned")
            .push((batch_number, remaining));
    }
}

pub(super) fn processed(id: u64, debt: i64) -> ProcessedAccount {
    ProcessedAccount {
        account_id: AccountId(id),
        account_name: format!("Account {id}"),
        priority_score: CRITICAL_TOTAL * debt as f64,
        risk_score: CRITICAL_TOTAL,
        risk_level: RiskLevel::Critical,
        debt_amount: Decimal::new(debt, 0),
        payment_status: PaymentStatus::Partial,
        processed_at: Utc::now(),
    }
}
