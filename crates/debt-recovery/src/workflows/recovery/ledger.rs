use std::fmt;

use serde::{Deserialize, Serialize};

use super::domain::AccountId;

/// Pipeline stage in which an isolated failure was discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStage {
    PriorityCalculation,
    AccountProcessing,
}

impl ProcessingStage {
    pub const fn label(self) -> &'static str {
        match self {
            Self::PriorityCalculation => "priority_calculation",
            Self::AccountProcessing => "account_processing",
        }
    }
}

impl fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub account_id: AccountId,
    pub error_message: String,
    pub stage: ProcessingStage,
}

/// Append-only record of per-account failures for one run, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorLedger {
    records: Vec<ErrorRecord>,
}

impl ErrorLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &mut self,
        account_id: AccountId,
        error_message: impl Into<String>,
        stage: ProcessingStage,
    ) {
        self.records.push(ErrorRecord {
            account_id,
            error_message: error_message.into(),
            stage,
        });
    }

    /// Appends another ledger's records after this one's.
    pub fn append(&mut self, other: ErrorLedger) {
        self.records.extend(other.records);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ErrorRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &ErrorRecord> {
        self.records.iter()
    }

    pub fn count_for(&self, stage: ProcessingStage) -> usize {
        self.records
            .iter()
            .filter(|record| record.stage == stage)
            .count()
    }

    pub fn into_records(self) -> Vec<ErrorRecord> {
        self.records
    }
}
