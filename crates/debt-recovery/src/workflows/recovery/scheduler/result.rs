use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::super::domain::{AccountId, PaymentStatus, RiskLevel};

/// Outcome of processing one popped account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProcessingResult {
    Success(ProcessedAccount),
    Error(FailedAccount),
}

impl ProcessingResult {
    pub fn account_id(&self) -> AccountId {
        match self {
            Self::Success(processed) => processed.account_id,
            Self::Error(failed) => failed.account_id,
        }
    }

    pub fn priority_score(&self) -> f64 {
        match self {
            Self::Success(processed) => processed.priority_score,
            Self::Error(failed) => failed.priority_score,
        }
    }

    pub fn as_success(&self) -> Option<&ProcessedAccount> {
        match self {
            Self::Success(processed) => Some(processed),
            Self::Error(_) => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Freshly rescored account, ready for downstream notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedAccount {
    pub account_id: AccountId,
    pub account_name: String,
    pub priority_score: f64,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub debt_amount: Decimal,
    pub payment_status: PaymentStatus,
    pub processed_at: DateTime<Utc>,
}

/// Account that could not be processed. The priority is best-effort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedAccount {
    pub account_id: AccountId,
    pub priority_score: f64,
    pub error_message: String,
    pub processed_at: DateTime<Utc>,
}
