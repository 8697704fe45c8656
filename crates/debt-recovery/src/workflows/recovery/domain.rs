use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for debt accounts held by the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub u64);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Financial and profile attributes of a debtor used for risk scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub total_debt_amount: Decimal,
    pub monthly_income: Decimal,
    pub late_payments_count: u32,
    pub employment_status: EmploymentStatus,
    pub contract_type: ContractType,
    pub industry_sector: IndustrySector,
    pub family_situation: FamilySituation,
    pub payment_status: PaymentStatus,
}

macro_rules! coded_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $code:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $($variant,)+
            Unknown,
        }

        impl $name {
            /// Parses an upstream code; anything unrecognized becomes `Unknown`.
            pub fn from_code(code: &str) -> Self {
                match code.trim().to_ascii_uppercase().as_str() {
                    $($code => Self::$variant,)+
                    _ => Self::Unknown,
                }
            }

            pub const fn code(self) -> &'static str {
                match self {
                    $(Self::$variant => $code,)+
                    Self::Unknown => "UNKNOWN",
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.code())
            }
        }
    };
}

coded_enum! {
    /// Employment status affects income stability assessment.
    EmploymentStatus {
        Employed => "EMPLOYED",
        Government => "GOVERNMENT",
        SelfEmployed => "SELF_EMPLOYED",
        Unemployed => "UNEMPLOYED",
    }
}

coded_enum! {
    ContractType {
        Permanent => "PERMANENT",
        Temporary => "TEMPORARY",
        Freelance => "FREELANCE",
    }
}

coded_enum! {
    IndustrySector {
        Healthcare => "HEALTHCARE",
        Education => "EDUCATION",
        Finance => "FINANCE",
        Technology => "TECHNOLOGY",
        Construction => "CONSTRUCTION",
        Hospitality => "HOSPITALITY",
    }
}

coded_enum! {
    FamilySituation {
        MarriedDualIncome => "MARRIED_DUAL_INCOME",
        MarriedSingleIncome => "MARRIED_SINGLE_INCOME",
        SingleNoDependents => "SINGLE_NO_DEPENDENTS",
        SingleWithDependents => "SINGLE_WITH_DEPENDENTS",
    }
}

coded_enum! {
    /// Repayment state forwarded to partner reconciliation as the internal status.
    PaymentStatus {
        Unpaid => "UNPAID",
        Partial => "PARTIAL",
        Paid => "PAID",
    }
}

/// Scoring factors, each normalized to a 0-10 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    DebtRatio,
    PaymentHistory,
    EmploymentStatus,
    ContractType,
    IndustrySector,
    FamilySituation,
}

impl RiskFactor {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::DebtRatio,
            Self::PaymentHistory,
            Self::EmploymentStatus,
            Self::ContractType,
            Self::IndustrySector,
            Self::FamilySituation,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::DebtRatio => "debt_ratio",
            Self::PaymentHistory => "payment_history",
            Self::EmploymentStatus => "employment_status",
            Self::ContractType => "contract_type",
            Self::IndustrySector => "industry_sector",
            Self::FamilySituation => "family_situation",
        }
    }
}

/// Categorical bucket derived from the weighted score as a share of the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Stored risk score; at most one per account, overwritten on recalculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskScore {
    pub account_id: AccountId,
    pub total_score: f64,
    pub risk_level: RiskLevel,
    pub factor_breakdown: BTreeMap<RiskFactor, u8>,
    pub calculated_at: DateTime<Utc>,
}
