use std::collections::BTreeMap;

use rust_decimal::Decimal;

use super::super::domain::{Account, RiskFactor, RiskLevel};
use super::weights::{
    contract_risk, employment_risk, factor_weight, family_risk, industry_risk, max_weighted_score,
};

pub(crate) fn normalize_debt_ratio(account: &Account) -> u8 {
    if account.monthly_income <= Decimal::ZERO {
        return 10;
    }

    // An overflowing ratio is off the top of the scale.
    let Some(ratio) = account
        .total_debt_amount
        .checked_div(account.monthly_income)
    else {
        return 10;
    };

    if ratio <= Decimal::ONE {
        2
    } else if ratio <= Decimal::new(3, 0) {
        5
    } else if ratio <= Decimal::new(6, 0) {
        7
    } else {
        10
    }
}

pub(crate) fn normalize_payment_history(account: &Account) -> u8 {
    match account.late_payments_count {
        0 => 1,
        1..=2 => 4,
        3..=5 => 7,
        _ => 10,
    }
}

pub(crate) fn normalize_factors(account: &Account) -> BTreeMap<RiskFactor, u8> {
    RiskFactor::ordered()
        .into_iter()
        .map(|factor| {
            let score = match factor {
                RiskFactor::DebtRatio => normalize_debt_ratio(account),
                RiskFactor::PaymentHistory => normalize_payment_history(account),
                RiskFactor::EmploymentStatus => employment_risk(account.employment_status),
                RiskFactor::ContractType => contract_risk(account.contract_type),
                RiskFactor::IndustrySector => industry_risk(account.industry_sector),
                RiskFactor::FamilySituation => family_risk(account.family_situation),
            };
            (factor, score)
        })
        .collect()
}

pub(crate) fn weighted_total(breakdown: &BTreeMap<RiskFactor, u8>) -> f64 {
    breakdown
        .iter()
        .map(|(factor, score)| f64::from(*score) * f64::from(factor_weight(*factor)))
        .sum()
}

/// Buckets a weighted score by its share of the theoretical maximum.
///
/// Each bucket includes its upper percentage bound, so exactly 30% is `Low`.
pub fn risk_level_for(weighted_score: f64) -> RiskLevel {
    let max = max_weighted_score();
    let scaled = weighted_score * 100.0;

    if scaled <= 30.0 * max {
        RiskLevel::Low
    } else if scaled <= 60.0 * max {
        RiskLevel::Medium
    } else if scaled <= 80.0 * max {
        RiskLevel::High
    } else {
        RiskLevel::Critical
    }
}
