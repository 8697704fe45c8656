use super::super::domain::{
    ContractType, EmploymentStatus, FamilySituation, IndustrySector, RiskFactor,
};

/// Score assigned to categorical values the lookup tables do not recognize.
pub(crate) const UNRECOGNIZED_CATEGORY_SCORE: u8 = 5;

pub const fn factor_weight(factor: RiskFactor) -> u8 {
    match factor {
        RiskFactor::DebtRatio => 9,
        RiskFactor::PaymentHistory => 9,
        RiskFactor::EmploymentStatus => 8,
        RiskFactor::ContractType => 7,
        RiskFactor::IndustrySector => 6,
        RiskFactor::FamilySituation => 6,
    }
}

/// Theoretical maximum of the weighted sum (every factor at 10).
pub fn max_weighted_score() -> f64 {
    RiskFactor::ordered()
        .into_iter()
        .map(|factor| 10.0 * f64::from(factor_weight(factor)))
        .sum()
}

pub(crate) const fn employment_risk(status: EmploymentStatus) -> u8 {
    match status {
        EmploymentStatus::Government => 1,
        EmploymentStatus::Employed => 2,
        EmploymentStatus::SelfEmployed => 6,
        EmploymentStatus::Unemployed => 10,
        EmploymentStatus::Unknown => UNRECOGNIZED_CATEGORY_SCORE,
    }
}

pub(crate) const fn contract_risk(contract: ContractType) -> u8 {
    match contract {
        ContractType::Permanent => 1,
        ContractType::Temporary => 6,
        ContractType::Freelance => 9,
        ContractType::Unknown => UNRECOGNIZED_CATEGORY_SCORE,
    }
}

pub(crate) const fn industry_risk(sector: IndustrySector) -> u8 {
    match sector {
        IndustrySector::Healthcare | IndustrySector::Education => 2,
        IndustrySector::Finance | IndustrySector::Technology => 3,
        IndustrySector::Construction => 7,
        IndustrySector::Hospitality => 9,
        IndustrySector::Unknown => UNRECOGNIZED_CATEGORY_SCORE,
    }
}

pub(crate) const fn family_risk(situation: FamilySituation) -> u8 {
    match situation {
        FamilySituation::MarriedDualIncome => 1,
        FamilySituation::SingleNoDependents => 4,
        FamilySituation::MarriedSingleIncome => 5,
        FamilySituation::SingleWithDependents => 9,
        FamilySituation::Unknown => UNRECOGNIZED_CATEGORY_SCORE,
    }
}
