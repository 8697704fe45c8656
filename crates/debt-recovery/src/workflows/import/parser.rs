use std::io::Read;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

use crate::workflows::recovery::{
    Account, AccountId, ContractType, EmploymentStatus, FamilySituation, IndustrySector,
    PaymentStatus,
};

pub(crate) fn parse_accounts<R: Read>(reader: R) -> Result<Vec<Account>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut accounts = Vec::new();

    for record in csv_reader.deserialize::<AccountRow>() {
        accounts.push(record?.into_account());
    }

    Ok(accounts)
}

#[derive(Debug, Deserialize)]
struct AccountRow {
    id: u64,
    name: String,
    #[serde(with = "rust_decimal::serde::str")]
    total_debt_amount: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    monthly_income: Decimal,
    late_payments_count: u32,
    employment_status: String,
    contract_type: String,
    industry_sector: String,
    family_situation: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    payment_status: Option<String>,
}

impl AccountRow {
    fn into_account(self) -> Account {
        Account {
            id: AccountId(self.id),
            name: self.name,
            total_debt_amount: self.total_debt_amount,
            monthly_income: self.monthly_income,
            late_payments_count: self.late_payments_count,
            employment_status: EmploymentStatus::from_code(&self.employment_status),
            contract_type: ContractType::from_code(&self.contract_type),
            industry_sector: IndustrySector::from_code(&self.industry_sector),
            family_situation: FamilySituation::from_code(&self.family_situation),
            payment_status: self
                .payment_status
                .as_deref()
                .map(PaymentStatus::from_code)
                .unwrap_or(PaymentStatus::Unpaid),
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
