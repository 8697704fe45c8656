mod parser;

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::workflows::recovery::{AccountId, AccountRecord};

#[derive(Debug)]
pub enum AccountImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    DuplicateAccount(AccountId),
}

impl std::fmt::Display for AccountImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountImportError::Io(err) => write!(f, "failed to read account export: {}", err),
            AccountImportError::Csv(err) => write!(f, "invalid account CSV data: {}", err),
            AccountImportError::DuplicateAccount(id) => {
                write!(f, "account {} appears more than once in the export", id)
            }
        }
    }
}

impl std::error::Error for AccountImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AccountImportError::Io(err) => Some(err),
            AccountImportError::Csv(err) => Some(err),
            AccountImportError::DuplicateAccount(_) => None,
        }
    }
}

impl From<std::io::Error> for AccountImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for AccountImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Loads unscored accounts from a CSV export.
///
/// Expected headers: `id, name, total_debt_amount, monthly_income,
/// late_payments_count, employment_status, contract_type, industry_sector,
/// family_situation` and an optional `payment_status` (defaults to `UNPAID`).
/// Categorical codes are SCREAMING_SNAKE_CASE; unrecognized codes import as `Unknown`.
pub struct AccountCsvImporter;

impl AccountCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<AccountRecord>, AccountImportError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<AccountRecord>, AccountImportError> {
        let accounts = parser::parse_accounts(reader)?;

        let mut seen = HashSet::with_capacity(accounts.len());
        for account in &accounts {
            if !seen.insert(account.id) {
                return Err(AccountImportError::DuplicateAccount(account.id));
            }
        }

        Ok(accounts.into_iter().map(AccountRecord::unscored).collect())
    }
}
