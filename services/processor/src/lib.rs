mod cli;
mod commands;
mod infra;

use debt_recovery::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
