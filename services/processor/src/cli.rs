use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use debt_recovery::error::AppError;
use debt_recovery::workflows::recovery::PREVIEW_LENGTH;

use crate::commands::{run_preview, run_recovery};

#[derive(Parser, Debug)]
#[command(
    name = "debt-recovery",
    about = "Score debt accounts and work through them in priority order",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score, rank, and process every account in the export
    Run(RunArgs),
    /// Show the highest-priority accounts without processing them
    Preview(PreviewArgs),
}

#[derive(Args, Debug)]
pub(crate) struct RunArgs {
    /// CSV export of accounts to process
    #[arg(long)]
    pub(crate) accounts: PathBuf,
    /// Override the configured batch size
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) batch_size: Option<i64>,
    /// Override the configured high-priority threshold
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) threshold: Option<f64>,
    /// Print the report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
    /// Append high-priority batches to this JSON-lines outbox instead of logging them
    #[arg(long)]
    pub(crate) outbox: Option<PathBuf>,
    /// Print a Prometheus snapshot to stderr after the run
    #[arg(long)]
    pub(crate) metrics: bool,
}

#[derive(Args, Debug)]
pub(crate) struct PreviewArgs {
    /// CSV export of accounts to rank
    #[arg(long)]
    pub(crate) accounts: PathBuf,
    /// Number of accounts to list
    #[arg(long, default_value_t = PREVIEW_LENGTH)]
    pub(crate) top_k: usize,
}

pub(crate) fn run() -> Result<(), AppError> {
    match Cli::parse().command {
        Command::Run(args) => run_recovery(args),
        Command::Preview(args) => run_preview(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_accepts_overrides_and_outputs() {
        let cli = Cli::try_parse_from([
            "debt-recovery",
            "run",
            "--accounts",
            "accounts.csv",
            "--batch-size",
            "25",
            "--threshold",
            "750000",
            "--json",
            "--outbox",
            "outbox.jsonl",
        ])
        .expect("valid arguments");

        match cli.command {
            Command::Run(args) => {
                assert_eq!(args.accounts, PathBuf::from("accounts.csv"));
                assert_eq!(args.batch_size, Some(25));
                assert_eq!(args.threshold, Some(750_000.0));
                assert!(args.json);
                assert!(!args.metrics);
                assert_eq!(args.outbox, Some(PathBuf::from("outbox.jsonl")));
            }
            other => panic!("expected run command, got {other:?}"),
        }
    }

    #[test]
    fn negative_batch_size_reaches_validation() {
        let cli = Cli::try_parse_from([
            "debt-recovery",
            "run",
            "--accounts",
            "accounts.csv",
            "--batch-size",
            "-3",
        ])
        .expect("negative values parse");

        match cli.command {
            Command::Run(args) => assert_eq!(args.batch_size, Some(-3)),
            other => panic!("expected run command, got {other:?}"),
        }
    }

    #[test]
    fn preview_defaults_to_ten_accounts() {
        let cli = Cli::try_parse_from(["debt-recovery", "preview", "--accounts", "a.csv"])
            .expect("valid arguments");

        match cli.command {
            Command::Preview(args) => assert_eq!(args.top_k, 10),
            other => panic!("expected preview command, got {other:?}"),
        }
    }

    #[test]
    fn accounts_path_is_required() {
        assert!(Cli::try_parse_from(["debt-recovery", "run"]).is_err());
    }
}
