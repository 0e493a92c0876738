use clap::Parser;

mod cli;
mod commands;
mod domain;
mod ledger;
mod services;

use cli::Cli;
use domain::models::{JsonErr, JsonErrBody};
use ledger::LedgerError;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        report_error(&cli, &e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    if commands::handle_admin_commands(cli)? {
        return Ok(());
    }

    let policy = services::policy::load_policy(&cli.project)?;
    let mut ledger = services::storage::load_ledger(&cli.project)?;
    commands::handle_runtime_commands(cli, &mut ledger, &policy)
}

fn report_error(cli: &Cli, err: &anyhow::Error) {
    if cli.json {
        let out = JsonErr {
            ok: false,
            error: JsonErrBody {
                code: error_code(err).to_string(),
                message: err.to_string(),
            },
        };
        match serde_json::to_string_pretty(&out) {
            Ok(s) => println!("{}", s),
            Err(_) => println!("{{\"ok\":false}}"),
        }
    } else {
        eprintln!("error: {}", err);
    }
}

/// Stable codes for the `--json` error envelope.
fn error_code(err: &anyhow::Error) -> &'static str {
    match err.downcast_ref::<LedgerError>() {
        Some(LedgerError::DuplicateFinding(_)) => "DUPLICATE_FINDING",
        Some(LedgerError::UnknownFinding(_)) => "UNKNOWN_FINDING",
        Some(LedgerError::RoundOpen(_)) => "ROUND_OPEN",
        Some(LedgerError::NoOpenRound) => "NO_OPEN_ROUND",
        Some(LedgerError::RoundClosed(_)) => "ROUND_CLOSED",
        Some(LedgerError::RoundBlocked(_)) => "ROUND_BLOCKED",
        Some(LedgerError::MergePrimaryRequired(_)) => "MERGE_PRIMARY_REQUIRED",
        Some(LedgerError::PrimaryNotAllowed(_)) => "PRIMARY_NOT_ALLOWED",
        Some(LedgerError::MergeTargetMissing(_)) => "MERGE_TARGET_MISSING",
        Some(LedgerError::MergeIntoMerged(_)) => "MERGE_INTO_MERGED",
        Some(LedgerError::MergePrimaryInUse(_)) => "MERGE_PRIMARY_IN_USE",
        Some(LedgerError::UnknownRound(_)) => "UNKNOWN_ROUND",
        Some(LedgerError::MergeSelf(_)) => "MERGE_SELF",
        Some(LedgerError::NotValid(_)) => "NOT_VALID",
        Some(LedgerError::NoAction(_)) => "NO_ACTION",
        Some(LedgerError::PolicyDeny(_)) => "POLICY_DENY",
        None => "INTERNAL",
    }
}
