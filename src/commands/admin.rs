use crate::cli::{Cli, Commands, PolicyCommands};
use crate::domain::constants::DEFAULT_POLICY_TOML;
use crate::ledger::Ledger;
use crate::services::output::print_one;
use crate::services::policy::load_policy;
use crate::services::storage::{audit, policy_path, revet_dir, save_ledger};

/// Handles commands that run before the ledger is loaded.
/// Returns Ok(false) when the command belongs to the runtime handler.
pub fn handle_admin_commands(cli: &Cli) -> anyhow::Result<bool> {
    match &cli.command {
        Commands::Init => {
            let dir = revet_dir(&cli.project);
            std::fs::create_dir_all(&dir)?;
            save_ledger(&cli.project, &Ledger::default())?;
            let policy = policy_path(&cli.project);
            if !policy.exists() {
                std::fs::write(policy, DEFAULT_POLICY_TOML)?;
            }
            audit(&cli.project, "init", serde_json::json!({}));
            print_one(cli.json, "initialized", |_| {
                format!("initialized review ledger in {}", dir.display())
            })?;
            Ok(true)
        }
        Commands::Policy {
            command: PolicyCommands::Show,
        } => {
            let policy = load_policy(&cli.project)?;
            print_one(cli.json, &policy, |p| {
                format!(
                    "require_location={} strict_close={} max_rounds={} max_findings_per_round={}",
                    p.review.require_location,
                    p.review.strict_close,
                    p.review.max_rounds,
                    p.review.max_findings_per_round
                )
            })?;
            Ok(true)
        }
        _ => Ok(false),
    }
}
