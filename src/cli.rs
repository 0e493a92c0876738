use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "revet", version, about = "Design-review round ledger")]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        default_value = ".",
        help = "Project directory holding the .revet ledger"
    )]
    pub project: PathBuf,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Init,
    Round {
        #[command(subcommand)]
        command: RoundCommands,
    },
    Finding {
        #[command(subcommand)]
        command: FindingCommands,
    },
    Verdict {
        #[command(subcommand)]
        command: VerdictCommands,
    },
    Options {
        finding: String,
    },
    Action {
        #[command(subcommand)]
        command: ActionCommands,
    },
    Report {
        #[arg(long)]
        round: Option<u32>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    Import {
        file: PathBuf,
    },
    Validate,
    Check,
    Policy {
        #[command(subcommand)]
        command: PolicyCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum RoundCommands {
    Start,
    Close,
    Status {
        #[arg(long)]
        round: Option<u32>,
    },
    List,
}

#[derive(Subcommand, Debug)]
pub enum FindingCommands {
    Add {
        id: String,
        #[arg(long, default_value = "")]
        location: String,
        #[arg(long)]
        description: String,
    },
    List {
        #[arg(long)]
        round: Option<u32>,
        #[arg(long, value_enum)]
        verdict: Option<VerdictArg>,
    },
    Show {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum VerdictCommands {
    Set {
        id: String,
        #[arg(value_enum)]
        verdict: VerdictArg,
        #[arg(long, help = "Primary finding id (required for merged)")]
        primary: Option<String>,
    },
    Summary {
        #[arg(long)]
        round: Option<u32>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ActionCommands {
    List {
        #[arg(long, default_value_t = false)]
        all: bool,
    },
    Choose {
        finding: String,
        #[arg(long)]
        option: u32,
    },
    Done {
        finding: String,
    },
    Defer {
        finding: String,
        #[arg(long)]
        reason: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum PolicyCommands {
    Show,
    Eval { finding: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum VerdictArg {
    Valid,
    FalsePositive,
    ScopeCreep,
    AlreadyOk,
    Merged,
}
