//! Stable on-disk names for the ledger directory.

pub const REVET_DIR: &str = ".revet";
pub const LEDGER_FILE: &str = "ledger.json";
pub const BACKLOG_FILE: &str = "backlog.json";
pub const POLICY_FILE: &str = "policy.toml";
pub const AUDIT_FILE: &str = "audit.jsonl";

pub const BACKLOG_VERSION: u32 = 1;

/// Written by `revet init` so a fresh project starts with the relaxed defaults
/// spelled out rather than implied.
pub const DEFAULT_POLICY_TOML: &str = "\
[review]
# Reject findings filed without a location pointer.
require_location = false
# Require every action item to be done or deferred before a round closes.
strict_close = false
# 0 = unlimited.
max_rounds = 0
max_findings_per_round = 0
";
