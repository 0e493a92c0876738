use crate::ledger::ActionItem;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

#[derive(Serialize)]
pub struct JsonErr {
    pub ok: bool,
    pub error: JsonErrBody,
}

#[derive(Serialize)]
pub struct JsonErrBody {
    pub code: String,
    pub message: String,
}

/// Derived view of action items, rewritten on every ledger save.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Backlog {
    pub version: u32,
    pub actions: Vec<ActionItem>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PolicyFile {
    #[serde(default)]
    pub review: ReviewRules,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct ReviewRules {
    #[serde(default)]
    pub require_location: bool,
    #[serde(default)]
    pub strict_close: bool,
    #[serde(default)]
    pub max_rounds: usize,
    #[serde(default)]
    pub max_findings_per_round: usize,
}

#[derive(Serialize)]
pub struct RoundStatusReport {
    pub round: u32,
    pub status: String,
    pub findings: usize,
    pub unclassified: usize,
    pub open_actions: usize,
    pub terminal: bool,
    pub verdicts: VerdictSummary,
}

#[derive(Serialize, Default)]
pub struct VerdictSummary {
    pub round: u32,
    pub total: usize,
    pub unclassified: usize,
    pub valid: usize,
    pub false_positive: usize,
    pub scope_creep: usize,
    pub already_ok: usize,
    pub merged: usize,
}

#[derive(Serialize, Clone, Debug)]
pub struct RemediationOption {
    pub option: u32,
    pub kind: String,
    pub summary: String,
    pub score: i32,
    pub reason: String,
}

#[derive(Serialize)]
pub struct ImportReport {
    pub added: usize,
    pub skipped: Vec<SkippedRow>,
}

#[derive(Serialize)]
pub struct SkippedRow {
    pub id: String,
    pub reason: String,
}

#[derive(Serialize)]
pub struct PolicyEvalReport {
    pub finding: String,
    pub allowed: bool,
    pub reason: String,
}

#[derive(Serialize)]
pub struct CheckReport {
    pub overall: String,
    pub rounds: usize,
    pub open_round: Option<u32>,
    pub last_closed_terminal: bool,
    pub unclassified: usize,
    pub pending_actions: usize,
    pub recommendations: Vec<String>,
}
