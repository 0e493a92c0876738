//! Business logic and side-effect helpers behind the command handlers.
//!
//! ## Map
//! - `storage.rs` — ledger/backlog persistence and the audit trail.
//! - `policy.rs` — review policy loading and enforcement gates.
//! - `options.rs` — remediation option presenter for valid findings.
//! - `report.rs` — markdown rendering of a round.
//! - `markdown.rs` — findings-table import parsing.
//! - `checkup.rs` — overall review-state report.
//! - `output.rs` — JSON-envelope/text printing.
//!
//! Helpers stay pure where they can; anything touching the filesystem
//! lives in `storage.rs` so command handlers remain thin.

pub mod checkup;
pub mod markdown;
pub mod options;
pub mod output;
pub mod policy;
pub mod report;
pub mod storage;
