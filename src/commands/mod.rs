//! CLI-facing orchestration.
//!
//! - `admin.rs` — `init` and policy inspection, dispatched before the
//!   ledger loads.
//! - `runtime.rs` — everything that reads or mutates the ledger.
//!
//! Handlers match CLI input, call into `ledger` and `services/*`, and keep
//! the printed output shapes stable.

pub mod admin;
pub mod runtime;

pub use admin::handle_admin_commands;
pub use runtime::handle_runtime_commands;
