//! Data-only layer: DTOs, report structs, and stable on-disk names.
//!
//! - `models.rs` — policy file shape and the structs behind `--json` output.
//! - `constants.rs` — ledger directory and file names, default policy text.
//!
//! Nothing here performs I/O. Struct changes show up in `--json` payloads,
//! so they must stay in step with the schemas under `docs/contracts/`.

pub mod constants;
pub mod models;
