use crate::domain::constants::{
    AUDIT_FILE, BACKLOG_FILE, BACKLOG_VERSION, LEDGER_FILE, POLICY_FILE, REVET_DIR,
};
use crate::domain::models::Backlog;
use crate::ledger::Ledger;
use std::path::{Path, PathBuf};

pub fn revet_dir(project: &Path) -> PathBuf {
    project.join(REVET_DIR)
}

pub fn ledger_path(project: &Path) -> PathBuf {
    revet_dir(project).join(LEDGER_FILE)
}

pub fn backlog_path(project: &Path) -> PathBuf {
    revet_dir(project).join(BACKLOG_FILE)
}

pub fn policy_path(project: &Path) -> PathBuf {
    revet_dir(project).join(POLICY_FILE)
}

pub fn load_ledger(project: &Path) -> anyhow::Result<Ledger> {
    let p = ledger_path(project);
    if !p.exists() {
        return Ok(Ledger::default());
    }
    let raw = std::fs::read_to_string(p)?;
    Ok(serde_json::from_str(&raw)?)
}

pub fn save_ledger(project: &Path, ledger: &Ledger) -> anyhow::Result<()> {
    let p = ledger_path(project);
    if let Some(parent) = p.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(p, serde_json::to_string_pretty(ledger)?)?;
    save_backlog(project, ledger)?;
    Ok(())
}

/// Derived open-action view, the sibling file agents and scripts watch.
fn save_backlog(project: &Path, ledger: &Ledger) -> anyhow::Result<()> {
    let backlog = Backlog {
        version: BACKLOG_VERSION,
        actions: ledger.pending_actions().cloned().collect(),
    };
    let p = backlog_path(project);
    if let Some(parent) = p.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(p, serde_json::to_string_pretty(&backlog)?)?;
    Ok(())
}

/// Best-effort append-only audit trail; never fails the command.
pub fn audit(project: &Path, action: &str, data: serde_json::Value) {
    let path = revet_dir(project).join(AUDIT_FILE);
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let event = serde_json::json!({
        "ts": unix_now(),
        "action": action,
        "data": data
    });
    let line = format!("{}\n", event);
    let _ = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .and_then(|mut f| std::io::Write::write_all(&mut f, line.as_bytes()));
}

fn unix_now() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    ts.to_string()
}
