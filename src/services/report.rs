use crate::domain::models::VerdictSummary;
use crate::ledger::{Ledger, LedgerError, RoundStatus, Verdict};

pub fn verdict_summary(ledger: &Ledger, round: u32) -> VerdictSummary {
    let mut s = VerdictSummary {
        round,
        ..VerdictSummary::default()
    };
    for f in ledger.findings_in(round) {
        s.total += 1;
        match f.verdict {
            None => s.unclassified += 1,
            Some(Verdict::Valid) => s.valid += 1,
            Some(Verdict::FalsePositive) => s.false_positive += 1,
            Some(Verdict::ScopeCreep) => s.scope_creep += 1,
            Some(Verdict::AlreadyOk) => s.already_ok += 1,
            Some(Verdict::Merged) => s.merged += 1,
        }
    }
    s
}

pub fn verdict_label(v: Option<Verdict>) -> &'static str {
    match v {
        None => "open",
        Some(Verdict::Valid) => "valid",
        Some(Verdict::FalsePositive) => "false_positive",
        Some(Verdict::ScopeCreep) => "scope_creep",
        Some(Verdict::AlreadyOk) => "already_ok",
        Some(Verdict::Merged) => "merged",
    }
}

/// Render one round as markdown: header, verdict table, findings table,
/// action-item checklist. This is the document a reviewer reads or commits.
pub fn render_round(ledger: &Ledger, round: u32) -> Result<String, LedgerError> {
    let r = ledger
        .round(round)
        .ok_or(LedgerError::UnknownRound(round))?;
    let s = verdict_summary(ledger, round);

    let mut out = String::new();
    out.push_str(&format!("# Review Round {}\n\n", round));
    out.push_str(&format!(
        "- status: {}\n",
        if r.status == RoundStatus::Open {
            "open"
        } else {
            "closed"
        }
    ));
    out.push_str(&format!("- findings: {}\n", s.total));
    if r.status == RoundStatus::Closed {
        out.push_str(&format!(
            "- terminal: {}\n",
            ledger.round_is_terminal(round)
        ));
    }

    out.push_str("\n## Verdicts\n\n");
    out.push_str("| verdict | count |\n|---|---|\n");
    for (label, count) in [
        ("open", s.unclassified),
        ("valid", s.valid),
        ("false_positive", s.false_positive),
        ("scope_creep", s.scope_creep),
        ("already_ok", s.already_ok),
        ("merged", s.merged),
    ] {
        out.push_str(&format!("| {} | {} |\n", label, count));
    }

    out.push_str("\n## Findings\n\n");
    out.push_str("| id | location | verdict | description |\n|---|---|---|---|\n");
    for f in ledger.findings_in(round) {
        let mut verdict = verdict_label(f.verdict).to_string();
        if let Some(primary) = &f.merged_into {
            verdict = format!("merged -> {}", primary);
        }
        out.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            f.id, f.location, verdict, f.description
        ));
    }

    out.push_str("\n## Action Items\n\n");
    let mut any = false;
    for a in ledger.actions_in(round) {
        any = true;
        let boxed = if a.done { "x" } else { " " };
        match &a.deferred {
            Some(reason) => out.push_str(&format!(
                "- [{}] `{}` {} (deferred: {})\n",
                boxed, a.finding_id, a.description, reason
            )),
            None => out.push_str(&format!(
                "- [{}] `{}` {}\n",
                boxed, a.finding_id, a.description
            )),
        }
    }
    if !any {
        out.push_str("_none_\n");
    }

    Ok(out)
}
