use crate::domain::models::CheckReport;
use crate::ledger::{Ledger, RoundStatus};

/// Assemble the overall review-state report for `revet check`.
///
/// `terminal` means the loop is done: latest round closed with zero valid
/// findings and nothing left pending.
pub fn build_check_report(ledger: &Ledger) -> CheckReport {
    let open_round = ledger.open_round().map(|r| r.number);
    let pending_actions = ledger.pending_actions().count();
    let unclassified = open_round
        .map(|n| ledger.findings_in(n).filter(|f| f.verdict.is_none()).count())
        .unwrap_or(0);
    let last_closed_terminal = ledger
        .rounds
        .iter()
        .rev()
        .find(|r| r.status == RoundStatus::Closed)
        .map(|r| ledger.round_is_terminal(r.number))
        .unwrap_or(false);

    let mut recommendations = Vec::new();
    let overall = if ledger.rounds.is_empty() {
        recommendations.push("Run `revet round start` to open the first review round.".to_string());
        "in_progress"
    } else if let Some(n) = open_round {
        if unclassified > 0 {
            recommendations.push(format!(
                "Classify the {} open findings in round {} with `revet verdict set`.",
                unclassified, n
            ));
        }
        recommendations.push(format!("Close round {} with `revet round close`.", n));
        "in_progress"
    } else if last_closed_terminal && pending_actions == 0 {
        "terminal"
    } else {
        if pending_actions > 0 {
            recommendations.push(format!(
                "Resolve or defer {} pending action items (`revet action done|defer`).",
                pending_actions
            ));
        }
        if !last_closed_terminal {
            recommendations.push(
                "Start a follow-up round with `revet round start` and re-review the fixes."
                    .to_string(),
            );
        }
        "needs_attention"
    };

    CheckReport {
        overall: overall.to_string(),
        rounds: ledger.rounds.len(),
        open_round,
        last_closed_terminal,
        unclassified,
        pending_actions,
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Verdict;

    #[test]
    fn empty_ledger_recommends_starting() {
        let report = build_check_report(&Ledger::default());
        assert_eq!(report.overall, "in_progress");
        assert!(report.recommendations[0].contains("round start"));
    }

    #[test]
    fn clean_closed_round_is_terminal() {
        let mut l = Ledger::default();
        l.start_round().expect("start");
        l.add_finding("F1", "s1", "noise").expect("add");
        l.set_verdict("F1", Verdict::FalsePositive, None).expect("verdict");
        l.close_round(false).expect("close");

        let report = build_check_report(&l);
        assert_eq!(report.overall, "terminal");
        assert!(report.recommendations.is_empty());
    }

    #[test]
    fn valid_findings_keep_the_loop_going() {
        let mut l = Ledger::default();
        l.start_round().expect("start");
        l.add_finding("F1", "s1", "real problem").expect("add");
        l.set_verdict("F1", Verdict::Valid, None).expect("verdict");
        l.close_round(false).expect("close");

        let report = build_check_report(&l);
        assert_eq!(report.overall, "needs_attention");
        assert_eq!(report.pending_actions, 1);
        assert!(!report.last_closed_terminal);
    }
}
