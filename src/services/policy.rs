use crate::domain::models::{PolicyEvalReport, PolicyFile, ReviewRules};
use crate::ledger::{Finding, Ledger, LedgerError};
use crate::services::storage::policy_path;
use std::path::Path;

pub fn load_policy(project: &Path) -> anyhow::Result<PolicyFile> {
    let path = policy_path(project);
    if !path.exists() {
        return Ok(PolicyFile {
            review: ReviewRules::default(),
        });
    }
    let raw = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&raw)?)
}

/// Gate on `finding add` / `import` rows.
pub fn enforce_add(
    policy: &PolicyFile,
    ledger: &Ledger,
    location: &str,
) -> Result<(), LedgerError> {
    if policy.review.require_location && location.trim().is_empty() {
        return Err(LedgerError::PolicyDeny(
            "policy requires a location for every finding".to_string(),
        ));
    }
    if policy.review.max_findings_per_round > 0 {
        if let Ok(round) = ledger.open_round_number() {
            let count = ledger.findings_in(round).count();
            if count >= policy.review.max_findings_per_round {
                return Err(LedgerError::PolicyDeny(format!(
                    "policy blocked finding: round {} already holds {} findings",
                    round, count
                )));
            }
        }
    }
    Ok(())
}

/// Gate on `round start`.
pub fn enforce_round_start(policy: &PolicyFile, ledger: &Ledger) -> Result<(), LedgerError> {
    if policy.review.max_rounds > 0 && ledger.rounds.len() >= policy.review.max_rounds {
        return Err(LedgerError::PolicyDeny(format!(
            "policy blocked round start: max_rounds={} reached",
            policy.review.max_rounds
        )));
    }
    Ok(())
}

pub fn policy_eval_for_finding(
    policy: &PolicyFile,
    ledger: &Ledger,
    f: &Finding,
) -> PolicyEvalReport {
    match enforce_add(policy, ledger, &f.location) {
        Ok(()) => PolicyEvalReport {
            finding: f.id.clone(),
            allowed: true,
            reason: "allowed".to_string(),
        },
        Err(e) => PolicyEvalReport {
            finding: f.id.clone(),
            allowed: false,
            reason: e.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(rules: ReviewRules) -> PolicyFile {
        PolicyFile { review: rules }
    }

    #[test]
    fn require_location_rejects_blank_pointer() {
        let p = policy(ReviewRules {
            require_location: true,
            ..ReviewRules::default()
        });
        let l = Ledger::default();
        assert!(enforce_add(&p, &l, "  ").is_err());
        assert!(enforce_add(&p, &l, "section 3.2").is_ok());
    }

    #[test]
    fn max_findings_per_round_caps_registry() {
        let p = policy(ReviewRules {
            max_findings_per_round: 1,
            ..ReviewRules::default()
        });
        let mut l = Ledger::default();
        l.start_round().expect("start");
        l.add_finding("F1", "s1", "first").expect("add");
        let err = enforce_add(&p, &l, "s2").unwrap_err();
        assert!(err.to_string().contains("already holds 1 findings"));
    }

    #[test]
    fn max_rounds_limits_the_loop() {
        let p = policy(ReviewRules {
            max_rounds: 1,
            ..ReviewRules::default()
        });
        let mut l = Ledger::default();
        l.start_round().expect("start");
        l.close_round(false).expect("close empty round");
        assert!(enforce_round_start(&p, &l).is_err());
    }
}
