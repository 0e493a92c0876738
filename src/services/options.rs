use crate::domain::models::RemediationOption;
use crate::ledger::{Finding, LedgerError, Verdict};

const MAX_OPTIONS: usize = 3;

/// Present 2-3 remediation choices for a valid finding, scored from its text.
///
/// Scores are keyword heuristics only; the reviewer picks with
/// `revet action choose <id> --option N`.
pub fn remediation_options(f: &Finding) -> Result<Vec<RemediationOption>, LedgerError> {
    if f.verdict != Some(Verdict::Valid) {
        return Err(LedgerError::NotValid(f.id.clone()));
    }

    let text = format!("{} {}", f.location, f.description).to_ascii_lowercase();

    let mut patch_score = 50;
    let mut patch_reason = "smallest change that addresses the finding".to_string();
    for kw in ["typo", "rename", "wording", "format", "header", "table"] {
        if text.contains(kw) {
            patch_score += 30;
            patch_reason = format!("'{}' suggests an in-place edit", kw);
            break;
        }
    }

    let mut followup_score = 20;
    let mut followup_reason = "baseline relevance".to_string();
    for kw in ["refactor", "redesign", "split", "restructure", "rework"] {
        if text.contains(kw) {
            followup_score += 40;
            followup_reason = format!("'{}' suggests work beyond this round", kw);
            break;
        }
    }
    if f.description.len() > 160 {
        followup_score += 15;
        if followup_reason == "baseline relevance" {
            followup_reason = "long description suggests a larger work item".to_string();
        }
    }

    let mut defer_score = 10;
    let mut defer_reason = "baseline relevance".to_string();
    for kw in ["limitation", "tradeoff", "accept", "document", "known issue"] {
        if text.contains(kw) {
            defer_score += 25;
            defer_reason = format!("'{}' suggests recording, not fixing", kw);
            break;
        }
    }

    let mut out = vec![
        RemediationOption {
            option: 0,
            kind: "patch".to_string(),
            summary: format!("Fix in place: {}", f.description),
            score: patch_score,
            reason: patch_reason,
        },
        RemediationOption {
            option: 0,
            kind: "followup".to_string(),
            summary: format!("Split into a follow-up backlog item: {}", f.description),
            score: followup_score,
            reason: followup_reason,
        },
        RemediationOption {
            option: 0,
            kind: "defer".to_string(),
            summary: format!("Record as known limitation: {}", f.description),
            score: defer_score,
            reason: defer_reason,
        },
    ];

    out.sort_by(|a, b| b.score.cmp(&a.score).then(a.kind.cmp(&b.kind)));
    out.truncate(MAX_OPTIONS);
    for (i, o) in out.iter_mut().enumerate() {
        o.option = (i + 1) as u32;
    }
    Ok(out)
}

pub fn pick_option(
    options: &[RemediationOption],
    number: u32,
) -> Result<&RemediationOption, LedgerError> {
    options
        .iter()
        .find(|o| o.option == number)
        .ok_or_else(|| LedgerError::NoAction(format!("option {} not offered", number)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::fingerprint;

    fn valid_finding(description: &str) -> Finding {
        Finding {
            id: "F1".to_string(),
            round: 1,
            location: "section 2".to_string(),
            description: description.to_string(),
            verdict: Some(Verdict::Valid),
            merged_into: None,
            fingerprint: fingerprint("section 2", description),
            seen_before: false,
        }
    }

    #[test]
    fn offers_two_to_three_options_with_stable_numbering() {
        let opts = remediation_options(&valid_finding("missing invariant")).expect("options");
        assert!((2..=3).contains(&opts.len()));
        let numbers: Vec<u32> = opts.iter().map(|o| o.option).collect();
        assert_eq!(numbers, vec![1, 2, 3][..opts.len()]);
    }

    #[test]
    fn typo_ranks_patch_first() {
        let opts = remediation_options(&valid_finding("typo in heading")).expect("options");
        assert_eq!(opts[0].kind, "patch");
    }

    #[test]
    fn redesign_ranks_followup_above_defer() {
        let opts =
            remediation_options(&valid_finding("needs a redesign of the storage section"))
                .expect("options");
        let followup = opts.iter().position(|o| o.kind == "followup");
        let defer = opts.iter().position(|o| o.kind == "defer");
        assert!(followup < defer);
    }

    #[test]
    fn non_valid_finding_has_no_options() {
        let mut f = valid_finding("anything");
        f.verdict = Some(Verdict::AlreadyOk);
        assert!(matches!(
            remediation_options(&f).unwrap_err(),
            LedgerError::NotValid(_)
        ));
    }
}
