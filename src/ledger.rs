use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Ledger {
    pub rounds: Vec<Round>,
    pub findings: Vec<Finding>,
    pub actions: Vec<ActionItem>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Round {
    pub number: u32,
    pub status: RoundStatus,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RoundStatus {
    Open,
    Closed,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Finding {
    pub id: String,
    pub round: u32,
    pub location: String,
    pub description: String,
    pub verdict: Option<Verdict>,
    #[serde(default)]
    pub merged_into: Option<String>,
    pub fingerprint: String,
    #[serde(default)]
    pub seen_before: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Valid,
    FalsePositive,
    ScopeCreep,
    AlreadyOk,
    Merged,
}

impl From<crate::cli::VerdictArg> for Verdict {
    fn from(v: crate::cli::VerdictArg) -> Self {
        use crate::cli::VerdictArg as A;
        match v {
            A::Valid => Verdict::Valid,
            A::FalsePositive => Verdict::FalsePositive,
            A::ScopeCreep => Verdict::ScopeCreep,
            A::AlreadyOk => Verdict::AlreadyOk,
            A::Merged => Verdict::Merged,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ActionItem {
    pub finding_id: String,
    pub round: u32,
    pub description: String,
    pub done: bool,
    #[serde(default)]
    pub deferred: Option<String>,
}

impl ActionItem {
    pub fn is_pending(&self) -> bool {
        !self.done && self.deferred.is_none()
    }
}

#[derive(thiserror::Error, Debug)]
pub enum LedgerError {
    #[error("duplicate finding id in round: {0}")]
    DuplicateFinding(String),
    #[error("finding not found in open round: {0}")]
    UnknownFinding(String),
    #[error("round {0} is still open")]
    RoundOpen(u32),
    #[error("no open round (run `revet round start`)")]
    NoOpenRound,
    #[error("round {0} is closed; verdicts are frozen")]
    RoundClosed(u32),
    #[error("round cannot close: {0}")]
    RoundBlocked(String),
    #[error("merged verdict requires --primary for finding: {0}")]
    MergePrimaryRequired(String),
    #[error("--primary is only valid with the merged verdict: {0}")]
    PrimaryNotAllowed(String),
    #[error("merge primary not found in round: {0}")]
    MergeTargetMissing(String),
    #[error("merge primary is itself merged: {0}")]
    MergeIntoMerged(String),
    #[error("finding is the merge primary of other findings: {0}")]
    MergePrimaryInUse(String),
    #[error("round not found: {0}")]
    UnknownRound(u32),
    #[error("finding cannot merge into itself: {0}")]
    MergeSelf(String),
    #[error("finding is not valid, no action applies: {0}")]
    NotValid(String),
    #[error("no action item for finding: {0}")]
    NoAction(String),
    #[error("{0}")]
    PolicyDeny(String),
}

/// Content fingerprint used to flag findings re-reported across rounds.
pub fn fingerprint(location: &str, description: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(location.as_bytes());
    hasher.update(b"\n");
    hasher.update(description.as_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..12].to_string()
}

impl Ledger {
    pub fn open_round(&self) -> Option<&Round> {
        self.rounds.iter().find(|r| r.status == RoundStatus::Open)
    }

    pub fn open_round_number(&self) -> Result<u32, LedgerError> {
        self.open_round()
            .map(|r| r.number)
            .ok_or(LedgerError::NoOpenRound)
    }

    pub fn last_round(&self) -> Option<&Round> {
        self.rounds.last()
    }

    pub fn round(&self, number: u32) -> Option<&Round> {
        self.rounds.iter().find(|r| r.number == number)
    }

    pub fn findings_in(&self, round: u32) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.round == round)
    }

    pub fn actions_in(&self, round: u32) -> impl Iterator<Item = &ActionItem> {
        self.actions.iter().filter(move |a| a.round == round)
    }

    /// Resolve a finding id within the open round.
    pub fn finding_in_open_round(&self, id: &str) -> Result<&Finding, LedgerError> {
        let round = self.open_round_number()?;
        self.findings
            .iter()
            .find(|f| f.round == round && f.id == id)
            .ok_or_else(|| LedgerError::UnknownFinding(id.to_string()))
    }

    /// Resolve a finding id, preferring the latest round that contains it.
    pub fn latest_finding(&self, id: &str) -> Option<&Finding> {
        self.findings
            .iter()
            .rev()
            .find(|f| f.id == id)
    }

    pub fn start_round(&mut self) -> Result<u32, LedgerError> {
        if let Some(open) = self.open_round() {
            return Err(LedgerError::RoundOpen(open.number));
        }
        let number = self.rounds.last().map(|r| r.number + 1).unwrap_or(1);
        self.rounds.push(Round {
            number,
            status: RoundStatus::Open,
        });
        Ok(number)
    }

    pub fn add_finding(
        &mut self,
        id: &str,
        location: &str,
        description: &str,
    ) -> Result<Finding, LedgerError> {
        let round = self.open_round_number()?;
        if self.findings_in(round).any(|f| f.id == id) {
            return Err(LedgerError::DuplicateFinding(id.to_string()));
        }
        let fp = fingerprint(location, description);
        let seen_before = self
            .findings
            .iter()
            .any(|f| f.round < round && f.fingerprint == fp);
        let finding = Finding {
            id: id.to_string(),
            round,
            location: location.to_string(),
            description: description.to_string(),
            verdict: None,
            merged_into: None,
            fingerprint: fp,
            seen_before,
        };
        self.findings.push(finding.clone());
        Ok(finding)
    }

    /// Record a reviewer verdict on a finding in the open round.
    ///
    /// Re-classification is allowed while the round stays open: moving away
    /// from `valid` drops the finding's pending action item, re-merging
    /// replaces the primary reference.
    pub fn set_verdict(
        &mut self,
        id: &str,
        verdict: Verdict,
        primary: Option<&str>,
    ) -> Result<Finding, LedgerError> {
        let round = self.open_round_number()?;

        match (verdict, primary) {
            (Verdict::Merged, None) => {
                return Err(LedgerError::MergePrimaryRequired(id.to_string()));
            }
            (Verdict::Merged, Some(p)) => {
                if p == id {
                    return Err(LedgerError::MergeSelf(id.to_string()));
                }
                let target = self
                    .findings_in(round)
                    .find(|f| f.id == p)
                    .ok_or_else(|| LedgerError::MergeTargetMissing(p.to_string()))?;
                if target.verdict == Some(Verdict::Merged) {
                    return Err(LedgerError::MergeIntoMerged(p.to_string()));
                }
                // merging this finding would leave its dependents pointing
                // at a merged primary
                if self
                    .findings_in(round)
                    .any(|f| f.merged_into.as_deref() == Some(id))
                {
                    return Err(LedgerError::MergePrimaryInUse(id.to_string()));
                }
            }
            (_, Some(_)) => {
                return Err(LedgerError::PrimaryNotAllowed(id.to_string()));
            }
            (_, None) => {}
        }

        if !self.findings.iter().any(|f| f.round == round && f.id == id) {
            // distinguish "never filed" from "filed in an already-closed round"
            if let Some(old) = self.latest_finding(id) {
                return Err(LedgerError::RoundClosed(old.round));
            }
            return Err(LedgerError::UnknownFinding(id.to_string()));
        }
        let finding = self
            .findings
            .iter_mut()
            .find(|f| f.round == round && f.id == id)
            .ok_or_else(|| LedgerError::UnknownFinding(id.to_string()))?;

        let was_valid = finding.verdict == Some(Verdict::Valid);
        finding.verdict = Some(verdict);
        finding.merged_into = primary.map(|p| p.to_string());
        let updated = finding.clone();

        if verdict == Verdict::Valid {
            if !self
                .actions
                .iter()
                .any(|a| a.round == round && a.finding_id == id)
            {
                self.actions.push(ActionItem {
                    finding_id: id.to_string(),
                    round,
                    description: format!("Fix: {}", updated.description),
                    done: false,
                    deferred: None,
                });
            }
        } else if was_valid {
            self.actions
                .retain(|a| !(a.round == round && a.finding_id == id && a.is_pending()));
        }

        Ok(updated)
    }

    /// Resolve the action item for a finding, latest pending first.
    ///
    /// Action items stay addressable after their round closes so fixes can
    /// be checked off during the follow-up round.
    pub fn action_mut(&mut self, finding_id: &str) -> Result<&mut ActionItem, LedgerError> {
        let idx = self
            .actions
            .iter()
            .rposition(|a| a.finding_id == finding_id && a.is_pending())
            .or_else(|| {
                self.actions
                    .iter()
                    .rposition(|a| a.finding_id == finding_id)
            })
            .ok_or_else(|| LedgerError::NoAction(finding_id.to_string()))?;
        Ok(&mut self.actions[idx])
    }

    /// Close the open round.
    ///
    /// Blocked while findings are unclassified or a valid finding lacks an
    /// action item. With `strict`, every action item must also be done or
    /// deferred at close time.
    pub fn close_round(&mut self, strict: bool) -> Result<u32, LedgerError> {
        let round = self.open_round_number()?;

        let unclassified: Vec<String> = self
            .findings_in(round)
            .filter(|f| f.verdict.is_none())
            .map(|f| f.id.clone())
            .collect();
        if !unclassified.is_empty() {
            return Err(LedgerError::RoundBlocked(format!(
                "unclassified findings: {}",
                unclassified.join(", ")
            )));
        }

        let missing_action: Vec<String> = self
            .findings_in(round)
            .filter(|f| f.verdict == Some(Verdict::Valid))
            .filter(|f| {
                !self
                    .actions
                    .iter()
                    .any(|a| a.round == round && a.finding_id == f.id)
            })
            .map(|f| f.id.clone())
            .collect();
        if !missing_action.is_empty() {
            return Err(LedgerError::RoundBlocked(format!(
                "valid findings without action items: {}",
                missing_action.join(", ")
            )));
        }

        if strict {
            let pending: Vec<String> = self
                .actions_in(round)
                .filter(|a| a.is_pending())
                .map(|a| a.finding_id.clone())
                .collect();
            if !pending.is_empty() {
                return Err(LedgerError::RoundBlocked(format!(
                    "pending action items (strict_close): {}",
                    pending.join(", ")
                )));
            }
        }

        for r in &mut self.rounds {
            if r.number == round {
                r.status = RoundStatus::Closed;
            }
        }
        Ok(round)
    }

    /// A closed round with zero valid findings ends the review loop.
    pub fn round_is_terminal(&self, number: u32) -> bool {
        match self.round(number) {
            Some(r) if r.status == RoundStatus::Closed => self
                .findings_in(number)
                .all(|f| f.verdict != Some(Verdict::Valid)),
            _ => false,
        }
    }

    pub fn pending_actions(&self) -> impl Iterator<Item = &ActionItem> {
        self.actions.iter().filter(|a| a.is_pending())
    }

    /// Full invariant sweep over the persisted ledger.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        let mut open_rounds = 0;
        let mut prev = 0u32;
        for r in &self.rounds {
            if r.status == RoundStatus::Open {
                open_rounds += 1;
            }
            if r.number <= prev {
                issues.push(format!("round numbers not strictly increasing at {}", r.number));
            }
            prev = r.number;
        }
        if open_rounds > 1 {
            issues.push(format!("{} rounds open at once", open_rounds));
        }
        if let Some(open) = self.open_round() {
            if self.rounds.last().map(|r| r.number) != Some(open.number) {
                issues.push(format!("open round {} is not the latest round", open.number));
            }
        }

        for r in &self.rounds {
            let mut seen = std::collections::HashSet::new();
            for f in self.findings_in(r.number) {
                if !seen.insert(&f.id) {
                    issues.push(format!("duplicate finding id {} in round {}", f.id, r.number));
                }
            }
        }

        for f in &self.findings {
            if self.round(f.round).is_none() {
                issues.push(format!("finding {} references unknown round {}", f.id, f.round));
            }
            match (f.verdict, &f.merged_into) {
                (Some(Verdict::Merged), None) => {
                    issues.push(format!("merged finding {} has no primary reference", f.id));
                }
                (Some(Verdict::Merged), Some(p)) => {
                    match self.findings_in(f.round).find(|x| x.id == *p) {
                        None => issues.push(format!(
                            "merged finding {} references missing primary {}",
                            f.id, p
                        )),
                        Some(t) if t.verdict == Some(Verdict::Merged) => issues.push(format!(
                            "merged finding {} references merged primary {}",
                            f.id, p
                        )),
                        Some(_) => {}
                    }
                }
                (_, Some(_)) => {
                    issues.push(format!("non-merged finding {} carries a primary reference", f.id));
                }
                (_, None) => {}
            }
        }

        for a in &self.actions {
            match self.findings_in(a.round).find(|f| f.id == a.finding_id) {
                None => issues.push(format!(
                    "action item for unknown finding {} in round {}",
                    a.finding_id, a.round
                )),
                Some(f) if f.verdict != Some(Verdict::Valid) => issues.push(format!(
                    "action item for non-valid finding {} in round {}",
                    a.finding_id, a.round
                )),
                Some(_) => {}
            }
        }

        for r in self.rounds.iter().filter(|r| r.status == RoundStatus::Closed) {
            for f in self.findings_in(r.number) {
                if f.verdict.is_none() {
                    issues.push(format!(
                        "closed round {} contains unclassified finding {}",
                        r.number, f.id
                    ));
                }
            }
        }

        issues
    }
}
