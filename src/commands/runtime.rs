use crate::cli::{
    ActionCommands, Cli, Commands, FindingCommands, PolicyCommands, RoundCommands, VerdictCommands,
};
use crate::domain::models::{ImportReport, JsonOut, PolicyFile, RoundStatusReport, SkippedRow};
use crate::ledger::{Ledger, LedgerError, RoundStatus, Verdict};
use crate::services::checkup::build_check_report;
use crate::services::markdown::parse_findings_table;
use crate::services::options::{pick_option, remediation_options};
use crate::services::output::{print_flagged, print_one, print_out};
use crate::services::policy::{enforce_add, enforce_round_start, policy_eval_for_finding};
use crate::services::report::{render_round, verdict_label, verdict_summary};
use crate::services::storage::{audit, save_ledger};

pub fn handle_runtime_commands(
    cli: &Cli,
    ledger: &mut Ledger,
    policy: &PolicyFile,
) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Round { command } => match command {
            RoundCommands::Start => {
                enforce_round_start(policy, ledger)?;
                let number = ledger.start_round()?;
                audit(&cli.project, "round_start", serde_json::json!({"round": number}));
                save_ledger(&cli.project, ledger)?;
                print_one(cli.json, number, |n| format!("started round {}", n))?;
            }
            RoundCommands::Close => {
                let number = ledger.close_round(policy.review.strict_close)?;
                let terminal = ledger.round_is_terminal(number);
                audit(
                    &cli.project,
                    "round_close",
                    serde_json::json!({"round": number, "terminal": terminal}),
                );
                save_ledger(&cli.project, ledger)?;
                print_one(
                    cli.json,
                    serde_json::json!({"round": number, "terminal": terminal}),
                    |_| format!("closed round {} (terminal: {})", number, terminal),
                )?;
            }
            RoundCommands::Status { round } => {
                let report = round_status(ledger, *round)?;
                print_one(cli.json, &report, |r| {
                    format!(
                        "round {} [{}]: {} findings, {} open, {} pending actions, terminal={}",
                        r.round, r.status, r.findings, r.unclassified, r.open_actions, r.terminal
                    )
                })?;
            }
            RoundCommands::List => {
                print_out(cli.json, &ledger.rounds, |r| {
                    format!(
                        "{}\t{}",
                        r.number,
                        if r.status == RoundStatus::Open {
                            "open"
                        } else {
                            "closed"
                        }
                    )
                })?;
            }
        },
        Commands::Finding { command } => match command {
            FindingCommands::Add {
                id,
                location,
                description,
            } => {
                enforce_add(policy, ledger, location)?;
                let finding = ledger.add_finding(id, location, description)?;
                audit(
                    &cli.project,
                    "finding_add",
                    serde_json::json!({"id": finding.id, "round": finding.round}),
                );
                save_ledger(&cli.project, ledger)?;
                let note = if finding.seen_before {
                    " (seen in an earlier round; consider already-ok or merged)"
                } else {
                    ""
                };
                let round = finding.round;
                let fid = finding.id.clone();
                print_one(cli.json, finding, |_| {
                    format!("recorded {} in round {}{}", fid, round, note)
                })?;
            }
            FindingCommands::List { round, verdict } => {
                let filter_round = round.or_else(|| ledger.open_round().map(|r| r.number));
                let filter_verdict: Option<Verdict> = verdict.map(Into::into);
                let items: Vec<_> = ledger
                    .findings
                    .iter()
                    .filter(|f| filter_round.map(|n| f.round == n).unwrap_or(true))
                    .filter(|f| {
                        filter_verdict
                            .map(|v| f.verdict == Some(v))
                            .unwrap_or(true)
                    })
                    .cloned()
                    .collect();
                print_out(cli.json, &items, |f| {
                    format!(
                        "{}\t{}\t{}\t{}",
                        f.id,
                        f.round,
                        verdict_label(f.verdict),
                        f.location
                    )
                })?;
            }
            FindingCommands::Show { id } => {
                let finding = ledger
                    .latest_finding(id)
                    .cloned()
                    .ok_or_else(|| LedgerError::UnknownFinding(id.clone()))?;
                print_one(cli.json, finding, |f| {
                    let mut lines = vec![
                        format!("id: {}", f.id),
                        format!("round: {}", f.round),
                        format!("location: {}", f.location),
                        format!("description: {}", f.description),
                        format!("verdict: {}", verdict_label(f.verdict)),
                    ];
                    if let Some(primary) = &f.merged_into {
                        lines.push(format!("merged_into: {}", primary));
                    }
                    if f.seen_before {
                        lines.push("seen_before: true".to_string());
                    }
                    lines.join("\n")
                })?;
            }
        },
        Commands::Verdict { command } => match command {
            VerdictCommands::Set {
                id,
                verdict,
                primary,
            } => {
                let finding = ledger.set_verdict(id, (*verdict).into(), primary.as_deref())?;
                audit(
                    &cli.project,
                    "verdict_set",
                    serde_json::json!({"id": id, "verdict": verdict, "primary": primary}),
                );
                save_ledger(&cli.project, ledger)?;
                print_one(cli.json, finding, |f| match &f.merged_into {
                    Some(p) => format!("{} -> merged into {}", f.id, p),
                    None => format!("{} -> {}", f.id, verdict_label(f.verdict)),
                })?;
            }
            VerdictCommands::Summary { round } => {
                let number = resolve_round(ledger, *round)?;
                let summary = verdict_summary(ledger, number);
                print_one(cli.json, &summary, |s| {
                    format!(
                        "round {}: total={} open={} valid={} false_positive={} scope_creep={} already_ok={} merged={}",
                        s.round,
                        s.total,
                        s.unclassified,
                        s.valid,
                        s.false_positive,
                        s.scope_creep,
                        s.already_ok,
                        s.merged
                    )
                })?;
            }
        },
        Commands::Options { finding } => {
            let f = ledger.finding_in_open_round(finding)?.clone();
            let opts = remediation_options(&f)?;
            print_out(cli.json, &opts, |o| {
                format!("{}\t{}\t{}\t({})", o.option, o.kind, o.summary, o.reason)
            })?;
        }
        Commands::Action { command } => match command {
            ActionCommands::List { all } => {
                let items: Vec<_> = if *all {
                    ledger.actions.clone()
                } else {
                    let round = ledger.open_round_number()?;
                    ledger.actions_in(round).cloned().collect()
                };
                print_out(cli.json, &items, |a| {
                    let state = if a.done {
                        "done"
                    } else if a.deferred.is_some() {
                        "deferred"
                    } else {
                        "pending"
                    };
                    format!("{}\t{}\t{}\t{}", a.finding_id, a.round, state, a.description)
                })?;
            }
            ActionCommands::Choose { finding, option } => {
                let f = ledger.finding_in_open_round(finding)?.clone();
                let opts = remediation_options(&f)?;
                let chosen = pick_option(&opts, *option)?.clone();
                let action = ledger.action_mut(finding)?;
                action.description = chosen.summary.clone();
                if chosen.kind == "defer" {
                    action.deferred = Some("recorded as known limitation".to_string());
                }
                audit(
                    &cli.project,
                    "action_choose",
                    serde_json::json!({"finding": finding, "option": option, "kind": chosen.kind}),
                );
                save_ledger(&cli.project, ledger)?;
                print_one(cli.json, chosen, |o| {
                    format!("adopted option {} ({}) for {}", o.option, o.kind, finding)
                })?;
            }
            ActionCommands::Done { finding } => {
                let action = ledger.action_mut(finding)?;
                action.done = true;
                let view = action.clone();
                audit(&cli.project, "action_done", serde_json::json!({"finding": finding}));
                save_ledger(&cli.project, ledger)?;
                print_one(cli.json, view, |a| format!("checked off {}", a.finding_id))?;
            }
            ActionCommands::Defer { finding, reason } => {
                let action = ledger.action_mut(finding)?;
                action.deferred = Some(reason.clone());
                let view = action.clone();
                audit(
                    &cli.project,
                    "action_defer",
                    serde_json::json!({"finding": finding, "reason": reason}),
                );
                save_ledger(&cli.project, ledger)?;
                print_one(cli.json, view, |a| {
                    format!("deferred {}: {}", a.finding_id, reason)
                })?;
            }
        },
        Commands::Report { round, out } => {
            let number = resolve_round(ledger, *round)?;
            let markdown = render_round(ledger, number)?;
            if let Some(path) = out {
                std::fs::write(path, &markdown)?;
                print_one(
                    cli.json,
                    serde_json::json!({"round": number, "path": path}),
                    |_| format!("wrote round {} report to {}", number, path.display()),
                )?;
            } else if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&JsonOut {
                        ok: true,
                        data: serde_json::json!({"round": number, "markdown": markdown})
                    })?
                );
            } else {
                print!("{}", markdown);
            }
        }
        Commands::Import { file } => {
            let text = std::fs::read_to_string(file)?;
            let mut report = ImportReport {
                added: 0,
                skipped: Vec::new(),
            };
            for row in parse_findings_table(&text) {
                if let Err(e) = enforce_add(policy, ledger, &row.location) {
                    report.skipped.push(SkippedRow {
                        id: row.id,
                        reason: e.to_string(),
                    });
                    continue;
                }
                match ledger.add_finding(&row.id, &row.location, &row.description) {
                    Ok(_) => report.added += 1,
                    Err(e) => report.skipped.push(SkippedRow {
                        id: row.id,
                        reason: e.to_string(),
                    }),
                }
            }
            audit(
                &cli.project,
                "import",
                serde_json::json!({"file": file, "added": report.added, "skipped": report.skipped.len()}),
            );
            save_ledger(&cli.project, ledger)?;
            print_one(cli.json, &report, |r| {
                format!("imported {} findings ({} skipped)", r.added, r.skipped.len())
            })?;
        }
        Commands::Validate => {
            let issues = ledger.validate();
            print_flagged(cli.json, issues.is_empty(), &issues, |issues| {
                if issues.is_empty() {
                    "ledger valid".to_string()
                } else {
                    issues.join("\n")
                }
            })?;
            if !issues.is_empty() {
                std::process::exit(1);
            }
        }
        Commands::Check => {
            let report = build_check_report(ledger);
            print_one(cli.json, &report, |r| format!("review: {}", r.overall))?;
        }
        Commands::Policy { command } => match command {
            PolicyCommands::Eval { finding } => {
                let f = ledger
                    .latest_finding(finding)
                    .cloned()
                    .ok_or_else(|| LedgerError::UnknownFinding(finding.clone()))?;
                let eval = policy_eval_for_finding(policy, ledger, &f);
                print_one(cli.json, eval, |e| {
                    format!(
                        "{}\t{}\n reason: {}",
                        e.finding,
                        if e.allowed { "allowed" } else { "denied" },
                        e.reason
                    )
                })?;
            }
            PolicyCommands::Show => unreachable!("handled before ledger loading"),
        },
        Commands::Init => unreachable!("handled before ledger loading"),
    }

    Ok(())
}

fn resolve_round(ledger: &Ledger, requested: Option<u32>) -> Result<u32, LedgerError> {
    requested
        .or_else(|| ledger.last_round().map(|r| r.number))
        .ok_or(LedgerError::NoOpenRound)
}

fn round_status(
    ledger: &Ledger,
    requested: Option<u32>,
) -> Result<RoundStatusReport, LedgerError> {
    let number = resolve_round(ledger, requested)?;
    let round = ledger
        .round(number)
        .ok_or(LedgerError::UnknownRound(number))?;
    let verdicts = verdict_summary(ledger, number);
    Ok(RoundStatusReport {
        round: number,
        status: if round.status == RoundStatus::Open {
            "open".to_string()
        } else {
            "closed".to_string()
        },
        findings: verdicts.total,
        unclassified: verdicts.unclassified,
        open_actions: ledger.actions_in(number).filter(|a| a.is_pending()).count(),
        terminal: ledger.round_is_terminal(number),
        verdicts,
    })
}
