//! `switchyard run`: one full pipeline run against the exec backend.

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::bail;

use switchyard_cluster::ExecCluster;
use switchyard_pipeline::{
    ApprovalGate, CommandPublisher, Decision, ImagePublisher, Pipeline, PrepublishedImage,
    RunOutcome, RunReport, StageStatus,
};

pub async fn run(
    config_path: &Path,
    revision: &str,
    yes: bool,
    build_with: Option<&str>,
    context: &Path,
    format: &str,
) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let mut cluster = ExecCluster::new(config.cluster.command.clone());

    let gate = if yes {
        ApprovalGate::pre_approved()
    } else {
        prompt_gate()
    };

    let report = match build_with {
        Some(tool) => {
            let mut publisher = CommandPublisher::new(tool, context);
            run_with(&config, &mut cluster, &mut publisher, revision, gate).await
        }
        None => {
            let mut publisher = PrepublishedImage;
            run_with(&config, &mut cluster, &mut publisher, revision, gate).await
        }
    };

    print_report(&report, format)?;

    match &report.outcome {
        RunOutcome::Completed | RunOutcome::Rejected => Ok(()),
        RunOutcome::Failed { stage } => bail!("pipeline failed at stage {stage}"),
    }
}

async fn run_with<P: ImagePublisher>(
    config: &switchyard_core::RolloutConfig,
    cluster: &mut ExecCluster,
    publisher: &mut P,
    revision: &str,
    gate: ApprovalGate,
) -> RunReport {
    Pipeline::new(config, cluster, publisher)
        .run(revision, gate)
        .await
}

/// Gate answered from the terminal. The prompt only appears once the run
/// actually reaches the approval stage.
fn prompt_gate() -> ApprovalGate {
    ApprovalGate::deferred(|| {
        eprint!("Swap the blue/green entry points? [y/N] ");
        let _ = io::stderr().flush();
        let mut line = String::new();
        let answered = io::stdin().lock().read_line(&mut line).is_ok();
        if answered && matches!(line.trim(), "y" | "Y" | "yes") {
            Decision::Approved
        } else {
            Decision::Rejected
        }
    })
}

fn print_report(report: &RunReport, format: &str) -> anyhow::Result<()> {
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(report)?),
        _ => {
            for outcome in &report.stages {
                let status = match &outcome.status {
                    StageStatus::Succeeded => "✓".to_string(),
                    StageStatus::Failed { reason } => format!("✗ {reason}"),
                    StageStatus::Rejected => "✗ rejected".to_string(),
                    StageStatus::Skipped => "- skipped".to_string(),
                };
                println!("{:>16}  {status}", outcome.stage.name());
            }
            if let Some(swap) = &report.swap {
                for patch in [&swap.blue, &swap.green] {
                    println!(
                        "{:>16}  {} {} -> {}",
                        "", patch.entry_point, patch.from, patch.to
                    );
                }
            }
        }
    }
    Ok(())
}
