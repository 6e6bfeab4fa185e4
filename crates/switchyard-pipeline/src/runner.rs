//! Drives one rollout run through its stages.

use tracing::{error, info};

use switchyard_cluster::ClusterApi;
use switchyard_core::{ImageRef, RolloutConfig};
use switchyard_rollout::{run_deploy, run_swap};

use crate::gate::{ApprovalGate, Decision};
use crate::publish::ImagePublisher;
use crate::stage::{RunOutcome, RunReport, Stage, StageOutcome, StageStatus};

const ORDER: [Stage; 4] = [
    Stage::Source,
    Stage::BuildAndDeploy,
    Stage::ApproveSwap,
    Stage::Swap,
];

/// One rollout run over an injected cluster and publisher.
pub struct Pipeline<'a, C, P> {
    config: &'a RolloutConfig,
    cluster: &'a mut C,
    publisher: &'a mut P,
}

impl<'a, C: ClusterApi, P: ImagePublisher> Pipeline<'a, C, P> {
    pub fn new(config: &'a RolloutConfig, cluster: &'a mut C, publisher: &'a mut P) -> Self {
        Self {
            config,
            cluster,
            publisher,
        }
    }

    /// Run the four stages for `revision`, suspending at the gate.
    ///
    /// The report always covers all four stages: stages after the first
    /// failure are recorded as skipped, and a rejection at the gate ends
    /// the run with phase-one side effects left committed.
    pub async fn run(self, revision: &str, gate: ApprovalGate) -> RunReport {
        let Pipeline {
            config,
            cluster,
            publisher,
        } = self;
        let mut report = RunReport {
            revision: revision.trim().to_string(),
            image: None,
            stages: Vec::new(),
            deploy: None,
            swap: None,
            outcome: RunOutcome::Completed,
        };

        // Source: the revision id becomes the image tag.
        if report.revision.is_empty() {
            return fail(report, Stage::Source, "empty revision identifier".to_string());
        }
        let image = ImageRef::from_revision(&config.registry.uri, &report.revision);
        info!(stage = %Stage::Source, revision = %report.revision, %image, "revision resolved");
        report.image = Some(image.clone());
        succeed(&mut report, Stage::Source);

        // BuildAndDeploy: publish the tag, then bootstrap or retag staging.
        if let Err(e) = publisher.publish(&image) {
            return fail(report, Stage::BuildAndDeploy, e.to_string());
        }
        match run_deploy(cluster, config, &image) {
            Ok(plan) => {
                report.deploy = Some(plan);
                succeed(&mut report, Stage::BuildAndDeploy);
            }
            Err(e) => return fail(report, Stage::BuildAndDeploy, e.to_string()),
        }

        // ApproveSwap: suspend until the external decision arrives.
        info!(stage = %Stage::ApproveSwap, "waiting for approval");
        match gate.wait().await {
            Decision::Approved => succeed(&mut report, Stage::ApproveSwap),
            Decision::Rejected => {
                info!(stage = %Stage::ApproveSwap, "rejected, deploy stays committed");
                report.stages.push(StageOutcome {
                    stage: Stage::ApproveSwap,
                    status: StageStatus::Rejected,
                });
                skip_after(&mut report, Stage::ApproveSwap);
                report.outcome = RunOutcome::Rejected;
                return report;
            }
        }

        // Swap: exchange the stable entry points' selectors.
        match run_swap(cluster, config) {
            Ok(plan) => {
                report.swap = Some(plan);
                succeed(&mut report, Stage::Swap);
            }
            Err(e) => return fail(report, Stage::Swap, e.to_string()),
        }

        info!(revision = %report.revision, "rollout completed");
        report
    }
}

fn succeed(report: &mut RunReport, stage: Stage) {
    report.stages.push(StageOutcome {
        stage,
        status: StageStatus::Succeeded,
    });
}

fn fail(mut report: RunReport, stage: Stage, reason: String) -> RunReport {
    error!(%stage, %reason, "stage failed, aborting run");
    report.stages.push(StageOutcome {
        stage,
        status: StageStatus::Failed { reason },
    });
    skip_after(&mut report, stage);
    report.outcome = RunOutcome::Failed { stage };
    report
}

/// Record every stage after `stage` as skipped.
fn skip_after(report: &mut RunReport, stage: Stage) {
    for skipped in ORDER.iter().skip_while(|s| **s != stage).skip(1) {
        report.stages.push(StageOutcome {
            stage: *skipped,
            status: StageStatus::Skipped,
        });
    }
}
