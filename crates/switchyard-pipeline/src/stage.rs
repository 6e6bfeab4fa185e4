//! Pipeline stages and run reports.

use std::fmt;

use serde::{Deserialize, Serialize};

use switchyard_core::ImageRef;
use switchyard_rollout::{DeployPlan, SwapPlan};

/// The four stages of a rollout run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    /// Resolve the revision into an image reference.
    Source,
    /// Publish the image, then bootstrap or update the staging workload.
    BuildAndDeploy,
    /// Suspend until an external approve/reject decision.
    ApproveSwap,
    /// Exchange the stable entry points' selectors.
    Swap,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Source => "Source",
            Stage::BuildAndDeploy => "BuildAndDeploy",
            Stage::ApproveSwap => "ApproveSwap",
            Stage::Swap => "Swap",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Terminal status of one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageStatus {
    Succeeded,
    Failed { reason: String },
    /// The approval gate answered reject (or was cancelled).
    Rejected,
    /// Not attempted because an earlier stage ended the run.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageOutcome {
    pub stage: Stage,
    pub status: StageStatus,
}

/// How the run as a whole ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    Completed,
    /// Terminal rejection at the gate. Phase-one side effects remain
    /// committed; nothing is rolled back.
    Rejected,
    Failed { stage: Stage },
}

/// Record of one pipeline run: what each stage did and what was decided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub revision: String,
    pub image: Option<ImageRef>,
    pub stages: Vec<StageOutcome>,
    pub deploy: Option<DeployPlan>,
    pub swap: Option<SwapPlan>,
    pub outcome: RunOutcome,
}

impl RunReport {
    pub fn succeeded(&self) -> bool {
        self.outcome == RunOutcome::Completed
    }

    /// Status of a given stage, if it was recorded.
    pub fn status_of(&self, stage: Stage) -> Option<&StageStatus> {
        self.stages
            .iter()
            .find(|outcome| outcome.stage == stage)
            .map(|outcome| &outcome.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_names_match_pipeline_order() {
        let names: Vec<&str> = [
            Stage::Source,
            Stage::BuildAndDeploy,
            Stage::ApproveSwap,
            Stage::Swap,
        ]
        .iter()
        .map(Stage::name)
        .collect();
        assert_eq!(
            names,
            vec!["Source", "BuildAndDeploy", "ApproveSwap", "Swap"]
        );
    }

    #[test]
    fn report_serializes_roundtrip() {
        let report = RunReport {
            revision: "abc123".to_string(),
            image: Some(ImageRef::new("registry.example.com/flask", "abc123")),
            stages: vec![StageOutcome {
                stage: Stage::Source,
                status: StageStatus::Succeeded,
            }],
            deploy: None,
            swap: None,
            outcome: RunOutcome::Failed {
                stage: Stage::BuildAndDeploy,
            },
        };
        let json = serde_json::to_string(&report).unwrap();
        let back: RunReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
        assert!(!back.succeeded());
    }
}
