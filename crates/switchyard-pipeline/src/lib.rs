//! Switchyard pipeline: one rollout from revision to cutover.
//!
//! A run sequences four stages: `Source`, `BuildAndDeploy`, `ApproveSwap`
//! and `Swap`. Execution is strictly sequential, the approval gate is the
//! only suspension point, and any stage error aborts the run with the
//! remaining stages skipped. There is no retry and no rollback.
//!
//! # Components
//!
//! - **`stage`**: stage identifiers, per-stage outcomes, the run report
//! - **`gate`**: the manual approval gate (a oneshot decision channel)
//! - **`publish`**: the image publication boundary
//! - **`runner`**: the `Pipeline` that drives one run end to end

pub mod gate;
pub mod publish;
pub mod runner;
pub mod stage;

pub use gate::{approval_gate, ApprovalGate, ApprovalHandle, Decision};
pub use publish::{CommandPublisher, ImagePublisher, PrepublishedImage, PublishError};
pub use runner::Pipeline;
pub use stage::{RunOutcome, RunReport, Stage, StageOutcome, StageStatus};
