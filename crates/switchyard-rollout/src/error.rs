//! Error types for rollout planning and execution.

use switchyard_cluster::ClusterError;
use thiserror::Error;

/// Result type alias for rollout operations.
pub type RolloutResult<T> = Result<T, RolloutError>;

/// Errors that can occur while planning or executing a rollout phase.
#[derive(Debug, Error)]
pub enum RolloutError {
    #[error("cluster error: {0}")]
    Cluster(#[from] ClusterError),

    /// The staging entry point selects a label no workload carries.
    #[error("no workload carries label {0}")]
    WorkloadNotFound(String),

    /// The staging entry point's label matches several workloads, so the
    /// update target cannot be decided.
    #[error("{count} workloads carry label {label}")]
    AmbiguousWorkload { label: String, count: usize },

    #[error("stable entry point not found: {0}")]
    EntryPointNotFound(String),
}
