//! Error types for cluster operations.

use thiserror::Error;

/// Result type alias for cluster operations.
pub type ClusterResult<T> = Result<T, ClusterError>;

/// Errors that can occur while querying or mutating the orchestrator.
#[derive(Debug, Error)]
pub enum ClusterError {
    /// No entry point exposes the requested port.
    #[error("no entry point exposes port {0}")]
    PortNotFound(u16),

    /// More than one entry point exposes the requested port, so the
    /// selector cannot be resolved. Patching with a guessed selector is
    /// never attempted.
    #[error("{count} entry points expose port {port}")]
    AmbiguousPort { port: u16, count: usize },

    #[error("workload not found: {0}")]
    WorkloadNotFound(String),

    #[error("entry point not found: {0}")]
    EntryPointNotFound(String),

    #[error("malformed listing: {0}")]
    Parse(String),

    #[error("orchestrator command failed: {0}")]
    Exec(String),
}
