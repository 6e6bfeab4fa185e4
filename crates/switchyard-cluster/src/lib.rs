//! Cluster access for Switchyard: the injected orchestrator capability.
//!
//! The rollout decisions never talk to the orchestrator directly; they go
//! through the [`ClusterApi`] trait so they stay pure and testable.
//!
//! # Components
//!
//! - **`api`**: the `ClusterApi` query/mutate trait and port resolution
//! - **`memory`**: in-memory implementation for tests and dry runs
//! - **`exec`**: subprocess adapter driving a kubectl-style CLI
//! - **`listing`**: legacy tabular listing parser (compatibility path)

pub mod api;
pub mod error;
pub mod exec;
pub mod listing;
pub mod memory;

pub use api::{port_selector, ClusterApi};
pub use error::{ClusterError, ClusterResult};
pub use exec::ExecCluster;
pub use memory::MemoryCluster;
