//! Switchyard rollout decisions.
//!
//! Both phases of the blue/green protocol live here as pure plan/execute
//! pairs: planning looks only at a snapshot of cluster state and returns a
//! typed action, executing replays that action through a [`ClusterApi`].
//!
//! # Components
//!
//! - **`deploy`**: phase one, bootstrap the pair or retag the staging side
//! - **`swap`**: phase two, exchange the stable entry points' selectors
//!
//! [`ClusterApi`]: switchyard_cluster::ClusterApi

pub mod deploy;
pub mod error;
pub mod swap;

pub use deploy::{plan_deploy, run_deploy, DeployPlan};
pub use error::{RolloutError, RolloutResult};
pub use swap::{plan_swap, run_swap, SelectorPatch, SwapPlan};
