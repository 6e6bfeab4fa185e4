//! Deploy-or-update: phase one of the rollout.
//!
//! On first contact with a namespace both sides of the blue/green pair are
//! created from the bootstrap manifests. Every run after that retags the
//! workload currently behind the staging port, leaving the live side
//! untouched until the swap phase.

use serde::{Deserialize, Serialize};
use tracing::info;

use switchyard_cluster::{port_selector, ClusterApi};
use switchyard_core::{EntryPoint, ImageRef, Manifest, RolloutConfig, Workload};

use crate::error::{RolloutError, RolloutResult};

/// Phase-one action decided from a snapshot of the namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeployPlan {
    /// No workload exists yet: apply both bootstrap manifests.
    Bootstrap { manifests: Vec<Manifest> },
    /// The pair exists: update the staging workload's image in place.
    UpdateImage {
        workload: String,
        container: String,
        image: ImageRef,
    },
}

/// Decide between bootstrapping and an in-place image update.
///
/// The update target is whichever workload is selected by the entry point
/// on the staging port; a snapshot where that cannot be resolved uniquely
/// is a fatal configuration error.
pub fn plan_deploy(
    config: &RolloutConfig,
    workloads: &[Workload],
    entry_points: &[EntryPoint],
    image: &ImageRef,
) -> RolloutResult<DeployPlan> {
    if workloads.is_empty() {
        return Ok(DeployPlan::Bootstrap {
            manifests: config.bootstrap_manifests(image),
        });
    }

    let label = port_selector(entry_points, config.entry_points.staging_port)?;
    let matched: Vec<&Workload> = workloads.iter().filter(|w| w.label == label).collect();
    let target = match matched.as_slice() {
        [] => return Err(RolloutError::WorkloadNotFound(label)),
        [workload] => workload,
        many => {
            return Err(RolloutError::AmbiguousWorkload {
                label,
                count: many.len(),
            })
        }
    };

    Ok(DeployPlan::UpdateImage {
        workload: target.name.clone(),
        container: target.container.clone(),
        image: image.clone(),
    })
}

/// Apply a phase-one plan through the cluster capability.
pub fn execute_deploy<C: ClusterApi>(
    cluster: &mut C,
    namespace: &str,
    plan: &DeployPlan,
) -> RolloutResult<()> {
    match plan {
        DeployPlan::Bootstrap { manifests } => {
            info!(%namespace, count = manifests.len(), "bootstrapping blue/green pair");
            for manifest in manifests {
                cluster.apply_manifest(manifest)?;
            }
        }
        DeployPlan::UpdateImage {
            workload,
            container,
            image,
        } => {
            info!(%namespace, %workload, %image, "updating staging workload image");
            cluster.set_image(namespace, workload, container, image)?;
        }
    }
    Ok(())
}

/// Query the namespace, plan, and execute in one step.
///
/// Returns the executed plan so callers can report what happened.
pub fn run_deploy<C: ClusterApi>(
    cluster: &mut C,
    config: &RolloutConfig,
    image: &ImageRef,
) -> RolloutResult<DeployPlan> {
    let namespace = &config.cluster.namespace;
    let workloads = cluster.list_workloads(namespace)?;
    let entry_points = cluster.list_entry_points(namespace)?;
    let plan = plan_deploy(config, &workloads, &entry_points, image)?;
    execute_deploy(cluster, namespace, &plan)?;
    Ok(plan)
}
