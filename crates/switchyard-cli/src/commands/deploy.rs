use std::path::Path;

use switchyard_cluster::ExecCluster;
use switchyard_core::ImageRef;
use switchyard_rollout::{run_deploy, DeployPlan};

pub fn deploy(config_path: &Path, revision: &str) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let image = ImageRef::from_revision(&config.registry.uri, revision.trim());
    let mut cluster = ExecCluster::new(config.cluster.command.clone());

    match run_deploy(&mut cluster, &config, &image)? {
        DeployPlan::Bootstrap { manifests } => {
            println!(
                "✓ Bootstrapped {} workloads in {}",
                manifests.len(),
                config.cluster.namespace
            );
        }
        DeployPlan::UpdateImage { workload, .. } => {
            println!("✓ Updated {workload} to {image}");
        }
    }
    Ok(())
}
