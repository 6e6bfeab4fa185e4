use std::path::Path;

use switchyard_cluster::ExecCluster;
use switchyard_rollout::run_swap;

pub fn swap(config_path: &Path) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let mut cluster = ExecCluster::new(config.cluster.command.clone());

    let plan = run_swap(&mut cluster, &config)?;
    for patch in [&plan.blue, &plan.green] {
        println!("✓ {} {} -> {}", patch.entry_point, patch.from, patch.to);
    }
    if plan.is_noop() {
        println!("  (no-op: roles unchanged since last cutover)");
    }
    Ok(())
}
