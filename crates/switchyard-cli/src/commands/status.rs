use std::path::Path;

use serde_json::json;

use switchyard_cluster::{ClusterApi, ExecCluster};

pub fn status(config_path: &Path, format: &str) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let cluster = ExecCluster::new(config.cluster.command.clone());
    let namespace = &config.cluster.namespace;

    let workloads = cluster.list_workloads(namespace)?;
    let entry_points = cluster.list_entry_points(namespace)?;

    match format {
        "json" => {
            let value = json!({
                "namespace": namespace,
                "workloads": workloads,
                "entry_points": entry_points,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        _ => {
            println!("namespace: {namespace}");
            println!("workloads:");
            for w in &workloads {
                println!("  {:<12} app={:<8} {}", w.name, w.label, w.image);
            }
            println!("entry points:");
            for ep in &entry_points {
                println!("  {:<24} port={:<5} app={}", ep.name, ep.port, ep.selector);
            }
        }
    }
    Ok(())
}
