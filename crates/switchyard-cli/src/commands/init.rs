use std::path::Path;

use switchyard_core::RolloutConfig;

pub fn init(path: &Path, namespace: &str, registry: &str) -> anyhow::Result<()> {
    let config = RolloutConfig::scaffold(namespace, registry);
    std::fs::write(path, config.to_toml_string()?)?;
    println!("✓ Generated {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_writes_a_loadable_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("switchyard.toml");

        init(&path, "payments", "registry.internal/payments").unwrap();

        let config = RolloutConfig::from_file(&path).unwrap();
        assert_eq!(config.cluster.namespace, "payments");
        assert_eq!(config.registry.uri, "registry.internal/payments");
    }
}
