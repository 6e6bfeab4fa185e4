//! switchyard.toml configuration parser.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::{EntryPoint, ImageRef, Manifest, Workload, LIVE_PORT, STAGING_PORT};

/// Rollout topology and collaborator configuration.
///
/// Every field has a default matching the original flask-alb topology, so
/// an empty file is a valid configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RolloutConfig {
    pub cluster: ClusterConfig,
    pub registry: RegistryConfig,
    pub workloads: WorkloadsConfig,
    pub entry_points: EntryPointsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Namespace all workloads and entry points live in.
    pub namespace: String,
    /// Orchestrator CLI driven by the exec backend.
    pub command: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Registry URI images are pushed under; the revision id becomes the tag.
    pub uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkloadsConfig {
    /// Name (and `app` label) of the blue workload.
    pub blue: String,
    /// Name (and `app` label) of the green workload.
    pub green: String,
    /// Container whose image is updated on redeploy.
    pub container: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryPointsConfig {
    /// Name of the blue stable entry point.
    pub blue: String,
    /// Name of the green stable entry point.
    pub green: String,
    /// Port the staging side is reachable on.
    pub staging_port: u16,
    /// Port serving live traffic.
    pub live_port: u16,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            namespace: "flask-alb".to_string(),
            command: "kubectl".to_string(),
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            uri: "registry.example.com/flask".to_string(),
        }
    }
}

impl Default for WorkloadsConfig {
    fn default() -> Self {
        Self {
            blue: "blue".to_string(),
            green: "green".to_string(),
            container: "flask".to_string(),
        }
    }
}

impl Default for EntryPointsConfig {
    fn default() -> Self {
        Self {
            blue: "flask-svc-alb-blue".to_string(),
            green: "flask-svc-alb-green".to_string(),
            staging_port: STAGING_PORT,
            live_port: LIVE_PORT,
        }
    }
}

impl Default for RolloutConfig {
    fn default() -> Self {
        Self {
            cluster: ClusterConfig::default(),
            registry: RegistryConfig::default(),
            workloads: WorkloadsConfig::default(),
            entry_points: EntryPointsConfig::default(),
        }
    }
}

impl RolloutConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: RolloutConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Scaffold a switchyard.toml for the given namespace and registry.
    pub fn scaffold(namespace: &str, registry: &str) -> Self {
        RolloutConfig {
            cluster: ClusterConfig {
                namespace: namespace.to_string(),
                ..ClusterConfig::default()
            },
            registry: RegistryConfig {
                uri: registry.to_string(),
            },
            ..RolloutConfig::default()
        }
    }

    /// Declarative initial state applied when the namespace has no
    /// workloads yet: blue fronted by the staging-port entry point,
    /// green by the live-port entry point.
    pub fn bootstrap_manifests(&self, image: &ImageRef) -> Vec<Manifest> {
        let namespace = &self.cluster.namespace;
        let blue = Manifest {
            workload: Workload {
                name: self.workloads.blue.clone(),
                namespace: namespace.clone(),
                label: self.workloads.blue.clone(),
                container: self.workloads.container.clone(),
                image: image.clone(),
            },
            entry_point: EntryPoint {
                name: self.entry_points.blue.clone(),
                namespace: namespace.clone(),
                port: self.entry_points.staging_port,
                selector: self.workloads.blue.clone(),
            },
        };
        let green = Manifest {
            workload: Workload {
                name: self.workloads.green.clone(),
                namespace: namespace.clone(),
                label: self.workloads.green.clone(),
                container: self.workloads.container.clone(),
                image: image.clone(),
            },
            entry_point: EntryPoint {
                name: self.entry_points.green.clone(),
                namespace: namespace.clone(),
                port: self.entry_points.live_port,
                selector: self.workloads.green.clone(),
            },
        };
        vec![blue, green]
    }
}
