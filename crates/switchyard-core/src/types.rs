//! Shared types used across Switchyard crates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Value of the `app` label a workload is addressed by.
pub type AppLabel = String;

/// Port served to live traffic by default.
pub const LIVE_PORT: u16 = 80;

/// Port the staging side is reachable on by default.
pub const STAGING_PORT: u16 = 8080;

/// A deployed, running unit addressable by its `app` label.
///
/// Workloads are created once by the bootstrap manifests. After that the
/// only mutation is an in-place image update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workload {
    pub name: String,
    pub namespace: String,
    /// `app` label value this workload is selected by.
    pub label: AppLabel,
    /// Container whose image is replaced on redeploy.
    pub container: String,
    pub image: ImageRef,
}

/// A stable network identity routing traffic to exactly one workload
/// via its `app` label.
///
/// Entry points are created once; the only mutation is a selector patch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPoint {
    pub name: String,
    pub namespace: String,
    /// Port this entry point exposes.
    pub port: u16,
    /// `app` label of the workload currently selected.
    pub selector: AppLabel,
}

/// Image reference: `<registry-uri>:<tag>`.
///
/// The tag is the revision identifier of the triggering commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub registry: String,
    pub tag: String,
}

impl ImageRef {
    pub fn new(registry: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            registry: registry.into(),
            tag: tag.into(),
        }
    }

    /// Image reference for a build of the given source revision.
    pub fn from_revision(registry: &str, revision: &str) -> Self {
        Self::new(registry, revision)
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.registry, self.tag)
    }
}

/// Declarative initial state for one side of the blue/green pair: a
/// workload plus the entry point that fronts it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub workload: Workload,
    pub entry_point: EntryPoint,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_ref_display() {
        let image = ImageRef::from_revision("registry.example.com/flask", "abc123");
        assert_eq!(image.to_string(), "registry.example.com/flask:abc123");
    }

    #[test]
    fn workload_serializes_roundtrip() {
        let workload = Workload {
            name: "blue".to_string(),
            namespace: "flask-alb".to_string(),
            label: "blue".to_string(),
            container: "flask".to_string(),
            image: ImageRef::new("registry.example.com/flask", "v1"),
        };
        let json = serde_json::to_string(&workload).unwrap();
        let back: Workload = serde_json::from_str(&json).unwrap();
        assert_eq!(back, workload);
    }
}
