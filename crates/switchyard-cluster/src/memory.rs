//! In-memory cluster backend for tests and dry runs.

use std::collections::HashMap;

use tracing::debug;

use switchyard_core::{EntryPoint, ImageRef, Manifest, Workload};

use crate::api::ClusterApi;
use crate::error::{ClusterError, ClusterResult};

/// An orchestrator resource store held entirely in memory.
///
/// Mirrors the real store's semantics: namespaces spring into existence on
/// first apply, mutations are last-writer-wins, queries against untouched
/// namespaces return empty sets.
#[derive(Debug, Default)]
pub struct MemoryCluster {
    namespaces: HashMap<String, NamespaceState>,
}

#[derive(Debug, Default)]
struct NamespaceState {
    workloads: Vec<Workload>,
    entry_points: Vec<EntryPoint>,
}

impl MemoryCluster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a workload directly, bypassing manifest application.
    pub fn insert_workload(&mut self, workload: Workload) {
        let ns = self.namespaces.entry(workload.namespace.clone()).or_default();
        ns.workloads.retain(|w| w.name != workload.name);
        ns.workloads.push(workload);
    }

    /// Seed an entry point directly, bypassing manifest application.
    pub fn insert_entry_point(&mut self, entry_point: EntryPoint) {
        let ns = self
            .namespaces
            .entry(entry_point.namespace.clone())
            .or_default();
        ns.entry_points.retain(|ep| ep.name != entry_point.name);
        ns.entry_points.push(entry_point);
    }
}

impl ClusterApi for MemoryCluster {
    fn list_workloads(&self, namespace: &str) -> ClusterResult<Vec<Workload>> {
        Ok(self
            .namespaces
            .get(namespace)
            .map(|ns| ns.workloads.clone())
            .unwrap_or_default())
    }

    fn list_entry_points(&self, namespace: &str) -> ClusterResult<Vec<EntryPoint>> {
        Ok(self
            .namespaces
            .get(namespace)
            .map(|ns| ns.entry_points.clone())
            .unwrap_or_default())
    }

    fn apply_manifest(&mut self, manifest: &Manifest) -> ClusterResult<()> {
        debug!(
            workload = %manifest.workload.name,
            entry_point = %manifest.entry_point.name,
            "applying manifest"
        );
        self.insert_workload(manifest.workload.clone());
        self.insert_entry_point(manifest.entry_point.clone());
        Ok(())
    }

    fn set_image(
        &mut self,
        namespace: &str,
        workload: &str,
        container: &str,
        image: &ImageRef,
    ) -> ClusterResult<()> {
        let ns = self
            .namespaces
            .get_mut(namespace)
            .ok_or_else(|| ClusterError::WorkloadNotFound(workload.to_string()))?;
        let target = ns
            .workloads
            .iter_mut()
            .find(|w| w.name == workload && w.container == container)
            .ok_or_else(|| ClusterError::WorkloadNotFound(workload.to_string()))?;
        debug!(%workload, %image, "image updated");
        target.image = image.clone();
        Ok(())
    }

    fn patch_selector(
        &mut self,
        namespace: &str,
        entry_point: &str,
        selector: &str,
    ) -> ClusterResult<()> {
        let ns = self
            .namespaces
            .get_mut(namespace)
            .ok_or_else(|| ClusterError::EntryPointNotFound(entry_point.to_string()))?;
        let target = ns
            .entry_points
            .iter_mut()
            .find(|ep| ep.name == entry_point)
            .ok_or_else(|| ClusterError::EntryPointNotFound(entry_point.to_string()))?;
        debug!(%entry_point, %selector, "selector patched");
        target.selector = selector.to_string();
        Ok(())
    }
}
