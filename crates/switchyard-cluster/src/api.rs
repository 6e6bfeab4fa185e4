//! The orchestrator query/mutate capability.

use switchyard_core::{AppLabel, EntryPoint, ImageRef, Manifest, Workload};

use crate::error::{ClusterError, ClusterResult};

/// Query and mutation operations against the orchestrator's resource store.
///
/// The store has last-writer-wins patch semantics; callers rely on that
/// but do not implement it. All mutations are create-or-overwrite.
pub trait ClusterApi {
    /// All workloads in the namespace. Empty if the namespace is untouched.
    fn list_workloads(&self, namespace: &str) -> ClusterResult<Vec<Workload>>;

    /// All entry points in the namespace.
    fn list_entry_points(&self, namespace: &str) -> ClusterResult<Vec<EntryPoint>>;

    /// Apply a declarative manifest, creating or replacing its workload
    /// and entry point.
    fn apply_manifest(&mut self, manifest: &Manifest) -> ClusterResult<()>;

    /// Replace the image of one container of one workload, in place.
    fn set_image(
        &mut self,
        namespace: &str,
        workload: &str,
        container: &str,
        image: &ImageRef,
    ) -> ClusterResult<()>;

    /// Patch an entry point's selector to the given `app` label.
    fn patch_selector(
        &mut self,
        namespace: &str,
        entry_point: &str,
        selector: &str,
    ) -> ClusterResult<()>;
}

/// Identify which workload label currently serves `port`.
///
/// Exactly one entry point must expose the port: zero matches and
/// multiple matches are both errors, so a swap can never be planned from
/// an ambiguous topology.
pub fn port_selector(entry_points: &[EntryPoint], port: u16) -> ClusterResult<AppLabel> {
    let matched: Vec<&EntryPoint> = entry_points.iter().filter(|ep| ep.port == port).collect();
    match matched.as_slice() {
        [] => Err(ClusterError::PortNotFound(port)),
        [ep] => Ok(ep.selector.clone()),
        many => Err(ClusterError::AmbiguousPort {
            port,
            count: many.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_point(name: &str, port: u16, selector: &str) -> EntryPoint {
        EntryPoint {
            name: name.to_string(),
            namespace: "flask-alb".to_string(),
            port,
            selector: selector.to_string(),
        }
    }

    #[test]
    fn resolves_unique_port() {
        let eps = vec![
            entry_point("flask-svc", 80, "green"),
            entry_point("flask-svc8080", 8080, "blue"),
        ];
        assert_eq!(port_selector(&eps, 80).unwrap(), "green");
        assert_eq!(port_selector(&eps, 8080).unwrap(), "blue");
    }

    #[test]
    fn missing_port_is_an_error() {
        let eps = vec![entry_point("flask-svc", 80, "green")];
        assert!(matches!(
            port_selector(&eps, 8080),
            Err(ClusterError::PortNotFound(8080))
        ));
    }

    #[test]
    fn duplicate_port_is_an_error() {
        let eps = vec![
            entry_point("a", 8080, "blue"),
            entry_point("b", 8080, "green"),
        ];
        assert!(matches!(
            port_selector(&eps, 8080),
            Err(ClusterError::AmbiguousPort { port: 8080, count: 2 })
        ));
    }
}
