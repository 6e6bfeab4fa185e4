//! Role swap: phase two of the rollout.
//!
//! The swap exchanges which workload each stable entry point routes to:
//! the blue entry point is pointed at whatever label currently serves the
//! staging port, the green entry point at whatever serves the live port.
//! Both selectors are re-read from the cluster each time, so running the
//! swap twice restores the original routing.

use serde::{Deserialize, Serialize};
use tracing::info;

use switchyard_cluster::{port_selector, ClusterApi};
use switchyard_core::{AppLabel, EntryPoint, RolloutConfig};

use crate::error::{RolloutError, RolloutResult};

/// One selector rewrite on a stable entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorPatch {
    pub entry_point: String,
    pub from: AppLabel,
    pub to: AppLabel,
}

impl SelectorPatch {
    /// True when the patch would not change routing.
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }
}

/// Phase-two action: the pair of selector rewrites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapPlan {
    pub blue: SelectorPatch,
    pub green: SelectorPatch,
}

impl SwapPlan {
    /// True when neither entry point's routing would change.
    pub fn is_noop(&self) -> bool {
        self.blue.is_noop() && self.green.is_noop()
    }
}

/// Compute the selector exchange from a snapshot of the entry points.
///
/// Fails if either port resolves to zero or several entry points, or if a
/// stable entry point is missing; no partial plan is ever produced.
pub fn plan_swap(config: &RolloutConfig, entry_points: &[EntryPoint]) -> RolloutResult<SwapPlan> {
    let staging_label = port_selector(entry_points, config.entry_points.staging_port)?;
    let live_label = port_selector(entry_points, config.entry_points.live_port)?;

    let current = |name: &str| -> RolloutResult<AppLabel> {
        entry_points
            .iter()
            .find(|ep| ep.name == name)
            .map(|ep| ep.selector.clone())
            .ok_or_else(|| RolloutError::EntryPointNotFound(name.to_string()))
    };

    Ok(SwapPlan {
        blue: SelectorPatch {
            entry_point: config.entry_points.blue.clone(),
            from: current(&config.entry_points.blue)?,
            to: staging_label,
        },
        green: SelectorPatch {
            entry_point: config.entry_points.green.clone(),
            from: current(&config.entry_points.green)?,
            to: live_label,
        },
    })
}

/// Apply a swap plan through the cluster capability.
///
/// No-op patches are still written; the store's last-writer-wins semantics
/// make them harmless.
pub fn execute_swap<C: ClusterApi>(
    cluster: &mut C,
    namespace: &str,
    plan: &SwapPlan,
) -> RolloutResult<()> {
    if plan.is_noop() {
        info!(%namespace, "swap is a no-op, roles unchanged since last cutover");
    }
    for patch in [&plan.blue, &plan.green] {
        info!(
            entry_point = %patch.entry_point,
            from = %patch.from,
            to = %patch.to,
            "patching stable entry point"
        );
        cluster.patch_selector(namespace, &patch.entry_point, &patch.to)?;
    }
    Ok(())
}

/// Query the namespace, plan, and execute the swap in one step.
pub fn run_swap<C: ClusterApi>(
    cluster: &mut C,
    config: &RolloutConfig,
) -> RolloutResult<SwapPlan> {
    let namespace = &config.cluster.namespace;
    let entry_points = cluster.list_entry_points(namespace)?;
    let plan = plan_swap(config, &entry_points)?;
    execute_swap(cluster, namespace, &plan)?;
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use switchyard_cluster::{ClusterError, MemoryCluster};

    fn entry_point(name: &str, port: u16, selector: &str) -> EntryPoint {
        EntryPoint {
            name: name.to_string(),
            namespace: "flask-alb".to_string(),
            port,
            selector: selector.to_string(),
        }
    }

    /// Wiring where the stable entry points themselves carry the ports,
    /// blue on live and green on staging.
    fn crossed_cluster() -> MemoryCluster {
        let mut cluster = MemoryCluster::new();
        cluster.insert_entry_point(entry_point("flask-svc-alb-blue", 80, "blue"));
        cluster.insert_entry_point(entry_point("flask-svc-alb-green", 8080, "green"));
        cluster
    }

    #[test]
    fn swap_exchanges_selectors() {
        let config = RolloutConfig::default();
        let mut cluster = crossed_cluster();

        let plan = run_swap(&mut cluster, &config).unwrap();
        assert_eq!(plan.blue.to, "green");
        assert_eq!(plan.green.to, "blue");

        let eps = cluster.list_entry_points("flask-alb").unwrap();
        let blue = eps.iter().find(|ep| ep.name == "flask-svc-alb-blue").unwrap();
        let green = eps.iter().find(|ep| ep.name == "flask-svc-alb-green").unwrap();
        assert_eq!(blue.selector, "green");
        assert_eq!(green.selector, "blue");
    }

    #[test]
    fn swap_twice_restores_original_selectors() {
        let config = RolloutConfig::default();
        let mut cluster = crossed_cluster();
        let original = cluster.list_entry_points("flask-alb").unwrap();

        run_swap(&mut cluster, &config).unwrap();
        let swapped = cluster.list_entry_points("flask-alb").unwrap();
        assert_ne!(swapped, original);

        run_swap(&mut cluster, &config).unwrap();
        let restored = cluster.list_entry_points("flask-alb").unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn bootstrap_wiring_swaps_to_itself() {
        // Straight out of bootstrap the staging port already routes to the
        // label the blue entry point selects, so the swap changes nothing.
        let config = RolloutConfig::default();
        let mut cluster = MemoryCluster::new();
        cluster.insert_entry_point(entry_point("flask-svc-alb-blue", 8080, "blue"));
        cluster.insert_entry_point(entry_point("flask-svc-alb-green", 80, "green"));

        let plan = run_swap(&mut cluster, &config).unwrap();
        assert!(plan.is_noop());
        assert_eq!(plan.blue.to, "blue");

        let eps = cluster.list_entry_points("flask-alb").unwrap();
        let blue = eps.iter().find(|ep| ep.name == "flask-svc-alb-blue").unwrap();
        assert_eq!(blue.selector, "blue");
    }

    #[test]
    fn ambiguous_port_plans_nothing_and_mutates_nothing() {
        let config = RolloutConfig::default();
        let mut cluster = crossed_cluster();
        cluster.insert_entry_point(entry_point("rogue", 8080, "purple"));
        let before = cluster.list_entry_points("flask-alb").unwrap();

        let err = run_swap(&mut cluster, &config).unwrap_err();
        assert!(matches!(
            err,
            RolloutError::Cluster(ClusterError::AmbiguousPort { port: 8080, count: 2 })
        ));
        assert_eq!(cluster.list_entry_points("flask-alb").unwrap(), before);
    }

    #[test]
    fn missing_port_plans_nothing() {
        let config = RolloutConfig::default();
        let eps = vec![entry_point("flask-svc-alb-blue", 80, "blue")];
        let err = plan_swap(&config, &eps).unwrap_err();
        assert!(matches!(
            err,
            RolloutError::Cluster(ClusterError::PortNotFound(8080))
        ));
    }

    #[test]
    fn missing_stable_entry_point_is_fatal() {
        let config = RolloutConfig::default();
        // Ports resolve, but the patch targets are named differently.
        let eps = vec![
            entry_point("svc-live", 80, "blue"),
            entry_point("svc-staging", 8080, "green"),
        ];
        let err = plan_swap(&config, &eps).unwrap_err();
        assert!(matches!(err, RolloutError::EntryPointNotFound(_)));
    }

    #[test]
    fn port_resolution_ignores_entry_point_names() {
        // The queried ports may belong to entry points other than the two
        // being patched, as in the original listing scan.
        let config = RolloutConfig::default();
        let mut cluster = MemoryCluster::new();
        cluster.insert_entry_point(entry_point("flask-svc", 80, "green"));
        cluster.insert_entry_point(entry_point("flask-svc8080", 8080, "blue"));
        cluster.insert_entry_point(EntryPoint {
            name: "flask-svc-alb-blue".to_string(),
            namespace: "flask-alb".to_string(),
            port: 5000,
            selector: "green".to_string(),
        });
        cluster.insert_entry_point(EntryPoint {
            name: "flask-svc-alb-green".to_string(),
            namespace: "flask-alb".to_string(),
            port: 5001,
            selector: "blue".to_string(),
        });

        let plan = run_swap(&mut cluster, &config).unwrap();
        assert_eq!(plan.blue.to, "blue");
        assert_eq!(plan.green.to, "green");

        let eps = cluster.list_entry_points("flask-alb").unwrap();
        let blue = eps.iter().find(|ep| ep.name == "flask-svc-alb-blue").unwrap();
        let green = eps.iter().find(|ep| ep.name == "flask-svc-alb-green").unwrap();
        assert_eq!(blue.selector, "blue");
        assert_eq!(green.selector, "green");
    }
}
