//! `switchyard plan`: offline swap planning from a captured listing.
//!
//! Takes a file of wide-format service listing output and shows what the
//! swap would do, using the legacy text extraction rules. Nothing is
//! executed; this is the dry-run and compatibility check for pasted
//! orchestrator output.

use std::path::Path;

use switchyard_cluster::listing;
use switchyard_core::RolloutConfig;
use switchyard_rollout::{SelectorPatch, SwapPlan};

pub fn plan(config_path: &Path, listing_path: &Path, format: &str) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let text = std::fs::read_to_string(listing_path)?;
    let plan = plan_from_listing(&config, &text)?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&plan)?),
        _ => {
            for patch in [&plan.blue, &plan.green] {
                println!("{} {} -> {}", patch.entry_point, patch.from, patch.to);
            }
            if plan.is_noop() {
                println!("(no-op: roles unchanged since last cutover)");
            }
        }
    }
    Ok(())
}

/// Resolve both port labels with the legacy extraction and pair them with
/// the stable entry points' current selectors.
fn plan_from_listing(config: &RolloutConfig, text: &str) -> anyhow::Result<SwapPlan> {
    let staging_label = listing::port_label(text, config.entry_points.staging_port)?;
    let live_label = listing::port_label(text, config.entry_points.live_port)?;

    let entry_points = listing::parse_entry_points(text, &config.cluster.namespace)?;
    let current = |name: &str| -> String {
        entry_points
            .iter()
            .find(|ep| ep.name == name)
            .map(|ep| ep.selector.clone())
            .unwrap_or_default()
    };

    Ok(SwapPlan {
        blue: SelectorPatch {
            entry_point: config.entry_points.blue.clone(),
            from: current(&config.entry_points.blue),
            to: staging_label,
        },
        green: SelectorPatch {
            entry_point: config.entry_points.green.clone(),
            from: current(&config.entry_points.green),
            to: live_label,
        },
    })
}
