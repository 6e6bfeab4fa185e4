//! Exec-backed cluster: drives a kubectl-style orchestrator CLI.
//!
//! Queries use the wide tabular output and the legacy parser in
//! [`crate::listing`]; mutations map one-to-one onto `apply`, `set image`
//! and `patch` invocations. Every non-zero exit aborts the calling stage.

use std::io::Write;
use std::process::{Command, Stdio};

use serde_json::json;
use tracing::{debug, info};

use switchyard_core::{EntryPoint, ImageRef, Manifest, Workload};

use crate::api::ClusterApi;
use crate::error::{ClusterError, ClusterResult};
use crate::listing;

/// Cluster backend that shells out to an orchestrator CLI.
pub struct ExecCluster {
    command: String,
}

impl ExecCluster {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    fn run(&self, args: &[&str]) -> ClusterResult<String> {
        debug!(command = %self.command, ?args, "running orchestrator command");
        let output = Command::new(&self.command)
            .args(args)
            .output()
            .map_err(|e| ClusterError::Exec(format!("failed to execute {}: {e}", self.command)))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ClusterError::Exec(format!(
                "{} {} exited with {}: {}",
                self.command,
                args.join(" "),
                output.status,
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn run_with_stdin(&self, args: &[&str], input: &str) -> ClusterResult<String> {
        debug!(command = %self.command, ?args, "running orchestrator command with stdin");
        let mut child = Command::new(&self.command)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ClusterError::Exec(format!("failed to execute {}: {e}", self.command)))?;
        child
            .stdin
            .take()
            .expect("stdin was piped")
            .write_all(input.as_bytes())
            .map_err(|e| ClusterError::Exec(format!("failed to write manifest: {e}")))?;
        let output = child
            .wait_with_output()
            .map_err(|e| ClusterError::Exec(format!("failed to wait for {}: {e}", self.command)))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ClusterError::Exec(format!(
                "{} {} exited with {}: {}",
                self.command,
                args.join(" "),
                output.status,
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl ClusterApi for ExecCluster {
    fn list_workloads(&self, namespace: &str) -> ClusterResult<Vec<Workload>> {
        let out = self.run(&[
            "get",
            "deploy",
            "-n",
            namespace,
            "-o",
            "wide",
            "--no-headers",
        ])?;
        listing::parse_workloads(&out, namespace)
    }

    fn list_entry_points(&self, namespace: &str) -> ClusterResult<Vec<EntryPoint>> {
        let out = self.run(&[
            "get",
            "svc",
            "-n",
            namespace,
            "-o",
            "wide",
            "--no-headers",
        ])?;
        listing::parse_entry_points(&out, namespace)
    }

    fn apply_manifest(&mut self, manifest: &Manifest) -> ClusterResult<()> {
        let payload = manifest_json(manifest).to_string();
        info!(
            workload = %manifest.workload.name,
            entry_point = %manifest.entry_point.name,
            "applying manifest"
        );
        self.run_with_stdin(
            &["apply", "-n", &manifest.workload.namespace, "-f", "-"],
            &payload,
        )?;
        Ok(())
    }

    fn set_image(
        &mut self,
        namespace: &str,
        workload: &str,
        container: &str,
        image: &ImageRef,
    ) -> ClusterResult<()> {
        info!(%workload, %image, "updating image");
        self.run(&[
            "set",
            "image",
            &format!("deployment/{workload}"),
            "-n",
            namespace,
            &format!("{container}={image}"),
        ])?;
        Ok(())
    }

    fn patch_selector(
        &mut self,
        namespace: &str,
        entry_point: &str,
        selector: &str,
    ) -> ClusterResult<()> {
        let patch = json!({ "spec": { "selector": { "app": selector } } });
        info!(%entry_point, %selector, "patching selector");
        self.run(&[
            "patch",
            "svc",
            entry_point,
            "-n",
            namespace,
            "-p",
            &patch.to_string(),
        ])?;
        Ok(())
    }
}

/// Render a manifest as the orchestrator's declarative JSON: a list
/// holding one deployment and one service.
fn manifest_json(manifest: &Manifest) -> serde_json::Value {
    let w = &manifest.workload;
    let ep = &manifest.entry_point;
    json!({
        "apiVersion": "v1",
        "kind": "List",
        "items": [
            {
                "apiVersion": "apps/v1",
                "kind": "Deployment",
                "metadata": {
                    "name": w.name,
                    "namespace": w.namespace,
                    "labels": { "app": w.label }
                },
                "spec": {
                    "replicas": 1,
                    "selector": { "matchLabels": { "app": w.label } },
                    "template": {
                        "metadata": { "labels": { "app": w.label } },
                        "spec": {
                            "containers": [
                                { "name": w.container, "image": w.image.to_string() }
                            ]
                        }
                    }
                }
            },
            {
                "apiVersion": "v1",
                "kind": "Service",
                "metadata": { "name": ep.name, "namespace": ep.namespace },
                "spec": {
                    "type": "NodePort",
                    "ports": [ { "port": ep.port, "protocol": "TCP" } ],
                    "selector": { "app": ep.selector }
                }
            }
        ]
    })
}
