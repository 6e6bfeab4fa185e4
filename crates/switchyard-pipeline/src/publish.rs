//! Image publication boundary.
//!
//! The build stage pushes the image under `<registry>:<revision>` before
//! phase one runs. Publication is injected so the pipeline can be tested
//! without a container toolchain, and skipped entirely when an external
//! build system already pushed the tag.

use std::path::PathBuf;
use std::process::Command;

use thiserror::Error;
use tracing::{debug, info};

use switchyard_core::ImageRef;

#[derive(Debug, Error)]
#[error("image publish failed: {0}")]
pub struct PublishError(pub String);

/// Pushes an image to the registry under its revision tag.
pub trait ImagePublisher {
    fn publish(&mut self, image: &ImageRef) -> Result<(), PublishError>;
}

/// Publisher for flows where the triggering build already pushed the tag.
#[derive(Debug, Default)]
pub struct PrepublishedImage;

impl ImagePublisher for PrepublishedImage {
    fn publish(&mut self, image: &ImageRef) -> Result<(), PublishError> {
        info!(%image, "image assumed already published");
        Ok(())
    }
}

/// Builds and pushes the image with a docker-style CLI.
pub struct CommandPublisher {
    command: String,
    /// Build context directory.
    context: PathBuf,
}

impl CommandPublisher {
    pub fn new(command: impl Into<String>, context: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            context: context.into(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<(), PublishError> {
        debug!(command = %self.command, ?args, "running image tool");
        let output = Command::new(&self.command)
            .args(args)
            .output()
            .map_err(|e| PublishError(format!("failed to execute {}: {e}", self.command)))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PublishError(format!(
                "{} {} exited with {}: {}",
                self.command,
                args.join(" "),
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

impl ImagePublisher for CommandPublisher {
    fn publish(&mut self, image: &ImageRef) -> Result<(), PublishError> {
        let tag = image.to_string();
        let context = self.context.display().to_string();
        info!(%image, %context, "building image");
        self.run(&["build", "-t", &tag, &context])?;
        info!(%image, "pushing image");
        self.run(&["push", &tag])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepublished_always_succeeds() {
        let image = ImageRef::new("registry.example.com/flask", "abc123");
        assert!(PrepublishedImage.publish(&image).is_ok());
    }

    #[test]
    fn failing_tool_surfaces_error() {
        let mut publisher = CommandPublisher::new("false", ".");
        let image = ImageRef::new("registry.example.com/flask", "abc123");
        let err = publisher.publish(&image).unwrap_err();
        assert!(err.to_string().contains("image publish failed"));
    }
}
