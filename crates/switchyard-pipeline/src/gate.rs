//! Manual approval gate between deploy and swap.
//!
//! The runner awaits the gate with no timeout; whoever holds the
//! [`ApprovalHandle`] (or the deferred closure) decides when, and whether,
//! the run proceeds.

use tokio::sync::oneshot;
use tracing::warn;

/// The external decision the gate waits for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approved,
    Rejected,
}

/// Sending side: held by whoever answers the approval request.
pub struct ApprovalHandle {
    tx: oneshot::Sender<Decision>,
}

/// Receiving side: awaited by the pipeline runner at the gate stage.
pub struct ApprovalGate(Inner);

enum Inner {
    /// Already decided, for unattended runs.
    Decided(Decision),
    /// Waits on a oneshot decision channel.
    Channel(oneshot::Receiver<Decision>),
    /// Asks a blocking closure, invoked only once the run reaches the
    /// gate. Used for terminal prompts.
    Deferred(Box<dyn FnOnce() -> Decision + Send + 'static>),
}

/// Create a connected handle/gate pair.
pub fn approval_gate() -> (ApprovalHandle, ApprovalGate) {
    let (tx, rx) = oneshot::channel();
    (ApprovalHandle { tx }, ApprovalGate(Inner::Channel(rx)))
}

impl ApprovalHandle {
    pub fn approve(self) {
        let _ = self.tx.send(Decision::Approved);
    }

    pub fn reject(self) {
        let _ = self.tx.send(Decision::Rejected);
    }
}

impl ApprovalGate {
    /// A gate that is already approved, for unattended runs.
    pub fn pre_approved() -> Self {
        ApprovalGate(Inner::Decided(Decision::Approved))
    }

    /// A gate answered by a blocking closure when the run reaches it.
    pub fn deferred(decide: impl FnOnce() -> Decision + Send + 'static) -> Self {
        ApprovalGate(Inner::Deferred(Box::new(decide)))
    }

    /// Suspend until the decision arrives.
    ///
    /// A dropped handle or a panicked closure counts as a rejection:
    /// cancelling the run at the gate aborts it exactly like an explicit
    /// reject.
    pub async fn wait(self) -> Decision {
        match self.0 {
            Inner::Decided(decision) => decision,
            Inner::Channel(rx) => match rx.await {
                Ok(decision) => decision,
                Err(_) => {
                    warn!("approval handle dropped, treating as rejection");
                    Decision::Rejected
                }
            },
            Inner::Deferred(decide) => match tokio::task::spawn_blocking(decide).await {
                Ok(decision) => decision,
                Err(_) => {
                    warn!("approval task failed, treating as rejection");
                    Decision::Rejected
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn approve_releases_the_gate() {
        let (handle, gate) = approval_gate();
        handle.approve();
        assert_eq!(gate.wait().await, Decision::Approved);
    }

    #[tokio::test]
    async fn reject_releases_the_gate() {
        let (handle, gate) = approval_gate();
        handle.reject();
        assert_eq!(gate.wait().await, Decision::Rejected);
    }

    #[tokio::test]
    async fn dropped_handle_rejects() {
        let (handle, gate) = approval_gate();
        drop(handle);
        assert_eq!(gate.wait().await, Decision::Rejected);
    }

    #[tokio::test]
    async fn pre_approved_gate_never_blocks() {
        assert_eq!(ApprovalGate::pre_approved().wait().await, Decision::Approved);
    }

    #[tokio::test]
    async fn deferred_gate_runs_the_closure_at_wait_time() {
        let gate = ApprovalGate::deferred(|| Decision::Approved);
        assert_eq!(gate.wait().await, Decision::Approved);
    }
}
