//! Shutdown coordination for the resolver.
//!
//! The resolver stops for one of two reasons: an OS signal, or its input
//! stream running dry. Whichever comes first is recorded and broadcast to the
//! stdin loop and the reload task; later triggers are ignored.

use std::fmt;
use std::sync::{Arc, OnceLock};

use tokio::sync::broadcast;

/// Why the resolver is stopping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// Ctrl-C or SIGTERM.
    Signal,
    /// Stdin reached end of file.
    EndOfInput,
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutdownReason::Signal => f.write_str("termination signal"),
            ShutdownReason::EndOfInput => f.write_str("end of input"),
        }
    }
}

/// Cloneable shutdown handle shared by the stdin loop, the signal handler
/// and the reload task.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<ShutdownReason>,
    reason: Arc<OnceLock<ShutdownReason>>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self {
            tx,
            reason: Arc::new(OnceLock::new()),
        }
    }

    /// Receiver that yields the reason once shutdown starts.
    pub fn subscribe(&self) -> broadcast::Receiver<ShutdownReason> {
        self.tx.subscribe()
    }

    /// Start shutdown for `reason`.
    ///
    /// Returns `false` if shutdown was already under way; the first reason sticks.
    pub fn trigger(&self, reason: ShutdownReason) -> bool {
        if self.reason.set(reason).is_err() {
            tracing::debug!(%reason, "Shutdown already in progress");
            return false;
        }
        tracing::info!(%reason, tasks = self.tx.receiver_count(), "Shutting down");
        let _ = self.tx.send(reason);
        true
    }

    /// Reason recorded by the first trigger, if any.
    pub fn reason(&self) -> Option<ShutdownReason> {
        self.reason.get().copied()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_trigger_reaches_subscribers() {
        let shutdown = Shutdown::new();
        let mut stdin_loop = shutdown.subscribe();
        let mut reload_task = shutdown.clone().subscribe();

        assert!(shutdown.trigger(ShutdownReason::EndOfInput));
        assert_eq!(stdin_loop.recv().await.unwrap(), ShutdownReason::EndOfInput);
        assert_eq!(reload_task.recv().await.unwrap(), ShutdownReason::EndOfInput);
    }

    #[tokio::test]
    async fn test_first_reason_sticks() {
        let shutdown = Shutdown::new();
        let signal_handler = shutdown.clone();
        let mut rx = shutdown.subscribe();
        assert_eq!(shutdown.reason(), None);

        assert!(signal_handler.trigger(ShutdownReason::Signal));
        assert!(!shutdown.trigger(ShutdownReason::EndOfInput));

        assert_eq!(shutdown.reason(), Some(ShutdownReason::Signal));
        assert_eq!(rx.recv().await.unwrap(), ShutdownReason::Signal);
        assert!(rx.try_recv().is_err());
    }
}
