//! Shutdown coordination for graceful termination.

use tokio::sync::watch;

/// One-shot shutdown signal shared between components.
///
/// `shutdown` flips the signal exactly once; every `wait` future resolves,
/// including futures created after the signal was raised.
pub struct Shutdown {
    state: watch::Sender<bool>,
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Shutdown {
    /// create a new shutdown signal
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self {
            state: tx,
        }
    }

    /// raise the shutdown signal
    pub fn shutdown(&self) {
        // send_replace stores the value even when no receiver exists yet
        self.state.send_replace(true);
    }

    /// check whether the signal has been raised
    pub fn is_terminated(&self) -> bool {
        *self.state.borrow()
    }

    /// wait until the signal is raised
    pub fn wait(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.state.subscribe();
        async move {
            let _ = rx.wait_for(|stopped| *stopped).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_wait_resolves_after_shutdown() {
        let shutdown = Shutdown::new();
        assert!(!shutdown.is_terminated());

        shutdown.shutdown();
        assert!(shutdown.is_terminated());

        // a waiter created after the signal must still resolve
        shutdown.wait().await;
    }
}
