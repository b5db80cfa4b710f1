//! One-shot reload timer armed at every mount.
//!
//! Firing is the only invalidation event: the caller throws the whole
//! snapshot away and mounts again, which arms the next timer.

use std::future::Future;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};

pub const DEFAULT_RELOAD_DELAY: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshController {
    delay: Duration,
}

impl Default for RefreshController {
    fn default() -> Self {
        Self::new(DEFAULT_RELOAD_DELAY)
    }
}

impl RefreshController {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Sleeps once, then runs `reload`.
    pub async fn wait_then<F, Fut>(&self, reload: F) -> Fut::Output
    where
        F: FnOnce() -> Fut,
        Fut: Future,
    {
        sleep(self.delay).await;
        reload().await
    }

    /// Detached form of [`wait_then`](Self::wait_then). Dropping the handle
    /// leaves the timer armed.
    pub fn schedule<F, Fut>(&self, reload: F) -> JoinHandle<Fut::Output>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future + Send + 'static,
        Fut::Output: Send + 'static,
    {
        let delay = self.delay;
        tokio::spawn(async move {
            sleep(delay).await;
            reload().await
        })
    }
}
