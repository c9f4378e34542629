//! Cancellable delayed tasks
//!
//! Simulated device work (a QR scan, a photo capture) takes a fixed delay and
//! then applies an effect. A [`DelayedTask`] applies its effect only if the
//! delay elapses before its [`CancellationToken`] fires; a cancelled task
//! never runs the effect.

use std::time::Duration;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Why a task produced no result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TaskError {
    #[error("Task was cancelled before it completed")]
    Cancelled,
}

/// A one-shot effect applied after a delay
#[derive(Debug, Clone)]
pub struct DelayedTask {
    delay: Duration,
    cancel: CancellationToken,
}

impl DelayedTask {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            cancel: CancellationToken::new(),
        }
    }

    /// Tie this task to an existing token (e.g., a parent screen's)
    pub fn with_token(delay: Duration, cancel: CancellationToken) -> Self {
        Self { delay, cancel }
    }

    /// Handle that cancels this task when triggered
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Wait out the delay, then apply `effect`
    pub async fn run<T, F>(&self, effect: F) -> Result<T, TaskError>
    where
        F: FnOnce() -> T,
    {
        if self.cancel.is_cancelled() {
            return Err(TaskError::Cancelled);
        }

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                debug!(delay = ?self.delay, "task cancelled");
                Err(TaskError::Cancelled)
            }
            _ = tokio::time::sleep(self.delay) => {
                debug!(delay = ?self.delay, "task completed");
                Ok(effect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap()
    }

    #[test]
    fn test_effect_applied_after_delay() {
        let task = DelayedTask::new(Duration::from_millis(5));
        let result = runtime().block_on(task.run(|| 42));
        assert_eq!(result, Ok(42));
    }

    #[test]
    fn test_cancel_before_start_skips_effect() {
        let applied = AtomicBool::new(false);
        let task = DelayedTask::new(Duration::from_millis(5));
        task.cancel();

        let result = runtime().block_on(task.run(|| applied.store(true, Ordering::SeqCst)));
        assert_eq!(result, Err(TaskError::Cancelled));
        assert!(!applied.load(Ordering::SeqCst));
    }

    #[test]
    fn test_cancel_during_delay_skips_effect() {
        let applied = Arc::new(AtomicBool::new(false));
        let task = DelayedTask::new(Duration::from_secs(30));
        let token = task.cancel_token();

        let result = runtime().block_on(async {
            let flag = Arc::clone(&applied);
            let run = task.run(move || flag.store(true, Ordering::SeqCst));
            let cancel = async {
                tokio::time::sleep(Duration::from_millis(5)).await;
                token.cancel();
            };
            let (result, ()) = tokio::join!(run, cancel);
            result
        });

        assert_eq!(result, Err(TaskError::Cancelled));
        assert!(!applied.load(Ordering::SeqCst));
        assert!(task.is_cancelled());
    }

    #[test]
    fn test_independent_tasks_do_not_share_cancellation() {
        let a = DelayedTask::new(Duration::from_millis(5));
        let b = DelayedTask::new(Duration::from_millis(5));
        a.cancel();

        let rt = runtime();
        assert_eq!(rt.block_on(a.run(|| "a")), Err(TaskError::Cancelled));
        assert_eq!(rt.block_on(b.run(|| "b")), Ok("b"));
    }

    #[test]
    fn test_child_token_follows_parent() {
        let parent = CancellationToken::new();
        let task = DelayedTask::with_token(Duration::from_millis(5), parent.child_token());
        parent.cancel();
        assert!(task.is_cancelled());
    }
}
