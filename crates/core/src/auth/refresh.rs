//! Background token refresh scheduling
//!
//! A [`RefreshScheduler`] owns at most one timer task. The task sleeps until
//! the session's refresh instant, asks its [`RefreshTarget`] to refresh, and
//! loops with the delay the target reports back. It stops when:
//!
//! - the refresh ceiling is reached,
//! - a refresh fails (failures are published, never retried immediately),
//! - the target has been dropped,
//! - it is cancelled by `cancel()`, a new `schedule()` call, or drop.
//!
//! Progress is published on a `tokio::sync::watch` channel so callers can
//! await the outcome of a scheduled refresh.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use async_trait::async_trait;
use authkit_domain::{AuthKitError, RefreshLimit, Result};
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Minimum delay between two scheduled refreshes.
pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// Something that can refresh its session on demand.
#[async_trait]
pub trait RefreshTarget: Send + Sync + 'static {
    /// Perform one refresh and return the delay until the next one is due.
    async fn refresh_due(&self) -> Result<Duration>;
}

/// Latest state of the refresh loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshStatus {
    /// Nothing has been scheduled yet.
    Idle,
    /// A refresh is armed to run after `delay`.
    Scheduled {
        delay: Duration,
    },
    /// A scheduled refresh succeeded and the next one is armed.
    Refreshed {
        count: u32,
        next_delay: Duration,
    },
    /// A scheduled refresh failed; nothing further is scheduled.
    Failed(AuthKitError),
    /// The refresh ceiling was reached before a due refresh.
    Exhausted {
        count: u32,
    },
    /// The timer was stopped before it fired.
    Cancelled,
}

struct TimerTask {
    cancellation: CancellationToken,
    handle: JoinHandle<()>,
}

impl TimerTask {
    fn stop(self) {
        self.cancellation.cancel();
        self.handle.abort();
    }
}

/// Cancellable one-shot refresh timer with a refresh ceiling.
pub struct RefreshScheduler {
    limit: RefreshLimit,
    completed: Arc<AtomicU32>,
    task: Mutex<Option<TimerTask>>,
    status: Arc<watch::Sender<RefreshStatus>>,
}

impl RefreshScheduler {
    /// Idle scheduler allowing at most `limit` scheduled refreshes.
    #[must_use]
    pub fn new(limit: RefreshLimit) -> Self {
        let (status, _) = watch::channel(RefreshStatus::Idle);
        Self {
            limit,
            completed: Arc::new(AtomicU32::new(0)),
            task: Mutex::new(None),
            status: Arc::new(status),
        }
    }

    /// Arm the timer to refresh `target` after `delay`, replacing any timer
    /// already running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<T: RefreshTarget>(&self, target: Weak<T>, delay: Duration) {
        let cancellation = CancellationToken::new();
        let handle = tokio::spawn(run_timer(
            target,
            delay,
            cancellation.clone(),
            self.limit,
            Arc::clone(&self.completed),
            Arc::clone(&self.status),
        ));

        if let Some(previous) = self.task.lock().replace(TimerTask { cancellation, handle }) {
            previous.stop();
        }

        debug!(delay_ms = delay.as_millis(), "token refresh scheduled");
        self.status.send_replace(RefreshStatus::Scheduled { delay });
    }

    /// Stop the running timer, if any.
    pub fn cancel(&self) {
        if let Some(task) = self.task.lock().take() {
            task.stop();
            debug!("token refresh timer cancelled");
            self.status.send_replace(RefreshStatus::Cancelled);
        }
    }

    /// Forget how many refreshes have run, for a brand new session.
    pub fn reset(&self) {
        self.completed.store(0, Ordering::SeqCst);
    }

    /// Whether a timer task is currently alive.
    #[must_use]
    pub fn is_scheduled(&self) -> bool {
        self.task.lock().as_ref().is_some_and(|task| !task.handle.is_finished())
    }

    /// Number of scheduled refreshes that have succeeded.
    #[must_use]
    pub fn completed(&self) -> u32 {
        self.completed.load(Ordering::SeqCst)
    }

    #[must_use]
    pub const fn limit(&self) -> RefreshLimit {
        self.limit
    }

    #[must_use]
    pub fn status(&self) -> RefreshStatus {
        self.status.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RefreshStatus> {
        self.status.subscribe()
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        if let Some(task) = self.task.get_mut().take() {
            task.stop();
        }
    }
}

impl std::fmt::Debug for RefreshScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshScheduler")
            .field("limit", &self.limit)
            .field("completed", &self.completed())
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}

async fn run_timer<T: RefreshTarget>(
    target: Weak<T>,
    mut delay: Duration,
    cancellation: CancellationToken,
    limit: RefreshLimit,
    completed: Arc<AtomicU32>,
    status: Arc<watch::Sender<RefreshStatus>>,
) {
    loop {
        tokio::select! {
            () = cancellation.cancelled() => return,
            () = tokio::time::sleep(delay) => {}
        }

        let count = completed.load(Ordering::SeqCst);
        if !limit.allows(count) {
            info!(count, limit = %limit, "refresh ceiling reached; stopping refresh timer");
            status.send_replace(RefreshStatus::Exhausted { count });
            return;
        }

        let Some(owner) = target.upgrade() else {
            debug!("refresh owner dropped; stopping refresh timer");
            return;
        };
        let result = owner.refresh_due().await;
        drop(owner);

        match result {
            Ok(next_delay) => {
                if next_delay < MIN_REFRESH_INTERVAL {
                    warn!(
                        next_delay_ms = next_delay.as_millis(),
                        "refreshed token expires within the leeway; spacing out the next refresh"
                    );
                }
                let next_delay = next_delay.max(MIN_REFRESH_INTERVAL);
                let count = completed.fetch_add(1, Ordering::SeqCst) + 1;
                info!(count, next_in_secs = next_delay.as_secs(), "access token refreshed");
                status.send_replace(RefreshStatus::Refreshed { count, next_delay });
                delay = next_delay;
            }
            Err(err) => {
                error!(error = %err, kind = err.kind(), "scheduled token refresh failed");
                status.send_replace(RefreshStatus::Failed(err));
                return;
            }
        }
    }
}
