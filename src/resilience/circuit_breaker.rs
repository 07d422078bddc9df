//! Circuit breaker guarding calls to an unreliable remote operation.
//!
//! # States
//! - Closed: normal operation, work is attempted
//! - Open: remote assumed down, calls fail fast without running work
//!
//! # State Transitions
//! ```text
//! Closed → Open: consecutive failures >= max failure count (inside send)
//! Open → Closed: reset timer fires after the reset timeout
//! ```
//!
//! # Design Decisions
//! - One mutex owns state, failure count and settings together
//! - The lock is held while work runs, so calls through one breaker are serialized
//! - The reset timer sleeps outside the lock and only locks to close the circuit
//! - Each reset timer owns a named OS thread, independent of any caller runtime
//! - Closing the circuit leaves the failure count untouched
//! - A poisoned lock (work panicked) is recovered, never propagated

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::config::BreakerConfig;

/// Consecutive failures that open the circuit when no threshold is set.
pub const DEFAULT_MAX_FAILURE_COUNT: u32 = 3;

/// Seconds the circuit stays open when no reset timeout is set.
pub const DEFAULT_RESET_TIMEOUT_SECS: u64 = 5;

/// Resolve a configured threshold, where 0 means "use the default".
pub fn effective_max_failure_count(configured: u32) -> u32 {
    if configured > 0 {
        configured
    } else {
        DEFAULT_MAX_FAILURE_COUNT
    }
}

/// Resolve a configured reset timeout in seconds, where 0 means "use the default".
pub fn effective_reset_timeout(configured_secs: u64) -> Duration {
    if configured_secs > 0 {
        Duration::from_secs(configured_secs)
    } else {
        Duration::from_secs(DEFAULT_RESET_TIMEOUT_SECS)
    }
}

/// Breaker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakerState {
    /// Calls are attempted.
    #[default]
    Closed,
    /// Calls are rejected outright.
    Open,
}

impl fmt::Display for BreakerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BreakerState::Closed => write!(f, "closed"),
            BreakerState::Open => write!(f, "open"),
        }
    }
}

/// A unit of protected work.
///
/// `send` performs the remote action once and reports whether it succeeded.
/// A `false` return is an ordinary outcome that counts towards opening the
/// circuit, not an error.
pub trait Sender {
    fn send(&self) -> bool;
}

impl<F> Sender for F
where
    F: Fn() -> bool,
{
    fn send(&self) -> bool {
        self()
    }
}

/// Point-in-time view of a breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub state: BreakerState,
    pub failure_count: u32,
}

/// Everything guarded by the breaker lock.
#[derive(Debug, Default)]
struct Core {
    state: BreakerState,
    failure_count: u32,
    max_failure_count: u32,
    reset_timeout_secs: u64,
    debug: bool,
}

impl Core {
    fn max_failure_count(&self) -> u32 {
        effective_max_failure_count(self.max_failure_count)
    }

    fn reset_timeout(&self) -> Duration {
        effective_reset_timeout(self.reset_timeout_secs)
    }

    fn set_state(&mut self, next: BreakerState) {
        if self.debug {
            if self.state == next {
                tracing::info!(state = %self.state, "No change in breaker state");
            } else {
                tracing::info!(
                    previous = %self.state,
                    state = %next,
                    failure_count = self.failure_count,
                    "Breaker state changed"
                );
            }
        }
        self.state = next;
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state,
            failure_count: self.failure_count,
        }
    }
}

fn lock_core(core: &Mutex<Core>) -> MutexGuard<'_, Core> {
    core.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Circuit breaker for a single protected call-site.
///
/// Cloning yields another handle to the same breaker.
#[derive(Debug, Clone, Default)]
pub struct Breaker {
    core: Arc<Mutex<Core>>,
}

impl Breaker {
    /// Create a closed breaker with default threshold and timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a breaker from configuration.
    pub fn from_config(config: &BreakerConfig) -> Self {
        let breaker = Self::new();
        breaker.set_max_failure_count(config.max_failure_count);
        breaker.set_reset_timeout(config.reset_timeout_secs);
        if config.debug {
            breaker.enable_debug();
        }
        breaker
    }

    /// Set the consecutive-failure threshold. 0 restores the default.
    pub fn set_max_failure_count(&self, value: u32) {
        self.lock().max_failure_count = value;
    }

    /// Set the open → closed cooldown in seconds. 0 restores the default.
    pub fn set_reset_timeout(&self, secs: u64) {
        self.lock().reset_timeout_secs = secs;
    }

    /// Turn on trace events for this breaker.
    pub fn enable_debug(&self) -> &Self {
        let mut core = self.lock();
        core.debug = true;
        tracing::info!(
            max_failure_count = core.max_failure_count(),
            reset_timeout_secs = core.reset_timeout().as_secs(),
            "Breaker debug enabled"
        );
        self
    }

    /// Try to run `sender` through the breaker.
    ///
    /// Returns `true` only when the work ran and succeeded. While the circuit
    /// is open the work is not invoked and `false` is returned immediately.
    /// The failure that reaches the threshold opens the circuit and starts
    /// the reset timer; this call does not wait for it.
    pub fn send<S>(&self, sender: &S) -> bool
    where
        S: Sender + ?Sized,
    {
        let mut core = self.lock();

        if core.state == BreakerState::Open {
            if core.debug {
                tracing::debug!(failure_count = core.failure_count, "Circuit is open, call rejected");
            }
            return false;
        }

        if sender.send() {
            core.failure_count = 0;
            return true;
        }

        core.failure_count = core.failure_count.saturating_add(1);
        if core.failure_count >= core.max_failure_count() {
            core.set_state(BreakerState::Open);
            let delay = core.reset_timeout();
            schedule_reset(Arc::clone(&self.core), delay);
        }

        false
    }

    /// Start the reset timer on demand.
    ///
    /// The returned handle resolves once the timer has fired and the circuit
    /// has been closed. Dropping the handle does not cancel the timer.
    pub fn reset(&self) -> ResetHandle {
        let delay = self.reset_timeout();
        schedule_reset(Arc::clone(&self.core), delay)
    }

    /// Current state.
    pub fn state(&self) -> BreakerState {
        self.lock().state
    }

    /// Consecutive failures since the last success.
    pub fn failure_count(&self) -> u32 {
        self.lock().failure_count
    }

    /// Effective threshold, after defaulting.
    pub fn max_failure_count(&self) -> u32 {
        self.lock().max_failure_count()
    }

    /// Effective reset timeout, after defaulting.
    pub fn reset_timeout(&self) -> Duration {
        self.lock().reset_timeout()
    }

    /// Whether trace events are enabled.
    pub fn is_debug(&self) -> bool {
        self.lock().debug
    }

    /// State and failure count, read under one lock.
    pub fn snapshot(&self) -> Snapshot {
        self.lock().snapshot()
    }

    fn lock(&self) -> MutexGuard<'_, Core> {
        lock_core(&self.core)
    }
}

/// Completion signal of a reset timer.
///
/// Await it from async code, or call [`ResetHandle::wait`] from a plain
/// thread. Resolves to `None` only if the timer thread could not be started.
#[derive(Debug)]
pub struct ResetHandle {
    rx: oneshot::Receiver<Snapshot>,
}

impl ResetHandle {
    /// Block the current thread until the timer fires.
    ///
    /// Panics if called from within an async runtime; await the handle there.
    pub fn wait(self) -> Option<Snapshot> {
        self.rx.blocking_recv().ok()
    }
}

impl Future for ResetHandle {
    type Output = Option<Snapshot>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(Result::ok)
    }
}

/// Spawn the timer that closes the circuit after `delay`.
///
/// The timer always gets its own OS thread, so it fires even when the caller's
/// runtime is idle or has been dropped.
fn schedule_reset(core: Arc<Mutex<Core>>, delay: Duration) -> ResetHandle {
    let (tx, rx) = oneshot::channel();

    let spawned = thread::Builder::new()
        .name("fuse-reset".to_string())
        .spawn(move || {
            thread::sleep(delay);
            let _ = tx.send(close(&core));
        });
    if let Err(e) = spawned {
        tracing::error!(error = %e, "Failed to spawn reset timer thread");
    }

    ResetHandle { rx }
}

fn close(core: &Mutex<Core>) -> Snapshot {
    let mut core = lock_core(core);
    if core.debug {
        tracing::info!("Reset triggered");
    }
    core.set_state(BreakerState::Closed);
    core.snapshot()
}
