//! Event types, timer scheduling and the leap freshness window.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::mpsc::Sender;
use tracing::trace;

pub mod manual;
pub use manual::ManualScheduler;

// -------------------------------------------------------------------------------------------------
// Channel Policy
// -------------------------------------------------------------------------------------------------
// Hosts drive the engine from a bounded mpsc channel sized by `EVENT_CHANNEL_CAP`. Input producers
// may block on a full channel; freshness notifications are fired from timer tasks and use
// `try_send` and never park a runtime worker. Dropped notifications are counted, not retried.
// -------------------------------------------------------------------------------------------------
pub const EVENT_CHANNEL_CAP: usize = 1024;

pub static FRESHNESS_SEND_FAILURES: AtomicU64 = AtomicU64::new(0);
pub static TIMERS_ARMED: AtomicU64 = AtomicU64::new(0);
pub static TIMERS_FIRED: AtomicU64 = AtomicU64::new(0);

/// Top-level event enum consumed by a host event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// One line of user input (command text).
    Input(String),
    /// The most recent leap entered (`true`) or left (`false`) its freshness window.
    LeapFreshness { fresh: bool },
    Shutdown,
}

/// Receives freshness transitions. Called from whichever thread runs the expiry task, so
/// implementations must not block.
pub trait FreshnessListener: Send + Sync + 'static {
    fn freshness_changed(&self, fresh: bool);
}

/// Listener that discards every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListener;

impl FreshnessListener for NoopListener {
    fn freshness_changed(&self, _fresh: bool) {}
}

impl FreshnessListener for Sender<Event> {
    fn freshness_changed(&self, fresh: bool) {
        if self.try_send(Event::LeapFreshness { fresh }).is_err() {
            FRESHNESS_SEND_FAILURES.fetch_add(1, Ordering::Relaxed);
            trace!(target: "leap.timer", fresh, "freshness_send_failed");
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Scheduling
// -------------------------------------------------------------------------------------------------

/// Deferred task runner. The engine never sleeps itself; it hands delayed work to the host.
pub trait Scheduler: Send + Sync + 'static {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce() + Send + 'static>);
}

/// Scheduler backed by a tokio runtime. Each task is one spawned sleep.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: tokio::runtime::Handle,
}

impl TokioScheduler {
    pub fn new(handle: tokio::runtime::Handle) -> Self {
        Self { handle }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce() + Send + 'static>) {
        self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        });
    }
}

// -------------------------------------------------------------------------------------------------
// Expiry Timer
// -------------------------------------------------------------------------------------------------

/// Single-slot rearmable timer.
///
/// Every `arm` mints a fresh token and makes it the live one; a scheduled task only fires if its
/// token is still live when it wakes, and claims it atomically so it fires at most once. Arming
/// again or cancelling simply replaces or clears the live token; stale tasks wake up and find
/// nothing to do.
pub struct ExpiryTimer {
    scheduler: Arc<dyn Scheduler>,
    next_token: AtomicU64,
    live: Arc<AtomicU64>,
}

const NO_TOKEN: u64 = 0;

impl ExpiryTimer {
    pub fn new(scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            scheduler,
            next_token: AtomicU64::new(NO_TOKEN + 1),
            live: Arc::new(AtomicU64::new(NO_TOKEN)),
        }
    }

    /// Cancel any pending expiry and schedule `on_expire` after `delay`. Returns the new token.
    pub fn arm<F>(&self, delay: Duration, on_expire: F) -> u64
    where
        F: FnOnce() + Send + 'static,
    {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        let previous = self.live.swap(token, Ordering::AcqRel);
        TIMERS_ARMED.fetch_add(1, Ordering::Relaxed);
        trace!(
            target: "leap.timer",
            token,
            replaced = previous != NO_TOKEN,
            delay_ms = delay.as_millis() as u64,
            "timer_armed"
        );
        let live = Arc::clone(&self.live);
        self.scheduler.schedule(
            delay,
            Box::new(move || {
                if live
                    .compare_exchange(token, NO_TOKEN, Ordering::AcqRel, Ordering::Acquire)
                    .is_ok()
                {
                    TIMERS_FIRED.fetch_add(1, Ordering::Relaxed);
                    trace!(target: "leap.timer", token, "timer_fired");
                    on_expire();
                }
            }),
        );
        token
    }

    /// Invalidate the live token, if any. Returns whether something was pending.
    pub fn cancel(&self) -> bool {
        let previous = self.live.swap(NO_TOKEN, Ordering::AcqRel);
        if previous != NO_TOKEN {
            trace!(target: "leap.timer", token = previous, "timer_cancelled");
        }
        previous != NO_TOKEN
    }

    /// True while an armed token has neither fired nor been cancelled.
    pub fn is_armed(&self) -> bool {
        self.live.load(Ordering::Acquire) != NO_TOKEN
    }
}

impl std::fmt::Debug for ExpiryTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpiryTimer")
            .field("live", &self.live.load(Ordering::Relaxed))
            .finish()
    }
}
