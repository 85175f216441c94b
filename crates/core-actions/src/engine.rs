//! Leap orchestration.
//!
//! `LeapEngine` composes pattern compilation, directional search and resolution, then commits
//! the outcome to its `SessionState` and restarts the freshness window. One engine per editor
//! instance; engines share nothing.
//!
//! Failure policy: an invalid pattern returns `Err`, while no match or no active document return
//! `Ok` with `ok == false`. In every failure case the session memo, the continuation anchor and
//! the expiry timer are left exactly as they were.

use crate::host::LeapHost;
use crate::resolver;
use crate::{LeapError, LeapResult};
use core_events::{ExpiryTimer, FreshnessListener, Scheduler};
use core_search::{Direction, Pattern, find_nearest};
use core_state::{LeapOptions, SessionState};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

pub struct LeapEngine {
    session: SessionState,
    timer: ExpiryTimer,
    listener: Arc<dyn FreshnessListener>,
    /// Generation of the leap that is currently fresh, or `STALE`.
    fresh: Arc<AtomicU64>,
    generation: u64,
    freshness_window: Duration,
}

const STALE: u64 = 0;

impl LeapEngine {
    pub fn new(
        scheduler: Arc<dyn Scheduler>,
        listener: Arc<dyn FreshnessListener>,
        freshness_window: Duration,
    ) -> Self {
        Self {
            session: SessionState::new(),
            timer: ExpiryTimer::new(scheduler),
            listener,
            fresh: Arc::new(AtomicU64::new(STALE)),
            generation: STALE,
            freshness_window,
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Whether the most recent successful leap is still inside its freshness window.
    pub fn is_fresh(&self) -> bool {
        self.fresh.load(Ordering::Acquire) != STALE
    }

    pub fn freshness_window(&self) -> Duration {
        self.freshness_window
    }

    /// Leap to the occurrence of `pattern` nearest the host's caret.
    pub fn leap<H: LeapHost + ?Sized>(
        &mut self,
        host: &mut H,
        pattern: &str,
        options: LeapOptions,
    ) -> Result<LeapResult, LeapError> {
        let compiled = Pattern::compile(pattern, options.use_regex)?;

        let (Some(text), Some(mut current)) = (host.document_text(), host.caret()) else {
            debug!(target: "leap.session", "no_active_document");
            return Ok(LeapResult::no_match());
        };
        let len = text.chars().count();
        current.clamp_to(len);

        let direction = Direction::from_backwards(options.search_backwards);
        let Some(found) = find_nearest(&text, current.active, &compiled, direction) else {
            debug!(
                target: "leap.session",
                pattern,
                caret = current.active,
                backwards = options.search_backwards,
                "no_match"
            );
            return Ok(LeapResult::no_match());
        };

        let mut resolution =
            resolver::resolve(found, &options, current, self.session.continuation_anchor());
        resolution.caret.clamp_to(len);

        let copy_text = if resolution.copy {
            let range = resolution.caret.range();
            let selected: String = text.chars().skip(range.start).take(range.len()).collect();
            if let Err(e) = host.write_clipboard(&selected) {
                warn!(target: "leap.clipboard", error = %e, "clipboard_write_failed");
            }
            Some(selected)
        } else {
            None
        };

        self.session.record_success(pattern, options, resolution.caret);
        self.refresh();

        debug!(
            target: "leap.session",
            pattern,
            match_start = found.start,
            match_end = found.end,
            anchor = resolution.caret.anchor,
            active = resolution.caret.active,
            "leap_ok"
        );
        Ok(LeapResult {
            ok: true,
            selection: Some(resolution.caret),
            reveal_range: Some(resolution.reveal),
            reveal_mode: options.reveal,
            copy_text,
        })
    }

    /// Replay the previous leap searching forward.
    pub fn repeat_forward<H: LeapHost + ?Sized>(
        &mut self,
        host: &mut H,
    ) -> Result<LeapResult, LeapError> {
        self.repeat(host, false)
    }

    /// Replay the previous leap searching backward.
    pub fn repeat_back<H: LeapHost + ?Sized>(
        &mut self,
        host: &mut H,
    ) -> Result<LeapResult, LeapError> {
        self.repeat(host, true)
    }

    /// Replay the previous pattern with caller-supplied options (e.g. the host's current toggles).
    pub fn leap_with_previous_search_term<H: LeapHost + ?Sized>(
        &mut self,
        host: &mut H,
        options: LeapOptions,
    ) -> Result<LeapResult, LeapError> {
        let Some(pattern) = self.session.previous().map(|p| p.pattern.clone()) else {
            debug!(target: "leap.session", "no_previous_leap");
            return Ok(LeapResult::no_match());
        };
        self.leap(host, &pattern, options)
    }

    /// Tear down for host deactivation: cancel the timer, drop the session, go stale.
    pub fn deactivate(&mut self) {
        self.timer.cancel();
        self.session.reset();
        if self.fresh.swap(STALE, Ordering::AcqRel) != STALE {
            self.listener.freshness_changed(false);
        }
    }

    fn repeat<H: LeapHost + ?Sized>(
        &mut self,
        host: &mut H,
        backwards: bool,
    ) -> Result<LeapResult, LeapError> {
        let Some(prev) = self.session.previous().cloned() else {
            debug!(target: "leap.session", backwards, "no_previous_leap");
            return Ok(LeapResult::no_match());
        };
        self.leap(host, &prev.pattern, prev.options.with_backwards(backwards))
    }

    /// Signal freshness and restart the window. Every successful leap signals, since each one
    /// restarts the indicator.
    ///
    /// Expiry only clears the generation it was armed for. An older expiry task that wakes while
    /// this runs finds a newer generation and leaves it alone.
    fn refresh(&mut self) {
        self.generation += 1;
        let generation = self.generation;
        self.fresh.store(generation, Ordering::Release);
        self.listener.freshness_changed(true);
        let fresh = Arc::clone(&self.fresh);
        let listener = Arc::clone(&self.listener);
        self.timer.arm(self.freshness_window, move || {
            if fresh
                .compare_exchange(generation, STALE, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                listener.freshness_changed(false);
            }
        });
    }
}

impl std::fmt::Debug for LeapEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeapEngine")
            .field("session", &self.session)
            .field("timer", &self.timer)
            .field("fresh", &self.is_fresh())
            .field("freshness_window", &self.freshness_window)
            .finish()
    }
}
