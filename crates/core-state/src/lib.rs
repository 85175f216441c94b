//! Leap session state: caret/selection values, per-leap options, the remembered previous leap
//! and the selection-continuation anchor.
//!
//! Session Lifecycle:
//! - A `SessionState` is created when the host activates the engine and reset on deactivation.
//!   Nothing here is global; each editor instance owns its own session.
//! - Only successful leaps write to the session. A failed leap (invalid pattern, no match, no
//!   document) leaves both `previous` and `continuation_anchor` exactly as they were.
//!
//! Selection Continuation:
//! - The first select-to-match leap of a chain pins the anchor at the caret it started from.
//! - Further select-to-match leaps reuse that anchor so the selection grows or shrinks as one
//!   contiguous range instead of jumping to a disjoint one.
//! - Any leap with select-to-match off ends the chain.

use serde::Deserialize;
use tracing::debug;

pub mod toggles;
pub use toggles::{OptionToggles, Toggle};

/// Caret or selection as two character offsets. `anchor == active` is a plain caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CaretState {
    pub anchor: usize,
    pub active: usize,
}

impl CaretState {
    pub fn new(anchor: usize, active: usize) -> Self {
        Self { anchor, active }
    }

    /// A collapsed selection at `offset`.
    pub fn caret(offset: usize) -> Self {
        Self {
            anchor: offset,
            active: offset,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.active
    }

    /// Ordered `start..end` span regardless of selection direction.
    pub fn range(&self) -> std::ops::Range<usize> {
        self.anchor.min(self.active)..self.anchor.max(self.active)
    }

    /// Clamp both ends into `0..=len`.
    pub fn clamp_to(&mut self, len: usize) {
        self.anchor = self.anchor.min(len);
        self.active = self.active.min(len);
    }
}

/// How the host should scroll a found match into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealMode {
    #[default]
    Default,
    InCenter,
    InCenterIfOutsideViewport,
    AtTop,
}

/// Options for a single leap. Immutable for the duration of that leap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LeapOptions {
    /// Land on the match start instead of its end.
    pub insert_left: bool,
    /// Extend a selection to the landing spot instead of moving a bare caret.
    pub select_to_match: bool,
    pub search_backwards: bool,
    /// Compile the typed text as a regular expression instead of a literal.
    pub use_regex: bool,
    pub copy_on_select: bool,
    pub reveal: RevealMode,
}

impl LeapOptions {
    /// Copy of these options with only the search direction replaced.
    pub fn with_backwards(self, search_backwards: bool) -> Self {
        Self {
            search_backwards,
            ..self
        }
    }
}

/// Memo of the last successful leap, replayed by the repeat commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviousLeap {
    /// Raw pattern as typed (never pre-escaped).
    pub pattern: String,
    /// Options used; `search_backwards` is the last direction.
    pub options: LeapOptions,
    pub final_caret: usize,
}

#[derive(Debug, Default, Clone)]
pub struct SessionState {
    previous: Option<PreviousLeap>,
    continuation_anchor: Option<usize>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn previous(&self) -> Option<&PreviousLeap> {
        self.previous.as_ref()
    }

    pub fn continuation_anchor(&self) -> Option<usize> {
        self.continuation_anchor
    }

    /// Commit a successful leap. `selection` is the resolved selection the leap produced; its
    /// anchor becomes the continuation anchor when this leap opens a select-to-match chain.
    pub fn record_success(&mut self, pattern: &str, options: LeapOptions, selection: CaretState) {
        if options.select_to_match {
            if self.continuation_anchor.is_none() {
                self.continuation_anchor = Some(selection.anchor);
                debug!(target: "leap.session", anchor = selection.anchor, "continuation_start");
            }
        } else if let Some(anchor) = self.continuation_anchor.take() {
            debug!(target: "leap.session", anchor, "continuation_end");
        }
        self.previous = Some(PreviousLeap {
            pattern: pattern.to_string(),
            options,
            final_caret: selection.active,
        });
        debug!(
            target: "leap.session",
            pattern,
            backwards = options.search_backwards,
            final_caret = selection.active,
            "previous_leap_recorded"
        );
    }

    /// Forget everything (host deactivation).
    pub fn reset(&mut self) {
        self.previous = None;
        self.continuation_anchor = None;
        debug!(target: "leap.session", "session_reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selecting() -> LeapOptions {
        LeapOptions {
            select_to_match: true,
            ..LeapOptions::default()
        }
    }

    #[test]
    fn caret_helpers() {
        let c = CaretState::new(7, 3);
        assert!(!c.is_empty());
        assert_eq!(c.range(), 3..7);
        assert!(CaretState::caret(4).is_empty());
        let mut c = CaretState::new(12, 20);
        c.clamp_to(10);
        assert_eq!(c, CaretState::new(10, 10));
    }

    #[test]
    fn with_backwards_only_changes_direction() {
        let base = LeapOptions {
            insert_left: true,
            copy_on_select: true,
            reveal: RevealMode::AtTop,
            ..LeapOptions::default()
        };
        let flipped = base.with_backwards(true);
        assert!(flipped.search_backwards);
        assert_eq!(flipped.with_backwards(false), base);
    }

    #[test]
    fn first_selecting_leap_pins_anchor() {
        let mut s = SessionState::new();
        s.record_success("x", selecting(), CaretState::new(2, 9));
        assert_eq!(s.continuation_anchor(), Some(2));
        // Chained leap keeps the original anchor even if the selection reports another.
        s.record_success("x", selecting(), CaretState::new(2, 15));
        assert_eq!(s.continuation_anchor(), Some(2));
        assert_eq!(s.previous().unwrap().final_caret, 15);
    }

    #[test]
    fn plain_leap_clears_anchor() {
        let mut s = SessionState::new();
        s.record_success("x", selecting(), CaretState::new(0, 4));
        s.record_success("x", LeapOptions::default(), CaretState::caret(8));
        assert_eq!(s.continuation_anchor(), None);
        s.record_success("x", selecting(), CaretState::new(8, 12));
        assert_eq!(s.continuation_anchor(), Some(8));
    }

    #[test]
    fn previous_leap_is_overwritten_whole() {
        let mut s = SessionState::new();
        s.record_success("ab", LeapOptions::default().with_backwards(true), CaretState::caret(1));
        s.record_success("cd", LeapOptions::default(), CaretState::caret(5));
        let prev = s.previous().unwrap();
        assert_eq!(prev.pattern, "cd");
        assert!(!prev.options.search_backwards);
        assert_eq!(prev.final_caret, 5);
    }

    #[test]
    fn reset_clears_everything() {
        let mut s = SessionState::new();
        s.record_success("x", selecting(), CaretState::new(0, 3));
        s.reset();
        assert!(s.previous().is_none());
        assert!(s.continuation_anchor().is_none());
    }
}
