//! Leap resolver.
//!
//! Turns a found `MatchRange` plus the leap's options into the caret/selection the host should
//! apply. Pure: it reads the continuation anchor but never writes session state, so a leap that
//! is abandoned after resolution leaves history untouched.
//!
//! * The landing spot is the match start with `insert_left`, otherwise the match end.
//! * Without `select_to_match` the result is a collapsed caret at the landing spot.
//! * With `select_to_match` the anchor is the active continuation anchor, or the caret the leap
//!   started from when no chain is running. The anchor may sit on either side of the landing
//!   spot.
//! * The reveal target is the match itself, not the caret, so the whole match is scrolled into
//!   view.

use core_search::MatchRange;
use core_state::{CaretState, LeapOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub caret: CaretState,
    /// Host should copy the selected text to the clipboard.
    pub copy: bool,
    pub reveal: MatchRange,
}

pub fn resolve(
    found: MatchRange,
    options: &LeapOptions,
    current: CaretState,
    continuation_anchor: Option<usize>,
) -> Resolution {
    let target = if options.insert_left {
        found.start
    } else {
        found.end
    };
    let anchor = if options.select_to_match {
        continuation_anchor.unwrap_or(current.active)
    } else {
        target
    };
    let caret = CaretState::new(anchor, target);
    Resolution {
        caret,
        copy: options.copy_on_select && !caret.is_empty(),
        reveal: found,
    }
}
