//! Nearest-match search relative to a caret.
//!
//! Forward leaps search `[caret + 1, len)` and take the first match; backward leaps search
//! `[0, caret - 1)` and take the match closest to the caret. Skipping the character next to the
//! caret keeps a repeated leap from landing on the match it just reached. There is no
//! wrap-around: an empty window or a window without a match yields `None`.
//!
//! "Closest to the caret" means the greatest end, overlapping candidates included, with the
//! earliest start on ties. The backward window is scanned right-to-left by lazy DFAs without
//! copying or reversing the text.

use crate::Pattern;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn from_backwards(backwards: bool) -> Self {
        if backwards {
            Direction::Backward
        } else {
            Direction::Forward
        }
    }

    pub fn is_backward(self) -> bool {
        matches!(self, Direction::Backward)
    }
}

/// A non-empty match expressed in absolute character offsets with `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchRange {
    pub start: usize,
    pub end: usize,
}

impl MatchRange {
    /// Build a range from two endpoints in either order.
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Find the occurrence of `pattern` nearest to `caret` in `direction`.
///
/// `caret` is a character offset and is clamped to the text length.
pub fn find_nearest(
    text: &str,
    caret: usize,
    pattern: &Pattern,
    direction: Direction,
) -> Option<MatchRange> {
    let len = text.chars().count();
    let caret = caret.min(len);
    let found = match direction {
        Direction::Forward => find_forward(text, caret, len, pattern),
        Direction::Backward => find_backward(text, caret, pattern),
    };
    trace!(
        target: "leap.search",
        caret,
        len,
        backwards = direction.is_backward(),
        pattern = pattern.raw(),
        found = ?found,
        "find_nearest"
    );
    found
}

fn find_forward(text: &str, caret: usize, len: usize, pattern: &Pattern) -> Option<MatchRange> {
    let window_start = caret + 1;
    if window_start >= len {
        return None;
    }
    let start_byte = char_to_byte(text, window_start);
    let window = &text[start_byte..];
    let m = pattern
        .regex()
        .find_iter(window)
        .find(|m| !m.is_empty())?;
    let start = window_start + window[..m.start()].chars().count();
    let end = start + m.as_str().chars().count();
    Some(MatchRange::new(start, end))
}

fn find_backward(text: &str, caret: usize, pattern: &Pattern) -> Option<MatchRange> {
    if caret < 2 {
        return None;
    }
    let end_byte = char_to_byte(text, caret - 1);
    let window = &text[..end_byte];

    let found = match pattern.reverse().map(|scan| scan.nearest(window)) {
        Some(Ok(found)) => found,
        Some(Err(e)) => {
            trace!(target: "leap.search", error = %e, "reverse_scan_fallback");
            probe_backward(window, pattern)
        }
        None => probe_backward(window, pattern),
    };

    let (start_byte, end_byte) = found?;
    let start = window[..start_byte].chars().count();
    let end = start + window[start_byte..end_byte].chars().count();
    Some(MatchRange::new(start, end))
}

/// Slow path for patterns the lazy DFA cannot scan: probe every position at which a match
/// begins, overlapping ones included, and keep the greatest end (earliest start on ties).
fn probe_backward(window: &str, pattern: &Pattern) -> Option<(usize, usize)> {
    let regex = pattern.regex();
    let mut best: Option<(usize, usize)> = None;
    let mut at = 0;
    while at <= window.len() {
        let Some(m) = regex.find_at(window, at) else {
            break;
        };
        if !m.is_empty() && best.is_none_or(|(_, end)| m.end() > end) {
            best = Some((m.start(), m.end()));
        }
        match window[m.start()..].chars().next() {
            Some(c) => at = m.start() + c.len_utf8(),
            None => break,
        }
    }
    best
}

/// Byte index of the character at `char_idx`, or `text.len()` when it is one past the end.
fn char_to_byte(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map(|(b, _)| b)
        .unwrap_or(text.len())
}
