//! Pattern compilation and nearest-match search for leaps.
//!
//! Both halves are pure: no editor state, no host calls. Offsets crossing this crate's API are
//! absolute character offsets; byte offsets only exist internally while talking to `regex`.

pub mod matcher;
pub mod pattern;
mod reverse;

pub use matcher::{Direction, MatchRange, find_nearest};
pub use pattern::{Pattern, PatternError, escape_literal};
