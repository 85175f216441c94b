//! Leap actions: resolution, orchestration and the host seam.
//!
//! Data flow for one leap: raw pattern -> `core_search::Pattern` -> `core_search::find_nearest`
//! over the host's text snapshot -> `resolver::resolve` using the session's continuation anchor
//! -> session commit + freshness restart -> `LeapResult` back to the host.
//!
//! Concurrency: leaps run synchronously on the caller's thread and take `&mut self`, so two
//! leaps never overlap. The only asynchronous piece is the expiry task, which touches nothing
//! but the freshness flag. The host's text is treated as a snapshot for one leap; if the host
//! edits the document before applying the result, the last writer wins.

use core_search::{MatchRange, PatternError};
use core_state::{CaretState, RevealMode};
use thiserror::Error;

pub mod command_parser;
pub mod engine;
pub mod host;
pub mod io_ops;
pub mod resolver;

pub use command_parser::{CommandParser, HostCommand};
pub use engine::LeapEngine;
pub use host::{LeapHost, MemoryHost};

#[derive(Debug, Error)]
pub enum LeapError {
    #[error(transparent)]
    Pattern(#[from] PatternError),
}

/// Outcome of one leap as seen by the host.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LeapResult {
    pub ok: bool,
    /// New selection to apply (`anchor == active` for a plain caret move).
    pub selection: Option<CaretState>,
    /// Match to scroll into view using `reveal_mode`.
    pub reveal_range: Option<MatchRange>,
    pub reveal_mode: RevealMode,
    /// Text handed to the clipboard for copy-on-select leaps.
    pub copy_text: Option<String>,
}

impl LeapResult {
    pub fn no_match() -> Self {
        Self::default()
    }
}
