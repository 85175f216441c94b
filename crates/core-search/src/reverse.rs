//! Right-to-left nearest-match scan.
//!
//! One forward pass with an overlapping lazy DFA reports every offset at which some match ends.
//! Walking those ends from the right, an anchored reverse search finds the earliest start for
//! each; the first non-empty one is the match nearest the caret. Both passes are linear in the
//! window, however long the matches are.

use regex_automata::hybrid::BuildError;
use regex_automata::hybrid::dfa::{DFA, OverlappingState};
use regex_automata::nfa::thompson;
use regex_automata::util::syntax;
use regex_automata::{Anchored, Input, MatchError, MatchKind};

#[derive(Debug, Clone)]
pub(crate) struct ReverseScan {
    ends: DFA,
    starts: DFA,
}

impl ReverseScan {
    pub(crate) fn build(source: &str) -> Result<Self, BuildError> {
        let syntax = syntax::Config::new().case_insensitive(true);
        let config = || {
            DFA::config()
                .match_kind(MatchKind::All)
                .unicode_word_boundary(true)
        };
        let ends = DFA::builder()
            .syntax(syntax)
            .configure(config())
            .build(source)?;
        let starts = DFA::builder()
            .syntax(syntax)
            .thompson(thompson::Config::new().reverse(true))
            .configure(config())
            .build(source)?;
        Ok(Self { ends, starts })
    }

    /// Byte range of the non-empty match with the greatest end in `window`, earliest start on
    /// ties.
    ///
    /// Errors when the lazy DFA gives up (non-ASCII text next to a Unicode word boundary, or
    /// cache thrashing); callers fall back to probing.
    pub(crate) fn nearest(&self, window: &str) -> Result<Option<(usize, usize)>, MatchError> {
        let mut cache = self.ends.create_cache();
        let input = Input::new(window);
        let mut state = OverlappingState::start();
        let mut ends = Vec::new();
        loop {
            self.ends
                .try_search_overlapping_fwd(&mut cache, &input, &mut state)?;
            match state.get_match() {
                Some(m) => ends.push(m.offset()),
                None => break,
            }
        }

        let mut cache = self.starts.create_cache();
        for &end in ends.iter().rev() {
            let input = Input::new(window).range(..end).anchored(Anchored::Yes);
            let Some(m) = self.starts.try_search_rev(&mut cache, &input)? else {
                continue;
            };
            let start = m.offset();
            if start < end && window.is_char_boundary(start) && window.is_char_boundary(end) {
                return Ok(Some((start, end)));
            }
        }
        Ok(None)
    }
}
