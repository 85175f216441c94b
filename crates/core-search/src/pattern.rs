use crate::reverse::ReverseScan;
use regex::{Regex, RegexBuilder};
use thiserror::Error;
use tracing::trace;

/// Characters with special meaning to the pattern engine. Literal leaps escape exactly this set.
const METACHARACTERS: &[char] = &[
    '.', '*', '+', '?', '^', '$', '{', '}', '(', ')', '|', '[', ']', '\\',
];

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("empty search pattern")]
    Empty,
    #[error("invalid search pattern '{pattern}': {source}")]
    Invalid {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A compiled, case-insensitive leap pattern.
///
/// Always built from the raw text the user typed, so replaying a remembered leap escapes the
/// literal exactly once no matter how often it is repeated.
#[derive(Debug, Clone)]
pub struct Pattern {
    raw: String,
    use_regex: bool,
    regex: Regex,
    reverse: Option<ReverseScan>,
}

impl Pattern {
    pub fn compile(raw: &str, use_regex: bool) -> Result<Self, PatternError> {
        if raw.is_empty() {
            return Err(PatternError::Empty);
        }
        let source = if use_regex {
            raw.to_string()
        } else {
            escape_literal(raw)
        };
        let regex = RegexBuilder::new(&source)
            .case_insensitive(true)
            .build()
            .map_err(|source| PatternError::Invalid {
                pattern: raw.to_string(),
                source,
            })?;
        let reverse = ReverseScan::build(&source)
            .inspect_err(|e| trace!(target: "leap.search", error = %e, "reverse_scan_unavailable"))
            .ok();
        Ok(Self {
            raw: raw.to_string(),
            use_regex,
            regex,
            reverse,
        })
    }

    /// Text as typed by the user.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn use_regex(&self) -> bool {
        self.use_regex
    }

    /// Source handed to the regex engine (escaped for literal patterns).
    pub fn source(&self) -> &str {
        self.regex.as_str()
    }

    pub(crate) fn regex(&self) -> &Regex {
        &self.regex
    }

    pub(crate) fn reverse(&self) -> Option<&ReverseScan> {
        self.reverse.as_ref()
    }
}

/// Prefix every metacharacter in `raw` with a backslash.
pub fn escape_literal(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 4);
    for c in raw.chars() {
        if METACHARACTERS.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
