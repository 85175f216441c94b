//! Rope-based document abstraction.
//!
//! The leap engine reasons in absolute character offsets; `Position` only exists for crossing
//! into and out of a host that thinks in (line, column). Columns are counted in characters and
//! exclude the line terminator.

use anyhow::Result;
use ropey::Rope;
use std::ops::Range;

/// A read-only document backed by a `ropey::Rope`.
#[derive(Clone)]
pub struct Buffer {
    rope: Rope,
    pub name: String,
}

/// A position inside a buffer expressed as (line index, character column within that line).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Hosts show 1-based coordinates.
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

impl Buffer {
    /// Construct a buffer from an in-memory string slice.
    pub fn from_str(name: impl Into<String>, content: &str) -> Result<Self> {
        Ok(Self {
            rope: Rope::from_str(content),
            name: name.into(),
        })
    }

    /// Total number of characters; the largest valid caret offset.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Total number of lines in the buffer.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Return the requested line as an owned `String` (including trailing newline if present).
    pub fn line(&self, idx: usize) -> Option<String> {
        if idx < self.rope.len_lines() {
            Some(self.rope.line(idx).to_string())
        } else {
            None
        }
    }

    /// Character length of a line excluding its terminator (`\n` or `\r\n`).
    pub fn line_char_len(&self, idx: usize) -> usize {
        if idx >= self.rope.len_lines() {
            return 0;
        }
        let line = self.rope.line(idx);
        let mut len = line.len_chars();
        if len > 0 && line.char(len - 1) == '\n' {
            len -= 1;
            if len > 0 && line.char(len - 1) == '\r' {
                len -= 1;
            }
        }
        len
    }

    /// Full document text snapshot.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Text covered by a character range, clamped to the buffer.
    pub fn slice(&self, range: Range<usize>) -> String {
        let len = self.rope.len_chars();
        let end = range.end.min(len);
        let start = range.start.min(end);
        self.rope.slice(start..end).to_string()
    }

    /// Convert an absolute character offset to a (line, column) pair. Offsets past the end clamp
    /// to the end of the document.
    pub fn offset_to_position(&self, offset: usize) -> Position {
        let offset = offset.min(self.rope.len_chars());
        let line = self.rope.char_to_line(offset);
        let column = offset - self.rope.line_to_char(line);
        Position { line, column }
    }

    /// Convert a (line, column) pair back into an absolute character offset. Lines past the end
    /// clamp to the last line; columns clamp to the line's content length.
    pub fn position_to_offset(&self, pos: Position) -> usize {
        let last_line = self.rope.len_lines().saturating_sub(1);
        let line = pos.line.min(last_line);
        let column = pos.column.min(self.line_char_len(line));
        self.rope.line_to_char(line) + column
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("name", &self.name)
            .field("chars", &self.rope.len_chars())
            .field("lines", &self.rope.len_lines())
            .finish()
    }
}
