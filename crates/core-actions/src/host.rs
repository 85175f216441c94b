//! Host seam.
//!
//! The engine reads the document snapshot and caret through `LeapHost` and writes the
//! clipboard through it; everything else (applying the selection, scrolling, flashing an
//! indicator) is left to the host acting on the returned `LeapResult`.

use crate::LeapResult;
use core_search::MatchRange;
use core_state::{CaretState, RevealMode};
use core_text::{Buffer, Position};

pub trait LeapHost {
    /// Full text of the active document, or `None` when no document is active.
    fn document_text(&self) -> Option<String>;
    /// Current selection of the active document.
    fn caret(&self) -> Option<CaretState>;
    /// Put `text` on the clipboard. Only called for copy-on-select leaps.
    fn write_clipboard(&mut self, text: &str) -> anyhow::Result<()>;
}

impl<T: LeapHost + ?Sized> LeapHost for &mut T {
    fn document_text(&self) -> Option<String> {
        (**self).document_text()
    }
    fn caret(&self) -> Option<CaretState> {
        (**self).caret()
    }
    fn write_clipboard(&mut self, text: &str) -> anyhow::Result<()> {
        (**self).write_clipboard(text)
    }
}

/// In-memory host: one optional buffer, one selection, a string clipboard.
#[derive(Debug, Default, Clone)]
pub struct MemoryHost {
    buffer: Option<Buffer>,
    selection: CaretState,
    clipboard: Option<String>,
    last_reveal: Option<(MatchRange, RevealMode)>,
}

impl MemoryHost {
    pub fn new(buffer: Buffer) -> Self {
        Self {
            buffer: Some(buffer),
            ..Self::default()
        }
    }

    /// Host without an active document.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn buffer(&self) -> Option<&Buffer> {
        self.buffer.as_ref()
    }

    pub fn selection(&self) -> CaretState {
        self.selection
    }

    pub fn clipboard(&self) -> Option<&str> {
        self.clipboard.as_deref()
    }

    pub fn last_reveal(&self) -> Option<(MatchRange, RevealMode)> {
        self.last_reveal
    }

    /// Collapse the selection to `offset`, clamped to the document.
    pub fn set_caret(&mut self, offset: usize) {
        let mut caret = CaretState::caret(offset);
        caret.clamp_to(self.len());
        self.selection = caret;
    }

    /// Collapse the selection to a (line, column) position.
    pub fn set_caret_position(&mut self, pos: Position) {
        let offset = self
            .buffer
            .as_ref()
            .map(|b| b.position_to_offset(pos))
            .unwrap_or(0);
        self.selection = CaretState::caret(offset);
    }

    /// Active end of the selection as (line, column).
    pub fn caret_position(&self) -> Position {
        self.buffer
            .as_ref()
            .map(|b| b.offset_to_position(self.selection.active))
            .unwrap_or_default()
    }

    pub fn selected_text(&self) -> String {
        self.buffer
            .as_ref()
            .map(|b| b.slice(self.selection.range()))
            .unwrap_or_default()
    }

    /// Apply a leap outcome: move the selection and remember the reveal request.
    pub fn apply(&mut self, result: &LeapResult) {
        if !result.ok {
            return;
        }
        if let Some(selection) = result.selection {
            self.selection = selection;
        }
        if let Some(range) = result.reveal_range {
            self.last_reveal = Some((range, result.reveal_mode));
        }
    }

    fn len(&self) -> usize {
        self.buffer.as_ref().map(Buffer::len_chars).unwrap_or(0)
    }
}

impl LeapHost for MemoryHost {
    fn document_text(&self) -> Option<String> {
        self.buffer.as_ref().map(Buffer::text)
    }

    fn caret(&self) -> Option<CaretState> {
        self.buffer.as_ref().map(|_| self.selection)
    }

    fn write_clipboard(&mut self, text: &str) -> anyhow::Result<()> {
        self.clipboard = Some(text.to_string());
        Ok(())
    }
}
