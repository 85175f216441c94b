//! File IO helpers for hosts that load a document from disk.
//!
//! Synchronous and minimal. Line endings are normalized to `\n` so that character offsets and
//! columns agree with what a line-oriented host displays.

use anyhow::{Context, Result};
use core_text::Buffer;
use std::path::Path;

/// Open a file path into a new `Buffer`, normalizing `\r\n` to `\n`.
pub fn open_document(path: &Path) -> Result<Buffer> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let crlf = content.matches("\r\n").count();
    let normalized = if crlf > 0 {
        content.replace("\r\n", "\n")
    } else {
        content
    };
    let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("file");
    let buffer = Buffer::from_str(name, &normalized)?;
    tracing::debug!(
        target: "io",
        file = %path.display(),
        chars = buffer.len_chars(),
        lines = buffer.line_count(),
        crlf_normalized = crlf,
        "file_read_ok"
    );
    Ok(buffer)
}
