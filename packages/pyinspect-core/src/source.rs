//! Reading the source line a frame was executing.
//!
//! Every lookup fails soft: a missing file, an out-of-range line or a file
//! that is not valid UTF-8 yields `None`.

use std::path::{Path, PathBuf};

use crate::error::{InspectError, Result};

/// A run of source lines, with the one-based number of the first line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSnippet {
    pub path: PathBuf,
    pub first_line: usize,
    pub lines: Vec<String>,
}

impl SourceSnippet {
    /// `(one-based line number, text)` pairs.
    pub fn numbered(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.lines
            .iter()
            .enumerate()
            .map(move |(i, line)| (self.first_line + i, line.as_str()))
    }
}

fn read_source(path: &Path) -> Option<String> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::debug!("cannot read source {}: {}", path.display(), e);
            return None;
        }
    };
    match String::from_utf8(bytes) {
        Ok(text) => Some(text),
        Err(_) => {
            log::debug!("source {} is not valid UTF-8", path.display());
            None
        }
    }
}

/// Reads a single line, zero-based, without its trailing newline.
pub fn read_line(path: impl AsRef<Path>, line: usize) -> Option<String> {
    let text = read_source(path.as_ref())?;
    text.lines().nth(line).map(|l| l.to_string())
}

/// Like [`read_line`] but takes the raw index a caller received from the
/// runtime. Negative indices are a caller bug and are rejected.
pub fn read_line_checked(path: impl AsRef<Path>, line: i64) -> Result<Option<String>> {
    let line = usize::try_from(line).map_err(|_| {
        InspectError::invalid_argument(format!(
            "line number should be a non-negative integer, got {}",
            line
        ))
    })?;
    Ok(read_line(path, line))
}

/// Reads lines `start..=end` (one-based, inclusive) for display.
pub fn snippet(path: impl AsRef<Path>, start: usize, end: usize) -> Option<SourceSnippet> {
    let path = path.as_ref();
    if start == 0 || end < start {
        return None;
    }
    let text = read_source(path)?;
    let lines: Vec<String> = text
        .lines()
        .skip(start - 1)
        .take(end - start + 1)
        .map(|l| l.to_string())
        .collect();
    if lines.is_empty() {
        return None;
    }
    Some(SourceSnippet {
        path: path.to_path_buf(),
        first_line: start,
        lines,
    })
}
