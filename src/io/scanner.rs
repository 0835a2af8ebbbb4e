//! Line-oriented scanner with speculative reads.
//!
//! The fort.14 boundary trailer is ambiguous enough that the reader has to try
//! an interpretation, look at the result and possibly roll back. `LineScanner`
//! keeps the whole file in memory and exposes its read position as a byte
//! offset, so a rollback is a single [`LineScanner::seek`] and never touches
//! anything the caller has already collected.

/// Result of [`LineScanner::read_nonblank_ints`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IntLine {
    /// Integer tokens of the consumed line and the offset of its first byte.
    Ints { values: Vec<i64>, start: usize },
    /// End of input, with the offset at which it was hit.
    Eof { at: usize },
}

impl IntLine {
    /// The integer tokens, or `None` at end of input.
    pub fn into_values(self) -> Option<Vec<i64>> {
        match self {
            IntLine::Ints { values, .. } => Some(values),
            IntLine::Eof { .. } => None,
        }
    }

    /// Offset before the consumed line (or the EOF offset).
    pub fn position(&self) -> usize {
        match self {
            IntLine::Ints { start, .. } => *start,
            IntLine::Eof { at } => *at,
        }
    }
}

/// Returns `true` if the whole token is a base-10, optionally signed integer.
pub fn is_int_like(token: &str) -> bool {
    token.parse::<i64>().is_ok()
}

/// All integer-like whitespace tokens of `line`, in order.
///
/// Tokens such as `1.5`, `NOPE` or `=` are skipped, which lets headers carry
/// trailing comments.
pub fn parse_ints(line: &str) -> Vec<i64> {
    line.split_whitespace()
        .filter_map(|tok| tok.parse::<i64>().ok())
        .collect()
}

fn count_newlines(bytes: &[u8]) -> usize {
    bytes.iter().filter(|&&b| b == b'\n').count()
}

/// Forward reader over a text buffer with absolute `tell`/`seek`.
#[derive(Clone, Debug)]
pub struct LineScanner<'a> {
    text: &'a str,
    pos: usize,
    // newlines before `pos`
    line: usize,
}

impl<'a> LineScanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            line: 0,
        }
    }

    /// Current byte offset.
    #[inline]
    pub fn tell(&self) -> usize {
        self.pos
    }

    /// Move to an absolute byte offset previously returned by [`tell`](Self::tell)
    /// or carried in an [`IntLine`]. Offsets past the end clamp to EOF.
    #[inline]
    pub fn seek(&mut self, pos: usize) {
        let pos = pos.min(self.text.len());
        let bytes = self.text.as_bytes();
        if pos >= self.pos {
            self.line += count_newlines(&bytes[self.pos..pos]);
        } else {
            self.line -= count_newlines(&bytes[pos..self.pos]);
        }
        self.pos = pos;
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// 1-based number of the line the scanner is positioned on.
    pub fn line_number(&self) -> usize {
        self.line + 1
    }

    /// Reads one raw line without its terminator. `None` at end of input.
    pub fn read_line(&mut self) -> Option<&'a str> {
        if self.is_eof() {
            return None;
        }
        let rest = &self.text[self.pos..];
        let line = match rest.find('\n') {
            Some(idx) => {
                self.pos += idx + 1;
                self.line += 1;
                &rest[..idx]
            }
            None => {
                self.pos = self.text.len();
                rest
            }
        };
        Some(line.strip_suffix('\r').unwrap_or(line))
    }

    /// Next line that is not empty after trimming, returned trimmed.
    pub fn read_nonblank_line(&mut self) -> Option<&'a str> {
        loop {
            let line = self.read_line()?;
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                return Some(trimmed);
            }
        }
    }

    /// Next line carrying at least one integer token.
    ///
    /// Blank lines and lines without integer tokens are skipped. The returned
    /// position is the offset right before the consumed line, so seeking to it
    /// un-reads that line.
    pub fn read_nonblank_ints(&mut self) -> IntLine {
        loop {
            let start = self.pos;
            let Some(line) = self.read_line() else {
                return IntLine::Eof { at: start };
            };
            if line.trim().is_empty() {
                continue;
            }
            let values = parse_ints(line);
            if values.is_empty() {
                continue;
            }
            return IntLine::Ints { values, start };
        }
    }

    /// Reads the next integer line and rewinds, leaving the position unchanged.
    pub fn peek_nonblank_ints(&mut self) -> Option<Vec<i64>> {
        let saved = self.tell();
        let values = self.read_nonblank_ints().into_values();
        self.seek(saved);
        values
    }
}
