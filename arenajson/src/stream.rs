// SPDX-License-Identifier: Apache-2.0

/// A line/column pair, both starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl core::fmt::Display for Location {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Cursor over the input slice.
///
/// A NUL byte reads as end of input, the same as running past the slice.
#[derive(Debug)]
pub struct CharStream<'i> {
    data: &'i [u8],
    pos: usize,
    line: usize,
    column: usize,
}

/// The classic locale-free `isspace` set.
pub fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C)
}

impl<'i> CharStream<'i> {
    pub fn new(data: &'i [u8]) -> Self {
        Self {
            data,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn location(&self) -> Location {
        Location {
            line: self.line,
            column: self.column,
        }
    }

    /// The byte under the cursor, or `None` at end of input.
    pub fn peek(&self) -> Option<u8> {
        self.peek_nth(0)
    }

    /// The byte `n` positions past the cursor. Looking past a NUL yields `None`.
    pub fn peek_nth(&self, n: usize) -> Option<u8> {
        let window = self.data.get(self.pos..)?;
        for (offset, &byte) in window.iter().enumerate() {
            if byte == 0 {
                return None;
            }
            if offset == n {
                return Some(byte);
            }
        }
        None
    }

    pub fn is_eof(&self) -> bool {
        self.peek().is_none()
    }

    /// Steps past the current byte and returns the new current byte.
    pub fn advance(&mut self) -> Option<u8> {
        if let Some(byte) = self.peek() {
            self.pos += 1;
            if byte == b'\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.peek()
    }

    /// Advances `count` bytes, stopping early at end of input.
    pub fn advance_by(&mut self, count: usize) {
        for _ in 0..count {
            if self.is_eof() {
                break;
            }
            self.advance();
        }
    }

    /// Skips whitespace and returns the first byte that is not whitespace.
    pub fn skip_space(&mut self) -> Option<u8> {
        while let Some(byte) = self.peek() {
            if !is_space(byte) {
                return Some(byte);
            }
            self.advance();
        }
        None
    }

    /// Everything from the cursor to the end of the slice.
    pub fn remaining(&self) -> &'i [u8] {
        self.data.get(self.pos..).unwrap_or_default()
    }
}
