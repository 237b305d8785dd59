// SPDX-License-Identifier: Apache-2.0

use alloc::string::String;
use core::fmt::{self, Write};

use crate::allocator::OutOfMemory;
use crate::stream::Location;
use crate::value::ValueKind;

/// Longest message a [`ParseError`] carries, in bytes.
pub const MESSAGE_CAPACITY: usize = 1024;

/// Classification of a failed parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorCode {
    /// No error: the document is healthy.
    #[default]
    None,
    /// Well-formed token with an unusable value (bad UTF-8, overflowing number).
    InvalidValue,
    /// The document as a whole has the wrong shape.
    WrongFormat,
    /// An expected delimiter or closing token was not found.
    UnmatchedToken,
    /// An escape sequence that JSON does not define.
    UnknownToken,
    /// A byte or word that cannot appear here.
    UnexpectedToken,
    /// Valid syntax this parser refuses (lone surrogates, excessive nesting).
    UnsupportedToken,
    /// The allocator refused a request.
    OutOfMemory,
    /// The parser broke one of its own invariants.
    InternalFatal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::None => "None",
            ErrorCode::InvalidValue => "InvalidValue",
            ErrorCode::WrongFormat => "WrongFormat",
            ErrorCode::UnmatchedToken => "UnmatchedToken",
            ErrorCode::UnknownToken => "UnknownToken",
            ErrorCode::UnexpectedToken => "UnexpectedToken",
            ErrorCode::UnsupportedToken => "UnsupportedToken",
            ErrorCode::OutOfMemory => "OutOfMemory",
            ErrorCode::InternalFatal => "InternalFatal",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed parse: what went wrong, where, and inside which kind of value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    code: ErrorCode,
    message: String,
    location: Location,
    parsing: Option<ValueKind>,
}

/// Writes into a `String` up to a byte cap, cutting at a char boundary.
struct Capped<'s> {
    out: &'s mut String,
    cap: usize,
}

impl Write for Capped<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = self.cap.saturating_sub(self.out.len());
        if s.len() <= room {
            self.out.push_str(s);
            return Ok(());
        }
        let mut cut = room;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        self.out.push_str(&s[..cut]);
        // Stop the formatter; the message is full.
        Err(fmt::Error)
    }
}

impl ParseError {
    /// Formats `detail` followed by the location trailer.
    ///
    /// `detail` is cut short so that the whole message, trailer included,
    /// fits in [`MESSAGE_CAPACITY`] bytes.
    pub fn new(
        code: ErrorCode,
        detail: fmt::Arguments<'_>,
        location: Location,
        parsing: Option<ValueKind>,
    ) -> Self {
        let kind = parsing.map_or("unknown", |kind| kind.name());
        let trailer = alloc::format!(
            "\n\tAt line {}, column {}. Parsing token: <{}>.",
            location.line, location.column, kind
        );
        let mut message = String::new();
        let mut out = Capped {
            out: &mut message,
            cap: MESSAGE_CAPACITY.saturating_sub(trailer.len()),
        };
        // A write error only means the cap was hit.
        let _ = write!(out, "{}", detail);
        message.push_str(&trailer);
        log::debug!("parse error {}: {}", code, message);
        Self {
            code,
            message,
            location,
            parsing,
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn line(&self) -> usize {
        self.location.line
    }

    pub fn column(&self) -> usize {
        self.location.column
    }

    pub fn location(&self) -> Location {
        self.location
    }

    /// Kind of value whose production was active, if any.
    pub fn parsing(&self) -> Option<ValueKind> {
        self.parsing
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl core::error::Error for ParseError {}

impl From<OutOfMemory> for ErrorCode {
    fn from(_: OutOfMemory) -> Self {
        ErrorCode::OutOfMemory
    }
}
