// SPDX-License-Identifier: Apache-2.0

//! Recursive-descent parser.
//!
//! Each production consumes its token from the [`CharStream`] and returns the
//! finished [`Value`]. Failures are returned as [`ParseError`] and travel up
//! through `?` to [`parse_in`], which is the only place a caller sees them.
//! Composite payloads are gathered in [`TempArray`]s on the stack of the
//! production that owns them, then copied into the arena when the composite
//! closes. Strings do not nest, so one string builder on the parser is reused.

use core::fmt;

use crate::allocator::{Allocator, OutOfMemory};
use crate::arena::Arena;
use crate::error::{ErrorCode, ParseError};
use crate::escape::{EscapeError, EscapeProcessor, UnicodeEscapeCollector};
use crate::limits::Limits;
use crate::number::{self, NumberError, NumberErrorKind, ScannedNumber};
use crate::stream::CharStream;
use crate::temp_array::{
    TempArray, ARRAY_INLINE_CAPACITY, OBJECT_INLINE_CAPACITY, STRING_INLINE_CAPACITY,
};
use crate::value::{JsonStr, ObjectEntry, Value, ValueKind};

/// Parses `input` into a tree stored in `arena`.
///
/// The root must be an array or an object, and nothing but whitespace may
/// follow it. A NUL byte ends the input early.
///
/// On failure the arena may already hold parts of the abandoned tree; they
/// are released with the arena.
pub fn parse_in<'a, A: Allocator>(
    arena: &'a Arena<A>,
    input: &[u8],
    limits: &Limits,
) -> Result<Value<'a>, ParseError> {
    Parser::new(arena, input, *limits).parse_document()
}

/// Prints a byte as the character it stands for, or as `\xNN`.
struct Shown(u8);

impl fmt::Display for Shown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_ascii_graphic() || self.0 == b' ' {
            write!(f, "{}", self.0 as char)
        } else {
            write!(f, "\\x{:02X}", self.0)
        }
    }
}

struct Parser<'i, 'a, A: Allocator> {
    stream: CharStream<'i>,
    arena: &'a Arena<A>,
    limits: Limits,
    depth: usize,
    /// Kind of the innermost production, for error messages.
    parsing: Option<ValueKind>,
    text: TempArray<'a, u8, STRING_INLINE_CAPACITY, A>,
    unicode: UnicodeEscapeCollector,
}

impl<'i, 'a, A: Allocator> Parser<'i, 'a, A> {
    fn new(arena: &'a Arena<A>, input: &'i [u8], limits: Limits) -> Self {
        Self {
            stream: CharStream::new(input),
            arena,
            limits,
            depth: 0,
            parsing: None,
            text: TempArray::new(arena.allocator()),
            unicode: UnicodeEscapeCollector::new(),
        }
    }

    fn error(&self, code: ErrorCode, detail: fmt::Arguments<'_>) -> ParseError {
        ParseError::new(code, detail, self.stream.location(), self.parsing)
    }

    fn fail<T>(&self, code: ErrorCode, detail: fmt::Arguments<'_>) -> Result<T, ParseError> {
        Err(self.error(code, detail))
    }

    fn out_of_memory(&self, err: OutOfMemory) -> ParseError {
        self.error(err.into(), format_args!("Out of memory"))
    }

    fn parse_document(mut self) -> Result<Value<'a>, ParseError> {
        let size = self.stream.remaining().len();
        if size > self.limits.max_input_size {
            return self.fail(
                ErrorCode::WrongFormat,
                format_args!(
                    "Input of {} bytes exceeds the limit of {} bytes",
                    size, self.limits.max_input_size
                ),
            );
        }

        match self.stream.skip_space() {
            Some(b'[' | b'{') => {}
            Some(byte) => {
                return self.fail(
                    ErrorCode::WrongFormat,
                    format_args!(
                        "Expected '[' or '{{' at the start of a document, found '{}'",
                        Shown(byte)
                    ),
                )
            }
            None => {
                return self.fail(
                    ErrorCode::WrongFormat,
                    format_args!("Empty document, expected '[' or '{{'"),
                )
            }
        }

        let root = self.parse_value()?;
        self.parsing = None;
        if let Some(byte) = self.stream.skip_space() {
            return self.fail(
                ErrorCode::WrongFormat,
                format_args!("Unexpected '{}' after the root value", Shown(byte)),
            );
        }
        log::debug!(
            "parsed {} bytes into a root {} of {} items, {} arena bytes",
            self.stream.position(),
            root.kind(),
            root.len(),
            self.arena.used_bytes()
        );
        Ok(root)
    }

    fn parse_value(&mut self) -> Result<Value<'a>, ParseError> {
        match self.stream.skip_space() {
            Some(b'[') => self.parse_array(),
            Some(b'{') => self.parse_object(),
            Some(b'"') => self.parse_string().map(Value::String),
            Some(b'-' | b'+' | b'0'..=b'9') => self.parse_number(),
            Some(byte) if byte.is_ascii_alphabetic() => self.parse_literal(),
            Some(byte) => self.fail(
                ErrorCode::UnexpectedToken,
                format_args!("Unexpected token '{}'", Shown(byte)),
            ),
            None => self.fail(
                ErrorCode::UnmatchedToken,
                format_args!("Expected a value, reached end of input"),
            ),
        }
    }

    /// Skips whitespace, then consumes `expected`.
    fn expect(&mut self, expected: u8) -> Result<(), ParseError> {
        match self.stream.skip_space() {
            Some(byte) if byte == expected => {
                self.stream.advance();
                Ok(())
            }
            Some(byte) => self.fail(
                ErrorCode::UnmatchedToken,
                format_args!("Expected '{}', found '{}'", expected as char, Shown(byte)),
            ),
            None => self.fail(
                ErrorCode::UnmatchedToken,
                format_args!("Expected '{}', reached end of input", expected as char),
            ),
        }
    }

    /// Opens a composite: checks the depth limit and consumes `open`.
    fn enter(&mut self, kind: ValueKind, open: u8) -> Result<Option<ValueKind>, ParseError> {
        let outer = self.parsing.replace(kind);
        if self.depth >= self.limits.max_depth {
            return self.fail(
                ErrorCode::UnsupportedToken,
                format_args!(
                    "Nesting deeper than {} levels is not supported",
                    self.limits.max_depth
                ),
            );
        }
        self.expect(open)?;
        self.depth += 1;
        Ok(outer)
    }

    fn leave(&mut self, outer: Option<ValueKind>) {
        self.depth -= 1;
        self.parsing = outer;
    }

    fn parse_array(&mut self) -> Result<Value<'a>, ParseError> {
        let outer = self.enter(ValueKind::Array, b'[')?;
        let mut items =
            TempArray::<Value<'a>, ARRAY_INLINE_CAPACITY, A>::new(self.arena.allocator());

        while self.stream.skip_space() != Some(b']') {
            if items.len() > 0 {
                self.expect(b',')?;
            }
            let item = self.parse_value()?;
            items.push(item).map_err(|e| self.out_of_memory(e))?;
        }
        self.expect(b']')?;

        let items = items
            .finalize(self.arena)
            .map_err(|e| self.out_of_memory(e))?;
        log::trace!("array of {} items at depth {}", items.len(), self.depth);
        self.leave(outer);
        Ok(Value::Array(items))
    }

    fn parse_object(&mut self) -> Result<Value<'a>, ParseError> {
        let outer = self.enter(ValueKind::Object, b'{')?;
        let mut entries =
            TempArray::<ObjectEntry<'a>, OBJECT_INLINE_CAPACITY, A>::new(self.arena.allocator());

        while self.stream.skip_space() != Some(b'}') {
            if entries.len() > 0 {
                self.expect(b',')?;
            }
            let name = self.parse_string()?;
            self.expect(b':')?;
            let value = self.parse_value()?;
            entries
                .push(ObjectEntry { name, value })
                .map_err(|e| self.out_of_memory(e))?;
        }
        self.expect(b'}')?;

        let entries = entries
            .finalize(self.arena)
            .map_err(|e| self.out_of_memory(e))?;
        log::trace!("object of {} entries at depth {}", entries.len(), self.depth);
        self.leave(outer);
        Ok(Value::Object(entries))
    }

    fn push_text(&mut self, byte: u8) -> Result<(), ParseError> {
        self.text.push(byte).map_err(|e| self.out_of_memory(e))
    }

    /// Parses a quoted string, used for both string values and member names.
    fn parse_string(&mut self) -> Result<JsonStr<'a>, ParseError> {
        let outer = self.parsing.replace(ValueKind::String);
        self.expect(b'"')?;
        self.text.clear();
        self.unicode.reset_all();

        loop {
            match self.stream.peek() {
                Some(b'"') => {
                    self.stream.advance();
                    break;
                }
                Some(b'\\') => self.parse_escape()?,
                Some(b'\r' | b'\n') => {
                    return self.fail(
                        ErrorCode::UnexpectedToken,
                        format_args!("Line breaks must be escaped in a <string>"),
                    )
                }
                Some(byte) => {
                    self.push_text(byte)?;
                    self.stream.advance();
                }
                None => {
                    return self.fail(
                        ErrorCode::UnmatchedToken,
                        format_args!("Expected '\"' to close a <string>, reached end of input"),
                    )
                }
            }
        }

        debug_assert!(!self.unicode.has_pending_high_surrogate());
        let text = if self.text.len() == 0 {
            JsonStr::EMPTY
        } else {
            let bytes = self
                .text
                .finalize_terminated(self.arena, 0)
                .map_err(|e| self.out_of_memory(e))?;
            let text = core::str::from_utf8(bytes).map_err(|e| {
                self.error(
                    ErrorCode::InvalidValue,
                    format_args!("Invalid UTF-8 at byte {} of a <string>", e.valid_up_to()),
                )
            })?;
            JsonStr::from_terminated(text).ok_or_else(|| {
                self.error(
                    ErrorCode::InternalFatal,
                    format_args!("String lost its terminator"),
                )
            })?
        };
        self.parsing = outer;
        Ok(text)
    }

    /// Decodes one escape sequence; the cursor is on the backslash.
    fn parse_escape(&mut self) -> Result<(), ParseError> {
        let Some(code) = self.stream.advance() else {
            return self.fail(
                ErrorCode::UnmatchedToken,
                format_args!("Unterminated escape sequence in a <string>"),
            );
        };
        if code == b'u' {
            return self.parse_unicode_escape();
        }
        let byte = EscapeProcessor::process_simple_escape(code).map_err(|_| {
            self.error(
                ErrorCode::UnknownToken,
                format_args!("Unknown escape sequence '\\{}'", Shown(code)),
            )
        })?;
        self.push_text(byte)?;
        self.stream.advance();
        Ok(())
    }

    /// Decodes `\uXXXX`; the cursor is on the `u`.
    fn parse_unicode_escape(&mut self) -> Result<(), ParseError> {
        self.unicode.reset();
        for _ in 0..4 {
            let Some(digit) = self.stream.advance() else {
                return self.fail(
                    ErrorCode::UnmatchedToken,
                    format_args!("Unterminated '\\u' escape in a <string>"),
                );
            };
            self.unicode.add_hex_digit(digit).map_err(|_| {
                self.error(
                    ErrorCode::UnknownToken,
                    format_args!("Invalid hex digit '{}' in a '\\u' escape", Shown(digit)),
                )
            })?;
        }
        let location = self.stream.location();
        self.stream.advance();

        match self.unicode.process() {
            Ok(Some(ch)) => {
                let mut buf = [0u8; 4];
                for &byte in ch.encode_utf8(&mut buf).as_bytes() {
                    self.push_text(byte)?;
                }
                Ok(())
            }
            Ok(None) => {
                if self.stream.peek() == Some(b'\\') && self.stream.peek_nth(1) == Some(b'u') {
                    return Ok(());
                }
                Err(ParseError::new(
                    ErrorCode::UnsupportedToken,
                    format_args!("High surrogate without a following low surrogate"),
                    location,
                    self.parsing,
                ))
            }
            Err(EscapeError::UnpairedSurrogate) => Err(ParseError::new(
                ErrorCode::UnsupportedToken,
                format_args!("Unpaired surrogate in a '\\u' escape"),
                location,
                self.parsing,
            )),
            Err(err) => self.fail(
                ErrorCode::InternalFatal,
                format_args!("Escape decoder failed: {:?}", err),
            ),
        }
    }

    fn parse_number(&mut self) -> Result<Value<'a>, ParseError> {
        let outer = self.parsing.replace(ValueKind::Number);
        match number::scan(self.stream.remaining()) {
            Ok(ScannedNumber { len, value }) => {
                self.stream.advance_by(len);
                self.parsing = outer;
                Ok(Value::Number(value))
            }
            Err(NumberError { kind, offset }) => {
                self.stream.advance_by(offset);
                let code = match kind {
                    NumberErrorKind::NotFinite => ErrorCode::InvalidValue,
                    _ => ErrorCode::UnexpectedToken,
                };
                self.fail(code, format_args!("{}", kind))
            }
        }
    }

    fn parse_literal(&mut self) -> Result<Value<'a>, ParseError> {
        let rest = self.stream.remaining();
        // Named after the literal the first letter could start.
        let attempted = match rest.first() {
            Some(b't' | b'f') => Some(ValueKind::Boolean),
            Some(b'n') => Some(ValueKind::Null),
            _ => None,
        };
        let outer = core::mem::replace(&mut self.parsing, attempted);
        let len = rest
            .iter()
            .position(|b| !b.is_ascii_alphabetic())
            .unwrap_or(rest.len());
        let word = &rest[..len];
        let value = match word {
            b"true" => Value::Boolean(true),
            b"false" => Value::Boolean(false),
            b"null" => Value::Null,
            _ => {
                return self.fail(
                    ErrorCode::UnexpectedToken,
                    format_args!(
                        "Unexpected token '{}'",
                        core::str::from_utf8(word).unwrap_or_default()
                    ),
                )
            }
        };
        self.stream.advance_by(len);
        self.parsing = outer;
        Ok(value)
    }
}
