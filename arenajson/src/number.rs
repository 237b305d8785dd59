// SPDX-License-Identifier: Apache-2.0

//! Strict JSON number validation.
//!
//! A number token is the longest run of bytes from the number alphabet
//! (`0-9 + - . e E`). The run is walked by a small state machine that accepts
//! exactly `-?(0|[1-9][0-9]*)(\.[0-9]+)?([eE][+-]?[0-9]+)?`; the validated text
//! is then handed to the correctly rounded `f64` parser from `core`.

/// Ways a number token can be malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberErrorKind {
    LeadingPlus,
    LeadingZero,
    MissingDigits,
    TooManyDots,
    MissingFraction,
    TooManyExponents,
    DotInExponent,
    MisplacedSign,
    MissingExponentDigits,
    /// Grammatically fine, but the magnitude overflows a double.
    NotFinite,
}

impl core::fmt::Display for NumberErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let text = match self {
            Self::LeadingPlus => "Leading '+' is not allowed in a <number>",
            Self::LeadingZero => "Leading '0' must stand alone in a <number>",
            Self::MissingDigits => "Expected a digit in a <number>",
            Self::TooManyDots => "Too many '.' are presented in a <number>",
            Self::MissingFraction => "Expected a digit after '.' in a <number>",
            Self::TooManyExponents => "Too many exponent markers are presented in a <number>",
            Self::DotInExponent => "Unexpected '.' in the exponent of a <number>",
            Self::MisplacedSign => "Unexpected sign in a <number>",
            Self::MissingExponentDigits => "Expected a digit in the exponent of a <number>",
            Self::NotFinite => "Value is out of range for a <number>",
        };
        f.write_str(text)
    }
}

/// A malformed number, with the offset of the offending byte inside the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberError {
    pub kind: NumberErrorKind,
    pub offset: usize,
}

/// A validated number token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScannedNumber {
    /// Bytes consumed from the input.
    pub len: usize,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    Sign,
    Zero,
    Integer,
    Dot,
    Fraction,
    Exponent,
    ExponentSign,
    ExponentDigits,
}

impl State {
    fn step(self, byte: u8) -> Result<State, NumberErrorKind> {
        use NumberErrorKind::*;
        use State::*;

        match (self, byte) {
            (Start, b'-') => Ok(Sign),
            (Start, b'+') => Err(LeadingPlus),
            (Start | Sign, b'0') => Ok(Zero),
            (Start | Sign, b'1'..=b'9') => Ok(Integer),
            (Start | Sign, _) => Err(MissingDigits),

            (Zero, b'0'..=b'9') => Err(LeadingZero),
            (Integer, b'0'..=b'9') => Ok(Integer),
            (Fraction, b'0'..=b'9') => Ok(Fraction),
            (Zero | Integer, b'.') => Ok(Dot),
            (Zero | Integer | Fraction, b'e' | b'E') => Ok(Exponent),
            (Zero | Integer | Fraction, _) if byte == b'.' => Err(TooManyDots),
            (Zero | Integer | Fraction, _) => Err(MisplacedSign),

            (Dot, b'0'..=b'9') => Ok(Fraction),
            (Dot, b'.') => Err(TooManyDots),
            (Dot, _) => Err(MissingFraction),

            (Exponent, b'+' | b'-') => Ok(ExponentSign),
            (Exponent | ExponentSign | ExponentDigits, b'0'..=b'9') => Ok(ExponentDigits),
            (Exponent | ExponentSign | ExponentDigits, b'.') => Err(DotInExponent),
            (Exponent | ExponentSign | ExponentDigits, b'e' | b'E') => Err(TooManyExponents),
            (Exponent, _) => Err(MissingExponentDigits),
            (ExponentSign | ExponentDigits, _) => Err(MisplacedSign),
        }
    }

    /// The error for a token that stops in this state, if it is not accepting.
    fn finish(self) -> Option<NumberErrorKind> {
        match self {
            State::Zero | State::Integer | State::Fraction | State::ExponentDigits => None,
            State::Start | State::Sign => Some(NumberErrorKind::MissingDigits),
            State::Dot => Some(NumberErrorKind::MissingFraction),
            State::Exponent | State::ExponentSign => Some(NumberErrorKind::MissingExponentDigits),
        }
    }
}

/// Whether `byte` can appear anywhere in a number token.
pub fn is_number_byte(byte: u8) -> bool {
    matches!(byte, b'0'..=b'9' | b'+' | b'-' | b'.' | b'e' | b'E')
}

/// Length of the number token at the start of `input`.
pub fn token_len(input: &[u8]) -> usize {
    input
        .iter()
        .position(|&b| !is_number_byte(b))
        .unwrap_or(input.len())
}

/// Validates and converts the number token at the start of `input`.
///
/// Bytes after the token are left for the caller to judge.
pub fn scan(input: &[u8]) -> Result<ScannedNumber, NumberError> {
    let len = token_len(input);
    let token = &input[..len];

    let mut state = State::Start;
    for (offset, &byte) in token.iter().enumerate() {
        state = state
            .step(byte)
            .map_err(|kind| NumberError { kind, offset })?;
    }
    if let Some(kind) = state.finish() {
        return Err(NumberError { kind, offset: len });
    }

    let not_finite = NumberError {
        kind: NumberErrorKind::NotFinite,
        offset: 0,
    };
    // The alphabet is ASCII, so the token is always valid UTF-8.
    let text = core::str::from_utf8(token).map_err(|_| not_finite)?;
    let value: f64 = text.parse().map_err(|_| not_finite)?;
    if !value.is_finite() {
        return Err(not_finite);
    }
    Ok(ScannedNumber { len, value })
}
