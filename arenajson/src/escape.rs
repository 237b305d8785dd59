// SPDX-License-Identifier: Apache-2.0

/// Failures while decoding a backslash escape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeError {
    /// The byte after the backslash is not a known escape.
    UnknownEscape,
    /// A `\u` escape contained a byte that is not a hex digit.
    InvalidHexDigit,
    /// A surrogate half without its partner, or a pair in the wrong order.
    UnpairedSurrogate,
    /// More than four hex digits were fed, or the sequence was processed early.
    IncompleteSequence,
}

/// Pure helpers for decoding JSON escape sequences.
pub struct EscapeProcessor;

impl EscapeProcessor {
    /// Process a simple escape sequence character and return the unescaped byte.
    ///
    /// # Arguments
    /// * `escape_char` - The character following the backslash in an escape sequence
    ///
    /// # Returns
    /// The unescaped byte value, or an error if the escape sequence is invalid.
    pub fn process_simple_escape(escape_char: u8) -> Result<u8, EscapeError> {
        match escape_char {
            b'n' => Ok(b'\n'),
            b't' => Ok(b'\t'),
            b'r' => Ok(b'\r'),
            b'\\' => Ok(b'\\'),
            b'"' => Ok(b'"'),
            b'/' => Ok(b'/'),
            b'b' => Ok(0x08), // Backspace
            b'f' => Ok(0x0C), // Form feed
            _ => Err(EscapeError::UnknownEscape),
        }
    }

    /// Validate that a byte represents a valid hexadecimal digit.
    ///
    /// # Returns
    /// The numeric value (0-15) of the hex digit, or an error if invalid.
    pub fn validate_hex_digit(byte: u8) -> Result<u32, EscapeError> {
        match byte {
            b'0'..=b'9' => Ok((byte - b'0') as u32),
            b'a'..=b'f' => Ok((byte - b'a' + 10) as u32),
            b'A'..=b'F' => Ok((byte - b'A' + 10) as u32),
            _ => Err(EscapeError::InvalidHexDigit),
        }
    }

    /// Check if a Unicode codepoint is a high surrogate (0xD800-0xDBFF)
    pub fn is_high_surrogate(codepoint: u32) -> bool {
        (0xD800..=0xDBFF).contains(&codepoint)
    }

    /// Check if a Unicode codepoint is a low surrogate (0xDC00-0xDFFF)
    pub fn is_low_surrogate(codepoint: u32) -> bool {
        (0xDC00..=0xDFFF).contains(&codepoint)
    }

    /// Combine a high and low surrogate pair into a single Unicode codepoint
    pub fn combine_surrogate_pair(high: u32, low: u32) -> Result<u32, EscapeError> {
        if !Self::is_high_surrogate(high) || !Self::is_low_surrogate(low) {
            return Err(EscapeError::UnpairedSurrogate);
        }
        Ok(0x10000 + ((high & 0x3FF) << 10) + (low & 0x3FF))
    }
}

/// Collects the four hex digits of a `\uXXXX` escape.
///
/// A high surrogate is held back until the next escape supplies the low half,
/// so a surrogate pair decodes to a single `char`.
#[derive(Debug, Default)]
pub struct UnicodeEscapeCollector {
    codepoint: u32,
    digits: usize,
    pending_high_surrogate: Option<u32>,
}

impl UnicodeEscapeCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset for the next `\uXXXX`, keeping any pending high surrogate.
    pub fn reset(&mut self) {
        self.codepoint = 0;
        self.digits = 0;
    }

    /// Reset completely, including any pending surrogate state.
    pub fn reset_all(&mut self) {
        self.reset();
        self.pending_high_surrogate = None;
    }

    /// Add a hex digit. Returns true once the fourth digit is in.
    pub fn add_hex_digit(&mut self, digit: u8) -> Result<bool, EscapeError> {
        let value = EscapeProcessor::validate_hex_digit(digit)?;
        if self.digits >= 4 {
            return Err(EscapeError::IncompleteSequence);
        }
        self.codepoint = (self.codepoint << 4) | value;
        self.digits += 1;
        Ok(self.digits == 4)
    }

    /// Decode the collected digits.
    ///
    /// Returns `Ok(None)` for a high surrogate, which stays pending until the
    /// next escape completes the pair.
    pub fn process(&mut self) -> Result<Option<char>, EscapeError> {
        if self.digits != 4 {
            return Err(EscapeError::IncompleteSequence);
        }
        let codepoint = self.codepoint;
        let combined = match self.pending_high_surrogate.take() {
            Some(high) => EscapeProcessor::combine_surrogate_pair(high, codepoint)?,
            None if EscapeProcessor::is_high_surrogate(codepoint) => {
                self.pending_high_surrogate = Some(codepoint);
                return Ok(None);
            }
            None if EscapeProcessor::is_low_surrogate(codepoint) => {
                return Err(EscapeError::UnpairedSurrogate)
            }
            None => codepoint,
        };
        char::from_u32(combined)
            .map(Some)
            .ok_or(EscapeError::UnpairedSurrogate)
    }

    /// Check if there's a pending high surrogate waiting for a low surrogate
    pub fn has_pending_high_surrogate(&self) -> bool {
        self.pending_high_surrogate.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(collector: &mut UnicodeEscapeCollector, hex: &[u8]) -> Result<Option<char>, EscapeError> {
        collector.reset();
        for &digit in hex {
            collector.add_hex_digit(digit)?;
        }
        collector.process()
    }

    #[test]
    fn test_simple_escapes() {
        assert_eq!(EscapeProcessor::process_simple_escape(b'n').unwrap(), b'\n');
        assert_eq!(EscapeProcessor::process_simple_escape(b't').unwrap(), b'\t');
        assert_eq!(EscapeProcessor::process_simple_escape(b'r').unwrap(), b'\r');
        assert_eq!(
            EscapeProcessor::process_simple_escape(b'\\').unwrap(),
            b'\\'
        );
        assert_eq!(EscapeProcessor::process_simple_escape(b'"').unwrap(), b'"');
        assert_eq!(EscapeProcessor::process_simple_escape(b'/').unwrap(), b'/');
        assert_eq!(EscapeProcessor::process_simple_escape(b'b').unwrap(), 0x08);
        assert_eq!(EscapeProcessor::process_simple_escape(b'f').unwrap(), 0x0C);
    }

    #[test]
    fn test_invalid_simple_escape() {
        assert_eq!(
            EscapeProcessor::process_simple_escape(b'x'),
            Err(EscapeError::UnknownEscape)
        );
        assert!(EscapeProcessor::process_simple_escape(b'u').is_err());
        assert!(EscapeProcessor::process_simple_escape(b'1').is_err());
    }

    #[test]
    fn test_hex_digit_validation() {
        assert_eq!(EscapeProcessor::validate_hex_digit(b'0').unwrap(), 0);
        assert_eq!(EscapeProcessor::validate_hex_digit(b'9').unwrap(), 9);
        assert_eq!(EscapeProcessor::validate_hex_digit(b'a').unwrap(), 10);
        assert_eq!(EscapeProcessor::validate_hex_digit(b'f').unwrap(), 15);
        assert_eq!(EscapeProcessor::validate_hex_digit(b'A').unwrap(), 10);
        assert_eq!(EscapeProcessor::validate_hex_digit(b'F').unwrap(), 15);

        assert!(EscapeProcessor::validate_hex_digit(b'g').is_err());
        assert!(EscapeProcessor::validate_hex_digit(b'G').is_err());
        assert!(EscapeProcessor::validate_hex_digit(b' ').is_err());
    }

    #[test]
    fn hex_is_accumulated_in_base_sixteen() {
        let mut collector = UnicodeEscapeCollector::new();
        assert_eq!(collect(&mut collector, b"0041"), Ok(Some('A')));
        assert_eq!(collect(&mut collector, b"00e9"), Ok(Some('é')));
        assert_eq!(collect(&mut collector, b"03B1"), Ok(Some('α')));
        assert_eq!(collect(&mut collector, b"20AC"), Ok(Some('€')));
        assert_eq!(collect(&mut collector, b"0000"), Ok(Some('\0')));
    }

    #[test]
    fn fifth_digit_is_rejected() {
        let mut collector = UnicodeEscapeCollector::new();
        for &digit in b"0041" {
            collector.add_hex_digit(digit).unwrap();
        }
        assert_eq!(
            collector.add_hex_digit(b'1'),
            Err(EscapeError::IncompleteSequence)
        );
    }

    #[test]
    fn early_processing_is_rejected() {
        let mut collector = UnicodeEscapeCollector::new();
        assert!(!collector.add_hex_digit(b'0').unwrap());
        assert!(!collector.add_hex_digit(b'0').unwrap());
        assert_eq!(collector.process(), Err(EscapeError::IncompleteSequence));
    }

    #[test]
    fn test_surrogate_pair_combination() {
        let combined = EscapeProcessor::combine_surrogate_pair(0xD801, 0xDC37).unwrap();
        assert_eq!(combined, 0x10437);

        let combined = EscapeProcessor::combine_surrogate_pair(0xD834, 0xDD1E).unwrap();
        assert_eq!(combined, 0x1D11E);

        assert!(EscapeProcessor::combine_surrogate_pair(0x0041, 0xDC37).is_err());
        assert!(EscapeProcessor::combine_surrogate_pair(0xD801, 0x0041).is_err());
    }

    #[test]
    fn collector_combines_surrogate_pairs() {
        let mut collector = UnicodeEscapeCollector::new();
        assert_eq!(collect(&mut collector, b"D83D"), Ok(None));
        assert!(collector.has_pending_high_surrogate());
        assert_eq!(collect(&mut collector, b"DE00"), Ok(Some('😀')));
        assert!(!collector.has_pending_high_surrogate());
    }

    #[test]
    fn collector_rejects_lone_surrogates() {
        let mut collector = UnicodeEscapeCollector::new();
        assert_eq!(
            collect(&mut collector, b"DC37"),
            Err(EscapeError::UnpairedSurrogate)
        );

        assert_eq!(collect(&mut collector, b"D801"), Ok(None));
        assert_eq!(
            collect(&mut collector, b"0041"),
            Err(EscapeError::UnpairedSurrogate)
        );

        collector.reset_all();
        assert!(!collector.has_pending_high_surrogate());
    }
}
