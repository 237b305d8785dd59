// SPDX-License-Identifier: Apache-2.0

// Error codes, locations and messages for malformed input

use arenajson::{parse, ErrorCode, Limits, Location, ParseError, Session, ValueKind};
use test_log::test;

fn parse_err(input: &str) -> ParseError {
    match parse(input.as_bytes()) {
        Ok(document) => panic!("{input:?} parsed into {:?}", document.root()),
        Err(err) => err,
    }
}

fn assert_code(input: &str, code: ErrorCode) {
    let err = parse_err(input);
    assert_eq!(err.code(), code, "{input:?}: {}", err.message());
}

#[test]
fn test_document_shape() {
    assert_code("", ErrorCode::WrongFormat);
    assert_code(" \t\r\n ", ErrorCode::WrongFormat);
    assert_code("42", ErrorCode::WrongFormat);
    assert_code("true", ErrorCode::WrongFormat);
    assert_code("null", ErrorCode::WrongFormat);
    assert_code(r#""text""#, ErrorCode::WrongFormat);
    assert_code("[] []", ErrorCode::WrongFormat);
    assert_code("{} x", ErrorCode::WrongFormat);
}

#[test]
fn test_nul_ends_input() {
    assert_code("\0[]", ErrorCode::WrongFormat);
    assert!(parse(b"[1]\0garbage").is_ok());
    assert_code("[1\0]", ErrorCode::UnmatchedToken);
}

#[test]
fn test_trailing_commas() {
    assert_code("[1,]", ErrorCode::UnexpectedToken);
    assert_code(r#"{"a":1,}"#, ErrorCode::UnmatchedToken);
}

#[test]
fn test_unterminated_input() {
    assert_code("[", ErrorCode::UnmatchedToken);
    assert_code("{", ErrorCode::UnmatchedToken);
    assert_code(r#"{"a""#, ErrorCode::UnmatchedToken);
    assert_code(r#"{"a":"#, ErrorCode::UnmatchedToken);
    assert_code(r#"["abc"#, ErrorCode::UnmatchedToken);
    assert_code(r#"["abc\"#, ErrorCode::UnmatchedToken);
    assert_code(r#"["\u12"#, ErrorCode::UnmatchedToken);
    assert_code("[[[1]]", ErrorCode::UnmatchedToken);
}

#[test]
fn test_malformed_numbers() {
    for input in ["00", "+1", "1.", ".5", "1e", "1e+", "1e-", "1..2", "1e1e1", "-", "1.e5", "01.5"] {
        assert_code(&format!("[{input}]"), ErrorCode::UnexpectedToken);
    }
}

#[test]
fn test_number_out_of_range() {
    assert_code("[1e400]", ErrorCode::InvalidValue);
    assert_code("[-1e400]", ErrorCode::InvalidValue);
    // Underflow rounds to zero.
    assert!(parse(b"[1e-400]").is_ok());
}

#[test]
fn test_bad_literals() {
    assert_code("[tru]", ErrorCode::UnexpectedToken);
    assert_code("[nul]", ErrorCode::UnexpectedToken);
    assert_code("[True]", ErrorCode::UnexpectedToken);
    assert_code("[falsey]", ErrorCode::UnexpectedToken);
    let err = parse_err("[nothing]");
    assert!(err.message().starts_with("Unexpected token 'nothing'"), "{}", err.message());
}

#[test]
fn test_bad_escapes() {
    assert_code(r#"["\q"]"#, ErrorCode::UnknownToken);
    assert_code(r#"["\x41"]"#, ErrorCode::UnknownToken);
    assert_code(r#"["\u00G1"]"#, ErrorCode::UnknownToken);
    assert_code(r#"["\u 041"]"#, ErrorCode::UnknownToken);
}

#[test]
fn test_raw_line_breaks_in_strings() {
    assert_code("[\"a\nb\"]", ErrorCode::UnexpectedToken);
    assert_code("[\"a\rb\"]", ErrorCode::UnexpectedToken);
}

#[test]
fn test_invalid_utf8() {
    assert_eq!(
        parse(b"[\"\xff\xfe\"]").unwrap_err().code(),
        ErrorCode::InvalidValue
    );
    assert_eq!(
        parse(b"{\"\xc3\": 1}").unwrap_err().code(),
        ErrorCode::InvalidValue
    );
}

#[test]
fn test_structural_mismatches() {
    assert_code(r#"[1 2]"#, ErrorCode::UnmatchedToken);
    assert_code(r#"{"a" 1}"#, ErrorCode::UnmatchedToken);
    assert_code(r#"{"a":1 "b":2}"#, ErrorCode::UnmatchedToken);
    assert_code(r#"{1:2}"#, ErrorCode::UnmatchedToken);
    assert_code(r#"[}"#, ErrorCode::UnexpectedToken);
    assert_code(r#"[:]"#, ErrorCode::UnexpectedToken);
}

#[test]
fn test_location_is_tracked_across_lines() {
    let err = parse_err("{\n  \"a\": 1,\n  \"b\": ?\n}");
    assert_eq!(err.code(), ErrorCode::UnexpectedToken);
    assert_eq!(err.location(), Location { line: 3, column: 8 });
    assert_eq!(err.location().to_string(), "line 3, column 8");
}

#[test]
fn test_message_trailer() {
    let err = parse_err(r#"{"a": [1, 2, ?]}"#);
    assert_eq!(err.parsing(), Some(ValueKind::Array));
    assert_eq!(
        err.message(),
        "Unexpected token '?'\n\tAt line 1, column 14. Parsing token: <array>."
    );
    assert_eq!(
        err.to_string(),
        format!("UnexpectedToken: {}", err.message())
    );

    let err = parse_err("7");
    assert_eq!(err.parsing(), None);
    assert!(err.message().ends_with("Parsing token: <unknown>."), "{}", err.message());
}

#[test]
fn test_bad_literal_names_the_attempted_literal() {
    let err = parse_err("[tru]");
    assert_eq!(err.parsing(), Some(ValueKind::Boolean));
    assert!(err.message().ends_with("Parsing token: <boolean>."), "{}", err.message());

    let err = parse_err(r#"{"k": nul}"#);
    assert_eq!(err.parsing(), Some(ValueKind::Null));

    let err = parse_err("[x]");
    assert_eq!(err.parsing(), None);
    assert!(err.message().ends_with("Parsing token: <unknown>."), "{}", err.message());

    // A good literal hands the label back to its container.
    let err = parse_err("[true, }");
    assert_eq!(err.parsing(), Some(ValueKind::Array));
}

#[test]
fn test_error_inside_string_names_string() {
    let err = parse_err(r#"{"k": "bad \z"}"#);
    assert_eq!(err.parsing(), Some(ValueKind::String));
    assert!(err.message().contains("<string>"), "{}", err.message());
}

#[test]
fn test_long_tokens_are_capped() {
    let word = "x".repeat(5000);
    let err = parse_err(&format!("[{word}]"));
    assert_eq!(err.code(), ErrorCode::UnexpectedToken);
    assert!(err.message().len() <= arenajson::MESSAGE_CAPACITY);
    assert!(err.message().starts_with("Unexpected token 'xxx"));
    assert!(err.message().contains("At line 1, column 2"), "{}", err.message());
    assert!(err.message().ends_with("Parsing token: <unknown>."));
}

#[test]
fn test_input_size_limit() {
    let mut session = Session::new().with_limits(Limits::default().with_max_input_size(8));
    assert!(session.parse(b"[1,2,3]").is_some());
    assert!(session.parse(b"[1,2,3,4]").is_none());
    assert_eq!(session.error(), ErrorCode::WrongFormat);
}

#[test]
fn test_error_codes_have_stable_names() {
    let names: Vec<&str> = [
        ErrorCode::None,
        ErrorCode::InvalidValue,
        ErrorCode::WrongFormat,
        ErrorCode::UnmatchedToken,
        ErrorCode::UnknownToken,
        ErrorCode::UnexpectedToken,
        ErrorCode::UnsupportedToken,
        ErrorCode::OutOfMemory,
        ErrorCode::InternalFatal,
    ]
    .iter()
    .map(ErrorCode::as_str)
    .collect();
    assert_eq!(
        names,
        [
            "None",
            "InvalidValue",
            "WrongFormat",
            "UnmatchedToken",
            "UnknownToken",
            "UnexpectedToken",
            "UnsupportedToken",
            "OutOfMemory",
            "InternalFatal"
        ]
    );
    assert_eq!(ErrorCode::default(), ErrorCode::None);
}
