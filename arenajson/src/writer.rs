// SPDX-License-Identifier: Apache-2.0

//! Serializers for parsed trees.
//!
//! Output of either writer parses back into a tree that is equal to the
//! original: numbers use the shortest text that round-trips to the same
//! `f64`, and strings are re-escaped.

use alloc::string::String;
use core::fmt::{self, Write};

use crate::value::{JsonStr, ObjectEntry, Value};

const INDENT: &str = "    ";

/// Writes `value` with no insignificant whitespace.
pub fn write_compact<W: Write + ?Sized>(value: &Value<'_>, out: &mut W) -> fmt::Result {
    match *value {
        Value::Array(items) => {
            out.write_char('[')?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.write_char(',')?;
                }
                write_compact(item, out)?;
            }
            out.write_char(']')
        }
        Value::Object(entries) => {
            out.write_char('{')?;
            for (i, entry) in entries.iter().enumerate() {
                if i > 0 {
                    out.write_char(',')?;
                }
                write_string(entry.name, out)?;
                out.write_char(':')?;
                write_compact(&entry.value, out)?;
            }
            out.write_char('}')
        }
        _ => write_scalar(value, out),
    }
}

/// Writes `value` with one member per line, four-space indentation and
/// `"name" : value` members.
pub fn write_pretty<W: Write + ?Sized>(value: &Value<'_>, out: &mut W) -> fmt::Result {
    write_pretty_at(value, 0, out)
}

fn write_indent<W: Write + ?Sized>(level: usize, out: &mut W) -> fmt::Result {
    for _ in 0..level {
        out.write_str(INDENT)?;
    }
    Ok(())
}

fn write_pretty_at<W: Write + ?Sized>(value: &Value<'_>, level: usize, out: &mut W) -> fmt::Result {
    match *value {
        Value::Array(items) if !items.is_empty() => {
            out.write_str("[\n")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.write_str(",\n")?;
                }
                write_indent(level + 1, out)?;
                write_pretty_at(item, level + 1, out)?;
            }
            out.write_char('\n')?;
            write_indent(level, out)?;
            out.write_char(']')
        }
        Value::Object(entries) if !entries.is_empty() => {
            out.write_str("{\n")?;
            for (i, ObjectEntry { name, value }) in entries.iter().enumerate() {
                if i > 0 {
                    out.write_str(",\n")?;
                }
                write_indent(level + 1, out)?;
                write_string(*name, out)?;
                out.write_str(" : ")?;
                write_pretty_at(value, level + 1, out)?;
            }
            out.write_char('\n')?;
            write_indent(level, out)?;
            out.write_char('}')
        }
        _ => write_compact(value, out),
    }
}

fn write_scalar<W: Write + ?Sized>(value: &Value<'_>, out: &mut W) -> fmt::Result {
    match *value {
        Value::Null => out.write_str("null"),
        Value::Boolean(true) => out.write_str("true"),
        Value::Boolean(false) => out.write_str("false"),
        Value::Number(n) => write_number(n, out),
        Value::String(s) => write_string(s, out),
        Value::Array(_) => out.write_str("[]"),
        Value::Object(_) => out.write_str("{}"),
    }
}

/// Shortest round-trip form, without a trailing `.0` on integral values.
fn write_number<W: Write + ?Sized>(n: f64, out: &mut W) -> fmt::Result {
    if !n.is_finite() {
        // JSON has no spelling for these; only hand-built trees can hold them.
        return out.write_str("null");
    }
    let text = alloc::format!("{n:?}");
    out.write_str(text.strip_suffix(".0").unwrap_or(&text))
}

fn write_string<W: Write + ?Sized>(s: JsonStr<'_>, out: &mut W) -> fmt::Result {
    out.write_char('"')?;
    let text = s.as_str();
    let mut plain = 0;
    for (i, byte) in text.bytes().enumerate() {
        let escape = match byte {
            b'"' => "\\\"",
            b'\\' => "\\\\",
            b'\n' => "\\n",
            b'\r' => "\\r",
            b'\t' => "\\t",
            0x08 => "\\b",
            0x0C => "\\f",
            0x00..=0x1F => "",
            _ => continue,
        };
        out.write_str(&text[plain..i])?;
        if escape.is_empty() {
            write!(out, "\\u{:04x}", byte)?;
        } else {
            out.write_str(escape)?;
        }
        plain = i + 1;
    }
    out.write_str(&text[plain..])?;
    out.write_char('"')
}

pub fn to_compact_string(value: &Value<'_>) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_compact(value, &mut out);
    out
}

pub fn to_pretty_string(value: &Value<'_>) -> String {
    let mut out = String::new();
    let _ = write_pretty(value, &mut out);
    out
}

/// `{}` writes the compact form, `{:#}` the pretty form.
impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write_pretty(self, f)
        } else {
            write_compact(self, f)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;
    use crate::limits::Limits;
    use crate::parser::parse_in;

    fn round_trip(input: &str) {
        let arena = Arena::new();
        let original = parse_in(&arena, input.as_bytes(), &Limits::default()).unwrap();
        for text in [to_compact_string(&original), to_pretty_string(&original)] {
            let reparsed = parse_in(&arena, text.as_bytes(), &Limits::default()).unwrap();
            assert_eq!(original, reparsed, "{text}");
        }
    }

    #[test]
    fn compact_output() {
        let arena = Arena::new();
        let root = parse_in(
            &arena,
            br#" { "a" : [ 1 , 2.5 , -0 ] , "b" : { } , "c" : [ ] , "d" : "x" , "e" : null } "#,
            &Limits::default(),
        )
        .unwrap();
        assert_eq!(
            to_compact_string(&root),
            r#"{"a":[1,2.5,-0],"b":{},"c":[],"d":"x","e":null}"#
        );
        assert_eq!(format!("{root}"), to_compact_string(&root));
    }

    #[test]
    fn pretty_output() {
        let arena = Arena::new();
        let root = parse_in(
            &arena,
            br#"{"a":1,"b":[true,{}],"c":{"d":[]}}"#,
            &Limits::default(),
        )
        .unwrap();
        let expected = "{\n    \"a\" : 1,\n    \"b\" : [\n        true,\n        {}\n    ],\n    \"c\" : {\n        \"d\" : []\n    }\n}";
        assert_eq!(to_pretty_string(&root), expected);
        assert_eq!(format!("{root:#}"), expected);
    }

    #[test]
    fn numbers_use_shortest_round_trip_text() {
        let mut out = String::new();
        for n in [100.0, 0.1, -2.5, 1e300, 1.5e-7, 123456789012.0] {
            out.clear();
            write_number(n, &mut out).unwrap();
            assert_eq!(out.parse::<f64>().unwrap(), n);
        }
        out.clear();
        write_number(100.0, &mut out).unwrap();
        assert_eq!(out, "100");
        out.clear();
        write_number(f64::INFINITY, &mut out).unwrap();
        assert_eq!(out, "null");
    }

    #[test]
    fn strings_are_escaped() {
        let arena = Arena::new();
        let root = parse_in(
            &arena,
            r#"["q\"b\\n\nr\rt\tb\bf\f\u0001\u0000/é"]"#.as_bytes(),
            &Limits::default(),
        )
        .unwrap();
        assert_eq!(
            to_compact_string(&root),
            r#"["q\"b\\n\nr\rt\tb\bf\f\u0001\u0000/é"]"#
        );
    }

    #[test]
    fn writers_round_trip() {
        round_trip("[]");
        round_trip("{}");
        round_trip(r#"{"a":1,"b":"two","c":true,"d":null,"e":[1,2,3]}"#);
        round_trip("[0.1, 1e-300, 1.7976931348623157e308, -0, 3.141592653589793]");
        round_trip(r#"[{"nested": [[{"deep": ["é😀\u0000"]}]]}, {"k":1,"k":2}]"#);
    }
}
