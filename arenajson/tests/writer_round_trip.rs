// SPDX-License-Identifier: Apache-2.0

// Writers produce text that parses back into an equal tree

use arenajson::writer::{to_compact_string, to_pretty_string, write_compact, write_pretty};
use arenajson::{parse, Value};
use test_log::test;

const SAMPLES: &[&str] = &[
    "[]",
    "{}",
    "[[], {}, [[]], {\"\": {}}]",
    r#"{"a":1,"b":"two","c":true,"d":null,"e":[1,2,3]}"#,
    r#"[1, -2, 3.5, 1e2, -0, 0.1, 1e-7, 123456789012345678, 5e-324, 1.7976931348623157e308]"#,
    r#"["", " ", "quote \" backslash \\ slash \/", "\b\f\n\r\t", "\u0001\u001f\u007f"]"#,
    r#"{"caf\u00e9": "\u20ac", "emoji": "\ud83d\ude00", "raw": "été"}"#,
    r#"{"dup": 1, "dup": 2, "list": [{"dup": [true, false, null]}]}"#,
    r#"{
        "glossary": {
            "title": "example glossary",
            "GlossDiv": {
                "title": "S",
                "GlossList": {
                    "GlossEntry": {
                        "ID": "SGML",
                        "SortAs": "SGML",
                        "GlossTerm": "Standard Generalized Markup Language",
                        "Acronym": "SGML",
                        "Abbrev": "ISO 8879:1986",
                        "GlossDef": {
                            "para": "A meta-markup language, used to create markup languages such as DocBook.",
                            "GlossSeeAlso": ["GML", "XML"]
                        },
                        "GlossSee": "markup"
                    }
                }
            }
        }
    }"#,
];

fn assert_round_trip(input: &str) {
    let original = parse(input.as_bytes()).unwrap();
    let root = original.root();

    let pretty = to_pretty_string(root);
    let from_pretty = parse(pretty.as_bytes()).unwrap();
    assert!(root.equals(from_pretty.root()), "pretty:\n{pretty}");
    // Writing a re-parsed tree gives the same text.
    assert_eq!(to_pretty_string(from_pretty.root()), pretty);

    let compact = to_compact_string(root);
    let from_compact = parse(compact.as_bytes()).unwrap();
    assert!(root.equals(from_compact.root()), "compact: {compact}");
    assert_eq!(to_compact_string(from_compact.root()), compact);
    assert!(!compact.contains('\n'));
}

#[test]
fn test_samples_round_trip() {
    for sample in SAMPLES {
        assert_round_trip(sample);
    }
}

#[test]
fn test_generated_document_round_trips() {
    let members: Vec<String> = (0..200)
        .map(|i| {
            format!(
                r#""member {i}": {{"index": {i}, "ratio": {}, "tags": ["t{i}", "x\ty"], "ok": {}}}"#,
                i as f64 / 7.0,
                i % 2 == 0
            )
        })
        .collect();
    assert_round_trip(&format!("{{{}}}", members.join(", ")));
}

#[test]
fn test_pretty_layout() {
    let document = parse(br#"{"a": [1, {"b": null}], "c": {}}"#).unwrap();
    let expected = [
        "{",
        "    \"a\" : [",
        "        1,",
        "        {",
        "            \"b\" : null",
        "        }",
        "    ],",
        "    \"c\" : {}",
        "}",
    ]
    .join("\n");
    assert_eq!(to_pretty_string(document.root()), expected);
}

#[test]
fn test_display_and_writer_agree() {
    let document = parse(br#"[{"k": "v"}, [1.5, -3]]"#).unwrap();
    let root: &Value<'_> = document.root();

    let mut compact = String::new();
    write_compact(root, &mut compact).unwrap();
    assert_eq!(root.to_string(), compact);
    assert_eq!(compact, r#"[{"k":"v"},[1.5,-3]]"#);

    let mut pretty = String::new();
    write_pretty(root, &mut pretty).unwrap();
    assert_eq!(format!("{root:#}"), pretty);
}

#[test]
fn test_control_bytes_are_escaped() {
    let document = parse(r#"["\u0000\u0007\n\u001b"]"#.as_bytes()).unwrap();
    assert_eq!(document.root().get(0).map(Value::len), Some(4));
    assert_eq!(
        to_compact_string(document.root()),
        r#"["\u0000\u0007\n\u001b"]"#
    );
}
