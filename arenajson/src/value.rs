// SPDX-License-Identifier: Apache-2.0

//! The parsed tree.
//!
//! A [`Value`] is a small `Copy` handle. Composite payloads and string bytes
//! live in the [`Arena`](crate::Arena) that produced them, and `'a` is the
//! lifetime of that arena. Nothing in the tree can be mutated.

use core::fmt;

/// Tag of a [`Value`], also used to name the active production in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Boolean => "boolean",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A decoded JSON string stored with a trailing NUL byte.
///
/// [`len`](Self::len) excludes the terminator and the byte at that offset is
/// always 0. The contents are valid UTF-8 and may themselves contain NUL
/// (from `\u0000`).
#[derive(Clone, Copy)]
pub struct JsonStr<'a> {
    with_nul: &'a str,
}

impl<'a> JsonStr<'a> {
    /// The empty string. Owns no arena storage.
    pub const EMPTY: JsonStr<'static> = JsonStr { with_nul: "\0" };

    /// Wraps `text`, which must end with its NUL terminator.
    pub fn from_terminated(with_nul: &'a str) -> Option<Self> {
        with_nul.ends_with('\0').then_some(Self { with_nul })
    }

    pub fn as_str(&self) -> &'a str {
        // The terminator is a single byte, so this is a char boundary.
        &self.with_nul[..self.len()]
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.as_str().as_bytes()
    }

    /// The contents followed by the terminating NUL.
    pub fn as_bytes_with_nul(&self) -> &'a [u8] {
        self.with_nul.as_bytes()
    }

    /// Length in bytes, terminator excluded.
    pub fn len(&self) -> usize {
        self.with_nul.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for JsonStr<'_> {
    fn default() -> Self {
        JsonStr::EMPTY
    }
}

impl<'b> PartialEq<JsonStr<'b>> for JsonStr<'_> {
    fn eq(&self, other: &JsonStr<'b>) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for JsonStr<'_> {}

impl PartialEq<str> for JsonStr<'_> {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for JsonStr<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl fmt::Debug for JsonStr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for JsonStr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `name: value` member of an object, in input order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectEntry<'a> {
    pub name: JsonStr<'a>,
    pub value: Value<'a>,
}

impl<'b> PartialEq<ObjectEntry<'b>> for ObjectEntry<'_> {
    fn eq(&self, other: &ObjectEntry<'b>) -> bool {
        self.name == other.name && self.value.equals(&other.value)
    }
}

/// A node of the parsed tree.
///
/// Empty arrays and objects are empty slices and own no storage.
#[derive(Debug, Clone, Copy, Default)]
pub enum Value<'a> {
    #[default]
    Null,
    Boolean(bool),
    Number(f64),
    String(JsonStr<'a>),
    Array(&'a [Value<'a>]),
    Object(&'a [ObjectEntry<'a>]),
}

fn same_storage<T, U>(a: &[T], b: &[U]) -> bool {
    a.len() == b.len() && core::ptr::eq(a.as_ptr().cast::<()>(), b.as_ptr().cast::<()>())
}

impl<'a> Value<'a> {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Value::Boolean(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&'a str> {
        self.as_json_str().map(|s| s.as_str())
    }

    pub fn as_json_str(&self) -> Option<JsonStr<'a>> {
        match *self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&'a [Value<'a>]> {
        match *self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&'a [ObjectEntry<'a>]> {
        match *self {
            Value::Object(entries) => Some(entries),
            _ => None,
        }
    }

    /// Element count for arrays and objects, byte length for strings, 0 otherwise.
    pub fn len(&self) -> usize {
        match self {
            Value::Array(items) => items.len(),
            Value::Object(entries) => entries.len(),
            Value::String(s) => s.len(),
            Value::Null | Value::Boolean(_) | Value::Number(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `index`-th element of an array.
    pub fn get(&self, index: usize) -> Option<&'a Value<'a>> {
        self.as_array()?.get(index)
    }

    /// The value of the first entry named `name`. `None` for non-objects.
    pub fn find(&self, name: &str) -> Option<&'a Value<'a>> {
        self.find_entry(name).map(|entry| &entry.value)
    }

    /// The first entry named `name`. `None` for non-objects.
    pub fn find_entry(&self, name: &str) -> Option<&'a ObjectEntry<'a>> {
        self.as_object()?
            .iter()
            .find(|entry| entry.name.as_bytes() == name.as_bytes())
    }

    /// Structural equality.
    ///
    /// Object entries are compared pairwise in order, so two objects with the
    /// same members in a different order are not equal.
    pub fn equals(&self, other: &Value<'_>) -> bool {
        match (*self, *other) {
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => {
                same_storage(a, b)
                    || (a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.equals(y)))
            }
            (Value::Object(a), Value::Object(b)) => {
                same_storage(a, b)
                    || (a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x == y))
            }
            _ => false,
        }
    }
}

impl<'b> PartialEq<Value<'b>> for Value<'_> {
    fn eq(&self, other: &Value<'b>) -> bool {
        self.equals(other)
    }
}
