// SPDX-License-Identifier: Apache-2.0

//! Strict JSON parser producing an immutable, arena-backed tree.
//!
//! ```
//! let document = arenajson::parse(br#"{"a": 1, "e": [1, 2, 3]}"#).unwrap();
//! let e = document.root().find("e").unwrap();
//! assert_eq!(e.len(), 3);
//! assert!(document.root().find("x").is_none());
//!
//! let err = arenajson::parse(b"\"hello\"").unwrap_err();
//! assert_eq!(err.code(), arenajson::ErrorCode::WrongFormat);
//! ```

#![cfg_attr(not(test), no_std)]

extern crate alloc;

mod allocator;
pub use allocator::{Allocator, Budget, Heap, OutOfMemory};

mod arena;
pub use arena::{Arena, DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE};

mod growable;
mod temp_array;

mod stream;
pub use stream::Location;

mod escape;
mod number;

mod error;
pub use error::{ErrorCode, ParseError, MESSAGE_CAPACITY};

mod limits;
pub use limits::{Limits, DEFAULT_MAX_DEPTH};

mod value;
pub use value::{JsonStr, ObjectEntry, Value, ValueKind};

mod parser;
pub use parser::parse_in;

mod document;
pub use document::{Document, Session, NO_ERROR_MESSAGE};

pub mod writer;

/// Parses `input` over the global heap with default [`Limits`].
pub fn parse(input: &[u8]) -> Result<Document<Heap>, ParseError> {
    Document::parse(input)
}
