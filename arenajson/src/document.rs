// SPDX-License-Identifier: Apache-2.0

//! Owned handles over a parsed tree.
//!
//! A [`Document`] bundles the root [`Value`] with the [`Arena`] it lives in.
//! Dropping the document (or calling [`Document::release`]) returns every
//! chunk to the allocator the document was created with.
//!
//! [`Session`] is a reusable, stateful front end: it keeps the most recent
//! document or the most recent error, and reports the error code and message
//! in the same way whichever one it holds.

use crate::allocator::{Allocator, Heap};
use crate::arena::Arena;
use crate::error::{ErrorCode, ParseError};
use crate::limits::Limits;
use crate::parser::parse_in;
use crate::value::Value;

/// Message reported by [`Session::error_message`] when there is no error.
pub const NO_ERROR_MESSAGE: &str = "no error";

/// A parsed tree together with the storage that owns it.
pub struct Document<A: Allocator = Heap> {
    // Borrows from `arena`; declared first so it is dropped first.
    root: Value<'static>,
    arena: Arena<A>,
}

impl Document<Heap> {
    /// Parses `input` with the default [`Limits`] over the global heap.
    pub fn parse(input: &[u8]) -> Result<Self, ParseError> {
        Self::parse_with(input, Heap, &Limits::default())
    }
}

impl<A: Allocator> Document<A> {
    /// Parses `input`, taking every byte of storage from `alloc`.
    pub fn parse_with(input: &[u8], alloc: A, limits: &Limits) -> Result<Self, ParseError> {
        let arena = Arena::with_allocator(alloc);
        let root = parse_in(&arena, input, limits)?;
        // SAFETY: `root` only points into chunks owned by `arena` (or into
        // static data). Chunks never move when the arena value moves, and they
        // are freed only when the arena drops, which happens after `root` is
        // gone. The lifetime is shortened again by `root()`.
        let root = unsafe { core::mem::transmute::<Value<'_>, Value<'static>>(root) };
        Ok(Self { root, arena })
    }

    /// The root array or object.
    pub fn root(&self) -> &Value<'_> {
        &self.root
    }

    /// Storage statistics for this document.
    pub fn arena(&self) -> &Arena<A> {
        &self.arena
    }

    /// Frees the tree. Equivalent to dropping the document.
    pub fn release(self) {
        log::trace!(
            "releasing document: {} chunks, {} bytes",
            self.arena.chunk_count(),
            self.arena.reserved_bytes()
        );
    }
}

impl<A: Allocator> core::fmt::Debug for Document<A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Document")
            .field("root", self.root())
            .field("arena", &self.arena)
            .finish()
    }
}

/// Parses documents one after another, holding on to the latest outcome.
///
/// Each parse releases whatever the session held before. Every document gets
/// its own clone of the session's allocator; for [`Budget`](crate::Budget)
/// that means its own byte cap.
pub struct Session<A: Allocator + Clone = Heap> {
    alloc: A,
    limits: Limits,
    document: Option<Document<A>>,
    error: Option<ParseError>,
}

impl Session<Heap> {
    pub fn new() -> Self {
        Self::with_allocator(Heap)
    }
}

impl Default for Session<Heap> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Allocator + Clone> Session<A> {
    pub fn with_allocator(alloc: A) -> Self {
        Self {
            alloc,
            limits: Limits::default(),
            document: None,
            error: None,
        }
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Parses `input`, replacing the previous document or error.
    ///
    /// Returns the new root, or `None` when parsing failed; the failure is
    /// then available from [`error`](Self::error) and
    /// [`error_message`](Self::error_message).
    pub fn parse(&mut self, input: &[u8]) -> Option<&Value<'_>> {
        self.release();
        match Document::parse_with(input, self.alloc.clone(), &self.limits) {
            Ok(document) => Some(self.document.insert(document).root()),
            Err(err) => {
                self.error = Some(err);
                None
            }
        }
    }

    /// The root of the current document, if the last parse succeeded.
    pub fn root(&self) -> Option<&Value<'_>> {
        self.document.as_ref().map(Document::root)
    }

    /// Code of the last failure, or [`ErrorCode::None`].
    pub fn error(&self) -> ErrorCode {
        self.error.as_ref().map_or(ErrorCode::None, ParseError::code)
    }

    /// Message of the last failure, or [`NO_ERROR_MESSAGE`].
    pub fn error_message(&self) -> &str {
        self.error
            .as_ref()
            .map_or(NO_ERROR_MESSAGE, ParseError::message)
    }

    pub fn last_error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    /// Hands the current document to the caller.
    pub fn take_document(&mut self) -> Option<Document<A>> {
        self.document.take()
    }

    /// Frees the current document and forgets the last error. A no-op on an
    /// empty session.
    pub fn release(&mut self) {
        if let Some(document) = self.document.take() {
            document.release();
        }
        self.error = None;
    }
}
