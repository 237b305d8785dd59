// SPDX-License-Identifier: Apache-2.0

//! Caller-supplied memory source.
//!
//! Every byte a document owns, and every scratch block the parser spills into,
//! is requested through an [`Allocator`]. [`Heap`] forwards to the global
//! allocator; [`Budget`] wraps another allocator and refuses requests once a
//! byte cap is reached, which is how resource exhaustion surfaces as
//! [`ErrorCode::OutOfMemory`](crate::ErrorCode::OutOfMemory).

use core::alloc::Layout;
use core::cell::Cell;
use core::ptr::NonNull;

/// The allocator refused a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfMemory;

impl core::fmt::Display for OutOfMemory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("allocator returned no memory")
    }
}

impl core::error::Error for OutOfMemory {}

/// A source of raw memory blocks.
///
/// # Safety
///
/// A block returned by [`allocate`](Allocator::allocate) must be valid for
/// reads and writes of `layout.size()` bytes, aligned to `layout.align()`, and
/// must not overlap any other live block until it is passed to
/// [`free`](Allocator::free).
pub unsafe trait Allocator {
    /// Returns a block for `layout`, or `None` when no memory is available.
    ///
    /// Callers never request zero-sized layouts.
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>>;

    /// Returns a block to the allocator.
    ///
    /// # Safety
    ///
    /// `ptr` must have been returned by `allocate` on this allocator with the
    /// same `layout`, and must not have been freed already.
    unsafe fn free(&self, ptr: NonNull<u8>, layout: Layout);
}

unsafe impl<A: Allocator + ?Sized> Allocator for &A {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        (**self).allocate(layout)
    }

    unsafe fn free(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: forwarded contract.
        unsafe { (**self).free(ptr, layout) }
    }
}

/// Thin wrapper over the global heap allocator.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Heap;

unsafe impl Allocator for Heap {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        debug_assert!(layout.size() != 0);
        // SAFETY: layout has non-zero size.
        NonNull::new(unsafe { alloc::alloc::alloc(layout) })
    }

    unsafe fn free(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: caller guarantees ptr came from `allocate` with this layout.
        unsafe { alloc::alloc::dealloc(ptr.as_ptr(), layout) }
    }
}

/// An allocator that refuses requests once `limit` live bytes are reached.
///
/// Cloning a budget starts a fresh count against the same limit, so every
/// document parsed through a [`Session`](crate::Session) gets its own cap.
#[derive(Debug)]
pub struct Budget<A: Allocator = Heap> {
    inner: A,
    limit: usize,
    in_use: Cell<usize>,
    peak: Cell<usize>,
}

impl Budget<Heap> {
    /// Caps the global heap at `limit` live bytes.
    pub const fn new(limit: usize) -> Self {
        Self::with_inner(Heap, limit)
    }
}

impl<A: Allocator> Budget<A> {
    /// Caps `inner` at `limit` live bytes.
    pub const fn with_inner(inner: A, limit: usize) -> Self {
        Self {
            inner,
            limit,
            in_use: Cell::new(0),
            peak: Cell::new(0),
        }
    }

    /// Bytes currently handed out and not yet freed.
    pub fn in_use(&self) -> usize {
        self.in_use.get()
    }

    /// Highest value `in_use` has reached.
    pub fn peak(&self) -> usize {
        self.peak.get()
    }

    /// The configured cap.
    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl<A: Allocator + Clone> Clone for Budget<A> {
    fn clone(&self) -> Self {
        Self::with_inner(self.inner.clone(), self.limit)
    }
}

unsafe impl<A: Allocator> Allocator for Budget<A> {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        let in_use = self.in_use.get().checked_add(layout.size())?;
        if in_use > self.limit {
            log::debug!(
                "budget refused {} bytes ({} of {} in use)",
                layout.size(),
                self.in_use.get(),
                self.limit
            );
            return None;
        }
        let block = self.inner.allocate(layout)?;
        self.in_use.set(in_use);
        self.peak.set(self.peak.get().max(in_use));
        Some(block)
    }

    unsafe fn free(&self, ptr: NonNull<u8>, layout: Layout) {
        self.in_use
            .set(self.in_use.get().saturating_sub(layout.size()));
        // SAFETY: forwarded contract.
        unsafe { self.inner.free(ptr, layout) }
    }
}
