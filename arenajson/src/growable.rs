// SPDX-License-Identifier: Apache-2.0

use core::alloc::Layout;
use core::marker::PhantomData;
use core::ptr::{self, NonNull};

use crate::allocator::{Allocator, OutOfMemory};

/// A contiguous vector of `Copy` items whose storage comes from an [`Allocator`].
///
/// Capacity always grows to the next power of two of the requested size. Growth
/// allocates a fresh block, copies the live items over and frees the old block.
pub(crate) struct GrowableArray<'s, T: Copy, A: Allocator + ?Sized> {
    alloc: &'s A,
    ptr: NonNull<T>,
    capacity: usize,
    len: usize,
    _items: PhantomData<T>,
}

impl<'s, T: Copy, A: Allocator + ?Sized> GrowableArray<'s, T, A> {
    pub fn new(alloc: &'s A) -> Self {
        Self {
            alloc,
            ptr: NonNull::dangling(),
            capacity: 0,
            len: 0,
            _items: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    #[cfg(test)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Makes room for at least `needed` items.
    pub fn ensure_capacity(&mut self, needed: usize) -> Result<(), OutOfMemory> {
        if needed <= self.capacity {
            return Ok(());
        }
        let capacity = needed.checked_next_power_of_two().ok_or(OutOfMemory)?;
        let layout = Layout::array::<T>(capacity).map_err(|_| OutOfMemory)?;
        if layout.size() == 0 {
            self.capacity = capacity;
            return Ok(());
        }
        let block = self.alloc.allocate(layout).ok_or(OutOfMemory)?.cast::<T>();
        // SAFETY: both blocks hold at least `len` items and are distinct.
        unsafe { ptr::copy_nonoverlapping(self.ptr.as_ptr(), block.as_ptr(), self.len) };
        self.free_block();
        self.ptr = block;
        self.capacity = capacity;
        Ok(())
    }

    pub fn push(&mut self, item: T) -> Result<(), OutOfMemory> {
        let len = self.len.checked_add(1).ok_or(OutOfMemory)?;
        self.ensure_capacity(len)?;
        // SAFETY: ensure_capacity guarantees slot `self.len` is inside the block.
        unsafe { self.ptr.as_ptr().add(self.len).write(item) };
        self.len = len;
        Ok(())
    }

    /// Forgets every item but keeps the block for reuse.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn as_slice(&self) -> &[T] {
        // SAFETY: the first `len` slots are initialized; `ptr` is dangling but
        // aligned when `len` is zero.
        unsafe { core::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    fn free_block(&mut self) {
        if self.capacity == 0 || core::mem::size_of::<T>() == 0 {
            return;
        }
        if let Ok(layout) = Layout::array::<T>(self.capacity) {
            // SAFETY: the block was allocated with exactly this layout.
            unsafe { self.alloc.free(self.ptr.cast(), layout) };
        }
    }
}

impl<T: Copy, A: Allocator + ?Sized> Drop for GrowableArray<'_, T, A> {
    fn drop(&mut self) {
        self.free_block();
    }
}
