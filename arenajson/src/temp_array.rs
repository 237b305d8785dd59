// SPDX-License-Identifier: Apache-2.0

use crate::allocator::{Allocator, OutOfMemory};
use crate::arena::Arena;
use crate::growable::GrowableArray;

/// Inline slots for array elements before spilling.
pub(crate) const ARRAY_INLINE_CAPACITY: usize = 64;
/// Inline slots for object entries before spilling.
pub(crate) const OBJECT_INLINE_CAPACITY: usize = 32;
/// Inline bytes for the string builder before spilling.
pub(crate) const STRING_INLINE_CAPACITY: usize = 2048;

/// Scratch list for a composite under construction.
///
/// The first `K` items live inline; the rest spill into a [`GrowableArray`]
/// backed by the document's allocator. [`finalize`](Self::finalize) copies both
/// halves, in order, into one tight arena block.
pub(crate) struct TempArray<'s, T: Copy + Default, const K: usize, A: Allocator + ?Sized> {
    inline: [T; K],
    inline_len: usize,
    spill: GrowableArray<'s, T, A>,
}

impl<'s, T: Copy + Default, const K: usize, A: Allocator + ?Sized> TempArray<'s, T, K, A> {
    pub fn new(alloc: &'s A) -> Self {
        Self {
            inline: [T::default(); K],
            inline_len: 0,
            spill: GrowableArray::new(alloc),
        }
    }

    pub fn len(&self) -> usize {
        self.inline_len + self.spill.len()
    }

    pub fn push(&mut self, item: T) -> Result<(), OutOfMemory> {
        match self.inline.get_mut(self.inline_len) {
            Some(slot) => {
                *slot = item;
                self.inline_len += 1;
                Ok(())
            }
            None => self.spill.push(item),
        }
    }

    pub fn clear(&mut self) {
        self.inline_len = 0;
        self.spill.clear();
    }

    fn inline_items(&self) -> &[T] {
        &self.inline[..self.inline_len]
    }

    pub fn finalize<'a, B: Allocator>(&self, arena: &'a Arena<B>) -> Result<&'a [T], OutOfMemory> {
        arena.alloc_joined(&[self.inline_items(), self.spill.as_slice()])
    }

    /// Like [`finalize`](Self::finalize), with `terminator` appended after the last item.
    pub fn finalize_terminated<'a, B: Allocator>(
        &self,
        arena: &'a Arena<B>,
        terminator: T,
    ) -> Result<&'a [T], OutOfMemory> {
        arena.alloc_joined(&[self.inline_items(), self.spill.as_slice(), &[terminator]])
    }
}
