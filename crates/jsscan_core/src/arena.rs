//! Arena allocation for interned identifiers.
//!
//! Identifier records and their spellings are allocated from a bump arena
//! owned outside the hash table. Nothing is freed individually; the whole
//! arena goes away with its owner.

use bumpalo::Bump;
use thiserror::Error;

/// Returned when the arena cannot satisfy an allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("identifier arena exhausted")]
pub struct ArenaExhausted;

/// The identifier arena wraps a bump allocator.
///
/// An optional allocation limit turns allocation failure into an
/// [`ArenaExhausted`] error instead of aborting, which is how interning
/// reports out-of-memory to the scanner.
pub struct IdentArena {
    bump: Bump,
}

impl IdentArena {
    /// Create a new arena with default capacity and no limit.
    pub fn new() -> Self {
        Self { bump: Bump::new() }
    }

    /// Create an arena that refuses to grow past `limit` bytes.
    pub fn with_limit(limit: usize) -> Self {
        let bump = Bump::new();
        bump.set_allocation_limit(Some(limit));
        Self { bump }
    }

    /// Allocate a value, failing if the arena limit is reached.
    #[inline]
    pub fn try_alloc<T>(&self, val: T) -> Result<&mut T, ArenaExhausted> {
        self.bump.try_alloc(val).map_err(|_| ArenaExhausted)
    }

    /// Allocate `len + 1` UTF-16 units filled from `units` and terminated
    /// with a NUL unit.
    ///
    /// `units` must yield exactly `len` items; a shorter iterator leaves the
    /// tail zeroed.
    pub fn try_alloc_spelling(
        &self,
        len: usize,
        units: impl IntoIterator<Item = u16>,
    ) -> Result<&[u16], ArenaExhausted> {
        let total = len.checked_add(1).ok_or(ArenaExhausted)?;
        if total.checked_mul(std::mem::size_of::<u16>()).is_none() {
            return Err(ArenaExhausted);
        }
        let slice = self
            .bump
            .try_alloc_slice_fill_copy(total, 0u16)
            .map_err(|_| ArenaExhausted)?;
        for (dst, unit) in slice[..len].iter_mut().zip(units) {
            *dst = unit;
        }
        Ok(slice)
    }
}

impl Default for IdentArena {
    fn default() -> Self {
        Self::new()
    }
}
