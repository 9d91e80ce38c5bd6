//! Fixed-capacity allocation budget shared by a crowd's behaviors.
//!
//! # Design
//!
//! A crowd runs with a maximum agent count known up front, so every
//! long-lived allocation (behavior instances and their per-agent parameter
//! stores) is sized once at setup.  `Arena` tracks two byte budgets:
//!
//! | Budget      | Used for                                   | Released            |
//! |-------------|--------------------------------------------|---------------------|
//! | permanent   | behaviors + parameter stores               | [`Arena::free_perm`] |
//! | transient   | per-call scratch (neighbor resolution)     | when `TempBlock` drops |
//!
//! Both are fail-soft: exhaustion returns `None`, never panics.  Counters are
//! atomic so transient scratch can be charged from Rayon workers during a
//! parallel update phase.
//!
//! The arena only accounts; the memory itself is obtained by the caller
//! (typically with `Vec::try_reserve_exact`) once a block has been granted.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Grant of `bytes` from the permanent budget.
///
/// Not `Clone`: a block is returned exactly once via [`Arena::free_perm`].
/// Dropping it without freeing leaks budget, not memory.
#[derive(Debug)]
#[must_use = "a permanent block must be returned with Arena::free_perm"]
pub struct PermBlock {
    bytes: usize,
}

impl PermBlock {
    #[inline]
    pub fn bytes(&self) -> usize {
        self.bytes
    }
}

/// Grant of `bytes` from the transient budget, released on drop.
#[derive(Debug)]
pub struct TempBlock<'a> {
    arena: &'a Arena,
    bytes: usize,
}

impl TempBlock<'_> {
    #[inline]
    pub fn bytes(&self) -> usize {
        self.bytes
    }
}

impl Drop for TempBlock<'_> {
    fn drop(&mut self) {
        self.arena.temp_used.fetch_sub(self.bytes, Ordering::AcqRel);
    }
}

/// Permanent + transient byte budgets.  See the module docs.
#[derive(Debug)]
pub struct Arena {
    perm_capacity: usize,
    perm_used:     AtomicUsize,
    temp_capacity: usize,
    temp_used:     AtomicUsize,
}

impl Arena {
    pub fn new(perm_capacity: usize, temp_capacity: usize) -> Self {
        Self {
            perm_capacity,
            perm_used: AtomicUsize::new(0),
            temp_capacity,
            temp_used: AtomicUsize::new(0),
        }
    }

    /// An arena that never reports exhaustion.  Handy in tests.
    pub fn unbounded() -> Self {
        Self::new(usize::MAX, usize::MAX)
    }

    /// Reserve `bytes` of permanent budget.  `None` if it would overflow.
    pub fn alloc_perm(&self, bytes: usize) -> Option<PermBlock> {
        if reserve(&self.perm_used, self.perm_capacity, bytes) {
            Some(PermBlock { bytes })
        } else {
            log::debug!(
                "arena: permanent request of {bytes} B refused ({} / {} B in use)",
                self.perm_used(),
                self.perm_capacity
            );
            None
        }
    }

    /// Return a block obtained from [`alloc_perm`](Self::alloc_perm) on this arena.
    pub fn free_perm(&self, block: PermBlock) {
        self.perm_used.fetch_sub(block.bytes, Ordering::AcqRel);
    }

    /// Reserve `bytes` of transient budget for the lifetime of the returned guard.
    pub fn alloc_temp(&self, bytes: usize) -> Option<TempBlock<'_>> {
        if reserve(&self.temp_used, self.temp_capacity, bytes) {
            Some(TempBlock { arena: self, bytes })
        } else {
            log::trace!("arena: transient request of {bytes} B refused");
            None
        }
    }

    #[inline]
    pub fn perm_used(&self) -> usize {
        self.perm_used.load(Ordering::Acquire)
    }

    #[inline]
    pub fn temp_used(&self) -> usize {
        self.temp_used.load(Ordering::Acquire)
    }

    #[inline]
    pub fn perm_capacity(&self) -> usize {
        self.perm_capacity
    }

    #[inline]
    pub fn temp_capacity(&self) -> usize {
        self.temp_capacity
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Atomically add `bytes` to `used` unless the total would exceed `capacity`.
fn reserve(used: &AtomicUsize, capacity: usize, bytes: usize) -> bool {
    used.fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
        current.checked_add(bytes).filter(|&total| total <= capacity)
    })
    .is_ok()
}
