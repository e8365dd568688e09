//! Slot storage for the dynamic values owned by bound structs.
//!
//! An [`Arena`] hands out [`ValueRef`] handles. A handle is tied to the arena
//! that issued it and to the arena's current generation: [`Arena::clear`] and
//! [`Arena::compact`] start a new generation, after which older handles
//! resolve to `None` instead of aliasing newer values.

// -----------------------------------------------------------------------------
// Modules

mod allocator;

// -----------------------------------------------------------------------------
// Exports

pub use allocator::{Allocator, SharedArena};

use alloc::vec::Vec;
use core::fmt::{self, Debug, Display};
use core::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;

use crate::error::{BindError, BindResult};

static NEXT_ARENA_ID: AtomicU64 = AtomicU64::new(1);

// -----------------------------------------------------------------------------
// ValueRef

/// A handle to a value stored in an [`Arena`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueRef {
    arena: u64,
    generation: u32,
    index: u32,
}

impl ValueRef {
    /// Returns the slot index inside the arena.
    #[inline(always)]
    pub const fn index(self) -> usize {
        self.index as usize
    }

    /// Returns the arena generation this handle was issued in.
    #[inline(always)]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl Debug for ValueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ValueRef({}#{}v{})", self.arena, self.index, self.generation)
    }
}

impl Display for ValueRef {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Debug::fmt(self, f)
    }
}

// -----------------------------------------------------------------------------
// Arena

/// A generational slot store of [`Value`]s.
///
/// Allocation appends; there is no per-slot free. Space is reclaimed as a
/// whole by [`clear`](Self::clear), or by [`compact`](Self::compact) which
/// keeps only the values still referenced.
pub struct Arena {
    id: u64,
    generation: u32,
    slots: Vec<Value>,
}

impl Default for Arena {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("id", &self.id)
            .field("generation", &self.generation)
            .field("len", &self.slots.len())
            .finish()
    }
}

impl Arena {
    /// Creates an empty arena with a process-unique id.
    #[inline]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            id: NEXT_ARENA_ID.fetch_add(1, Ordering::Relaxed),
            generation: 0,
            slots: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Returns the number of allocated slots, live or not.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Stores `value` and returns its handle.
    ///
    /// # Panics
    /// Panics if the arena already holds `u32::MAX` slots.
    pub fn alloc(&mut self, value: Value) -> ValueRef {
        let Ok(index) = u32::try_from(self.slots.len()) else {
            panic!("arena {} exceeded u32::MAX slots", self.id);
        };
        self.slots.push(value);
        ValueRef {
            arena: self.id,
            generation: self.generation,
            index,
        }
    }

    /// Returns `true` if `handle` was issued by this arena in its current
    /// generation.
    #[inline]
    pub fn owns(&self, handle: ValueRef) -> bool {
        handle.arena == self.id
            && handle.generation == self.generation
            && handle.index() < self.slots.len()
    }

    #[inline]
    pub fn get(&self, handle: ValueRef) -> Option<&Value> {
        if self.owns(handle) {
            self.slots.get(handle.index())
        } else {
            None
        }
    }

    #[inline]
    pub fn get_mut(&mut self, handle: ValueRef) -> Option<&mut Value> {
        if self.owns(handle) {
            self.slots.get_mut(handle.index())
        } else {
            None
        }
    }

    /// Moves the value out, leaving `null` in the slot.
    #[inline]
    pub fn take(&mut self, handle: ValueRef) -> Option<Value> {
        self.get_mut(handle).map(Value::take)
    }

    fn next_generation(&mut self) {
        let (generation, wrapped) = self.generation.overflowing_add(1);
        self.generation = generation;
        if wrapped {
            log::warn!(
                "Arena({}) generation wrapped, stale handles may alias.",
                self.id
            );
        }
    }

    /// Drops every value and invalidates all handles. Capacity is kept.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.next_generation();
    }

    /// Rebuilds the arena around the values named by `live`.
    ///
    /// Handles in `live` are rewritten in place to point into the new
    /// generation; every other handle becomes stale. The backing storage is
    /// shrunk to exactly the live values.
    pub fn compact(&mut self, live: &mut [ValueRef]) -> BindResult<()> {
        if !live.iter().all(|handle| self.owns(*handle)) {
            return Err(BindError::inner("compacting a stale arena handle"));
        }
        let mut slots = Vec::with_capacity(live.len());
        for handle in live.iter() {
            slots.push(self.slots[handle.index()].take());
        }

        self.slots = slots;
        self.next_generation();
        for (index, handle) in live.iter_mut().enumerate() {
            *handle = ValueRef {
                arena: self.id,
                generation: self.generation,
                index: index as u32,
            };
        }
        Ok(())
    }
}
