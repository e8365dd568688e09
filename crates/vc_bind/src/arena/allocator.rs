use alloc::sync::{Arc, Weak};
use core::fmt::{self, Debug};
use std::sync::{Mutex, PoisonError};

use super::Arena;
use crate::error::{BindError, BindResult};

/// An arena that several bound structs can borrow.
///
/// The owner keeps the `Arc`; borrowers hold a `Weak` and fail with
/// [`ErrorKind::Inner`](crate::ErrorKind::Inner) once the owner drops it.
pub type SharedArena = Arc<Mutex<Arena>>;

// -----------------------------------------------------------------------------
// Allocator

/// Where an accessor keeps its dynamic values.
pub enum Allocator {
    /// A private arena, cleared on every deserialization.
    Owned(Arena),
    /// An external arena. It is never cleared by the borrower.
    Borrowed(Weak<Mutex<Arena>>),
    /// No storage at all; the state after being stolen from.
    Detached,
}

impl Default for Allocator {
    #[inline]
    fn default() -> Self {
        Self::Owned(Arena::new())
    }
}

impl Debug for Allocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Owned(arena) => f.debug_tuple("Owned").field(arena).finish(),
            Self::Borrowed(weak) => f
                .debug_tuple("Borrowed")
                .field(&(weak.strong_count() > 0))
                .finish(),
            Self::Detached => f.write_str("Detached"),
        }
    }
}

impl Allocator {
    /// Creates an allocator borrowing `shared`.
    #[inline]
    pub fn borrowed(shared: &SharedArena) -> Self {
        Self::Borrowed(Arc::downgrade(shared))
    }

    #[inline]
    pub fn is_owned(&self) -> bool {
        matches!(self, Self::Owned(_))
    }

    #[inline]
    pub fn is_borrowed(&self) -> bool {
        matches!(self, Self::Borrowed(_))
    }

    #[inline]
    pub fn is_detached(&self) -> bool {
        matches!(self, Self::Detached)
    }

    /// Returns `true` if `shared` is the arena being borrowed.
    pub fn borrows(&self, shared: &SharedArena) -> bool {
        match self {
            Self::Borrowed(weak) => core::ptr::eq(weak.as_ptr(), Arc::as_ptr(shared)),
            _ => false,
        }
    }

    /// Runs `f` against the arena.
    pub fn with<R>(&self, f: impl FnOnce(&Arena) -> R) -> BindResult<R> {
        match self {
            Self::Owned(arena) => Ok(f(arena)),
            Self::Borrowed(weak) => {
                let shared = upgrade(weak)?;
                let arena = shared.lock().unwrap_or_else(PoisonError::into_inner);
                Ok(f(&arena))
            }
            Self::Detached => Err(detached()),
        }
    }

    /// Runs `f` against the arena, mutably.
    pub fn with_mut<R>(&mut self, f: impl FnOnce(&mut Arena) -> R) -> BindResult<R> {
        match self {
            Self::Owned(arena) => Ok(f(arena)),
            Self::Borrowed(weak) => {
                let shared = upgrade(weak)?;
                let mut arena = shared.lock().unwrap_or_else(PoisonError::into_inner);
                Ok(f(&mut arena))
            }
            Self::Detached => Err(detached()),
        }
    }

    /// Prepares the allocator for a fresh deserialization.
    ///
    /// An owned arena is cleared and reused, a detached allocator receives
    /// a new owned arena, and a borrowed arena is left untouched.
    pub fn reset(&mut self) {
        match self {
            Self::Owned(arena) => arena.clear(),
            Self::Borrowed(_) => {}
            Self::Detached => *self = Self::Owned(Arena::new()),
        }
    }
}

fn upgrade(weak: &Weak<Mutex<Arena>>) -> BindResult<Arc<Mutex<Arena>>> {
    weak.upgrade()
        .ok_or_else(|| BindError::inner("borrowed arena was dropped by its owner"))
}

#[cold]
fn detached() -> BindError {
    BindError::inner("accessor is detached from any allocator")
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;
    use std::sync::Mutex;

    use serde_json::json;

    use super::{Allocator, SharedArena};
    use crate::ErrorKind;
    use crate::arena::Arena;

    #[test]
    fn borrowed_arena_outlived() {
        let shared: SharedArena = Arc::new(Mutex::new(Arena::new()));
        let mut allocator = Allocator::borrowed(&shared);
        assert!(allocator.borrows(&shared));

        let handle = allocator.with_mut(|arena| arena.alloc(json!(3))).unwrap();
        assert_eq!(shared.lock().unwrap().get(handle), Some(&json!(3)));

        allocator.reset();
        assert_eq!(allocator.with(|arena| arena.len()).unwrap(), 1);

        drop(shared);
        let err = allocator.with(|arena| arena.len()).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Inner(_)));
    }

    #[test]
    fn detached_gets_fresh_arena() {
        let mut allocator = Allocator::Detached;
        assert!(allocator.with(|_| ()).is_err());

        allocator.reset();
        assert!(allocator.is_owned());
        assert!(allocator.with(|arena| arena.is_empty()).unwrap());
    }
}
