//! Serialization, deserialization and allocator compaction of bound structs.
//!
//! The functions here are driven through [`BoundExt`](crate::BoundExt) and,
//! for nested structs, through [`ObjectCodec`](crate::codec::ObjectCodec).
//!
//! ## Wire order
//!
//! Registered fields are written in registration order, followed by unknown
//! members in the order they were read.
//!
//! ## Failure
//!
//! A field whose codec fails is reset to its default value and its status
//! rolled back to `Missing`; the error is returned with the field's wire
//! name prepended to its path, and the accessor is marked invalid.

// -----------------------------------------------------------------------------
// Modules

mod de;
mod flags;
mod ser;
mod shrink;

#[cfg(test)]
mod tests;

// -----------------------------------------------------------------------------
// Exports

pub use flags::{DeserializeFlags, SerializeFlags};

pub(crate) use de::deserialize;
pub(crate) use ser::serialize;
pub(crate) use shrink::shrink_allocator;

// -----------------------------------------------------------------------------
// DeContext

/// State threaded through one deserialization pass.
#[derive(Debug, Clone)]
pub struct DeContext {
    flags: DeserializeFlags,
    depth: usize,
}

impl DeContext {
    #[inline]
    pub const fn new(flags: DeserializeFlags) -> Self {
        Self { flags, depth: 0 }
    }

    #[inline]
    pub const fn flags(&self) -> DeserializeFlags {
        self.flags
    }

    /// Number of enclosing structs and containers.
    #[inline]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Runs `f` one nesting level deeper.
    #[inline]
    pub fn nested<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }
}
