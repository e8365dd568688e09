//! Hash builders with deterministic output.
//!
//! - [`FixedHashState`]: `foldhash` with a compile-time seed, so maps
//!   iterate in an order that depends only on their keys.
//! - [`NoOpHashState`]: passes a single `u64` through, for keys such as
//!   `TypeId` that are hashes already.

use core::hash::{BuildHasher, Hasher};

use foldhash::fast::{FixedState, FoldHasher};

// -----------------------------------------------------------------------------
// FixedHashState

const SEED: u64 = 0x6A09_E667_F3BC_C908;

/// The hasher built by [`FixedHashState`].
pub type FixedHasher = FoldHasher<'static>;

/// Seeded `foldhash` state; equal inputs hash equally across runs.
///
/// ```
/// use core::hash::BuildHasher;
/// use vc_utils::hash::FixedHashState;
///
/// assert_eq!(
///     FixedHashState.hash_one("wire_name"),
///     FixedHashState.hash_one("wire_name"),
/// );
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FixedHasher;

    #[inline]
    fn build_hasher(&self) -> FixedHasher {
        const STATE: FixedState = FixedState::with_seed(SEED);
        STATE.build_hasher()
    }
}

// -----------------------------------------------------------------------------
// NoOpHashState

/// Keeps the last `u64` written as the hash.
///
/// Byte writes are folded in as a fallback; they are never expected for
/// the keys this hasher is meant for.
#[derive(Copy, Clone, Default, Debug)]
pub struct NoOpHasher(u64);

impl Hasher for NoOpHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }

    #[inline]
    fn write_u64(&mut self, value: u64) {
        self.0 = value;
    }

    fn write(&mut self, bytes: &[u8]) {
        self.0 = bytes
            .iter()
            .fold(self.0, |hash, &byte| hash.rotate_left(5) ^ u64::from(byte));
    }
}

/// Builds [`NoOpHasher`]s.
#[derive(Copy, Clone, Default, Debug)]
pub struct NoOpHashState;

impl BuildHasher for NoOpHashState {
    type Hasher = NoOpHasher;

    #[inline]
    fn build_hasher(&self) -> NoOpHasher {
        NoOpHasher::default()
    }
}
