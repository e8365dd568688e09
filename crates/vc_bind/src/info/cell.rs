//! Static storage for class metadata.
//!
//! Class metadata is generic over the bound type, and a `static` inside a
//! generic function is shared by every instantiation. The cell therefore
//! keys its entries by [`TypeId`] and stores them type-erased.
//!
//! Lookups take the read lock. A miss builds the entry outside of any lock
//! and publishes it under the write lock; if two threads race on first use
//! both may build, but only the first published entry is ever returned.

use alloc::boxed::Box;
use core::any::{Any, TypeId};
use std::sync::{PoisonError, RwLock};

use vc_utils::TypeIdMap;

type Entry = &'static (dyn Any + Send + Sync);

/// A process-wide, append-only map from a key type to leaked metadata.
pub(crate) struct ClassCell(RwLock<TypeIdMap<Entry>>);

impl ClassCell {
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(TypeIdMap::new()))
    }

    /// Returns the entry stored for `K`, building it with `f` on first use.
    ///
    /// # Panics
    /// Panics if an entry of another type was stored under `K`.
    #[inline(always)]
    pub fn get_or_insert<K: Any + ?Sized, V: Any + Send + Sync>(
        &self,
        f: impl FnOnce() -> V,
    ) -> &'static V {
        let entry = self.get_or_insert_by_type_id(TypeId::of::<K>(), || Box::new(f()));
        match entry.downcast_ref::<V>() {
            Some(value) => value,
            None => panic!(
                "class cell entry for `{}` is not a `{}`",
                core::any::type_name::<K>(),
                core::any::type_name::<V>(),
            ),
        }
    }

    #[inline(never)]
    fn get_or_insert_by_type_id(
        &self,
        type_id: TypeId,
        f: impl FnOnce() -> Box<dyn Any + Send + Sync>,
    ) -> Entry {
        match self.get_by_type_id(type_id) {
            Some(entry) => entry,
            None => self.insert_by_type_id(type_id, f()),
        }
    }

    #[inline(never)]
    fn get_by_type_id(&self, type_id: TypeId) -> Option<Entry> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied()
    }

    #[inline(never)]
    fn insert_by_type_id(&self, type_id: TypeId, value: Box<dyn Any + Send + Sync>) -> Entry {
        *self
            .0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_or_insert(type_id, || Box::leak(value))
    }

    /// Returns the number of published entries.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.0.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}
