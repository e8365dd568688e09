use core::any::TypeId;
use core::fmt::{self, Debug};

use hashbrown::HashMap;

use crate::hash::NoOpHashState;

/// A map keyed by [`TypeId`], the storage behind per-type registries.
///
/// A `TypeId` is a hash already, so keys go through [`NoOpHashState`]
/// unchanged. `new` is `const`, which lets the map live in a `static`
/// behind a lock.
///
/// ```
/// use core::any::TypeId;
/// use vc_utils::TypeIdMap;
///
/// let mut names = TypeIdMap::new();
/// names.get_or_insert(TypeId::of::<u8>(), || "byte");
///
/// assert_eq!(names.get_type::<u8>(), Some(&"byte"));
/// assert!(names.get_type::<u16>().is_none());
/// ```
pub struct TypeIdMap<V>(HashMap<TypeId, V, NoOpHashState>);

impl<V> TypeIdMap<V> {
    #[inline]
    pub const fn new() -> Self {
        Self(HashMap::with_hasher(NoOpHashState))
    }

    /// Returns the value stored for `type_id`, inserting `f()` first if
    /// there is none. `f` runs at most once.
    #[inline]
    pub fn get_or_insert(&mut self, type_id: TypeId, f: impl FnOnce() -> V) -> &mut V {
        self.0.entry(type_id).or_insert_with(f)
    }

    #[inline]
    pub fn get(&self, type_id: &TypeId) -> Option<&V> {
        self.0.get(type_id)
    }

    /// Shorthand for `get(&TypeId::of::<T>())`.
    #[inline]
    pub fn get_type<T: ?Sized + 'static>(&self) -> Option<&V> {
        self.0.get(&TypeId::of::<T>())
    }

    #[inline]
    pub fn contains(&self, type_id: &TypeId) -> bool {
        self.0.contains_key(type_id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<V> Default for TypeIdMap<V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Debug> Debug for TypeIdMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.0.values()).finish()
    }
}
