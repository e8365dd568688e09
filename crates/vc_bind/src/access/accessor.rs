use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{self, Debug};

use serde_json::Value;

use crate::access::{Bound, FieldStatus};
use crate::arena::{Allocator, Arena, SharedArena, ValueRef};
use crate::error::{BindError, BindResult};
use crate::info::ClassInfo;
use crate::value::Sink;

// -----------------------------------------------------------------------------
// Accessor

/// The runtime companion embedded in every bound struct.
///
/// It records the [`FieldStatus`] of each field, keeps the members that did
/// not match any field, and owns (or borrows) the [`Arena`] those members
/// are stored in.
///
/// Constructing an accessor never touches the class registry; the class is
/// resolved on first use.
///
/// - `Clone` copies statuses and deep-copies unknown members into a fresh,
///   owned arena.
/// - Equality compares statuses, validity and unknown members.
pub struct Accessor<T: 'static> {
    class: Option<&'static ClassInfo<T>>,
    // Indexed like `ClassInfo::fields`, grown on demand.
    status: Vec<FieldStatus>,
    unknown: Vec<(String, ValueRef)>,
    allocator: Allocator,
    valid: bool,
}

impl<T: 'static> Default for Accessor<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Accessor<T> {
    /// Creates a valid accessor with an empty owned arena.
    pub fn new() -> Self {
        Self {
            class: None,
            status: Vec::new(),
            unknown: Vec::new(),
            allocator: Allocator::default(),
            valid: true,
        }
    }

    /// Returns `false` if the struct represents absent data, after a failed
    /// deserialization or after being stolen from.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    #[inline]
    pub fn set_valid(&mut self, valid: bool) {
        self.valid = valid;
    }

    #[inline]
    pub fn allocator(&self) -> &Allocator {
        &self.allocator
    }

    /// Returns `true` after the accessor has been stolen from.
    #[inline]
    pub fn is_detached(&self) -> bool {
        self.allocator.is_detached()
    }

    /// Number of unknown members.
    #[inline]
    pub fn unknown_len(&self) -> usize {
        self.unknown.len()
    }

    /// Iterates the keys of unknown members in document order.
    pub fn unknown_keys(&self) -> impl Iterator<Item = &str> {
        self.unknown.iter().map(|(key, _)| key.as_str())
    }

    /// Returns a copy of the unknown member `key`.
    pub fn unknown(&self, key: &str) -> BindResult<Option<Value>> {
        if self.is_detached() {
            return Err(BindError::inner("accessor is detached from any allocator"));
        }
        let Some(&(_, handle)) = self.unknown.iter().find(|(k, _)| k == key) else {
            return Ok(None);
        };
        self.allocator
            .with(|arena| arena.get(handle).cloned())?
            .map(Some)
            .ok_or_else(|| stale(key))
    }

    /// Removes the unknown member `key`, returning its value.
    ///
    /// The arena slot is reclaimed by the next compaction.
    pub fn remove_unknown(&mut self, key: &str) -> BindResult<Option<Value>> {
        let Some(position) = self.unknown.iter().position(|(k, _)| k == key) else {
            return Ok(None);
        };
        let (key, handle) = self.unknown.remove(position);
        self.allocator
            .with_mut(|arena| arena.take(handle))?
            .map(Some)
            .ok_or_else(|| stale(&key))
    }

    /// Forgets every unknown member.
    #[inline]
    pub fn clear_unknown(&mut self) {
        self.unknown.clear();
    }

    /// Switches to an external arena.
    ///
    /// Existing unknown members are moved into `shared`. The shared arena is
    /// never cleared by this accessor, so values accumulate in it until its
    /// owner clears it.
    pub fn use_allocator(&mut self, shared: &SharedArena) -> BindResult<()> {
        if self.allocator.borrows(shared) {
            return Ok(());
        }

        let values: Vec<Value> = if self.unknown.is_empty() {
            Vec::new()
        } else {
            self.allocator.with_mut(|arena| {
                self.unknown
                    .iter()
                    .map(|(_, handle)| arena.take(*handle).unwrap_or_default())
                    .collect()
            })?
        };

        self.allocator = Allocator::borrowed(shared);
        self.allocator.with_mut(|arena| {
            for ((_, handle), value) in self.unknown.iter_mut().zip(values) {
                *handle = arena.alloc(value);
            }
        })
    }

    /// Drops all storage and marks the accessor invalid.
    ///
    /// Serializing or reading unknown members afterwards fails with
    /// [`ErrorKind::Inner`](crate::ErrorKind::Inner) until the next
    /// deserialization installs a fresh arena.
    pub fn detach(&mut self) {
        self.status.clear();
        self.unknown.clear();
        self.allocator = Allocator::Detached;
        self.valid = false;
    }

    /// Resets everything but the class ahead of a deserialization.
    pub(crate) fn prepare(&mut self) {
        self.allocator.reset();
        self.status.clear();
        self.unknown.clear();
        self.valid = true;
    }

    pub(crate) fn push_unknown(&mut self, key: &str, value: Value) -> BindResult<()> {
        let handle = self.allocator.with_mut(|arena| arena.alloc(value))?;
        self.unknown.push((key.into(), handle));
        Ok(())
    }

    /// Writes every unknown member as a key/value pair.
    pub(crate) fn write_unknown(&self, sink: &mut dyn Sink) -> BindResult<usize> {
        if self.unknown.is_empty() {
            return Ok(0);
        }
        self.allocator.with(|arena| {
            for (key, handle) in &self.unknown {
                let value = arena.get(*handle).ok_or_else(|| stale(key))?;
                sink.key(key)?;
                sink.value(value)?;
            }
            Ok(self.unknown.len())
        })?
    }

    /// Rebuilds an owned arena around the live unknown members.
    pub(crate) fn compact(&mut self) -> BindResult<()> {
        let Allocator::Owned(arena) = &mut self.allocator else {
            return Ok(());
        };
        let mut live: Vec<ValueRef> = self.unknown.iter().map(|(_, handle)| *handle).collect();
        arena.compact(&mut live)?;
        for ((_, handle), new) in self.unknown.iter_mut().zip(live) {
            *handle = new;
        }
        Ok(())
    }

    /// Copies the unknown members out, `None` if the arena is unreachable.
    fn unknown_entries(&self) -> Option<Vec<(String, Value)>> {
        self.allocator
            .with(|arena| {
                self.unknown
                    .iter()
                    .map(|(key, handle)| {
                        let value = arena.get(*handle).cloned().unwrap_or_default();
                        (key.clone(), value)
                    })
                    .collect()
            })
            .ok()
    }

    fn trimmed_status(&self) -> &[FieldStatus] {
        let len = self
            .status
            .iter()
            .rposition(|status| *status != FieldStatus::Missing)
            .map_or(0, |last| last + 1);
        &self.status[..len]
    }
}

impl<T: Bound> Accessor<T> {
    /// Returns the class used by this accessor.
    ///
    /// Unless [`bind_class`](Self::bind_class) selected another one, this is
    /// [`T::class_info`](Bound::class_info).
    #[inline]
    pub fn class(&self) -> &'static ClassInfo<T> {
        match self.class {
            Some(class) => class,
            None => T::class_info(),
        }
    }

    /// Uses `class` for all further operations and resets every status.
    ///
    /// `class` must describe `T`; override classes are built for this.
    pub fn bind_class(&mut self, class: &'static ClassInfo<T>) {
        self.class = Some(class);
        self.status.clear();
    }

    /// Returns `true` if the class serializes as a single bare value.
    #[inline]
    pub fn is_scalar(&self) -> bool {
        self.class().is_scalar()
    }

    /// Returns the status of the field with the given index.
    pub fn status_at(&self, index: usize) -> FieldStatus {
        if index >= self.class().len() {
            return FieldStatus::NotAField;
        }
        self.status.get(index).copied().unwrap_or_default()
    }

    /// Stores `value` as the unknown member `key`.
    ///
    /// An existing member keeps its position and gets the new value. Wire
    /// names of the class's fields are refused.
    pub fn insert_unknown(&mut self, key: impl Into<String>, value: Value) -> BindResult<()> {
        let key = key.into();
        let class = self.class();
        if class.field_by_wire_name(&key).is_some() {
            return Err(BindError::inner(format!(
                "`{key}` is a field of `{}`, not an unknown member",
                class.name()
            )));
        }
        let handle = self.allocator.with_mut(|arena| arena.alloc(value))?;
        match self.unknown.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = handle,
            None => self.unknown.push((key, handle)),
        }
        Ok(())
    }

    /// Sets the status of the field with the given index.
    ///
    /// # Panics
    /// Panics if `index` is not a field of the class, or `status` is
    /// [`FieldStatus::NotAField`].
    pub fn set_status_at(&mut self, index: usize, status: FieldStatus) {
        let len = self.class().len();
        assert!(index < len, "field index {index} out of range for {len} fields");
        assert!(
            status != FieldStatus::NotAField,
            "`NotAField` cannot be stored"
        );
        if self.status.len() < len {
            self.status.resize(len, FieldStatus::Missing);
        }
        self.status[index] = status;
    }
}

fn stale(key: &str) -> BindError {
    BindError::inner(format!("stale arena handle for unknown member `{key}`"))
}

// -----------------------------------------------------------------------------
// Traits

impl<T: 'static> Clone for Accessor<T> {
    fn clone(&self) -> Self {
        let (unknown, allocator) = if self.is_detached() {
            (Vec::new(), Allocator::Detached)
        } else {
            let mut arena = Arena::with_capacity(self.unknown.len());
            let unknown = self
                .unknown_entries()
                .unwrap_or_else(|| {
                    log::warn!("cloning an accessor whose borrowed arena was dropped");
                    Vec::new()
                })
                .into_iter()
                .map(|(key, value)| (key, arena.alloc(value)))
                .collect();
            (unknown, Allocator::Owned(arena))
        };

        Self {
            class: self.class,
            status: self.status.clone(),
            unknown,
            allocator,
            valid: self.valid,
        }
    }
}

impl<T: 'static> PartialEq for Accessor<T> {
    fn eq(&self, other: &Self) -> bool {
        if self.valid != other.valid
            || self.trimmed_status() != other.trimmed_status()
            || self.unknown.len() != other.unknown.len()
        {
            return false;
        }
        if self.unknown.is_empty() {
            return true;
        }
        // Copy one side first; both may borrow the same arena.
        match (self.unknown_entries(), other.unknown_entries()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl<T: 'static> Debug for Accessor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("class", &self.class.map(ClassInfo::name))
            .field("status", &self.trimmed_status())
            .field("unknown", &self.unknown.iter().map(|(k, _)| k).collect::<Vec<_>>())
            .field("allocator", &self.allocator)
            .field("valid", &self.valid)
            .finish()
    }
}
