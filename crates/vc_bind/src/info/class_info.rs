use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt::{self, Debug};

use vc_utils::hash::fnv1a_32;

use crate::info::FieldInfo;

// -----------------------------------------------------------------------------
// ClassInfo

/// Metadata of a bound struct: its fields and how to find them.
///
/// Built once per type by [`Bound::class_info`](crate::Bound::class_info)
/// (or per marker by [`Override::class_info`](crate::Override::class_info))
/// and immutable afterwards.
///
/// Fields are stored sorted by byte offset, which makes the address of a
/// field enough to find its metadata. A second table maps the FNV-1a hash
/// of each wire name to its field for member lookup during deserialization.
pub struct ClassInfo<T> {
    pub(crate) name: &'static str,
    pub(crate) base: Option<&'static str>,
    pub(crate) fields: Box<[FieldInfo<T>]>,
    // declaration -> index
    pub(crate) order: Box<[u16]>,
    // (hash, index), sorted by (hash, declaration)
    pub(crate) name_index: Box<[(u32, u16)]>,
    pub(crate) accessor_offset: usize,
    pub(crate) scalar: bool,
}

impl<T: 'static> ClassInfo<T> {
    /// Assembles the lookup tables.
    ///
    /// `fields` must be sorted by offset with `index` already assigned.
    pub(crate) fn from_sorted(
        name: &'static str,
        base: Option<&'static str>,
        fields: Vec<FieldInfo<T>>,
        accessor_offset: usize,
        scalar: bool,
    ) -> Self {
        let mut order: Vec<u16> = (0..fields.len() as u16).collect();
        order.sort_unstable_by_key(|&index| fields[index as usize].declaration);

        let mut name_index: Vec<(u32, u16)> = fields
            .iter()
            .map(|field| (fnv1a_32(field.wire_name.as_bytes()), field.index))
            .collect();
        name_index.sort_unstable_by_key(|&(hash, index)| (hash, fields[index as usize].declaration));

        for (at, &(hash, index)) in name_index.iter().enumerate() {
            let wire_name = fields[index as usize].wire_name;
            let duplicated = name_index[at + 1..]
                .iter()
                .take_while(|&&(h, _)| h == hash)
                .any(|&(_, other)| fields[other as usize].wire_name == wire_name);
            if duplicated {
                panic!("class `{name}` registers the wire name `{wire_name}` twice");
            }
        }

        Self {
            name,
            base,
            fields: fields.into_boxed_slice(),
            order: order.into_boxed_slice(),
            name_index: name_index.into_boxed_slice(),
            accessor_offset,
            scalar,
        }
    }

    /// The class name. Defaults to the Rust type name.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// For override classes, the name of the class they were derived from.
    #[inline]
    pub fn base_name(&self) -> Option<&'static str> {
        self.base
    }

    /// Number of registered fields.
    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the class serializes as its single field's value.
    #[inline]
    pub fn is_scalar(&self) -> bool {
        self.scalar
    }

    /// Byte offset of the accessor inside the struct.
    #[inline]
    pub fn accessor_offset(&self) -> usize {
        self.accessor_offset
    }

    /// Returns the field with the given index.
    #[inline]
    pub fn field_at(&self, index: usize) -> Option<&FieldInfo<T>> {
        self.fields.get(index)
    }

    /// Iterates fields in offset order.
    #[inline]
    pub fn fields(&self) -> impl ExactSizeIterator<Item = &FieldInfo<T>> {
        self.fields.iter()
    }

    /// Iterates fields in registration order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &FieldInfo<T>> {
        self.order.iter().map(|&index| &self.fields[index as usize])
    }

    /// Finds the index of the field starting at `offset`.
    pub fn index_of_offset(&self, offset: usize) -> Option<usize> {
        self.fields
            .binary_search_by_key(&offset, |field| field.offset)
            .ok()
    }

    /// Finds a field by its wire name.
    pub fn field_by_wire_name(&self, name: &str) -> Option<&FieldInfo<T>> {
        let hash = fnv1a_32(name.as_bytes());
        let start = self.name_index.partition_point(|&(h, _)| h < hash);

        self.name_index[start..]
            .iter()
            .take_while(|&&(h, _)| h == hash)
            .map(|&(_, index)| &self.fields[index as usize])
            .find(|field| field.wire_name == name)
    }

    /// Finds the index of the field `field` inside `owner`.
    ///
    /// Returns `None` if `field` is not a registered field of this class,
    /// including a sub-field that happens to share an offset with one.
    #[inline]
    pub fn index_of_field<F: 'static>(&self, owner: &T, field: &F) -> Option<usize> {
        self.index_of_address::<F>((owner as *const T).addr(), (field as *const F).addr())
    }

    /// Same as [`index_of_field`](Self::index_of_field), on raw addresses.
    pub(crate) fn index_of_address<F: 'static>(&self, base: usize, addr: usize) -> Option<usize> {
        let index = self.index_of_offset(addr.checked_sub(base)?)?;
        (self.fields[index].binding.field_type() == TypeId::of::<F>()).then_some(index)
    }
}

impl<T> Debug for ClassInfo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassInfo")
            .field("name", &self.name)
            .field("base", &self.base)
            .field("scalar", &self.scalar)
            .field("fields", &self.fields)
            .finish()
    }
}
