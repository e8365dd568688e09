use alloc::sync::Arc;
use core::fmt::{self, Debug};

use crate::codec::FieldBinding;
use crate::info::FieldFlags;
use crate::value::ExpectedKind;

// -----------------------------------------------------------------------------
// FieldInfo

/// Metadata of one registered field of a `T`.
pub struct FieldInfo<T> {
    pub(crate) index: u16,
    pub(crate) declaration: u16,
    pub(crate) offset: usize,
    pub(crate) size: usize,
    pub(crate) wire_name: &'static str,
    pub(crate) local_name: &'static str,
    pub(crate) flags: FieldFlags,
    pub(crate) type_name: &'static str,
    pub(crate) binding: Arc<dyn FieldBinding<T>>,
}

impl<T> Clone for FieldInfo<T> {
    fn clone(&self) -> Self {
        Self {
            index: self.index,
            declaration: self.declaration,
            offset: self.offset,
            size: self.size,
            wire_name: self.wire_name,
            local_name: self.local_name,
            flags: self.flags,
            type_name: self.type_name,
            binding: self.binding.clone(),
        }
    }
}

impl<T: 'static> FieldInfo<T> {
    /// Position in the class's offset-sorted field table.
    ///
    /// This is also the index into the accessor's status table.
    #[inline]
    pub fn index(&self) -> usize {
        self.index as usize
    }

    /// Position in registration order, which is also the wire order.
    #[inline]
    pub fn declaration(&self) -> usize {
        self.declaration as usize
    }

    /// Byte offset of the field inside the owning struct.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The member key used in the value tree.
    #[inline]
    pub fn wire_name(&self) -> &'static str {
        self.wire_name
    }

    /// The name of the field in Rust source.
    ///
    /// Defaults to the wire name.
    #[inline]
    pub fn local_name(&self) -> &'static str {
        self.local_name
    }

    #[inline]
    pub fn flags(&self) -> FieldFlags {
        self.flags
    }

    #[inline]
    pub fn is_optional(&self) -> bool {
        self.flags.is_optional()
    }

    #[inline]
    pub fn is_nullable(&self) -> bool {
        self.flags.is_nullable()
    }

    /// The Rust type name of the field.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// What the field's codec accepts.
    #[inline]
    pub fn expected(&self) -> ExpectedKind {
        self.binding.expected()
    }
}

impl<T> Debug for FieldInfo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldInfo")
            .field("index", &self.index)
            .field("offset", &self.offset)
            .field("wire_name", &self.wire_name)
            .field("type_name", &self.type_name)
            .field("flags", &self.flags)
            .finish()
    }
}
