use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::type_name;

use crate::access::{Accessor, Bound};
use crate::codec::{Bindable, SharedCodec, TypedBinding};
use crate::info::{ClassInfo, FieldFlags, FieldInfo};

// -----------------------------------------------------------------------------
// ClassBuilder

/// Collects the fields of a bound struct during [`Bound::describe`].
///
/// The builder owns a default-constructed prototype of `T`. Field offsets
/// are measured on it: each getter is applied to the prototype and the
/// address of the result, relative to the prototype, is the field offset.
///
/// # Panics
///
/// Registration mistakes are programmer errors and panic when the class is
/// first used:
/// - a getter that does not point into the struct, or into the accessor;
/// - two fields at the same offset, or two fields with the same wire name;
/// - a scalar class without exactly one field.
pub struct ClassBuilder<T> {
    prototype: T,
    name: &'static str,
    scalar: bool,
    fields: Vec<FieldInfo<T>>,
}

impl<T: Bound> ClassBuilder<T> {
    pub(crate) fn new() -> Self {
        Self {
            prototype: T::default(),
            name: type_name::<T>(),
            scalar: false,
            fields: Vec::new(),
        }
    }

    /// Runs [`Bound::describe`] and builds the class.
    pub(crate) fn describe() -> ClassInfo<T> {
        let mut builder = Self::new();
        T::describe(&mut builder);
        builder.build()
    }

    /// Overrides the class name, which defaults to the Rust type name.
    pub fn name(&mut self, name: &'static str) -> &mut Self {
        self.name = name;
        self
    }

    /// Marks the class as a scalar wrapper around its only field.
    ///
    /// A scalar class serializes as the bare value of that field.
    pub fn scalar(&mut self) -> &mut Self {
        self.scalar = true;
        self
    }

    /// Registers a field using the codec of its type.
    ///
    /// Usually invoked through [`field!`](crate::field).
    #[inline]
    pub fn field<F: Bindable>(
        &mut self,
        wire_name: &'static str,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> FieldBuilder<'_, T> {
        self.field_with(wire_name, get, get_mut, F::codec())
    }

    /// Registers a field with an explicit codec.
    pub fn field_with<F: Default + 'static>(
        &mut self,
        wire_name: &'static str,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
        codec: SharedCodec<F>,
    ) -> FieldBuilder<'_, T> {
        // Indices are stored as `u16`, including the field count.
        let declaration = match u16::try_from(self.fields.len()) {
            Ok(declaration) if declaration < u16::MAX => declaration,
            _ => panic!(
                "class `{}` registers more than {} fields",
                self.name,
                u16::MAX
            ),
        };

        let base = (&self.prototype as *const T).addr();
        let addr = (get(&self.prototype) as *const F).addr();
        let addr_mut = (get_mut(&mut self.prototype) as *mut F).addr();
        let offset = match addr.checked_sub(base) {
            Some(offset) if addr == addr_mut && offset + size_of::<F>() <= size_of::<T>() => offset,
            _ => panic!(
                "getter of field `{wire_name}` does not point into `{}`",
                self.name
            ),
        };

        self.fields.push(FieldInfo {
            index: 0,
            declaration,
            offset,
            size: size_of::<F>(),
            wire_name,
            local_name: wire_name,
            flags: FieldFlags::empty(),
            type_name: type_name::<F>(),
            binding: Arc::new(TypedBinding { get, get_mut, codec }),
        });

        let last = self.fields.len() - 1;
        FieldBuilder {
            field: &mut self.fields[last],
        }
    }

    fn build(self) -> ClassInfo<T> {
        let Self {
            prototype,
            name,
            scalar,
            mut fields,
        } = self;

        if scalar && fields.len() != 1 {
            panic!(
                "scalar class `{name}` must register exactly one field, found {}",
                fields.len()
            );
        }

        let base = (&prototype as *const T).addr();
        let accessor_offset = (prototype.accessor() as *const Accessor<T>)
            .addr()
            .checked_sub(base)
            .filter(|offset| offset + size_of::<Accessor<T>>() <= size_of::<T>());
        let Some(accessor_offset) = accessor_offset else {
            panic!("accessor of `{name}` is not stored inside the struct");
        };
        let accessor_end = accessor_offset + size_of::<Accessor<T>>();

        fields.sort_unstable_by_key(|field| field.offset);
        for pair in fields.windows(2) {
            if pair[0].offset == pair[1].offset || pair[0].offset + pair[0].size > pair[1].offset {
                panic!(
                    "fields `{}` and `{}` of `{name}` overlap",
                    pair[0].wire_name, pair[1].wire_name
                );
            }
        }

        for (index, field) in fields.iter_mut().enumerate() {
            if field.offset < accessor_end && accessor_offset < field.offset + field.size.max(1) {
                panic!("field `{}` of `{name}` aliases the accessor", field.wire_name);
            }
            field.index = index as u16;
        }

        log::debug!("registered class `{name}` with {} fields", fields.len());
        ClassInfo::from_sorted(name, None, fields, accessor_offset, scalar)
    }
}

// -----------------------------------------------------------------------------
// FieldBuilder

/// Sets options on a field just registered with a [`ClassBuilder`].
pub struct FieldBuilder<'a, T> {
    field: &'a mut FieldInfo<T>,
}

impl<T> FieldBuilder<'_, T> {
    /// The field may be absent after deserialization.
    pub fn optional(self) -> Self {
        self.field.flags |= FieldFlags::OPTIONAL;
        self
    }

    /// The field accepts an explicit `null`.
    pub fn nullable(self) -> Self {
        self.field.flags |= FieldFlags::NULLABLE;
        self
    }

    pub fn flags(self, flags: FieldFlags) -> Self {
        self.field.flags = flags;
        self
    }

    /// Records the Rust name of the field when it differs from the wire name.
    pub fn local_name(self, name: &'static str) -> Self {
        self.field.local_name = name;
        self
    }
}
