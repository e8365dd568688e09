//! Alternative classes for an already bound struct.
//!
//! An override derives a second [`ClassInfo`] from a base class: the same
//! fields at the same offsets, with edited flags, codecs or name. The base
//! class is never modified. Bind the result with
//! [`BoundExt::deserialize_as`](crate::BoundExt::deserialize_as), with
//! [`Accessor::bind_class`](crate::Accessor::bind_class), or for nested
//! structs with [`ObjectCodec::overridden`](crate::codec::ObjectCodec::overridden).
//!
//! ```
//! use vc_bind::info::ClassBuilder;
//! use vc_bind::overrides::{ClassOverride, Override};
//! use vc_bind::{Accessor, Bound, BoundExt, DeserializeFlags, field};
//! use serde_json::json;
//!
//! #[derive(Default)]
//! struct Login {
//!     user: String,
//!     token: String,
//!     accessor: Accessor<Self>,
//! }
//!
//! impl Bound for Login {
//!     fn describe(class: &mut ClassBuilder<Self>) {
//!         field!(class, user);
//!         field!(class, token);
//!     }
//!     fn accessor(&self) -> &Accessor<Self> { &self.accessor }
//!     fn accessor_mut(&mut self) -> &mut Accessor<Self> { &mut self.accessor }
//! }
//!
//! // Anonymous logins carry no token.
//! struct Anonymous;
//!
//! impl Override for Anonymous {
//!     type Base = Login;
//!     fn describe(class: &mut ClassOverride<Login>) {
//!         class.name("AnonymousLogin").optional("token", true);
//!     }
//! }
//!
//! let source = json!({"user": "guest"});
//! let mut login = Login::default();
//! assert!(login.deserialize(&source, DeserializeFlags::empty()).is_err());
//! assert!(login.deserialize_as::<Anonymous>(&source, DeserializeFlags::empty()).is_ok());
//! ```

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::type_name;

use crate::access::Bound;
use crate::codec::{SharedCodec, TypedBinding};
use crate::info::{ClassCell, ClassInfo, FieldFlags, FieldInfo};

// -----------------------------------------------------------------------------
// Override

/// A marker type describing edits to the class of [`Self::Base`].
pub trait Override: 'static {
    type Base: Bound;

    /// Edits the copied class. Called once, on first use.
    fn describe(class: &mut ClassOverride<Self::Base>);

    /// The class the edits start from.
    ///
    /// Return another override's class to chain overrides.
    fn base() -> &'static ClassInfo<Self::Base> {
        Self::Base::class_info()
    }

    /// Returns the derived class, building it on first use.
    fn class_info() -> &'static ClassInfo<Self::Base> {
        static CELL: ClassCell = ClassCell::new();
        CELL.get_or_insert::<Self, _>(|| {
            let mut class = ClassOverride::new(Self::base());
            Self::describe(&mut class);
            class.build()
        })
    }
}

// -----------------------------------------------------------------------------
// ClassOverride

/// Edits a private copy of a base class's fields.
///
/// Fields are addressed by wire name; naming a field that does not exist
/// panics.
pub struct ClassOverride<T: 'static> {
    base: &'static ClassInfo<T>,
    name: &'static str,
    fields: Vec<FieldInfo<T>>,
}

impl<T: 'static> ClassOverride<T> {
    fn new(base: &'static ClassInfo<T>) -> Self {
        Self {
            base,
            name: base.name,
            fields: base.fields.to_vec(),
        }
    }

    #[inline]
    pub fn base(&self) -> &'static ClassInfo<T> {
        self.base
    }

    /// Renames the derived class. It keeps the base class's name otherwise.
    pub fn name(&mut self, name: &'static str) -> &mut Self {
        self.name = name;
        self
    }

    /// Replaces all flags of a field.
    pub fn flags(&mut self, wire_name: &str, flags: FieldFlags) -> &mut Self {
        self.field_mut(wire_name).flags = flags;
        self
    }

    pub fn optional(&mut self, wire_name: &str, optional: bool) -> &mut Self {
        self.field_mut(wire_name)
            .flags
            .set(FieldFlags::OPTIONAL, optional);
        self
    }

    pub fn nullable(&mut self, wire_name: &str, nullable: bool) -> &mut Self {
        self.field_mut(wire_name)
            .flags
            .set(FieldFlags::NULLABLE, nullable);
        self
    }

    /// Replaces the codec of a field.
    ///
    /// # Panics
    /// Panics if the field is not of type `F`.
    pub fn codec<F: Default + 'static>(&mut self, wire_name: &str, codec: SharedCodec<F>) -> &mut Self {
        let class = self.name;
        let field = self.field_mut(wire_name);
        let Some(binding) = field.binding.as_any().downcast_ref::<TypedBinding<T, F>>() else {
            panic!(
                "field `{wire_name}` of `{class}` is a `{}`, not a `{}`",
                field.type_name,
                type_name::<F>()
            );
        };
        field.binding = Arc::new(binding.with_codec(codec));
        self
    }

    fn field_mut(&mut self, wire_name: &str) -> &mut FieldInfo<T> {
        let class = self.name;
        match self.fields.iter_mut().find(|field| field.wire_name == wire_name) {
            Some(field) => field,
            None => panic!("class `{class}` has no field `{wire_name}`"),
        }
    }

    fn build(self) -> ClassInfo<T> {
        log::debug!("derived class `{}` from `{}`", self.name, self.base.name);
        ClassInfo::from_sorted(
            self.name,
            Some(self.base.name),
            self.fields,
            self.base.accessor_offset,
            self.base.scalar,
        )
    }
}
