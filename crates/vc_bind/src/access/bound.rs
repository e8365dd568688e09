use alloc::string::String;
use alloc::vec::Vec;
use core::any::type_name;
use core::mem;
use std::io;

use serde_json::Value;

use crate::access::{Accessor, FieldStatus, OptionalRef};
use crate::arena::SharedArena;
use crate::error::{BindError, BindResult};
use crate::info::{ClassBuilder, ClassCell, ClassInfo};
use crate::overrides::Override;
use crate::pipeline::{self, DeContext, DeserializeFlags, SerializeFlags};
use crate::value::{Sink, Source, ValueSink, WriterSink};

// -----------------------------------------------------------------------------
// Bound

/// A struct whose fields are registered for binding.
///
/// Implementors embed an [`Accessor<Self>`] and list their fields in
/// [`describe`](Self::describe):
///
/// ```
/// use vc_bind::info::ClassBuilder;
/// use vc_bind::{Accessor, Bound, BoundExt, FieldStatus, field};
///
/// #[derive(Default)]
/// struct Point {
///     x: i32,
///     y: i32,
///     accessor: Accessor<Self>,
/// }
///
/// impl Bound for Point {
///     fn describe(class: &mut ClassBuilder<Self>) {
///         field!(class, x);
///         field!(class, y).optional();
///     }
///
///     fn accessor(&self) -> &Accessor<Self> {
///         &self.accessor
///     }
///
///     fn accessor_mut(&mut self) -> &mut Accessor<Self> {
///         &mut self.accessor
///     }
/// }
///
/// let point = Point::from_json_str(r#"{"x": 3}"#).unwrap();
/// assert_eq!(*point.get(|p| &p.x), 3);
/// assert_eq!(point.status(|p| &p.y), FieldStatus::Missing);
/// assert_eq!(point.to_json_string().unwrap(), r#"{"x":3}"#);
/// ```
pub trait Bound: Default + Sized + 'static {
    /// Registers the fields of `Self`. Called once, on first use.
    fn describe(class: &mut ClassBuilder<Self>);

    fn accessor(&self) -> &Accessor<Self>;

    fn accessor_mut(&mut self) -> &mut Accessor<Self>;

    /// Returns the class of `Self`, building it on first use.
    fn class_info() -> &'static ClassInfo<Self> {
        static CELL: ClassCell = ClassCell::new();
        CELL.get_or_insert::<Self, _>(ClassBuilder::<Self>::describe)
    }
}

// -----------------------------------------------------------------------------
// BoundExt

/// Operations available on every [`Bound`] struct.
///
/// Fields are designated by projections such as `|s| &s.name`. A projection
/// that does not resolve to a registered field makes the `mark_*` and `set`
/// operations panic, while [`status`](Self::status) reports
/// [`FieldStatus::NotAField`].
pub trait BoundExt: Bound {
    /// Returns the status of a field.
    fn status<F: 'static>(&self, field: impl FnOnce(&Self) -> &F) -> FieldStatus {
        let accessor = self.accessor();
        match accessor.class().index_of_field(self, field(self)) {
            Some(index) => accessor.status_at(index),
            None => FieldStatus::NotAField,
        }
    }

    /// Marks a field `Valid`.
    fn mark_valid<F: 'static>(&mut self, field: impl FnOnce(&Self) -> &F) {
        let index = resolve(self, field);
        self.accessor_mut().set_status_at(index, FieldStatus::Valid);
    }

    /// Marks a field `Null`, returning `false` without a change if the
    /// field is not `NULLABLE`.
    fn mark_null<F: 'static>(&mut self, field: impl FnOnce(&Self) -> &F) -> bool {
        let index = resolve(self, field);
        let class = self.accessor().class();
        let info = &class.fields[index];
        if !info.is_nullable() {
            log::warn!(
                "ignored null mark on field `{}` of `{}`: not nullable",
                info.wire_name,
                class.name
            );
            return false;
        }
        self.accessor_mut().set_status_at(index, FieldStatus::Null);
        true
    }

    /// Marks a field `Missing`.
    fn mark_missing<F: 'static>(&mut self, field: impl FnOnce(&Self) -> &F) {
        let index = resolve(self, field);
        self.accessor_mut().set_status_at(index, FieldStatus::Missing);
    }

    /// Reads a field if this struct is valid and the field is `Valid`.
    fn get<F: Default + 'static>(&self, field: impl FnOnce(&Self) -> &F) -> OptionalRef<'_, F> {
        let value = field(self);
        let accessor = self.accessor();
        let present = accessor.is_valid()
            && accessor
                .class()
                .index_of_field(self, value)
                .is_some_and(|index| accessor.status_at(index) == FieldStatus::Valid);

        if present {
            OptionalRef::Present(value)
        } else {
            OptionalRef::Absent(F::default())
        }
    }

    /// Writes a field and marks it `Valid`.
    fn set<F: 'static>(&mut self, field: impl FnOnce(&mut Self) -> &mut F, value: F) {
        let base = (self as *const Self).addr();
        let slot = field(self);
        let addr = (&*slot as *const F).addr();
        *slot = value;

        let class = self.accessor().class();
        let Some(index) = class.index_of_address::<F>(base, addr) else {
            not_a_field::<Self, F>(class);
        };
        self.accessor_mut().set_status_at(index, FieldStatus::Valid);
    }

    /// Pushes this struct into `sink`, returning the number of members
    /// written. Scalar classes write one bare value and report `1`.
    fn serialize(&self, sink: &mut dyn Sink, flags: SerializeFlags) -> BindResult<usize> {
        pipeline::serialize(self, sink, flags)
    }

    fn to_value(&self, flags: SerializeFlags) -> BindResult<Value> {
        let mut sink = ValueSink::new();
        self.serialize(&mut sink, flags)?;
        sink.finish()
    }

    /// Renders compact JSON with default flags.
    fn to_json_string(&self) -> BindResult<String> {
        let mut bytes = Vec::new();
        self.to_writer(&mut bytes, SerializeFlags::empty())?;
        String::from_utf8(bytes).map_err(|err| BindError::inner(alloc::format!("{err}")))
    }

    /// Streams compact JSON into `writer`.
    fn to_writer<W: io::Write>(&self, writer: W, flags: SerializeFlags) -> BindResult<W> {
        let mut sink = WriterSink::new(writer);
        self.serialize(&mut sink, flags)?;
        sink.into_inner()
    }

    /// Reads this struct from `source`, copying every retained value.
    fn deserialize(&mut self, source: &Value, flags: DeserializeFlags) -> BindResult<()> {
        let mut ctx = DeContext::new(flags);
        pipeline::deserialize(self, Source::Borrowed(source), &mut ctx)
    }

    /// Reads this struct from `source`.
    ///
    /// With [`DeserializeFlags::MOVE_FROM_SOURCE`], retained values are
    /// moved out of `source`, leaving `null` in their place.
    fn deserialize_mut(&mut self, source: &mut Value, flags: DeserializeFlags) -> BindResult<()> {
        let source = if flags.contains(DeserializeFlags::MOVE_FROM_SOURCE) {
            Source::Stolen(source)
        } else {
            Source::Borrowed(source)
        };
        pipeline::deserialize(self, source, &mut DeContext::new(flags))
    }

    /// Binds the override class `O` and reads this struct from `source`.
    fn deserialize_as<O: Override<Base = Self>>(
        &mut self,
        source: &Value,
        flags: DeserializeFlags,
    ) -> BindResult<()> {
        self.accessor_mut().bind_class(O::class_info());
        self.deserialize(source, flags)
    }

    fn from_value(source: &Value, flags: DeserializeFlags) -> BindResult<Self> {
        let mut value = Self::default();
        value.deserialize(source, flags)?;
        Ok(value)
    }

    /// Parses `text` and reads a struct from it with default flags.
    ///
    /// Members are moved out of the parsed document rather than copied.
    fn from_json_str(text: &str) -> BindResult<Self> {
        let mut document: Value = serde_json::from_str(text).map_err(|err| BindError::parse(&err))?;
        let mut value = Self::default();
        value.deserialize_mut(&mut document, DeserializeFlags::MOVE_FROM_SOURCE)?;
        Ok(value)
    }

    /// Compacts the arenas of this struct and of every nested field.
    fn shrink_allocator(&mut self) -> BindResult<()> {
        pipeline::shrink_allocator(self)
    }

    /// Switches this struct's accessor to an external arena.
    fn use_allocator(&mut self, shared: &SharedArena) -> BindResult<()> {
        self.accessor_mut().use_allocator(shared)
    }

    /// Moves everything out of this struct, leaving it default-initialized
    /// and detached.
    fn steal(&mut self) -> Self {
        let stolen = mem::take(self);
        self.accessor_mut().detach();
        stolen
    }

    /// Replaces this struct with the contents of `other`, which is left
    /// detached.
    fn take_from(&mut self, other: &mut Self) {
        *self = other.steal();
    }
}

impl<T: Bound> BoundExt for T {}

fn resolve<T: Bound, F: 'static>(value: &T, field: impl FnOnce(&T) -> &F) -> usize {
    let class = value.accessor().class();
    match class.index_of_field(value, field(value)) {
        Some(index) => index,
        None => not_a_field::<T, F>(class),
    }
}

#[cold]
#[track_caller]
fn not_a_field<T, F>(class: &ClassInfo<T>) -> ! {
    panic!(
        "the projected `{}` is not a registered field of `{}`",
        type_name::<F>(),
        class.name
    )
}
