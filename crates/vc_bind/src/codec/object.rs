use alloc::sync::Arc;

use crate::access::Bound;
use crate::codec::{Codec, SharedCodec};
use crate::error::BindResult;
use crate::info::ClassInfo;
use crate::overrides::Override;
use crate::pipeline::{self, DeContext, SerializeFlags};
use crate::value::{ExpectedKind, Sink, Source};

/// Codec of a nested [`Bound`] struct.
///
/// Delegates to the nested struct's own accessor. When built with an
/// explicit class, that class is bound to the nested accessor before each
/// deserialization, so the nested struct also serializes through it.
pub struct ObjectCodec<U: 'static> {
    class: Option<&'static ClassInfo<U>>,
}

impl<U: Bound> ObjectCodec<U> {
    /// A codec using the accessor's own class.
    #[inline]
    pub fn shared() -> SharedCodec<U> {
        Arc::new(Self { class: None })
    }

    /// A codec binding `class` to every nested struct it reads.
    #[inline]
    pub fn with_class(class: &'static ClassInfo<U>) -> SharedCodec<U> {
        Arc::new(Self { class: Some(class) })
    }

    /// A codec binding the override class `O`.
    #[inline]
    pub fn overridden<O: Override<Base = U>>() -> SharedCodec<U> {
        Self::with_class(O::class_info())
    }
}

impl<U: Bound> Codec<U> for ObjectCodec<U> {
    #[inline]
    fn serialize(&self, value: &U, sink: &mut dyn Sink, flags: SerializeFlags) -> BindResult<()> {
        pipeline::serialize(value, sink, flags).map(|_| ())
    }

    fn deserialize(&self, source: Source<'_>, value: &mut U, ctx: &mut DeContext) -> BindResult<()> {
        if let Some(class) = self.class {
            value.accessor_mut().bind_class(class);
        }
        pipeline::deserialize(value, source, ctx)
    }

    #[inline]
    fn shrink_allocator(&self, value: &mut U) -> BindResult<()> {
        pipeline::shrink_allocator(value)
    }

    fn expected(&self) -> ExpectedKind {
        let class = self.class.unwrap_or_else(U::class_info);
        match class.field_at(0) {
            Some(field) if class.is_scalar() => field.expected(),
            _ => ExpectedKind::Object,
        }
    }
}
