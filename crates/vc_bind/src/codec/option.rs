use alloc::sync::Arc;

use crate::codec::{Bindable, Codec, SharedCodec};
use crate::error::BindResult;
use crate::pipeline::{DeContext, SerializeFlags};
use crate::value::{ExpectedKind, Sink, Source};

/// Codec of `Option<E>`: `None` is `null`, `Some` is written as `E`.
///
/// This is independent of field nullability. A nullable `Option` field
/// that reads `null` is reset to `None` with status `Null`; a non-nullable
/// one reads it through this codec and ends up `Valid`.
pub struct OptionCodec<E> {
    inner: SharedCodec<E>,
}

impl<E: Default + 'static> OptionCodec<E> {
    #[inline]
    pub fn new(inner: SharedCodec<E>) -> SharedCodec<Option<E>> {
        Arc::new(Self { inner })
    }
}

impl<E: Default + 'static> Codec<Option<E>> for OptionCodec<E> {
    fn serialize(
        &self,
        value: &Option<E>,
        sink: &mut dyn Sink,
        flags: SerializeFlags,
    ) -> BindResult<()> {
        match value {
            Some(inner) => self.inner.serialize(inner, sink, flags),
            None => sink.null(),
        }
    }

    fn deserialize(
        &self,
        source: Source<'_>,
        value: &mut Option<E>,
        ctx: &mut DeContext,
    ) -> BindResult<()> {
        if source.is_null() {
            *value = None;
            return Ok(());
        }

        let result = self.inner.deserialize(source, value.insert(E::default()), ctx);
        if result.is_err() {
            *value = None;
        }
        result
    }

    fn shrink_allocator(&self, value: &mut Option<E>) -> BindResult<()> {
        match value {
            Some(inner) => self.inner.shrink_allocator(inner),
            None => Ok(()),
        }
    }

    #[inline]
    fn expected(&self) -> ExpectedKind {
        self.inner.expected()
    }
}

impl<E: Bindable> Bindable for Option<E> {
    #[inline]
    fn codec() -> SharedCodec<Self> {
        OptionCodec::new(E::codec())
    }
}
