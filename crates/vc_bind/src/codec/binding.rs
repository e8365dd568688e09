use core::any::{Any, TypeId};

use super::SharedCodec;
use crate::error::BindResult;
use crate::pipeline::{DeContext, SerializeFlags};
use crate::value::{ExpectedKind, Sink, Source};

// -----------------------------------------------------------------------------
// FieldBinding

/// Type-erased access to one field of a `T`, paired with its codec.
pub(crate) trait FieldBinding<T>: Send + Sync + 'static {
    fn serialize(&self, owner: &T, sink: &mut dyn Sink, flags: SerializeFlags) -> BindResult<()>;

    fn deserialize(&self, source: Source<'_>, owner: &mut T, ctx: &mut DeContext)
    -> BindResult<()>;

    /// Restores the field's default value.
    fn reset(&self, owner: &mut T);

    fn shrink_allocator(&self, owner: &mut T) -> BindResult<()>;

    fn expected(&self) -> ExpectedKind;

    /// Returns the [`TypeId`] of the field's type.
    fn field_type(&self) -> TypeId;

    fn as_any(&self) -> &dyn Any;
}

// -----------------------------------------------------------------------------
// TypedBinding

/// The only [`FieldBinding`]: a pair of projections plus a codec.
pub(crate) struct TypedBinding<T, F> {
    pub get: fn(&T) -> &F,
    pub get_mut: fn(&mut T) -> &mut F,
    pub codec: SharedCodec<F>,
}

impl<T, F> Clone for TypedBinding<T, F> {
    fn clone(&self) -> Self {
        Self {
            get: self.get,
            get_mut: self.get_mut,
            codec: self.codec.clone(),
        }
    }
}

impl<T, F> TypedBinding<T, F> {
    /// Returns a copy that uses `codec` instead.
    pub fn with_codec(&self, codec: SharedCodec<F>) -> Self {
        Self {
            get: self.get,
            get_mut: self.get_mut,
            codec,
        }
    }
}

impl<T: 'static, F: Default + 'static> FieldBinding<T> for TypedBinding<T, F> {
    #[inline]
    fn serialize(&self, owner: &T, sink: &mut dyn Sink, flags: SerializeFlags) -> BindResult<()> {
        self.codec.serialize((self.get)(owner), sink, flags)
    }

    #[inline]
    fn deserialize(
        &self,
        source: Source<'_>,
        owner: &mut T,
        ctx: &mut DeContext,
    ) -> BindResult<()> {
        self.codec.deserialize(source, (self.get_mut)(owner), ctx)
    }

    #[inline]
    fn reset(&self, owner: &mut T) {
        *(self.get_mut)(owner) = F::default();
    }

    #[inline]
    fn shrink_allocator(&self, owner: &mut T) -> BindResult<()> {
        self.codec.shrink_allocator((self.get_mut)(owner))
    }

    #[inline]
    fn expected(&self) -> ExpectedKind {
        self.codec.expected()
    }

    #[inline]
    fn field_type(&self) -> TypeId {
        TypeId::of::<F>()
    }

    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }
}
