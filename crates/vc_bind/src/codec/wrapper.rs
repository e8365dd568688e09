use alloc::boxed::Box;
use alloc::sync::Arc;

use crate::codec::{Bindable, Codec, SharedCodec};
use crate::error::BindResult;
use crate::pipeline::{DeContext, SerializeFlags};
use crate::value::{ExpectedKind, Sink, Source};

/// A type that is transparent on the wire: it reads and writes as its
/// inner value.
///
/// # Examples
///
/// ```
/// use vc_bind::Bindable;
/// use vc_bind::codec::{Wrap, WrapperCodec};
///
/// #[derive(Default)]
/// struct Meters(f64);
///
/// impl Wrap for Meters {
///     type Inner = f64;
///     fn inner(&self) -> &f64 { &self.0 }
///     fn inner_mut(&mut self) -> &mut f64 { &mut self.0 }
/// }
///
/// impl Bindable for Meters {
///     fn codec() -> vc_bind::SharedCodec<Self> {
///         WrapperCodec::<Self>::new(f64::codec())
///     }
/// }
/// ```
pub trait Wrap: Default + 'static {
    type Inner: Default + 'static;

    fn inner(&self) -> &Self::Inner;

    fn inner_mut(&mut self) -> &mut Self::Inner;
}

impl<E: Default + 'static> Wrap for Box<E> {
    type Inner = E;

    #[inline]
    fn inner(&self) -> &E {
        self
    }

    #[inline]
    fn inner_mut(&mut self) -> &mut E {
        self
    }
}

/// Codec of a [`Wrap`] type, forwarding to the inner codec.
pub struct WrapperCodec<W: Wrap> {
    inner: SharedCodec<W::Inner>,
}

impl<W: Wrap> WrapperCodec<W> {
    #[inline]
    pub fn new(inner: SharedCodec<W::Inner>) -> SharedCodec<W> {
        Arc::new(Self { inner })
    }
}

impl<W: Wrap> Codec<W> for WrapperCodec<W> {
    #[inline]
    fn serialize(&self, value: &W, sink: &mut dyn Sink, flags: SerializeFlags) -> BindResult<()> {
        self.inner.serialize(value.inner(), sink, flags)
    }

    #[inline]
    fn deserialize(&self, source: Source<'_>, value: &mut W, ctx: &mut DeContext) -> BindResult<()> {
        self.inner.deserialize(source, value.inner_mut(), ctx)
    }

    #[inline]
    fn shrink_allocator(&self, value: &mut W) -> BindResult<()> {
        self.inner.shrink_allocator(value.inner_mut())
    }

    #[inline]
    fn expected(&self) -> ExpectedKind {
        self.inner.expected()
    }
}

impl<E: Bindable> Bindable for Box<E> {
    #[inline]
    fn codec() -> SharedCodec<Self> {
        WrapperCodec::<Self>::new(E::codec())
    }
}
