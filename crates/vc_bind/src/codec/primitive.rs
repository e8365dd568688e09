use alloc::string::String;
use alloc::sync::Arc;
use core::marker::PhantomData;

use serde_json::Value;

use crate::codec::{Bindable, Codec, SharedCodec};
use crate::error::{BindError, BindResult};
use crate::pipeline::{DeContext, SerializeFlags};
use crate::value::{ExpectedKind, Sink, Source, ValueKind};

// -----------------------------------------------------------------------------
// PrimitiveCodec

/// Codec of scalar leaf types and of raw [`Value`]s.
///
/// Integers must be in range of the target type; an out-of-range or
/// fractional number is a type mismatch. Floats accept any number that
/// stays finite in the target type.
pub struct PrimitiveCodec<F>(PhantomData<fn() -> F>);

impl<F> PrimitiveCodec<F> {
    #[inline]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<F> Default for PrimitiveCodec<F> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! impl_integer {
    ($as:ident, $write:ident, $wide:ty: $($ty:ty => $kind:ident),* $(,)?) => {$(
        impl Codec<$ty> for PrimitiveCodec<$ty> {
            #[inline]
            fn serialize(&self, value: &$ty, sink: &mut dyn Sink, _: SerializeFlags) -> BindResult<()> {
                sink.$write(*value as $wide)
            }

            fn deserialize(
                &self,
                source: Source<'_>,
                value: &mut $ty,
                _: &mut DeContext,
            ) -> BindResult<()> {
                match source.value().$as().and_then(|v| <$ty>::try_from(v).ok()) {
                    Some(v) => {
                        *value = v;
                        Ok(())
                    }
                    None => Err(BindError::mismatch(ExpectedKind::$kind, source.value())),
                }
            }

            #[inline]
            fn expected(&self) -> ExpectedKind {
                ExpectedKind::$kind
            }
        }

        impl Bindable for $ty {
            #[inline]
            fn codec() -> SharedCodec<Self> {
                Arc::new(PrimitiveCodec::<$ty>::new())
            }
        }
    )*};
}

impl_integer!(as_i64, i64, i64: i8 => Int, i16 => Int, i32 => Int, i64 => Int64, isize => Int64);
impl_integer!(as_u64, u64, u64: u8 => Uint, u16 => Uint, u32 => Uint, u64 => Uint64, usize => Uint64);

macro_rules! impl_float {
    ($($ty:ty),*) => {$(
        impl Codec<$ty> for PrimitiveCodec<$ty> {
            #[inline]
            fn serialize(&self, value: &$ty, sink: &mut dyn Sink, _: SerializeFlags) -> BindResult<()> {
                sink.f64(f64::from(*value))
            }

            fn deserialize(
                &self,
                source: Source<'_>,
                value: &mut $ty,
                _: &mut DeContext,
            ) -> BindResult<()> {
                match source.value().as_f64().map(|v| v as $ty).filter(|v| v.is_finite()) {
                    Some(v) => {
                        *value = v;
                        Ok(())
                    }
                    None => Err(BindError::mismatch(ExpectedKind::Double, source.value())),
                }
            }

            #[inline]
            fn expected(&self) -> ExpectedKind {
                ExpectedKind::Double
            }
        }

        impl Bindable for $ty {
            #[inline]
            fn codec() -> SharedCodec<Self> {
                Arc::new(PrimitiveCodec::<$ty>::new())
            }
        }
    )*};
}

impl_float!(f32, f64);

impl Codec<bool> for PrimitiveCodec<bool> {
    #[inline]
    fn serialize(&self, value: &bool, sink: &mut dyn Sink, _: SerializeFlags) -> BindResult<()> {
        sink.bool(*value)
    }

    fn deserialize(&self, source: Source<'_>, value: &mut bool, _: &mut DeContext) -> BindResult<()> {
        match source.value().as_bool() {
            Some(v) => {
                *value = v;
                Ok(())
            }
            None => Err(BindError::mismatch(ExpectedKind::Bool, source.value())),
        }
    }

    #[inline]
    fn expected(&self) -> ExpectedKind {
        ExpectedKind::Bool
    }
}

impl Codec<String> for PrimitiveCodec<String> {
    #[inline]
    fn serialize(&self, value: &String, sink: &mut dyn Sink, _: SerializeFlags) -> BindResult<()> {
        sink.str(value)
    }

    fn deserialize(
        &self,
        source: Source<'_>,
        value: &mut String,
        _: &mut DeContext,
    ) -> BindResult<()> {
        if source.kind() != ValueKind::String {
            return Err(BindError::mismatch(ExpectedKind::String, source.value()));
        }
        *value = source.into_string().unwrap_or_default();
        Ok(())
    }

    #[inline]
    fn expected(&self) -> ExpectedKind {
        ExpectedKind::String
    }
}

impl Codec<Value> for PrimitiveCodec<Value> {
    #[inline]
    fn serialize(&self, value: &Value, sink: &mut dyn Sink, _: SerializeFlags) -> BindResult<()> {
        sink.value(value)
    }

    #[inline]
    fn deserialize(&self, source: Source<'_>, value: &mut Value, _: &mut DeContext) -> BindResult<()> {
        *value = source.into_value();
        Ok(())
    }

    #[inline]
    fn expected(&self) -> ExpectedKind {
        ExpectedKind::Raw
    }
}

macro_rules! impl_bindable {
    ($($ty:ty),*) => {$(
        impl Bindable for $ty {
            #[inline]
            fn codec() -> SharedCodec<Self> {
                Arc::new(PrimitiveCodec::<$ty>::new())
            }
        }
    )*};
}

impl_bindable!(bool, String, Value);
