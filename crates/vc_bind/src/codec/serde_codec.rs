use alloc::string::ToString;
use alloc::sync::Arc;
use core::any::type_name;
use core::marker::PhantomData;

use serde_core::Serialize;
use serde_core::de::DeserializeOwned;

use crate::codec::{Codec, SharedCodec};
use crate::error::{BindError, BindResult};
use crate::pipeline::{DeContext, SerializeFlags};
use crate::value::{ExpectedKind, Sink, Source};

/// Codec of any type implementing serde's traits, converted through
/// `serde_json`.
///
/// Useful for field types that are not registered classes, such as
/// tuples or foreign enums. It is never picked automatically; name it
/// with [`ClassBuilder::field_with`](crate::info::ClassBuilder::field_with).
///
/// A conversion failure is reported as a type mismatch against the
/// field's type name.
pub struct SerdeCodec<F>(PhantomData<fn() -> F>);

impl<F> SerdeCodec<F>
where
    F: Serialize + DeserializeOwned + 'static,
{
    #[inline]
    pub fn shared() -> SharedCodec<F> {
        Arc::new(Self(PhantomData))
    }
}

impl<F> Codec<F> for SerdeCodec<F>
where
    F: Serialize + DeserializeOwned + 'static,
{
    fn serialize(&self, value: &F, sink: &mut dyn Sink, _: SerializeFlags) -> BindResult<()> {
        let value = serde_json::to_value(value).map_err(|err| BindError::inner(err.to_string()))?;
        sink.value(&value)
    }

    fn deserialize(&self, source: Source<'_>, value: &mut F, _: &mut DeContext) -> BindResult<()> {
        match F::deserialize(source.value()) {
            Ok(v) => {
                *value = v;
                Ok(())
            }
            Err(err) => {
                log::debug!("`{}` rejected its value: {err}", type_name::<F>());
                Err(BindError::mismatch(self.expected(), source.value()))
            }
        }
    }

    #[inline]
    fn expected(&self) -> ExpectedKind {
        ExpectedKind::Custom(type_name::<F>())
    }
}
