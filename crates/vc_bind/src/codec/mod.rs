//! Per-type conversion between field values and the value tree.
//!
//! A [`Codec<F>`] reads and writes one `F`. Codecs are picked when a field
//! is registered, usually through [`Bindable::codec`], and stored in the
//! field's binding; dispatch afterwards is a single virtual call.
//!
//! Provided codecs:
//!
//! | Field type | Codec | Wire shape |
//! |------------|-------|------------|
//! | `bool`, integers, floats, `String` | [`PrimitiveCodec`] | scalar |
//! | [`Value`](crate::value::Value) | [`PrimitiveCodec`] | anything |
//! | [`Bound`](crate::Bound) structs | [`ObjectCodec`] | object, or bare value for scalar classes |
//! | `Vec<E>`, `VecDeque<E>` | [`ListCodec`] | array |
//! | `HashMap<String, E>`, `BTreeMap<String, E>` | [`MapCodec`] | object |
//! | `Option<E>` | [`OptionCodec`] | `null` or `E` |
//! | `Box<E>` and [`Wrap`] types | [`WrapperCodec`] | as `E` |
//! | serde types | [`SerdeCodec`] | as serialized by `serde_json` |

// -----------------------------------------------------------------------------
// Modules

mod binding;
mod list;
mod map;
mod object;
mod option;
mod primitive;
mod serde_codec;
mod wrapper;

// -----------------------------------------------------------------------------
// Exports

pub(crate) use binding::{FieldBinding, TypedBinding};

pub use list::{ListCodec, Sequence};
pub use map::{MapCodec, MapLike};
pub use object::ObjectCodec;
pub use option::OptionCodec;
pub use primitive::PrimitiveCodec;
pub use serde_codec::SerdeCodec;
pub use wrapper::{Wrap, WrapperCodec};

use alloc::sync::Arc;

use crate::error::BindResult;
use crate::pipeline::{DeContext, SerializeFlags};
use crate::value::{ExpectedKind, Sink, Source};

// -----------------------------------------------------------------------------
// Codec

/// Converts one `F` to and from the value tree.
pub trait Codec<F>: Send + Sync + 'static {
    /// Writes `value` as exactly one value into `sink`.
    fn serialize(&self, value: &F, sink: &mut dyn Sink, flags: SerializeFlags) -> BindResult<()>;

    /// Reads `source` into `value`.
    ///
    /// Returned errors carry no location; the caller adds the path segment.
    /// On failure `value` may be partially written.
    fn deserialize(&self, source: Source<'_>, value: &mut F, ctx: &mut DeContext)
    -> BindResult<()>;

    /// Compacts storage owned by `value`. Nothing to do for most codecs.
    #[inline]
    fn shrink_allocator(&self, value: &mut F) -> BindResult<()> {
        let _ = value;
        Ok(())
    }

    /// Describes what `deserialize` accepts, for error messages.
    fn expected(&self) -> ExpectedKind;
}

/// A codec shared between field bindings.
pub type SharedCodec<F> = Arc<dyn Codec<F>>;

// -----------------------------------------------------------------------------
// Bindable

/// A type that can be registered as a field without naming a codec.
///
/// Implemented for primitives, containers of bindable types and, through
/// [`bindable!`](crate::bindable), for [`Bound`](crate::Bound) structs.
pub trait Bindable: Default + 'static {
    /// Returns the codec used for fields of this type.
    fn codec() -> SharedCodec<Self>;
}
