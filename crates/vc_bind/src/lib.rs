#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// Lets the exported macros name `vc_bind` from inside this crate's own tests.
extern crate self as vc_bind;

// -----------------------------------------------------------------------------
// Alloc

// Links `std` for the class cell, the arena locks and the writer sink;
// collections are still named through `alloc`.
extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod macros;

pub mod access;
pub mod arena;
pub mod codec;
pub mod info;
pub mod overrides;
pub mod pipeline;
pub mod registry;
pub mod value;

#[cfg(test)]
mod fixtures;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use access::{Accessor, Bound, BoundExt, FieldStatus, OptionalRef};
pub use codec::{Bindable, Codec, SharedCodec};
pub use error::{BindError, BindResult, ErrorKind, PathSegment};
pub use info::{ClassInfo, FieldFlags, FieldInfo};
pub use overrides::Override;
pub use pipeline::{DeserializeFlags, SerializeFlags};

#[doc(hidden)]
pub mod __macro_exports {
    #[cfg(feature = "auto_register")]
    pub use inventory;
}
