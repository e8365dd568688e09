//! Field and class metadata.
//!
//! - [`FieldInfo`]: offset, wire name, flags and codec of one field.
//! - [`ClassInfo`]: the fields of a bound struct, indexed by offset and by
//!   wire name.
//! - [`ClassBuilder`]: collects fields during [`Bound::describe`](crate::Bound::describe).

// -----------------------------------------------------------------------------
// Modules

mod builder;
mod cell;
mod class_info;
mod field_info;
mod flags;

// -----------------------------------------------------------------------------
// Exports

pub(crate) use cell::ClassCell;

pub use builder::{ClassBuilder, FieldBuilder};
pub use class_info::ClassInfo;
pub use field_info::FieldInfo;
pub use flags::FieldFlags;
