//! Per-instance presence tracking and the public surface of bound structs.

// -----------------------------------------------------------------------------
// Modules

mod accessor;
mod bound;
mod optional;
mod status;

#[cfg(test)]
mod tests;

// -----------------------------------------------------------------------------
// Exports

pub use accessor::Accessor;
pub use bound::{Bound, BoundExt};
pub use optional::OptionalRef;
pub use status::FieldStatus;
