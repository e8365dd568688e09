//! The boundary to the dynamic value tree.
//!
//! Bound structs are read from a [`Source`] and written into a [`Sink`].
//! The tree itself is [`serde_json::Value`] with insertion order preserved,
//! so unknown members round-trip in document order.

// -----------------------------------------------------------------------------
// Modules

mod kind;
mod sink;
mod source;
mod writer;

// -----------------------------------------------------------------------------
// Exports

pub use serde_json::{Map, Number, Value};

pub use kind::{ExpectedKind, PREVIEW_LIMIT, ValueKind, preview};
pub use sink::{Sink, ValueSink, emit_value};
pub use source::{Elements, Members, Source};
pub use writer::WriterSink;
