use alloc::vec::Vec;
use std::io;

use serde_json::ser::{CompactFormatter, Formatter, PrettyFormatter};

use super::Sink;
use crate::error::{BindError, BindResult};

// -----------------------------------------------------------------------------
// WriterSink

enum Frame {
    Object { first: bool, has_key: bool },
    Array { first: bool },
}

/// A [`Sink`] streaming JSON text into an [`io::Write`].
///
/// Layout is delegated to a `serde_json` [`Formatter`], so the output is
/// byte-identical to `serde_json::to_writer` (or `to_writer_pretty`) applied
/// to the equivalent [`Value`](serde_json::Value).
pub struct WriterSink<W, F = CompactFormatter> {
    writer: W,
    formatter: F,
    stack: Vec<Frame>,
    done: bool,
}

impl<W: io::Write> WriterSink<W> {
    /// Creates a sink writing compact JSON.
    #[inline]
    pub fn new(writer: W) -> Self {
        Self::with_formatter(writer, CompactFormatter)
    }
}

impl<'a, W: io::Write> WriterSink<W, PrettyFormatter<'a>> {
    /// Creates a sink writing indented JSON.
    #[inline]
    pub fn pretty(writer: W) -> Self {
        Self::with_formatter(writer, PrettyFormatter::new())
    }
}

impl<W: io::Write, F: Formatter> WriterSink<W, F> {
    pub fn with_formatter(writer: W, formatter: F) -> Self {
        Self {
            writer,
            formatter,
            stack: Vec::new(),
            done: false,
        }
    }

    /// Returns the writer once a complete document has been written.
    pub fn into_inner(self) -> BindResult<W> {
        if !self.stack.is_empty() || !self.done {
            return Err(BindError::inner("incomplete document"));
        }
        Ok(self.writer)
    }

    fn before_value(&mut self) -> BindResult<()> {
        match self.stack.last_mut() {
            None if self.done => Err(BindError::inner("multiple root values")),
            None => Ok(()),
            Some(Frame::Array { first }) => {
                let was_first = core::mem::replace(first, false);
                self.formatter
                    .begin_array_value(&mut self.writer, was_first)
                    .map_err(BindError::io)
            }
            Some(Frame::Object { has_key: true, .. }) => self
                .formatter
                .begin_object_value(&mut self.writer)
                .map_err(BindError::io),
            Some(Frame::Object { .. }) => Err(BindError::inner("object value without a key")),
        }
    }

    fn after_value(&mut self) -> BindResult<()> {
        match self.stack.last_mut() {
            None => {
                self.done = true;
                Ok(())
            }
            Some(Frame::Array { .. }) => self
                .formatter
                .end_array_value(&mut self.writer)
                .map_err(BindError::io),
            Some(Frame::Object { has_key, .. }) => {
                *has_key = false;
                self.formatter
                    .end_object_value(&mut self.writer)
                    .map_err(BindError::io)
            }
        }
    }

    fn scalar(&mut self, write: impl FnOnce(&mut F, &mut W) -> io::Result<()>) -> BindResult<()> {
        self.before_value()?;
        write(&mut self.formatter, &mut self.writer).map_err(BindError::io)?;
        self.after_value()
    }

    fn write_str(&mut self, text: &str) -> BindResult<()> {
        serde_json::to_writer(&mut self.writer, text).map_err(BindError::io)
    }
}

impl<W: io::Write, F: Formatter> Sink for WriterSink<W, F> {
    fn begin_object(&mut self) -> BindResult<()> {
        self.before_value()?;
        self.formatter
            .begin_object(&mut self.writer)
            .map_err(BindError::io)?;
        self.stack.push(Frame::Object {
            first: true,
            has_key: false,
        });
        Ok(())
    }

    fn key(&mut self, key: &str) -> BindResult<()> {
        let Some(Frame::Object { first, has_key }) = self.stack.last_mut() else {
            return Err(BindError::inner("key outside of an object"));
        };
        if *has_key {
            return Err(BindError::inner("key without a value"));
        }
        let was_first = core::mem::replace(first, false);
        *has_key = true;

        self.formatter
            .begin_object_key(&mut self.writer, was_first)
            .map_err(BindError::io)?;
        self.write_str(key)?;
        self.formatter
            .end_object_key(&mut self.writer)
            .map_err(BindError::io)
    }

    fn end_object(&mut self) -> BindResult<()> {
        match self.stack.pop() {
            Some(Frame::Object { has_key: false, .. }) => {}
            _ => return Err(BindError::inner("unbalanced end_object")),
        }
        self.formatter
            .end_object(&mut self.writer)
            .map_err(BindError::io)?;
        self.after_value()
    }

    fn begin_array(&mut self) -> BindResult<()> {
        self.before_value()?;
        self.formatter
            .begin_array(&mut self.writer)
            .map_err(BindError::io)?;
        self.stack.push(Frame::Array { first: true });
        Ok(())
    }

    fn end_array(&mut self) -> BindResult<()> {
        if !matches!(self.stack.pop(), Some(Frame::Array { .. })) {
            return Err(BindError::inner("unbalanced end_array"));
        }
        self.formatter
            .end_array(&mut self.writer)
            .map_err(BindError::io)?;
        self.after_value()
    }

    fn null(&mut self) -> BindResult<()> {
        self.scalar(|f, w| f.write_null(w))
    }

    fn bool(&mut self, v: bool) -> BindResult<()> {
        self.scalar(|f, w| f.write_bool(w, v))
    }

    fn i64(&mut self, v: i64) -> BindResult<()> {
        self.scalar(|f, w| f.write_i64(w, v))
    }

    fn u64(&mut self, v: u64) -> BindResult<()> {
        self.scalar(|f, w| f.write_u64(w, v))
    }

    fn f64(&mut self, v: f64) -> BindResult<()> {
        if v.is_finite() {
            self.scalar(|f, w| f.write_f64(w, v))
        } else {
            self.null()
        }
    }

    fn str(&mut self, v: &str) -> BindResult<()> {
        self.before_value()?;
        self.write_str(v)?;
        self.after_value()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;

    use serde_json::json;

    use super::WriterSink;
    use crate::value::{Sink, emit_value};

    fn render(value: &serde_json::Value, pretty: bool) -> String {
        let bytes = if pretty {
            let mut sink = WriterSink::pretty(Vec::new());
            emit_value(&mut sink, value).unwrap();
            sink.into_inner().unwrap()
        } else {
            let mut sink = WriterSink::new(Vec::new());
            emit_value(&mut sink, value).unwrap();
            sink.into_inner().unwrap()
        };
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn matches_serde_json() {
        let doc = json!({
            "name": "a \"quoted\" name",
            "list": [1, -2, 3.25, [], {}],
            "nested": {"flag": false, "none": null},
        });

        assert_eq!(render(&doc, false), serde_json::to_string(&doc).unwrap());
        assert_eq!(render(&doc, true), serde_json::to_string_pretty(&doc).unwrap());
    }

    #[test]
    fn rejects_dangling_key() {
        let mut sink = WriterSink::new(Vec::new());
        sink.begin_object().unwrap();
        sink.key("a").unwrap();
        assert!(sink.key("b").is_err());
        assert!(sink.end_object().is_err());
    }
}
