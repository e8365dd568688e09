use alloc::string::{String, ToString};
use alloc::vec::Vec;

use serde_json::{Map, Number, Value};

use crate::error::{BindError, BindResult};

// -----------------------------------------------------------------------------
// Sink

/// A push-style receiver of serialization events.
///
/// Events must be balanced: every `begin_*` is closed by the matching
/// `end_*`, and inside an object every value is preceded by [`key`](Sink::key).
///
/// The trait is object safe; codecs receive `&mut dyn Sink`.
pub trait Sink {
    fn begin_object(&mut self) -> BindResult<()>;
    fn key(&mut self, key: &str) -> BindResult<()>;
    fn end_object(&mut self) -> BindResult<()>;

    fn begin_array(&mut self) -> BindResult<()>;
    fn end_array(&mut self) -> BindResult<()>;

    fn null(&mut self) -> BindResult<()>;
    fn bool(&mut self, v: bool) -> BindResult<()>;
    fn i64(&mut self, v: i64) -> BindResult<()>;
    fn u64(&mut self, v: u64) -> BindResult<()>;
    /// Non-finite values are written as `null`.
    fn f64(&mut self, v: f64) -> BindResult<()>;
    fn str(&mut self, v: &str) -> BindResult<()>;

    /// Emits a whole subtree.
    ///
    /// The default implementation replays it event by event.
    fn value(&mut self, value: &Value) -> BindResult<()> {
        emit_value(self, value)
    }
}

/// Replays `value` into `sink` as a sequence of events.
pub fn emit_value<S: Sink + ?Sized>(sink: &mut S, value: &Value) -> BindResult<()> {
    match value {
        Value::Null => sink.null(),
        Value::Bool(v) => sink.bool(*v),
        Value::Number(n) => emit_number(sink, n),
        Value::String(s) => sink.str(s),
        Value::Array(items) => {
            sink.begin_array()?;
            for item in items {
                emit_value(sink, item)?;
            }
            sink.end_array()
        }
        Value::Object(members) => {
            sink.begin_object()?;
            for (key, item) in members {
                sink.key(key)?;
                emit_value(sink, item)?;
            }
            sink.end_object()
        }
    }
}

fn emit_number<S: Sink + ?Sized>(sink: &mut S, n: &Number) -> BindResult<()> {
    if let Some(v) = n.as_u64() {
        sink.u64(v)
    } else if let Some(v) = n.as_i64() {
        sink.i64(v)
    } else {
        sink.f64(n.as_f64().unwrap_or(f64::NAN))
    }
}

// -----------------------------------------------------------------------------
// ValueSink

enum Frame {
    Object {
        map: Map<String, Value>,
        key: Option<String>,
    },
    Array(Vec<Value>),
}

/// A [`Sink`] that builds a [`Value`].
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use vc_bind::value::{Sink, ValueSink};
///
/// let mut sink = ValueSink::new();
/// sink.begin_object().unwrap();
/// sink.key("a").unwrap();
/// sink.i64(-1).unwrap();
/// sink.end_object().unwrap();
///
/// assert_eq!(sink.finish().unwrap(), json!({"a": -1}));
/// ```
#[derive(Default)]
pub struct ValueSink {
    stack: Vec<Frame>,
    root: Option<Value>,
}

impl ValueSink {
    #[inline]
    pub const fn new() -> Self {
        Self {
            stack: Vec::new(),
            root: None,
        }
    }

    /// Returns the finished tree.
    ///
    /// Fails if containers are still open or nothing was emitted.
    pub fn finish(self) -> BindResult<Value> {
        if !self.stack.is_empty() {
            return Err(BindError::inner("unbalanced sink events"));
        }
        self.root
            .ok_or_else(|| BindError::inner("no value was emitted"))
    }

    fn push(&mut self, value: Value) -> BindResult<()> {
        match self.stack.last_mut() {
            None => {
                if self.root.is_some() {
                    return Err(BindError::inner("multiple root values"));
                }
                self.root = Some(value);
            }
            Some(Frame::Array(items)) => items.push(value),
            Some(Frame::Object { map, key }) => {
                let Some(key) = key.take() else {
                    return Err(BindError::inner("object value without a key"));
                };
                map.insert(key, value);
            }
        }
        Ok(())
    }
}

impl Sink for ValueSink {
    fn begin_object(&mut self) -> BindResult<()> {
        self.stack.push(Frame::Object {
            map: Map::new(),
            key: None,
        });
        Ok(())
    }

    fn key(&mut self, name: &str) -> BindResult<()> {
        match self.stack.last_mut() {
            Some(Frame::Object { key, .. }) if key.is_none() => {
                *key = Some(name.to_string());
                Ok(())
            }
            _ => Err(BindError::inner("key outside of an object")),
        }
    }

    fn end_object(&mut self) -> BindResult<()> {
        match self.stack.pop() {
            Some(Frame::Object { map, key: None }) => self.push(Value::Object(map)),
            _ => Err(BindError::inner("unbalanced end_object")),
        }
    }

    fn begin_array(&mut self) -> BindResult<()> {
        self.stack.push(Frame::Array(Vec::new()));
        Ok(())
    }

    fn end_array(&mut self) -> BindResult<()> {
        match self.stack.pop() {
            Some(Frame::Array(items)) => self.push(Value::Array(items)),
            _ => Err(BindError::inner("unbalanced end_array")),
        }
    }

    #[inline]
    fn null(&mut self) -> BindResult<()> {
        self.push(Value::Null)
    }

    #[inline]
    fn bool(&mut self, v: bool) -> BindResult<()> {
        self.push(Value::Bool(v))
    }

    #[inline]
    fn i64(&mut self, v: i64) -> BindResult<()> {
        self.push(Value::from(v))
    }

    #[inline]
    fn u64(&mut self, v: u64) -> BindResult<()> {
        self.push(Value::from(v))
    }

    fn f64(&mut self, v: f64) -> BindResult<()> {
        // `Number::from_f64` rejects NaN and infinities.
        let value = Number::from_f64(v).map_or(Value::Null, Value::Number);
        self.push(value)
    }

    #[inline]
    fn str(&mut self, v: &str) -> BindResult<()> {
        self.push(Value::String(v.to_string()))
    }

    #[inline]
    fn value(&mut self, value: &Value) -> BindResult<()> {
        self.push(value.clone())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{Sink, ValueSink, emit_value};

    #[test]
    fn replay_rebuilds_the_tree() {
        let doc = json!({"b": [1, -2, 2.5, null], "a": {"x": "y", "t": true}});

        let mut sink = ValueSink::new();
        emit_value(&mut sink, &doc).unwrap();
        let out = sink.finish().unwrap();

        assert_eq!(out, doc);
        let keys: alloc::vec::Vec<_> = out.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["b", "a"]);
    }

    #[test]
    fn non_finite_becomes_null() {
        let mut sink = ValueSink::new();
        sink.f64(f64::INFINITY).unwrap();
        assert_eq!(sink.finish().unwrap(), json!(null));
    }

    #[test]
    fn unbalanced_events_fail() {
        let mut sink = ValueSink::new();
        sink.begin_object().unwrap();
        assert!(sink.i64(1).is_err());
        assert!(sink.end_array().is_err());

        let mut open = ValueSink::new();
        open.begin_array().unwrap();
        assert!(open.finish().is_err());
    }
}
