use alloc::string::String;
use core::{mem, slice};

use serde_json::{Value, map};

use super::ValueKind;

// -----------------------------------------------------------------------------
// Source

/// A value being deserialized, either borrowed or available for stealing.
///
/// Stealing takes a subtree out of the source document in O(1) and leaves
/// `null` behind, so a moved-from document must not be read back as data.
#[derive(Debug)]
pub enum Source<'a> {
    /// Read-only; retained subtrees are deep-copied.
    Borrowed(&'a Value),
    /// Retained subtrees are moved out of the document.
    Stolen(&'a mut Value),
}

impl<'a> Source<'a> {
    /// Returns the underlying value.
    #[inline]
    pub fn value(&self) -> &Value {
        match self {
            Self::Borrowed(value) => value,
            Self::Stolen(value) => value,
        }
    }

    /// Returns the JSON kind of the underlying value.
    #[inline]
    pub fn kind(&self) -> ValueKind {
        ValueKind::of(self.value())
    }

    /// Returns `true` if the underlying value is `null`.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.value().is_null()
    }

    /// Returns `true` if retained subtrees are moved instead of copied.
    #[inline]
    pub fn is_stolen(&self) -> bool {
        matches!(self, Self::Stolen(_))
    }

    /// Reborrows the source for a shorter lifetime.
    #[inline]
    pub fn reborrow(&mut self) -> Source<'_> {
        match self {
            Self::Borrowed(value) => Source::Borrowed(value),
            Self::Stolen(value) => Source::Stolen(value),
        }
    }

    /// Takes ownership of the value: a clone if borrowed, a move if stolen.
    pub fn into_value(self) -> Value {
        match self {
            Self::Borrowed(value) => value.clone(),
            Self::Stolen(value) => value.take(),
        }
    }

    /// Takes the string out of a string value.
    pub fn into_string(self) -> Option<String> {
        match self {
            Self::Borrowed(Value::String(text)) => Some(text.clone()),
            Self::Stolen(Value::String(text)) => Some(mem::take(text)),
            _ => None,
        }
    }

    /// Iterates the members of an object, or gives the source back.
    pub fn into_members(self) -> Result<Members<'a>, Self> {
        match self {
            Self::Borrowed(Value::Object(members)) => Ok(Members::Borrowed(members.iter())),
            Self::Stolen(Value::Object(members)) => Ok(Members::Stolen(members.iter_mut())),
            other => Err(other),
        }
    }

    /// Iterates the elements of an array, or gives the source back.
    pub fn into_elements(self) -> Result<Elements<'a>, Self> {
        match self {
            Self::Borrowed(Value::Array(items)) => Ok(Elements::Borrowed(items.iter())),
            Self::Stolen(Value::Array(items)) => Ok(Elements::Stolen(items.iter_mut())),
            other => Err(other),
        }
    }
}

// -----------------------------------------------------------------------------
// Members

/// Iterator over the members of an object [`Source`], in document order.
pub enum Members<'a> {
    Borrowed(map::Iter<'a>),
    Stolen(map::IterMut<'a>),
}

impl<'a> Iterator for Members<'a> {
    type Item = (&'a str, Source<'a>);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Borrowed(iter) => iter
                .next()
                .map(|(key, value)| (key.as_str(), Source::Borrowed(value))),
            Self::Stolen(iter) => iter
                .next()
                .map(|(key, value)| (key.as_str(), Source::Stolen(value))),
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Self::Borrowed(iter) => iter.size_hint(),
            Self::Stolen(iter) => iter.size_hint(),
        }
    }
}

impl ExactSizeIterator for Members<'_> {}

// -----------------------------------------------------------------------------
// Elements

/// Iterator over the elements of an array [`Source`].
pub enum Elements<'a> {
    Borrowed(slice::Iter<'a, Value>),
    Stolen(slice::IterMut<'a, Value>),
}

impl<'a> Iterator for Elements<'a> {
    type Item = Source<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Borrowed(iter) => iter.next().map(Source::Borrowed),
            Self::Stolen(iter) => iter.next().map(Source::Stolen),
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Self::Borrowed(iter) => iter.size_hint(),
            Self::Stolen(iter) => iter.size_hint(),
        }
    }
}

impl ExactSizeIterator for Elements<'_> {}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use serde_json::{Value, json};

    use super::Source;

    #[test]
    fn borrowed_members_copy() {
        let doc = json!({"a": "x", "b": [1, 2]});
        let members = Source::Borrowed(&doc).into_members().unwrap();
        assert_eq!(members.len(), 2);

        let values: Vec<Value> = members.map(|(_, v)| v.into_value()).collect();
        assert_eq!(values, [json!("x"), json!([1, 2])]);
        assert_eq!(doc["a"], "x");
    }

    #[test]
    fn stolen_members_move() {
        let mut doc = json!({"a": "x", "b": [1, 2]});
        let taken: Vec<Value> = Source::Stolen(&mut doc)
            .into_members()
            .unwrap()
            .map(|(_, value)| value.into_value())
            .collect();

        assert_eq!(taken, [json!("x"), json!([1, 2])]);
        assert_eq!(doc, json!({"a": null, "b": null}));
    }

    #[test]
    fn wrong_kind_gives_source_back() {
        let doc = json!([1]);
        let source = Source::Borrowed(&doc).into_members().err().unwrap();
        assert_eq!(source.value(), &json!([1]));

        let mut text = json!("hello");
        assert_eq!(
            Source::Stolen(&mut text).into_string().as_deref(),
            Some("hello")
        );
        assert_eq!(text, json!(""));
    }
}
