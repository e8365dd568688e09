use alloc::collections::VecDeque;
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::codec::{Bindable, Codec, SharedCodec};
use crate::error::{BindError, BindResult};
use crate::pipeline::{DeContext, SerializeFlags};
use crate::value::{ExpectedKind, Sink, Source};

// -----------------------------------------------------------------------------
// Sequence

/// An ordered container that [`ListCodec`] can fill in place.
pub trait Sequence: Default + 'static {
    type Item: Default + 'static;

    fn clear(&mut self);

    fn reserve(&mut self, additional: usize);

    /// Appends a default element and returns it.
    fn push_default(&mut self) -> &mut Self::Item;

    /// Removes the last element.
    fn pop_last(&mut self);

    fn items(&self) -> impl Iterator<Item = &Self::Item>;

    fn items_mut(&mut self) -> impl Iterator<Item = &mut Self::Item>;
}

impl<E: Default + 'static> Sequence for Vec<E> {
    type Item = E;

    #[inline]
    fn clear(&mut self) {
        Vec::clear(self);
    }

    #[inline]
    fn reserve(&mut self, additional: usize) {
        Vec::reserve(self, additional);
    }

    #[inline]
    fn push_default(&mut self) -> &mut E {
        self.push(E::default());
        let last = self.len() - 1;
        &mut self[last]
    }

    #[inline]
    fn pop_last(&mut self) {
        self.pop();
    }

    #[inline]
    fn items(&self) -> impl Iterator<Item = &E> {
        self.iter()
    }

    #[inline]
    fn items_mut(&mut self) -> impl Iterator<Item = &mut E> {
        self.iter_mut()
    }
}

impl<E: Default + 'static> Sequence for VecDeque<E> {
    type Item = E;

    #[inline]
    fn clear(&mut self) {
        VecDeque::clear(self);
    }

    #[inline]
    fn reserve(&mut self, additional: usize) {
        VecDeque::reserve(self, additional);
    }

    #[inline]
    fn push_default(&mut self) -> &mut E {
        self.push_back(E::default());
        let last = self.len() - 1;
        &mut self[last]
    }

    #[inline]
    fn pop_last(&mut self) {
        self.pop_back();
    }

    #[inline]
    fn items(&self) -> impl Iterator<Item = &E> {
        self.iter()
    }

    #[inline]
    fn items_mut(&mut self) -> impl Iterator<Item = &mut E> {
        self.iter_mut()
    }
}

// -----------------------------------------------------------------------------
// ListCodec

/// Codec of a [`Sequence`], as a JSON array.
///
/// Each element is appended before it is decoded. An element that fails is
/// removed again and the error is annotated with its index.
pub struct ListCodec<S: Sequence> {
    element: SharedCodec<S::Item>,
}

impl<S: Sequence> ListCodec<S> {
    #[inline]
    pub fn new(element: SharedCodec<S::Item>) -> SharedCodec<S> {
        Arc::new(Self { element })
    }
}

impl<S: Sequence> Codec<S> for ListCodec<S> {
    fn serialize(&self, value: &S, sink: &mut dyn Sink, flags: SerializeFlags) -> BindResult<()> {
        sink.begin_array()?;
        for (index, item) in value.items().enumerate() {
            self.element
                .serialize(item, sink, flags)
                .map_err(|err| err.with_index(index))?;
        }
        sink.end_array()
    }

    fn deserialize(&self, source: Source<'_>, value: &mut S, ctx: &mut DeContext) -> BindResult<()> {
        let elements = match source.into_elements() {
            Ok(elements) => elements,
            Err(source) => return Err(BindError::mismatch(ExpectedKind::Array, source.value())),
        };

        value.clear();
        value.reserve(elements.len());
        for (index, element) in elements.enumerate() {
            let slot = value.push_default();
            if let Err(err) = ctx.nested(|ctx| self.element.deserialize(element, slot, ctx)) {
                value.pop_last();
                return Err(err.with_index(index));
            }
        }
        Ok(())
    }

    fn shrink_allocator(&self, value: &mut S) -> BindResult<()> {
        for (index, item) in value.items_mut().enumerate() {
            self.element
                .shrink_allocator(item)
                .map_err(|err| err.with_index(index))?;
        }
        Ok(())
    }

    #[inline]
    fn expected(&self) -> ExpectedKind {
        ExpectedKind::Array
    }
}

impl<E: Bindable> Bindable for Vec<E> {
    #[inline]
    fn codec() -> SharedCodec<Self> {
        ListCodec::<Self>::new(E::codec())
    }
}

impl<E: Bindable> Bindable for VecDeque<E> {
    #[inline]
    fn codec() -> SharedCodec<Self> {
        ListCodec::<Self>::new(E::codec())
    }
}
