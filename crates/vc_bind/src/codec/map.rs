use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::sync::Arc;
use core::hash::BuildHasher;
use std::collections::HashMap as StdMap;

use vc_utils::hash::hashbrown::HashMap as FastMap;

use crate::codec::{Bindable, Codec, SharedCodec};
use crate::error::{BindError, BindResult};
use crate::pipeline::{DeContext, SerializeFlags};
use crate::value::{ExpectedKind, Sink, Source};

// -----------------------------------------------------------------------------
// MapLike

/// A string-keyed container that [`MapCodec`] can fill in place.
pub trait MapLike: Default + 'static {
    type Item: Default + 'static;

    fn clear(&mut self);

    /// Stores a default value under `key`, replacing any previous one,
    /// and returns it.
    fn insert_default(&mut self, key: &str) -> &mut Self::Item;

    fn remove_key(&mut self, key: &str);

    fn entries(&self) -> impl Iterator<Item = (&str, &Self::Item)>;

    fn items_mut(&mut self) -> impl Iterator<Item = (&str, &mut Self::Item)>;
}

macro_rules! impl_hash_map {
    ($map:ident) => {
        impl<E, S> MapLike for $map<String, E, S>
        where
            E: Default + 'static,
            S: BuildHasher + Default + 'static,
        {
            type Item = E;

            #[inline]
            fn clear(&mut self) {
                $map::clear(self);
            }

            fn insert_default(&mut self, key: &str) -> &mut E {
                let slot = self.entry(String::from(key)).or_default();
                *slot = E::default();
                slot
            }

            #[inline]
            fn remove_key(&mut self, key: &str) {
                self.remove(key);
            }

            #[inline]
            fn entries(&self) -> impl Iterator<Item = (&str, &E)> {
                self.iter().map(|(key, value)| (key.as_str(), value))
            }

            #[inline]
            fn items_mut(&mut self) -> impl Iterator<Item = (&str, &mut E)> {
                self.iter_mut().map(|(key, value)| (key.as_str(), value))
            }
        }

        impl<E, S> Bindable for $map<String, E, S>
        where
            E: Bindable,
            S: BuildHasher + Default + 'static,
        {
            #[inline]
            fn codec() -> SharedCodec<Self> {
                MapCodec::<Self>::new(E::codec())
            }
        }
    };
}

impl_hash_map!(StdMap);
impl_hash_map!(FastMap);

impl<E: Default + 'static> MapLike for BTreeMap<String, E> {
    type Item = E;

    #[inline]
    fn clear(&mut self) {
        BTreeMap::clear(self);
    }

    fn insert_default(&mut self, key: &str) -> &mut E {
        let slot = self.entry(String::from(key)).or_default();
        *slot = E::default();
        slot
    }

    #[inline]
    fn remove_key(&mut self, key: &str) {
        self.remove(key);
    }

    #[inline]
    fn entries(&self) -> impl Iterator<Item = (&str, &E)> {
        self.iter().map(|(key, value)| (key.as_str(), value))
    }

    #[inline]
    fn items_mut(&mut self) -> impl Iterator<Item = (&str, &mut E)> {
        self.iter_mut().map(|(key, value)| (key.as_str(), value))
    }
}

impl<E: Bindable> Bindable for BTreeMap<String, E> {
    #[inline]
    fn codec() -> SharedCodec<Self> {
        MapCodec::<Self>::new(E::codec())
    }
}

// -----------------------------------------------------------------------------
// MapCodec

/// Codec of a [`MapLike`], as a JSON object.
///
/// Each member is inserted as a default value before it is decoded. A
/// member that fails is removed again and the error is annotated with its
/// key. Serialization follows the container's iteration order.
pub struct MapCodec<M: MapLike> {
    item: SharedCodec<M::Item>,
}

impl<M: MapLike> MapCodec<M> {
    #[inline]
    pub fn new(item: SharedCodec<M::Item>) -> SharedCodec<M> {
        Arc::new(Self { item })
    }
}

impl<M: MapLike> Codec<M> for MapCodec<M> {
    fn serialize(&self, value: &M, sink: &mut dyn Sink, flags: SerializeFlags) -> BindResult<()> {
        sink.begin_object()?;
        for (key, item) in value.entries() {
            sink.key(key)?;
            self.item
                .serialize(item, sink, flags)
                .map_err(|err| err.with_key(key))?;
        }
        sink.end_object()
    }

    fn deserialize(&self, source: Source<'_>, value: &mut M, ctx: &mut DeContext) -> BindResult<()> {
        let members = match source.into_members() {
            Ok(members) => members,
            Err(source) => return Err(BindError::mismatch(ExpectedKind::Object, source.value())),
        };

        value.clear();
        for (key, member) in members {
            let slot = value.insert_default(key);
            if let Err(err) = ctx.nested(|ctx| self.item.deserialize(member, slot, ctx)) {
                value.remove_key(key);
                return Err(err.with_key(key));
            }
        }
        Ok(())
    }

    fn shrink_allocator(&self, value: &mut M) -> BindResult<()> {
        for (key, item) in value.items_mut() {
            self.item
                .shrink_allocator(item)
                .map_err(|err| err.with_key(key))?;
        }
        Ok(())
    }

    #[inline]
    fn expected(&self) -> ExpectedKind {
        ExpectedKind::Object
    }
}
