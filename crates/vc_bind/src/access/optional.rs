use core::fmt::{self, Debug};
use core::ops::Deref;

use crate::access::{Bound, BoundExt};

// -----------------------------------------------------------------------------
// OptionalRef

/// The result of [`BoundExt::get`]: a field that may be absent.
///
/// Dereferences to the field when present, and to a default instance
/// otherwise, so reading through it never fails.
pub enum OptionalRef<'a, F> {
    Present(&'a F),
    Absent(F),
}

impl<'a, F> OptionalRef<'a, F> {
    #[inline]
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// Returns the field if present.
    #[inline]
    pub fn as_option(&self) -> Option<&'a F> {
        match *self {
            Self::Present(value) => Some(value),
            Self::Absent(_) => None,
        }
    }
}

impl<'a, F: Bound> OptionalRef<'a, F> {
    /// Reads a field of a nested bound struct.
    ///
    /// Absent if this struct or the nested field is absent.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let city = person.get(|p| &p.address).get(|a| &a.city);
    /// ```
    pub fn get<G: Default + 'static>(&self, field: impl FnOnce(&F) -> &G) -> OptionalRef<'a, G> {
        match *self {
            Self::Present(value) => value.get(field),
            Self::Absent(_) => OptionalRef::Absent(G::default()),
        }
    }
}

impl<F> Deref for OptionalRef<'_, F> {
    type Target = F;

    #[inline]
    fn deref(&self) -> &F {
        match self {
            Self::Present(value) => value,
            Self::Absent(value) => value,
        }
    }
}

impl<F: Debug> Debug for OptionalRef<'_, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present(value) => f.debug_tuple("Present").field(value).finish(),
            Self::Absent(_) => f.write_str("Absent"),
        }
    }
}

impl<F: PartialEq> PartialEq<F> for OptionalRef<'_, F> {
    #[inline]
    fn eq(&self, other: &F) -> bool {
        **self == *other
    }
}
