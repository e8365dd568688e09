//! Eager class registration.
//!
//! Classes are built lazily on first use. Types submitted with
//! [`auto_register!`](crate::auto_register) can instead be built up front
//! by one call to [`register_all`], for example during start-up so that
//! registration panics surface early.
//!
//! Submission relies on [`inventory`](https://docs.rs/inventory) and is
//! only available with the `auto_register` feature; without it
//! `register_all` finds nothing.

#![cfg_attr(
    feature = "auto_register",
    allow(unsafe_code, reason = "inventory registration relies on link sections")
)]

use core::any::type_name;

use crate::access::Bound;

/// A type submitted for eager registration.
pub struct AutoRegistration {
    type_name: fn() -> &'static str,
    init: fn() -> &'static str,
}

impl AutoRegistration {
    pub const fn of<T: Bound>() -> Self {
        Self {
            type_name: type_name::<T>,
            init: init::<T>,
        }
    }

    /// The Rust name of the submitted type.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        (self.type_name)()
    }

    /// Builds the class, if not built yet, and returns its name.
    #[inline]
    pub fn register(&self) -> &'static str {
        (self.init)()
    }
}

fn init<T: Bound>() -> &'static str {
    T::class_info().name()
}

#[cfg(feature = "auto_register")]
inventory::collect!(AutoRegistration);

/// Builds the class of every submitted type, returning how many were
/// submitted.
#[cfg_attr(not(feature = "auto_register"), inline(always))]
pub fn register_all() -> usize {
    #[cfg(feature = "auto_register")]
    {
        let mut count = 0;
        for registration in inventory::iter::<AutoRegistration> {
            let name = registration.register();
            log::trace!("auto-registered `{}` as `{name}`", registration.type_name());
            count += 1;
        }
        log::debug!("auto-registered {count} classes");
        count
    }

    #[cfg(not(feature = "auto_register"))]
    {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::AutoRegistration;
    use crate::fixtures::Celsius;

    #[test]
    fn registration_builds_the_class() {
        let registration = AutoRegistration::of::<Celsius>();
        assert!(registration.type_name().ends_with("Celsius"));
        assert_eq!(registration.register(), "Celsius");
    }

    #[cfg(feature = "auto_register")]
    #[test]
    fn submitted_fixtures_are_found() {
        use crate::access::Bound;
        use crate::fixtures::{Numbers, Person};

        assert!(super::register_all() >= 3);
        assert_eq!(Numbers::class_info().name(), "Numbers");
        assert!(Person::class_info().len() > 0);
    }
}
