// -----------------------------------------------------------------------------
// Registration

/// Registers a struct field on a [`ClassBuilder`](crate::info::ClassBuilder).
///
/// `field!(class, name)` uses the field name as wire name;
/// `field!(class, name => "wire")` renames it on the wire. Returns the
/// [`FieldBuilder`](crate::info::FieldBuilder) for further options.
///
/// ```ignore
/// field!(class, id);
/// field!(class, display_name => "displayName").optional();
/// ```
#[macro_export]
macro_rules! field {
    ($class:expr, $field:ident) => {
        $class.field(
            ::core::stringify!($field),
            |s| &s.$field,
            |s| &mut s.$field,
        )
    };
    ($class:expr, $field:ident => $wire:expr) => {
        $class
            .field($wire, |s| &s.$field, |s| &mut s.$field)
            .local_name(::core::stringify!($field))
    };
}

/// Implements [`Bindable`](crate::Bindable) for [`Bound`](crate::Bound)
/// structs, so they can be nested as fields and container elements.
#[macro_export]
macro_rules! bindable {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::Bindable for $ty {
            #[inline]
            fn codec() -> $crate::SharedCodec<Self> {
                $crate::codec::ObjectCodec::<Self>::shared()
            }
        }
    )+};
}

/// Submits [`Bound`](crate::Bound) types for
/// [`register_all`](crate::registry::register_all).
///
/// Without the `auto_register` feature this expands to nothing.
#[cfg(feature = "auto_register")]
#[macro_export]
macro_rules! auto_register {
    ($($ty:ty),+ $(,)?) => {$(
        $crate::__macro_exports::inventory::submit! {
            $crate::registry::AutoRegistration::of::<$ty>()
        }
    )+};
}

/// Submits [`Bound`](crate::Bound) types for
/// [`register_all`](crate::registry::register_all).
///
/// Without the `auto_register` feature this expands to nothing.
#[cfg(not(feature = "auto_register"))]
#[macro_export]
macro_rules! auto_register {
    ($($ty:ty),+ $(,)?) => {};
}
