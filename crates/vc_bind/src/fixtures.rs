//! Bound structs shared by the unit tests.

#![cfg_attr(
    feature = "auto_register",
    allow(unsafe_code, reason = "inventory registration relies on link sections")
)]

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use crate::access::{Accessor, Bound};
use crate::codec::SerdeCodec;
use crate::info::ClassBuilder;
use crate::{auto_register, bindable, field};

macro_rules! accessor {
    () => {
        fn accessor(&self) -> &Accessor<Self> {
            &self.accessor
        }

        fn accessor_mut(&mut self) -> &mut Accessor<Self> {
            &mut self.accessor
        }
    };
}

// -----------------------------------------------------------------------------
// Numbers

#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Numbers {
    pub int_1: i32,
    pub int_2: i32,
    pub ratio: f64,
    pub accessor: Accessor<Self>,
}

impl Bound for Numbers {
    fn describe(class: &mut ClassBuilder<Self>) {
        class.name("Numbers");
        field!(class, int_1).optional();
        field!(class, int_2);
        field!(class, ratio).optional().nullable();
    }

    accessor!();
}

// -----------------------------------------------------------------------------
// Person

#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Address {
    pub city: String,
    pub zip: Option<String>,
    pub accessor: Accessor<Self>,
}

impl Bound for Address {
    fn describe(class: &mut ClassBuilder<Self>) {
        class.name("Address");
        field!(class, city => "city_name");
        field!(class, zip).optional();
    }

    accessor!();
}

#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Person {
    pub name: String,
    pub age: u32,
    pub tags: Vec<String>,
    pub scores: BTreeMap<String, i64>,
    pub nickname: Option<String>,
    pub address: Address,
    pub previous: Vec<Address>,
    pub temperature: Celsius,
    pub accessor: Accessor<Self>,
}

impl Bound for Person {
    fn describe(class: &mut ClassBuilder<Self>) {
        class.name("Person");
        field!(class, name);
        field!(class, age);
        field!(class, tags).optional();
        field!(class, scores).optional();
        field!(class, nickname).optional().nullable();
        field!(class, address).optional();
        field!(class, previous).optional();
        field!(class, temperature).optional();
    }

    accessor!();
}

// -----------------------------------------------------------------------------
// Celsius

/// Serializes as a bare number.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Celsius {
    pub degrees: f64,
    pub accessor: Accessor<Self>,
}

impl Bound for Celsius {
    fn describe(class: &mut ClassBuilder<Self>) {
        class.name("Celsius").scalar();
        field!(class, degrees);
    }

    accessor!();
}

bindable!(Address, Celsius);

// -----------------------------------------------------------------------------
// Wide

#[derive(Debug, Default)]
pub(crate) struct Wide {
    pub f0: i32,
    pub f1: i32,
    pub f2: i32,
    pub f3: i32,
    pub f4: i32,
    pub f5: i32,
    pub f6: i32,
    pub f7: i32,
    pub f8: i32,
    pub f9: i32,
    pub f10: i32,
    pub f11: i32,
    pub accessor: Accessor<Self>,
}

impl Bound for Wide {
    fn describe(class: &mut ClassBuilder<Self>) {
        class.name("Wide");
        field!(class, f0);
        field!(class, f1);
        field!(class, f2);
        field!(class, f3);
        field!(class, f4);
        field!(class, f5);
        field!(class, f6);
        field!(class, f7);
        field!(class, f8);
        field!(class, f9);
        field!(class, f10);
        field!(class, f11);
    }

    accessor!();
}

// -----------------------------------------------------------------------------
// Tagged

#[derive(Debug, Default)]
pub(crate) struct Tagged {
    pub id: i64,
    pub point: (i64, i64),
    pub accessor: Accessor<Self>,
}

impl Bound for Tagged {
    fn describe(class: &mut ClassBuilder<Self>) {
        class.name("Tagged");
        field!(class, id);
        class
            .field_with("point", |t| &t.point, |t| &mut t.point, SerdeCodec::shared())
            .optional();
    }

    accessor!();
}

auto_register!(Numbers, Person, Celsius, Tagged);
