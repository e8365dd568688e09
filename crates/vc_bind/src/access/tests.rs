use alloc::string::String;
use alloc::sync::Arc;
use std::sync::Mutex;

use serde_json::json;

use crate::access::{Bound, BoundExt, FieldStatus};
use crate::arena::{Arena, SharedArena};
use crate::error::ErrorKind;
use crate::fixtures::{Address, Numbers, Person};
use crate::pipeline::{DeserializeFlags, SerializeFlags};

#[test]
fn marks_are_idempotent() {
    let mut numbers = Numbers::default();
    assert_eq!(numbers.status(|n| &n.int_2), FieldStatus::Missing);

    numbers.mark_valid(|n| &n.int_2);
    numbers.mark_valid(|n| &n.int_2);
    assert_eq!(numbers.status(|n| &n.int_2), FieldStatus::Valid);

    numbers.mark_null(|n| &n.ratio);
    numbers.mark_null(|n| &n.ratio);
    assert_eq!(numbers.status(|n| &n.ratio), FieldStatus::Null);

    numbers.mark_missing(|n| &n.int_2);
    numbers.mark_missing(|n| &n.int_2);
    assert_eq!(numbers.status(|n| &n.int_2), FieldStatus::Missing);
    assert_eq!(numbers.status(|n| &n.int_1), FieldStatus::Missing);
}

#[test]
fn unregistered_projection_is_not_a_field() {
    let numbers = Numbers::default();
    assert_eq!(numbers.status(|n| &n.accessor), FieldStatus::NotAField);
    assert_eq!(numbers.status(|_| &0_i32), FieldStatus::NotAField);
}

#[test]
#[should_panic(expected = "is not a registered field of `Numbers`")]
fn marking_a_non_field_panics() {
    let mut numbers = Numbers::default();
    numbers.mark_valid(|n| &n.accessor);
}

#[test]
fn null_requires_nullable() {
    let mut numbers = Numbers::default();
    numbers.mark_valid(|n| &n.int_1);

    assert!(!numbers.mark_null(|n| &n.int_1));
    assert_eq!(numbers.status(|n| &n.int_1), FieldStatus::Valid);
    assert!(numbers.mark_null(|n| &n.ratio));
}

#[test]
fn get_reads_only_valid_fields() {
    let mut numbers = Numbers::default();
    numbers.int_1 = 4;
    assert!(!numbers.get(|n| &n.int_1).is_present());
    assert_eq!(*numbers.get(|n| &n.int_1), 0);

    numbers.set(|n| &mut n.int_2, 7);
    assert_eq!(numbers.int_2, 7);
    assert_eq!(numbers.get(|n| &n.int_2).as_option(), Some(&7));

    numbers.accessor_mut().set_valid(false);
    assert!(!numbers.get(|n| &n.int_2).is_present());
    assert_eq!(numbers.get(|n| &n.int_2), 0);
}

#[test]
fn get_chains_into_nested_structs() {
    let mut address = Address::default();
    address.set(|a| &mut a.city, String::from("Oslo"));

    let mut person = Person::default();
    assert_eq!(*person.get(|p| &p.address).get(|a| &a.city), "");

    person.set(|p| &mut p.address, address);
    let city = person.get(|p| &p.address).get(|a| &a.city);
    assert!(city.is_present());
    assert_eq!(*city, "Oslo");
    assert!(!person.get(|p| &p.address).get(|a| &a.zip).is_present());
}

#[test]
fn steal_leaves_the_source_detached() {
    let mut numbers = Numbers::default();
    numbers
        .deserialize(&json!({"int_2": 3, "extra": [1]}), DeserializeFlags::empty())
        .unwrap();

    let stolen = numbers.steal();
    assert!(stolen.accessor().is_valid());
    assert_eq!(stolen.int_2, 3);
    assert_eq!(stolen.accessor().unknown("extra").unwrap(), Some(json!([1])));

    assert!(numbers.accessor().is_detached());
    assert!(!numbers.accessor().is_valid());
    assert_eq!(numbers.int_2, 0);
    let err = numbers.to_value(SerializeFlags::empty()).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::Inner(_)));

    numbers
        .deserialize(&json!({"int_2": 5}), DeserializeFlags::empty())
        .unwrap();
    assert!(numbers.accessor().allocator().is_owned());
    assert_eq!(
        numbers.to_value(SerializeFlags::empty()).unwrap(),
        json!({"int_2": 5})
    );
}

#[test]
fn take_from_moves_everything() {
    let mut source = Numbers::default();
    source.set(|n| &mut n.int_2, 9);
    source
        .accessor_mut()
        .insert_unknown("note", json!("kept"))
        .unwrap();

    let mut target = Numbers::default();
    target.take_from(&mut source);

    assert_eq!(target.get(|n| &n.int_2), 9);
    assert_eq!(target.accessor().unknown("note").unwrap(), Some(json!("kept")));
    assert!(source.accessor().is_detached());
}

#[test]
fn borrowed_arena_accumulates() {
    let shared: SharedArena = Arc::new(Mutex::new(Arena::new()));
    let mut numbers = Numbers::default();
    numbers.use_allocator(&shared).unwrap();

    let source = json!({"int_2": 1, "a": 1, "b": 2});
    numbers.deserialize(&source, DeserializeFlags::empty()).unwrap();
    assert_eq!(shared.lock().unwrap().len(), 2);

    numbers.deserialize(&source, DeserializeFlags::empty()).unwrap();
    assert_eq!(shared.lock().unwrap().len(), 4);
    assert_eq!(numbers.accessor().unknown_len(), 2);
    assert!(numbers.accessor().allocator().is_borrowed());
}

#[test]
fn parse_errors_surface() {
    let err = Numbers::from_json_str("{\"int_2\": ").unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::Parse(_)));

    let numbers = Numbers::from_json_str(r#"{"int_2": 2, "ratio": null}"#).unwrap();
    assert_eq!(numbers.status(|n| &n.ratio), FieldStatus::Null);
    assert_eq!(Numbers::class_info().name(), "Numbers");
}

#[test]
fn inserted_members_never_shadow_fields() {
    let mut numbers = Numbers::default();
    numbers.set(|n| &mut n.int_2, 1);
    assert!(numbers.accessor_mut().insert_unknown("int_2", json!(99)).is_err());

    let text = numbers.to_json_string().unwrap();
    assert_eq!(text, r#"{"int_2":1}"#);
    assert_eq!(numbers.to_value(SerializeFlags::empty()).unwrap().to_string(), text);
}
