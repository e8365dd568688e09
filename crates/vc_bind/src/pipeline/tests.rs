use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;
use std::collections::HashMap as StdMap;

use serde_json::{Value, json};
use vc_utils::hash::HashMap;

use crate::access::{Accessor, Bound, BoundExt, FieldStatus};
use crate::codec::ObjectCodec;
use crate::error::{ErrorKind, PathSegment};
use crate::fixtures::{Address, Celsius, Numbers, Person, Tagged};
use crate::info::ClassBuilder;
use crate::overrides::{ClassOverride, Override};
use crate::pipeline::{DeserializeFlags, SerializeFlags};
use crate::value::{ExpectedKind, ValueKind, ValueSink, WriterSink};
use crate::field;

const NONE: DeserializeFlags = DeserializeFlags::empty();

fn person_json() -> Value {
    json!({
        "name": "Ada",
        "age": 36,
        "tags": ["a", "b"],
        "scores": {"x": 1, "y": 2},
        "nickname": null,
        "address": {"city_name": "London", "zip": "N1"},
        "previous": [{"city_name": "Paris"}],
        "temperature": 21.5
    })
}

// -----------------------------------------------------------------------------
// Round trip

#[test]
fn round_trip_keeps_registration_order() {
    let person = Person::from_value(&person_json(), NONE).unwrap();

    assert_eq!(person.name, "Ada");
    assert_eq!(person.tags, ["a", "b"]);
    assert_eq!(person.scores.get("y"), Some(&2));
    assert_eq!(person.nickname, None);
    assert_eq!(person.status(|p| &p.nickname), FieldStatus::Null);
    assert_eq!(person.address.city, "London");
    assert_eq!(person.previous[0].zip, None);
    assert_eq!(person.temperature.degrees, 21.5);

    assert_eq!(
        person.to_json_string().unwrap(),
        r#"{"name":"Ada","age":36,"tags":["a","b"],"scores":{"x":1,"y":2},"nickname":null,"address":{"city_name":"London","zip":"N1"},"previous":[{"city_name":"Paris"}],"temperature":21.5}"#
    );

    let again = Person::from_value(&person.to_value(SerializeFlags::empty()).unwrap(), NONE).unwrap();
    assert_eq!(again, person);
}

#[test]
fn writer_and_value_sinks_agree() {
    let mut person = Person::from_value(&person_json(), NONE).unwrap();
    person
        .accessor_mut()
        .insert_unknown("extra", json!({"k": [1, 2.5, "s", null, true]}))
        .unwrap();

    for flags in [SerializeFlags::empty(), SerializeFlags::IGNORE_NULL] {
        let value = person.to_value(flags).unwrap();

        let compact = person.to_writer(Vec::new(), flags).unwrap();
        assert_eq!(String::from_utf8(compact).unwrap(), serde_json::to_string(&value).unwrap());

        let mut sink = WriterSink::pretty(Vec::new());
        person.serialize(&mut sink, flags).unwrap();
        let pretty = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        assert_eq!(pretty, serde_json::to_string_pretty(&value).unwrap());
    }
}

// -----------------------------------------------------------------------------
// Unknown members

#[test]
fn unknown_members_follow_known_ones() {
    let source = json!({"z": 1, "int_2": 2, "a": {"b": [1]}, "int_1": 1});
    let mut numbers = Numbers::default();
    numbers.deserialize(&source, NONE).unwrap();

    assert_eq!(numbers.accessor().unknown_len(), 2);
    assert_eq!(
        numbers.to_json_string().unwrap(),
        r#"{"int_1":1,"int_2":2,"z":1,"a":{"b":[1]}}"#
    );

    let mut sink = ValueSink::new();
    assert_eq!(numbers.serialize(&mut sink, SerializeFlags::empty()).unwrap(), 4);
    assert_eq!(
        numbers.serialize(&mut ValueSink::new(), SerializeFlags::IGNORE_UNKNOWN).unwrap(),
        2
    );
}

#[test]
fn unknown_member_policies() {
    let source = json!({"int_2": 2, "extra": true});

    let mut numbers = Numbers::default();
    numbers
        .deserialize(&source, DeserializeFlags::IGNORE_UNKNOWN)
        .unwrap();
    assert_eq!(numbers.accessor().unknown_len(), 0);

    let err = numbers
        .deserialize(&source, DeserializeFlags::ERROR_ON_UNKNOWN | DeserializeFlags::IGNORE_UNKNOWN)
        .unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::UnknownMember("extra".to_string()));
    assert!(!numbers.accessor().is_valid());
}

// -----------------------------------------------------------------------------
// Presence

#[test]
fn presence_violations_are_aggregated() {
    let err = Person::from_value(&json!({"tags": []}), NONE).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::PresenceViolation(vec!["name", "age"]));

    let mut numbers = Numbers::default();
    let err = numbers.deserialize(&json!({"int_1": 1}), NONE).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::PresenceViolation(vec!["int_2"]));
    assert!(!numbers.accessor().is_valid());
    assert_eq!(numbers.status(|n| &n.int_1), FieldStatus::Valid);

    numbers
        .deserialize(&json!({"int_1": 1}), DeserializeFlags::SKIP_PRESENCE_CHECK)
        .unwrap();
    assert!(numbers.accessor().is_valid());
    assert_eq!(numbers.status(|n| &n.int_2), FieldStatus::Missing);
}

#[test]
fn every_deserialization_starts_from_missing() {
    let mut numbers = Numbers::default();
    numbers
        .deserialize(&json!({"int_1": 1, "int_2": 2, "x": 0}), NONE)
        .unwrap();
    numbers.deserialize(&json!({"int_2": 3}), NONE).unwrap();

    assert_eq!(numbers.status(|n| &n.int_1), FieldStatus::Missing);
    assert_eq!(numbers.accessor().unknown_len(), 0);
    assert_eq!(numbers.to_json_string().unwrap(), r#"{"int_2":3}"#);
}

#[test]
fn missing_fields_can_be_emitted() {
    let mut numbers = Numbers::default();
    numbers.set(|n| &mut n.int_2, 5);

    assert_eq!(
        numbers.to_value(SerializeFlags::EMIT_MISSING).unwrap(),
        json!({"int_1": null, "int_2": 5, "ratio": null})
    );
}

// -----------------------------------------------------------------------------
// Nullability

#[test]
fn null_is_accepted_only_by_nullable_fields() {
    let mut numbers = Numbers::default();
    numbers
        .deserialize(&json!({"int_2": 1, "ratio": null}), NONE)
        .unwrap();
    assert_eq!(numbers.status(|n| &n.ratio), FieldStatus::Null);
    assert_eq!(numbers.to_json_string().unwrap(), r#"{"int_2":1,"ratio":null}"#);
    assert_eq!(
        numbers.to_value(SerializeFlags::IGNORE_NULL).unwrap(),
        json!({"int_2": 1})
    );

    let err = numbers.deserialize(&json!({"int_2": null}), NONE).unwrap_err();
    assert_eq!(err.path_string(), ".int_2");
    assert!(matches!(
        err.kind(),
        ErrorKind::TypeMismatch { found: ValueKind::Null, .. }
    ));
}

#[test]
fn option_fields_read_null_as_none() {
    let address = Address::from_value(&json!({"city_name": "Rome", "zip": null}), NONE).unwrap();
    assert_eq!(address.zip, None);
    assert_eq!(address.status(|a| &a.zip), FieldStatus::Valid);
    assert_eq!(
        address.to_json_string().unwrap(),
        r#"{"city_name":"Rome","zip":null}"#
    );
}

// -----------------------------------------------------------------------------
// Type mismatches

#[test]
fn mismatch_names_path_and_value() {
    let mut numbers = Numbers::default();
    let err = numbers
        .deserialize(&json!({"int_1": 4, "int_2": "str"}), NONE)
        .unwrap_err();

    assert_eq!(err.path_string(), ".int_2");
    assert_eq!(
        err.kind(),
        &ErrorKind::TypeMismatch {
            expected: ExpectedKind::Int,
            found: ValueKind::String,
            preview: "\"str\"".to_string(),
        }
    );
    assert_eq!(numbers.int_2, 0);
    assert_eq!(numbers.status(|n| &n.int_2), FieldStatus::Missing);
    assert!(!numbers.accessor().is_valid());
}

#[test]
fn nested_mismatch_paths() {
    let source = json!({
        "name": "a",
        "age": 1,
        "previous": [{"city_name": "x"}, {"city_name": 5}]
    });
    let mut person = Person::default();
    let err = person.deserialize(&source, NONE).unwrap_err();
    assert_eq!(err.path_string(), ".previous[1].city_name");
    assert!(person.previous.is_empty());

    let err = person
        .deserialize(&json!({"name": "a", "age": 1, "scores": {"x": "bad"}}), NONE)
        .unwrap_err();
    assert_eq!(err.path_string(), ".scores[\"x\"]");
    assert!(person.scores.is_empty());

    let err = person
        .deserialize(&json!({"name": "a", "age": -1}), NONE)
        .unwrap_err();
    let path: Vec<&PathSegment> = err.path().collect();
    assert_eq!(path, [&PathSegment::Field("age")]);

    let err = person.deserialize(&json!([1]), NONE).unwrap_err();
    assert!(matches!(
        err.kind(),
        ErrorKind::TypeMismatch { expected: ExpectedKind::Object, found: ValueKind::Array, .. }
    ));
}

// -----------------------------------------------------------------------------
// Containers

#[derive(Debug, Default)]
struct Containers {
    ints: Vec<i32>,
    queue: VecDeque<u8>,
    fast: HashMap<String, i32>,
    slow: StdMap<String, bool>,
    boxed: Box<i64>,
    raw: Value,
    accessor: Accessor<Self>,
}

impl Bound for Containers {
    fn describe(class: &mut ClassBuilder<Self>) {
        field!(class, ints).optional();
        field!(class, queue).optional();
        field!(class, fast).optional();
        field!(class, slow).optional();
        field!(class, boxed).optional();
        field!(class, raw).optional();
    }

    fn accessor(&self) -> &Accessor<Self> {
        &self.accessor
    }

    fn accessor_mut(&mut self) -> &mut Accessor<Self> {
        &mut self.accessor
    }
}

#[test]
fn container_codecs() {
    let source = json!({
        "ints": [1, 2, 3],
        "queue": [7],
        "fast": {"a": 1, "b": 2},
        "slow": {"on": true},
        "boxed": 40,
        "raw": {"any": ["thing"]}
    });
    let containers = Containers::from_value(&source, NONE).unwrap();

    assert_eq!(containers.ints, [1, 2, 3]);
    assert_eq!(containers.queue, [7]);
    assert_eq!(containers.fast.get("b"), Some(&2));
    assert_eq!(containers.slow.get("on"), Some(&true));
    assert_eq!(*containers.boxed, 40);
    assert_eq!(containers.raw, json!({"any": ["thing"]}));
    assert_eq!(containers.to_value(SerializeFlags::empty()).unwrap(), source);
}

#[test]
fn failed_elements_are_rolled_back() {
    let mut containers = Containers::default();
    let err = containers
        .deserialize(&json!({"ints": [1, 2.5]}), NONE)
        .unwrap_err();
    assert_eq!(err.path_string(), ".ints[1]");
    assert!(containers.ints.is_empty());
    assert_eq!(containers.status(|c| &c.ints), FieldStatus::Missing);

    let err = containers
        .deserialize(&json!({"queue": {"0": 1}}), NONE)
        .unwrap_err();
    assert!(matches!(
        err.kind(),
        ErrorKind::TypeMismatch { expected: ExpectedKind::Array, .. }
    ));
}

#[test]
fn serde_codec_fields() {
    let tagged = Tagged::from_value(&json!({"id": 1, "point": [3, 4]}), NONE).unwrap();
    assert_eq!(tagged.point, (3, 4));
    assert_eq!(tagged.to_json_string().unwrap(), r#"{"id":1,"point":[3,4]}"#);

    let err = Tagged::from_value(&json!({"id": 1, "point": "3,4"}), NONE).unwrap_err();
    assert_eq!(err.path_string(), ".point");
    assert!(matches!(
        err.kind(),
        ErrorKind::TypeMismatch { expected: ExpectedKind::Custom(_), .. }
    ));
}

// -----------------------------------------------------------------------------
// Scalar classes

#[test]
fn scalar_classes_use_bare_values() {
    let celsius = Celsius::from_value(&json!(21.5), NONE).unwrap();
    assert_eq!(celsius.degrees, 21.5);
    assert!(celsius.accessor().is_scalar());
    assert_eq!(celsius.to_value(SerializeFlags::empty()).unwrap(), json!(21.5));
    assert_eq!(celsius.serialize(&mut ValueSink::new(), SerializeFlags::empty()).unwrap(), 1);

    assert_eq!(Celsius::default().to_value(SerializeFlags::empty()).unwrap(), Value::Null);

    let err = Celsius::from_value(&json!("warm"), NONE).unwrap_err();
    assert_eq!(err.path_string(), "");
    assert!(matches!(
        err.kind(),
        ErrorKind::TypeMismatch { expected: ExpectedKind::Double, .. }
    ));
}

// -----------------------------------------------------------------------------
// Ownership

#[test]
fn move_from_source_steals_subtrees() {
    let mut document = json!({"int_2": 1, "blob": {"big": [1, 2, 3]}});
    let mut numbers = Numbers::default();

    numbers.deserialize_mut(&mut document, NONE).unwrap();
    assert_eq!(document["blob"], json!({"big": [1, 2, 3]}));

    numbers
        .deserialize_mut(&mut document, DeserializeFlags::MOVE_FROM_SOURCE)
        .unwrap();
    assert_eq!(document["blob"], Value::Null);
    assert_eq!(
        numbers.accessor().unknown("blob").unwrap(),
        Some(json!({"big": [1, 2, 3]}))
    );

    let mut document = person_json();
    let person = {
        let mut person = Person::default();
        person
            .deserialize_mut(&mut document, DeserializeFlags::MOVE_FROM_SOURCE)
            .unwrap();
        person
    };
    assert_eq!(person.name, "Ada");
    assert_eq!(document["name"], json!(""));
}

#[test]
fn shrink_compacts_nested_arenas() {
    let source = json!({
        "name": "a",
        "age": 1,
        "address": {"city_name": "x", "e1": 1, "e2": 2, "e3": 3},
        "p": 0
    });
    let mut person = Person::from_value(&source, NONE).unwrap();
    let arena_len = |address: &Address| address.accessor().allocator().with(|arena| arena.len()).unwrap();

    person.address.accessor_mut().remove_unknown("e1").unwrap();
    person.address.accessor_mut().remove_unknown("e3").unwrap();
    assert_eq!(arena_len(&person.address), 3);

    person.shrink_allocator().unwrap();
    assert_eq!(arena_len(&person.address), 1);
    assert_eq!(person.address.accessor().unknown("e2").unwrap(), Some(json!(2)));
    assert_eq!(
        person.to_json_string().unwrap(),
        r#"{"name":"a","age":1,"address":{"city_name":"x","e2":2},"p":0}"#
    );
}

// -----------------------------------------------------------------------------
// Overrides

struct LenientNumbers;

impl Override for LenientNumbers {
    type Base = Numbers;

    fn describe(class: &mut ClassOverride<Numbers>) {
        class.optional("int_2", true).nullable("int_2", true);
    }
}

#[derive(Debug, Default)]
struct Holder {
    strict: Numbers,
    lenient: Numbers,
    accessor: Accessor<Self>,
}

impl Bound for Holder {
    fn describe(class: &mut ClassBuilder<Self>) {
        class.field_with("strict", |h| &h.strict, |h| &mut h.strict, ObjectCodec::shared());
        class.field_with(
            "lenient",
            |h| &h.lenient,
            |h| &mut h.lenient,
            ObjectCodec::overridden::<LenientNumbers>(),
        );
    }

    fn accessor(&self) -> &Accessor<Self> {
        &self.accessor
    }

    fn accessor_mut(&mut self) -> &mut Accessor<Self> {
        &mut self.accessor
    }
}

#[test]
fn overrides_apply_only_where_bound() {
    let source = json!({"strict": {"int_2": 1}, "lenient": {"int_2": null}});
    let holder = Holder::from_value(&source, NONE).unwrap();

    assert_eq!(holder.lenient.status(|n| &n.int_2), FieldStatus::Null);
    assert_eq!(holder.lenient.accessor().class().base_name(), Some("Numbers"));
    assert_eq!(holder.to_value(SerializeFlags::empty()).unwrap(), source);

    let err = Holder::from_value(&json!({"strict": {}, "lenient": {}}), NONE).unwrap_err();
    assert_eq!(err.path_string(), ".strict");
    assert_eq!(err.kind(), &ErrorKind::PresenceViolation(vec!["int_2"]));

    let mut plain = Numbers::default();
    assert!(plain.deserialize(&json!({}), NONE).is_err());
    plain.deserialize_as::<LenientNumbers>(&json!({}), NONE).unwrap();
    assert!(plain.accessor().is_valid());
}
