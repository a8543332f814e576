use std::collections::BTreeSet;

use graft::element::{ConfigElement, ConfigNode};
use graft::object::ObjectRef;
use graft::signature::{CustomSignature, SchemaBuilder};
use graft::token::{Reflect, Token};
use graft::Mapper;

use crate::helpers::{Mode, Profile, setup_mapper};

fn list(items: impl IntoIterator<Item = ConfigElement>) -> ConfigElement {
    items.into_iter().collect()
}

fn node(entries: &[(&str, ConfigElement)]) -> ConfigElement {
    let node: ConfigNode = entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect();
    ConfigElement::Node(node)
}

#[test]
fn flat_string_list() {
    let mapper = setup_mapper();
    let element = list(["a".into(), "b".into(), "c".into()]);

    let strings: Vec<String> = mapper.data_from_element(&element).unwrap();
    assert_eq!(strings, vec!["a", "b", "c"]);

    let back = mapper.element_from_data(&strings).unwrap();
    assert_eq!(back, element);
}

#[test]
fn nested_generics() {
    let mapper = setup_mapper();
    let element = list([
        list(["a".into(), "b".into()]),
        list(["c".into(), "d".into()]),
    ]);

    let nested: Vec<Vec<String>> = mapper.data_from_element(&element).unwrap();
    assert_eq!(
        nested,
        vec![
            vec!["a".to_string(), "b".to_string()],
            vec!["c".to_string(), "d".to_string()],
        ]
    );

    let back = mapper.element_from_data(&nested).unwrap();
    assert_eq!(back, element);
}

#[test]
fn record_with_named_arguments() {
    let mapper = setup_mapper();
    let element = node(&[
        ("strings", list(["a".into(), "b".into()])),
        ("value", 69.into()),
        ("intSet", list([1.into(), 2.into(), 3.into()])),
    ]);

    let profile: Profile = mapper.data_from_element(&element).unwrap();
    assert_eq!(profile.strings, vec!["a", "b"]);
    assert_eq!(profile.value, 69);
    assert_eq!(profile.int_set, BTreeSet::from([1, 2, 3]));
}

#[test]
fn record_round_trip_uses_signature_key_order() {
    let mapper = setup_mapper();
    let profile = Profile {
        strings: vec!["x".to_string()],
        value: 7,
        int_set: BTreeSet::from([10, 20]),
    };

    let element = mapper.element_from_data(&profile).unwrap();
    let keys = element.as_node().unwrap().keys();
    assert_eq!(keys, vec!["strings", "value", "intSet"]);

    let back: Profile = mapper.data_from_element(&element).unwrap();
    assert_eq!(back, profile);
}

#[test]
fn named_arguments_are_order_independent() {
    let mapper = setup_mapper();
    let forward = node(&[
        ("strings", list(["a".into()])),
        ("value", 1.into()),
        ("intSet", list([5.into()])),
    ]);
    let shuffled = node(&[
        ("intSet", list([5.into()])),
        ("strings", list(["a".into()])),
        ("value", 1.into()),
    ]);

    let first: Profile = mapper.data_from_element(&forward).unwrap();
    let second: Profile = mapper.data_from_element(&shuffled).unwrap();
    assert_eq!(first, second);
}

#[test]
fn surplus_keys_are_ignored() {
    let mapper = setup_mapper();
    let element = node(&[
        ("strings", list(["a".into()])),
        ("value", 1.into()),
        ("intSet", list([5.into()])),
        ("unrelated", "extra".into()),
    ]);

    let profile: Profile = mapper.data_from_element(&element).unwrap();
    assert_eq!(profile.value, 1);
}

#[test]
fn missing_argument_is_no_matching_signature() {
    let mapper = setup_mapper();
    let element = node(&[("strings", list(["a".into()])), ("value", 1.into())]);

    let err = mapper.data_from_element::<Profile>(&element).unwrap_err();
    assert!(err.is_no_matching_signature(), "unexpected error: {err}");
}

#[test]
fn type_hint_rejection() {
    // A node whose "x" is text never selects a signature wanting an int.
    #[derive(Clone, Debug, PartialEq)]
    struct IntHolder {
        x: i64,
    }
    impl Reflect for IntHolder {
        fn token() -> Token {
            Token::concrete::<IntHolder>("IntHolder")
        }
    }

    let mapper = Mapper::builder()
        .register_schema(
            SchemaBuilder::<IntHolder>::new()
                .param::<i64>("x")
                .construct(|args| Ok(IntHolder { x: args.next()? }))
                .field::<i64>("x", |h| h.x)
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();

    let element = node(&[("x", "s".into())]);
    let err = mapper.data_from_element::<IntHolder>(&element).unwrap_err();
    assert!(err.is_no_matching_signature(), "unexpected error: {err}");
}

#[test]
fn mixed_scalars_into_dynamic_list() {
    let mapper = setup_mapper();
    let element = list(["a".into(), "b".into(), 1.into(), 2.into()]);

    let values: Vec<ObjectRef> = mapper.data_from_element(&element).unwrap();
    assert_eq!(values[0].take::<String>().unwrap(), "a");
    assert_eq!(values[3].take::<i64>().unwrap(), 2);

    let back = mapper
        .element_from_object(&ObjectRef::new(values))
        .unwrap();
    assert_eq!(back, element);
}

#[test]
fn enums_map_by_variant_name() {
    let mapper = setup_mapper();

    let mode: Mode = mapper.data_from_element(&"PASSIVE".into()).unwrap();
    assert_eq!(mode, Mode::Passive);

    let back = mapper.element_from_data(&mode).unwrap();
    assert_eq!(back, ConfigElement::from("PASSIVE"));

    let err = mapper.data_from_element::<Mode>(&"passive".into()).unwrap_err();
    assert!(err.is_conversion_error());
}

#[test]
fn numeric_overflow_is_reported() {
    let mapper = setup_mapper();
    let element = list([300.into()]);

    let err = mapper.data_from_element::<Vec<u8>>(&element).unwrap_err();
    assert!(err.is_conversion_error(), "unexpected error: {err}");
    assert!(format!("{err}").contains("$[0]"));
}

#[test]
fn optional_fields_round_trip() {
    let mapper = setup_mapper();

    let values: Vec<Option<i64>> = mapper
        .data_from_element(&list([1.into(), ConfigElement::null(), 3.into()]))
        .unwrap();
    assert_eq!(values, vec![Some(1), None, Some(3)]);

    let back = mapper.element_from_data(&values).unwrap();
    assert_eq!(back, list([1.into(), ConfigElement::null(), 3.into()]));
}

#[test]
fn boxed_slices_build_from_lists() {
    let mapper = setup_mapper();
    let element = list([1.into(), 2.into(), 3.into()]);

    let values: Box<[i64]> = mapper.data_from_element(&element).unwrap();
    assert_eq!(values.as_ref(), &[1, 2, 3]);

    let back = mapper.element_from_data(&values).unwrap();
    assert_eq!(back, element);
}

#[test]
fn string_keyed_maps_round_trip() {
    let mapper = setup_mapper();
    let element = node(&[("alpha", 1.into()), ("beta", 2.into())]);

    let map: indexmap::IndexMap<String, i64> = mapper.data_from_element(&element).unwrap();
    assert_eq!(map["alpha"], 1);
    assert_eq!(map["beta"], 2);
    assert_eq!(map.keys().collect::<Vec<_>>(), vec!["alpha", "beta"]);

    let back = mapper.element_from_data(&map).unwrap();
    assert_eq!(back, element);
}

#[test]
fn custom_signature_takes_precedence() {
    #[derive(Clone, Debug, PartialEq)]
    struct Tagged(String);
    impl Reflect for Tagged {
        fn token() -> Token {
            Token::concrete::<Tagged>("Tagged")
        }
    }

    let mapper = Mapper::builder()
        .register_signature(
            CustomSignature::builder(Tagged::token())
                .param_unnamed(Token::of::<String>())
                .build_with(|_, mut args| {
                    let value = args.remove(0).value.take::<String>()?;
                    Ok(ObjectRef::new(Tagged(format!("custom:{value}"))))
                })
                .introspect_with(|object| {
                    object
                        .with_ref(|tagged: &Tagged| {
                            vec![graft::signature::TypedObject {
                                name: None,
                                ty: Token::of::<String>(),
                                value: ObjectRef::new(tagged.0.clone()),
                            }]
                        })
                        .map_err(Into::into)
                })
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();

    let tagged: Tagged = mapper.data_from_element(&list(["x".into()])).unwrap();
    assert_eq!(tagged, Tagged("custom:x".to_string()));
}
