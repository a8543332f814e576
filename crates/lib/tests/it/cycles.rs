use graft::Reflect;
use graft::element::{ConfigElement, ConfigList, ConfigNode};
use graft::object::ObjectRef;
use graft::token::Token;

use crate::helpers::{Widget, setup_mapper};

#[test]
fn self_referential_list_round_trips_through_dynamic_target() {
    let mapper = setup_mapper();

    // L = ["a", L, L, 1]
    let list = ConfigList::new();
    list.push("a".into());
    list.push(ConfigElement::List(list.clone()));
    list.push(ConfigElement::List(list.clone()));
    list.push(1.into());
    let element = ConfigElement::List(list);

    let object = mapper
        .object_from_element(&Token::of::<Vec<ObjectRef>>(), &element)
        .unwrap();

    object
        .with_ref(|items: &Vec<ObjectRef>| {
            assert_eq!(items.len(), 4);
            assert_eq!(items[0].take::<String>().unwrap(), "a");
            // Indices 1 and 2 are the list itself.
            assert!(items[1].ptr_eq(&object));
            assert!(items[2].ptr_eq(&object));
            assert_eq!(items[3].take::<i64>().unwrap(), 1);
        })
        .unwrap();

    // And back out: the emitted element closes the same cycle.
    let emitted = mapper.element_from_object(&object).unwrap();
    let emitted_list = emitted.as_list().unwrap();
    assert_eq!(emitted_list.len(), 4);
    assert!(
        emitted_list
            .get(1)
            .unwrap()
            .as_list()
            .unwrap()
            .ptr_eq(emitted_list)
    );
    assert_eq!(emitted, element);
}

#[test]
fn self_referential_record_through_field_strategy() {
    let mapper = setup_mapper();

    let node = ConfigNode::new();
    node.insert("label", "v".into());
    node.insert("enabled", true.into());
    node.insert("selfReference", ConfigElement::Node(node.clone()));
    let element = ConfigElement::Node(node);

    let object = mapper
        .object_from_element(&Widget::token(), &element)
        .unwrap();

    object
        .with_ref(|widget: &Widget| {
            assert_eq!(widget.label, "v");
            assert!(widget.enabled);
            // The record's self reference is the record itself.
            assert!(widget.self_reference.ptr_eq(&object));
        })
        .unwrap();
}

#[test]
fn cycle_emission_preserves_the_reference() {
    let mapper = setup_mapper();

    let node = ConfigNode::new();
    node.insert("label", "v".into());
    node.insert("enabled", true.into());
    node.insert("selfReference", ConfigElement::Node(node.clone()));
    let element = ConfigElement::Node(node);

    let object = mapper
        .object_from_element(&Widget::token(), &element)
        .unwrap();
    let emitted = mapper.element_from_object(&object).unwrap();

    let emitted_node = emitted.as_node().unwrap();
    assert_eq!(emitted_node.keys(), vec!["label", "enabled", "selfReference"]);
    assert!(
        emitted_node
            .get("selfReference")
            .unwrap()
            .as_node()
            .unwrap()
            .ptr_eq(emitted_node)
    );
    assert_eq!(emitted, element);
}

#[test]
fn null_self_reference_stays_null() {
    let mapper = setup_mapper();

    let node = ConfigNode::new();
    node.insert("label", "v".into());
    node.insert("enabled", true.into());
    node.insert("selfReference", ConfigElement::null());

    let object = mapper
        .object_from_element(&Widget::token(), &ConfigElement::Node(node))
        .unwrap();
    object
        .with_ref(|widget: &Widget| {
            assert!(widget.self_reference.is_null());
        })
        .unwrap();
}

#[test]
fn cycle_into_constructor_strategy_is_reported() {
    use graft::signature::SchemaBuilder;
    use graft::token::Reflect;

    // A record with a dynamic field, mapped through a constructor
    // signature. Constructors cannot prebuild, so a self-reference in
    // their arguments is unresolvable.
    #[derive(Clone, Debug)]
    struct Chain {
        next: ObjectRef,
    }
    impl Reflect for Chain {
        fn token() -> Token {
            Token::concrete::<Chain>("Chain")
        }
    }

    let mapper = graft::Mapper::builder()
        .register_schema(
            SchemaBuilder::<Chain>::new()
                .param::<ObjectRef>("next")
                .construct(|args| Ok(Chain { next: args.next()? }))
                .field::<ObjectRef>("next", |c| c.next.clone())
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();

    let node = ConfigNode::new();
    node.insert("next", ConfigElement::Node(node.clone()));

    let err = mapper
        .object_from_element(&Chain::token(), &ConfigElement::Node(node))
        .unwrap_err();
    assert!(err.is_cycle_error(), "unexpected error: {err}");
}

#[test]
fn cycle_into_fixed_size_sequence_is_reported() {
    let mapper = setup_mapper();

    let list = ConfigList::new();
    list.push(ConfigElement::List(list.clone()));

    let err = mapper
        .data_from_element::<Box<[ObjectRef]>>(&ConfigElement::List(list))
        .unwrap_err();
    assert!(err.is_cycle_error(), "unexpected error: {err}");
}

#[test]
fn shared_subtrees_keep_identity_without_cycles() {
    let mapper = setup_mapper();

    // The same list element appears under two indices; the mapped vector
    // shares one dynamic list object between them.
    let shared = ConfigList::new();
    shared.push("s".into());

    let outer = ConfigList::new();
    outer.push(ConfigElement::List(shared.clone()));
    outer.push(ConfigElement::List(shared));

    let object = mapper
        .object_from_element(&Token::of::<Vec<ObjectRef>>(), &ConfigElement::List(outer))
        .unwrap();
    object
        .with_ref(|items: &Vec<ObjectRef>| {
            assert!(items[0].ptr_eq(&items[1]));
        })
        .unwrap();
}
