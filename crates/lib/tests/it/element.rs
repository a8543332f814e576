use graft::element::{ConfigElement, ConfigList, ConfigNode};

#[test]
fn handles_alias_shared_storage() {
    let list = ConfigList::new();
    list.push("a".into());

    let alias = list.clone();
    alias.push("b".into());

    assert_eq!(list.len(), 2);
    assert!(list.ptr_eq(&alias));
}

#[test]
fn node_replacement_keeps_position() {
    let node = ConfigNode::new();
    node.insert("first", 1.into());
    node.insert("second", 2.into());

    let previous = node.insert("first", 10.into());
    assert_eq!(previous.unwrap().as_int(), Some(1));
    assert_eq!(node.keys(), vec!["first", "second"]);
}

#[test]
fn children_carry_node_keys() {
    let node: ConfigNode = [("a", ConfigElement::from(1)), ("b", ConfigElement::from(2))]
        .into_iter()
        .collect();

    let children = ConfigElement::Node(node).children();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0].0.as_deref(), Some("a"));
    assert_eq!(children[1].0.as_deref(), Some("b"));

    let list: ConfigElement = [ConfigElement::from(1)].into_iter().collect();
    assert_eq!(list.children()[0].0, None);
}

#[test]
fn equal_cycles_of_equal_content() {
    let a = ConfigNode::new();
    a.insert("v", 1.into());
    a.insert("next", ConfigElement::Node(a.clone()));

    let b = ConfigNode::new();
    b.insert("v", 1.into());
    b.insert("next", ConfigElement::Node(b.clone()));

    assert_eq!(ConfigElement::Node(a.clone()), ConfigElement::Node(b));

    let c = ConfigNode::new();
    c.insert("v", 2.into());
    c.insert("next", ConfigElement::Node(c.clone()));
    assert_ne!(ConfigElement::Node(a), ConfigElement::Node(c));
}

#[test]
fn mutation_through_one_position_is_visible_in_all() {
    let shared = ConfigNode::new();
    shared.insert("x", 1.into());

    let outer = ConfigList::new();
    outer.push(ConfigElement::Node(shared.clone()));
    outer.push(ConfigElement::Node(shared));

    outer
        .get(0)
        .unwrap()
        .as_node()
        .unwrap()
        .insert("y", 2.into());

    assert_eq!(outer.get(1).unwrap().as_node().unwrap().len(), 2);
}
