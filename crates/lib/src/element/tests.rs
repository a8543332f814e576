#[cfg(test)]
mod test_element {
    use crate::element::{ConfigElement, ConfigList, ConfigNode, Scalar};

    #[test]
    fn scalar_accessors() {
        let element = ConfigElement::from(42);
        assert!(element.is_scalar());
        assert_eq!(element.as_int(), Some(42));
        assert_eq!(element.as_text(), None);
        assert_eq!(element.type_name(), "int");
    }

    #[test]
    fn node_preserves_insertion_order() {
        let node = ConfigNode::new();
        node.insert("zeta", "z".into());
        node.insert("alpha", "a".into());
        node.insert("mid", "m".into());

        assert_eq!(node.keys(), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn container_identity_survives_reads() {
        let inner = ConfigList::new();
        inner.push("x".into());

        let node = ConfigNode::new();
        node.insert("a", ConfigElement::List(inner.clone()));
        node.insert("b", ConfigElement::List(inner.clone()));

        let a = node.get("a").unwrap();
        let b = node.get("b").unwrap();
        assert!(a.as_list().unwrap().ptr_eq(b.as_list().unwrap()));

        // Mutation through one handle is visible through the other.
        inner.push("y".into());
        assert_eq!(a.as_list().unwrap().len(), 2);
    }

    #[test]
    fn content_equality_ignores_node_order() {
        let first: ConfigNode = [("a", ConfigElement::from(1)), ("b", ConfigElement::from(2))]
            .into_iter()
            .collect();
        let second: ConfigNode = [("b", ConfigElement::from(2)), ("a", ConfigElement::from(1))]
            .into_iter()
            .collect();

        assert_eq!(first, second);
    }

    #[test]
    fn self_referential_lists_compare_by_bisimulation() {
        let a = ConfigList::new();
        a.push("x".into());
        a.push(ConfigElement::List(a.clone()));

        let b = ConfigList::new();
        b.push("x".into());
        b.push(ConfigElement::List(b.clone()));

        // Distinct identities, same cycle structure.
        assert!(!a.ptr_eq(&b));
        assert_eq!(a, b);

        let c = ConfigList::new();
        c.push("y".into());
        c.push(ConfigElement::List(c.clone()));
        assert_ne!(a, c);
    }

    #[test]
    fn cycle_of_different_shape_is_unequal() {
        // a -> b -> a versus c -> c: both cyclic, different structure size.
        let a = ConfigList::new();
        let b = ConfigList::new();
        a.push(ConfigElement::List(b.clone()));
        b.push(ConfigElement::List(a.clone()));

        let c = ConfigList::new();
        c.push(ConfigElement::List(c.clone()));

        // Bisimulation equates them: every path through one matches the
        // other. This is the documented reading of graph equality.
        assert_eq!(a, c);

        let d = ConfigList::new();
        d.push(ConfigElement::from(1));
        assert_ne!(a, d);
    }

    #[test]
    fn debug_output_cuts_cycles() {
        let list = ConfigList::new();
        list.push("a".into());
        list.push(ConfigElement::List(list.clone()));

        let printed = format!("{list:?}");
        assert_eq!(printed, r#"["a", [...]]"#);
    }

    #[test]
    fn digest_is_shallow() {
        let node = ConfigNode::new();
        node.insert("self", ConfigElement::Node(node.clone()));
        assert_eq!(node.get("self").unwrap().digest(), "node with keys [self]");
    }

    #[test]
    fn require_accessors_report_actual_variant() {
        let element = ConfigElement::from("text");
        let err = element.require_list().unwrap_err();
        assert!(err.is_type_mismatch());
        assert!(element.require_scalar().is_ok());
    }

    #[test]
    fn scalar_float_widening() {
        assert_eq!(Scalar::Int(2).as_float(), Some(2.0));
        assert_eq!(Scalar::Float(1.5).as_float(), Some(1.5));
        assert_eq!(Scalar::Text("x".into()).as_float(), None);
    }

    #[test]
    fn serde_round_trip_through_json() {
        let node = ConfigNode::new();
        node.insert("name", "example".into());
        node.insert("count", 3.into());
        node.insert(
            "items",
            [ConfigElement::from("a"), ConfigElement::from("b")]
                .into_iter()
                .collect(),
        );
        node.insert("none", ConfigElement::null());
        let element = ConfigElement::Node(node);

        let text = serde_json::to_string(&element).unwrap();
        let back: ConfigElement = serde_json::from_str(&text).unwrap();
        assert_eq!(element, back);
    }

    #[test]
    fn serde_rejects_cyclic_elements() {
        let list = ConfigList::new();
        list.push(ConfigElement::List(list.clone()));

        let result = serde_json::to_string(&ConfigElement::List(list));
        assert!(result.is_err());
    }
}
