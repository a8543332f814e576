#[cfg(test)]
mod test_codec {
    use std::io::Cursor;

    use crate::codec::{Codec, CodecRegistry, JsonCodec, TomlCodec};
    use crate::element::{ConfigElement, ConfigList, ConfigNode};

    fn decode(codec: &dyn Codec, text: &str) -> ConfigElement {
        codec.decode(&mut Cursor::new(text.as_bytes())).unwrap()
    }

    fn encode(codec: &dyn Codec, element: &ConfigElement) -> String {
        let mut out = Vec::new();
        codec.encode(element, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn json_decode_shapes() {
        let element = decode(
            &JsonCodec,
            r#"{"name": "svc", "port": 8080, "ratio": 0.5, "tags": ["a", "b"], "extra": null}"#,
        );

        let node = element.as_node().unwrap();
        assert_eq!(node.get("name").unwrap().as_text(), Some("svc"));
        assert_eq!(node.get("port").unwrap().as_int(), Some(8080));
        assert_eq!(node.get("ratio").unwrap().as_float(), Some(0.5));
        assert_eq!(node.get("tags").unwrap().as_list().unwrap().len(), 2);
        assert!(node.get("extra").unwrap().is_null());
    }

    #[test]
    fn json_round_trip() {
        let element = decode(
            &JsonCodec,
            r#"{"outer": {"inner": [1, 2, {"deep": true}]}, "n": null}"#,
        );
        let text = encode(&JsonCodec, &element);
        let back = decode(&JsonCodec, &text);
        assert_eq!(element, back);
    }

    #[test]
    fn json_rejects_cyclic_elements() {
        let list = ConfigList::new();
        list.push(ConfigElement::List(list.clone()));

        let mut out = Vec::new();
        let err = JsonCodec
            .encode(&ConfigElement::List(list), &mut out)
            .unwrap_err();
        assert!(err.is_cyclic());
    }

    #[test]
    fn json_parse_error() {
        let err = JsonCodec
            .decode(&mut Cursor::new(b"{not json"))
            .unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn toml_decode_shapes() {
        let element = decode(
            &TomlCodec,
            "name = \"svc\"\nport = 8080\nratio = 0.5\n\n[limits]\nretries = 3\n",
        );

        let node = element.as_node().unwrap();
        assert_eq!(node.get("name").unwrap().as_text(), Some("svc"));
        assert_eq!(node.get("port").unwrap().as_int(), Some(8080));
        let limits = node.get("limits").unwrap();
        assert_eq!(limits.as_node().unwrap().get("retries").unwrap().as_int(), Some(3));
    }

    #[test]
    fn toml_datetimes_decode_as_text() {
        let element = decode(&TomlCodec, "created = 2024-01-15T10:00:00Z\n");
        let created = element.as_node().unwrap().get("created").unwrap();
        assert_eq!(created.as_text(), Some("2024-01-15T10:00:00Z"));
    }

    #[test]
    fn toml_round_trip() {
        let element = decode(
            &TomlCodec,
            "title = \"x\"\ncounts = [1, 2, 3]\n\n[nested]\nflag = true\n",
        );
        let text = encode(&TomlCodec, &element);
        let back = decode(&TomlCodec, &text);
        assert_eq!(element, back);
    }

    #[test]
    fn toml_rejects_null_and_non_node_roots() {
        let node = ConfigNode::new();
        node.insert("bad", ConfigElement::null());
        let mut out = Vec::new();
        assert!(TomlCodec
            .encode(&ConfigElement::Node(node), &mut out)
            .is_err());

        let mut out = Vec::new();
        assert!(TomlCodec
            .encode(&ConfigElement::from(1), &mut out)
            .is_err());
    }

    #[test]
    fn registry_routes_by_extension() {
        let registry = CodecRegistry::with_defaults();
        assert!(registry.by_extension("json").is_ok());
        assert!(registry.by_extension(".TOML").is_ok());

        let err = registry.by_extension("yaml").unwrap_err();
        assert!(matches!(
            err,
            crate::codec::CodecError::UnknownExtension { .. }
        ));
    }

    #[test]
    fn cross_format_equivalence() {
        // The same logical document through both codecs yields equal trees.
        let json = decode(&JsonCodec, r#"{"a": 1, "b": [true, "x"]}"#);
        let toml = decode(&TomlCodec, "a = 1\nb = [true, \"x\"]\n");
        assert_eq!(json, toml);
    }
}
