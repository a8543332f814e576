use std::io::Cursor;

use graft::codec::{Codec, CodecRegistry, JsonCodec, TomlCodec};
use graft::element::ConfigElement;

use crate::helpers::{Profile, setup_mapper};

const PROFILE_JSON: &str = r#"
{
    "strings": ["a", "b"],
    "value": 69,
    "intSet": [1, 2, 3]
}
"#;

const PROFILE_TOML: &str = "\
strings = [\"a\", \"b\"]
value = 69
intSet = [1, 2, 3]
";

fn decode(codec: &dyn Codec, text: &str) -> ConfigElement {
    codec.decode(&mut Cursor::new(text.as_bytes())).unwrap()
}

#[test]
fn json_document_maps_into_a_record() {
    let mapper = setup_mapper();
    let element = decode(&JsonCodec, PROFILE_JSON);

    let profile: Profile = mapper.data_from_element(&element).unwrap();
    assert_eq!(profile.strings, vec!["a", "b"]);
    assert_eq!(profile.value, 69);
}

#[test]
fn toml_document_maps_into_the_same_record() {
    let mapper = setup_mapper();

    let from_json: Profile = mapper
        .data_from_element(&decode(&JsonCodec, PROFILE_JSON))
        .unwrap();
    let from_toml: Profile = mapper
        .data_from_element(&decode(&TomlCodec, PROFILE_TOML))
        .unwrap();
    assert_eq!(from_json, from_toml);
}

#[test]
fn record_to_json_and_back() {
    let mapper = setup_mapper();
    let profile = Profile {
        strings: vec!["x".to_string(), "y".to_string()],
        value: 5,
        int_set: [3, 1].into_iter().collect(),
    };

    let element = mapper.element_from_data(&profile).unwrap();

    let mut out = Vec::new();
    JsonCodec.encode(&element, &mut out).unwrap();
    let reparsed = JsonCodec.decode(&mut Cursor::new(&out)).unwrap();

    let back: Profile = mapper.data_from_element(&reparsed).unwrap();
    assert_eq!(back, profile);
}

#[test]
fn record_to_toml_and_back() {
    let mapper = setup_mapper();
    let profile = Profile {
        strings: vec!["x".to_string()],
        value: 5,
        int_set: [2].into_iter().collect(),
    };

    let element = mapper.element_from_data(&profile).unwrap();

    let mut out = Vec::new();
    TomlCodec.encode(&element, &mut out).unwrap();
    let reparsed = TomlCodec.decode(&mut Cursor::new(&out)).unwrap();

    let back: Profile = mapper.data_from_element(&reparsed).unwrap();
    assert_eq!(back, profile);
}

#[test]
fn registry_feeds_the_mapper() {
    let mapper = setup_mapper();
    let registry = CodecRegistry::with_defaults();

    let codec = registry.by_extension("toml").unwrap();
    let element = codec
        .decode(&mut Cursor::new(PROFILE_TOML.as_bytes()))
        .unwrap();
    let profile: Profile = mapper.data_from_element(&element).unwrap();
    assert_eq!(profile.value, 69);
}
