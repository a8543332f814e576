//! TOML codec backed by the toml crate.

use std::io::{self, Read, Write};

use tracing::debug;

use crate::element::{ConfigElement, ConfigList, ConfigNode, Scalar};

use super::{Codec, CodecError, is_cyclic};

/// The TOML codec.
///
/// TOML documents are tables, so decode always yields a node and encode
/// requires one. TOML has no null: null scalars fail to encode, and
/// datetimes decode as their text form.
#[derive(Debug)]
pub struct TomlCodec;

impl Codec for TomlCodec {
    fn extensions(&self) -> &[&str] {
        &["toml"]
    }

    fn decode(&self, input: &mut dyn io::Read) -> Result<ConfigElement, CodecError> {
        let mut text = String::new();
        input.read_to_string(&mut text)?;

        let table: toml::Table = text.parse().map_err(|err: toml::de::Error| {
            CodecError::Parse {
                format: "TOML",
                reason: err.to_string(),
            }
        })?;

        let element = table_to_node(table);
        debug!(entries = element.child_count(), "decoded TOML document");
        Ok(element)
    }

    fn encode(
        &self,
        element: &ConfigElement,
        output: &mut dyn io::Write,
    ) -> Result<(), CodecError> {
        if is_cyclic(element) {
            return Err(CodecError::CyclicElement);
        }
        let ConfigElement::Node(node) = element else {
            return Err(CodecError::Emit {
                format: "TOML",
                reason: format!("top-level element must be a node, found {}", element.type_name()),
            });
        };

        let mut table = toml::Table::with_capacity(node.len());
        for (key, value) in node.entries() {
            table.insert(key, element_to_value(&value)?);
        }

        let text = toml::to_string(&table).map_err(|err| CodecError::Emit {
            format: "TOML",
            reason: err.to_string(),
        })?;
        output.write_all(text.as_bytes())?;
        Ok(())
    }
}

fn table_to_node(table: toml::Table) -> ConfigElement {
    let node = ConfigNode::with_capacity(table.len());
    for (key, value) in table {
        node.insert(key, value_to_element(value));
    }
    ConfigElement::Node(node)
}

fn value_to_element(value: toml::Value) -> ConfigElement {
    match value {
        toml::Value::String(s) => ConfigElement::Scalar(Scalar::Text(s)),
        toml::Value::Integer(n) => ConfigElement::Scalar(Scalar::Int(n)),
        toml::Value::Float(x) => ConfigElement::Scalar(Scalar::Float(x)),
        toml::Value::Boolean(b) => ConfigElement::Scalar(Scalar::Bool(b)),
        toml::Value::Datetime(dt) => ConfigElement::Scalar(Scalar::Text(dt.to_string())),
        toml::Value::Array(values) => {
            let list = ConfigList::with_capacity(values.len());
            for value in values {
                list.push(value_to_element(value));
            }
            ConfigElement::List(list)
        }
        toml::Value::Table(table) => table_to_node(table),
    }
}

fn element_to_value(element: &ConfigElement) -> Result<toml::Value, CodecError> {
    match element {
        ConfigElement::Scalar(Scalar::Null) => Err(CodecError::Emit {
            format: "TOML",
            reason: "null values are not representable".to_string(),
        }),
        ConfigElement::Scalar(Scalar::Bool(b)) => Ok(toml::Value::Boolean(*b)),
        ConfigElement::Scalar(Scalar::Int(n)) => Ok(toml::Value::Integer(*n)),
        ConfigElement::Scalar(Scalar::Float(x)) => Ok(toml::Value::Float(*x)),
        ConfigElement::Scalar(Scalar::Text(s)) => Ok(toml::Value::String(s.clone())),
        ConfigElement::List(list) => {
            let mut values = Vec::with_capacity(list.len());
            for item in list.elements() {
                values.push(element_to_value(&item)?);
            }
            Ok(toml::Value::Array(values))
        }
        ConfigElement::Node(node) => {
            let mut table = toml::Table::with_capacity(node.len());
            for (key, value) in node.entries() {
                table.insert(key, element_to_value(&value)?);
            }
            Ok(toml::Value::Table(table))
        }
    }
}
