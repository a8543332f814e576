//! Serde integration for the element tree.
//!
//! Elements serialize to the natural data-model mapping (null, bool, i64,
//! f64, string, seq, map), which is what the format codecs drive. The wire
//! formats are trees, so serializing a self-referential element fails
//! rather than looping.

use std::cell::RefCell;
use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use super::{ConfigElement, ConfigList, ConfigNode, Scalar};

struct Guarded<'a> {
    element: &'a ConfigElement,
    in_progress: &'a RefCell<Vec<usize>>,
}

impl Serialize for ConfigElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let in_progress = RefCell::new(Vec::new());
        Guarded {
            element: self,
            in_progress: &in_progress,
        }
        .serialize(serializer)
    }
}

impl Serialize for Guarded<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.element {
            ConfigElement::Scalar(Scalar::Null) => serializer.serialize_unit(),
            ConfigElement::Scalar(Scalar::Bool(b)) => serializer.serialize_bool(*b),
            ConfigElement::Scalar(Scalar::Int(n)) => serializer.serialize_i64(*n),
            ConfigElement::Scalar(Scalar::Float(x)) => serializer.serialize_f64(*x),
            ConfigElement::Scalar(Scalar::Text(s)) => serializer.serialize_str(s),
            ConfigElement::List(list) => {
                self.enter(list.ptr_id())?;
                let items = list.elements();
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in &items {
                    seq.serialize_element(&Guarded {
                        element: item,
                        in_progress: self.in_progress,
                    })?;
                }
                self.leave();
                seq.end()
            }
            ConfigElement::Node(node) => {
                self.enter(node.ptr_id())?;
                let entries = node.entries();
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in &entries {
                    map.serialize_entry(
                        key,
                        &Guarded {
                            element: value,
                            in_progress: self.in_progress,
                        },
                    )?;
                }
                self.leave();
                map.end()
            }
        }
    }
}

impl Guarded<'_> {
    fn enter<E: serde::ser::Error>(&self, id: usize) -> Result<(), E> {
        let mut in_progress = self.in_progress.borrow_mut();
        if in_progress.contains(&id) {
            return Err(E::custom("cannot serialize a self-referential element"));
        }
        in_progress.push(id);
        Ok(())
    }

    fn leave(&self) {
        self.in_progress.borrow_mut().pop();
    }
}

struct ElementVisitor;

impl<'de> Visitor<'de> for ElementVisitor {
    type Value = ConfigElement;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a configuration element")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(ConfigElement::Scalar(Scalar::Bool(v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(ConfigElement::Scalar(Scalar::Int(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        match i64::try_from(v) {
            Ok(n) => Ok(ConfigElement::Scalar(Scalar::Int(n))),
            Err(_) => Err(E::custom(format!("integer {v} does not fit in i64"))),
        }
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(ConfigElement::Scalar(Scalar::Float(v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(ConfigElement::Scalar(Scalar::Text(v.to_string())))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(ConfigElement::Scalar(Scalar::Text(v)))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(ConfigElement::null())
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(ConfigElement::null())
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(ElementVisitor)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let list = ConfigList::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(element) = seq.next_element::<ConfigElement>()? {
            list.push(element);
        }
        Ok(ConfigElement::List(list))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let node = ConfigNode::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<String, ConfigElement>()? {
            node.insert(key, value);
        }
        Ok(ConfigElement::Node(node))
    }
}

impl<'de> Deserialize<'de> for ConfigElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ElementVisitor)
    }
}
