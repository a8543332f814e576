use std::collections::BTreeSet;

use graft::mapper::Mapper;
use graft::object::ObjectRef;
use graft::signature::{SchemaBuilder, Strategy};
use graft::token::{Reflect, Token};

/// Record mapped through the constructor strategy with named parameters.
///
/// The `int_set` field maps under the wire name `intSet`, exercising name
/// overrides.
#[derive(Clone, Debug, PartialEq)]
pub struct Profile {
    pub strings: Vec<String>,
    pub value: i64,
    pub int_set: BTreeSet<i64>,
}

impl Reflect for Profile {
    fn token() -> Token {
        Token::concrete::<Profile>("Profile")
    }
}

/// Record mapped through the field strategy; `self_reference` is
/// dynamically typed so the record can point at itself.
#[derive(Clone, Debug)]
pub struct Widget {
    pub label: String,
    pub enabled: bool,
    pub self_reference: ObjectRef,
}

impl Default for Widget {
    fn default() -> Self {
        Self {
            label: String::new(),
            enabled: false,
            self_reference: ObjectRef::null(),
        }
    }
}

impl Reflect for Widget {
    fn token() -> Token {
        Token::concrete::<Widget>("Widget")
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Mode {
    Active,
    Passive,
}

impl Reflect for Mode {
    fn token() -> Token {
        Token::concrete::<Mode>("Mode")
    }
}

/// A mapper with the standard test registrations.
pub fn setup_mapper() -> Mapper {
    Mapper::builder()
        .register_schema(
            SchemaBuilder::<Profile>::new()
                .param::<Vec<String>>("strings")
                .param::<i64>("value")
                .param::<BTreeSet<i64>>("intSet")
                .construct(|args| {
                    Ok(Profile {
                        strings: args.next()?,
                        value: args.next()?,
                        int_set: args.next()?,
                    })
                })
                .field::<Vec<String>>("strings", |p| p.strings.clone())
                .field::<i64>("value", |p| p.value)
                .field::<BTreeSet<i64>>("intSet", |p| p.int_set.clone())
                .build()
                .expect("Profile schema should validate"),
        )
        .register_schema(
            SchemaBuilder::<Widget>::new()
                .strategy(Strategy::Field)
                .with_default(Widget::default)
                .field_mut::<String>("label", |w| w.label.clone(), |w, v| w.label = v)
                .field_mut::<bool>("enabled", |w| w.enabled, |w, v| w.enabled = v)
                .field_mut::<ObjectRef>(
                    "selfReference",
                    |w| w.self_reference.clone(),
                    |w, v| w.self_reference = v,
                )
                .build()
                .expect("Widget schema should validate"),
        )
        .register_enum([("ACTIVE", Mode::Active), ("PASSIVE", Mode::Passive)])
        .build()
        .expect("test mapper should build")
}
