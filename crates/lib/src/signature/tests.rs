#[cfg(test)]
mod test_signature {
    use std::collections::HashMap;
    use std::sync::Arc;

    use crate::convert::ScalarTable;
    use crate::element::{ConfigElement, ConfigList, ConfigNode};
    use crate::hint::TypeHinter;
    use crate::object::ObjectRef;
    use crate::signature::{
        BoundArgument, ConstructorSignature, CustomSignature, FieldSignature, SchemaBuilder,
        SequenceSignature, Signature, SignatureMatcher, SignatureRef, Strategy,
    };
    use crate::token::{Reflect, Token};

    fn hinter() -> TypeHinter {
        TypeHinter::new(Arc::new(ScalarTable::builtin()))
    }

    #[derive(Clone, Debug, PartialEq, Default)]
    struct Endpoint {
        host: String,
        port: i64,
    }

    impl Reflect for Endpoint {
        fn token() -> Token {
            Token::concrete::<Endpoint>("Endpoint")
        }
    }

    fn endpoint_schema() -> crate::signature::RecordSchema {
        SchemaBuilder::<Endpoint>::new()
            .param::<String>("host")
            .param::<i64>("port")
            .construct(|args| {
                Ok(Endpoint {
                    host: args.next()?,
                    port: args.next()?,
                })
            })
            .field::<String>("host", |e| e.host.clone())
            .field::<i64>("port", |e| e.port)
            .build()
            .unwrap()
    }

    #[test]
    fn schema_rejects_mixed_naming() {
        let result = SchemaBuilder::<Endpoint>::new()
            .param::<String>("host")
            .param_unnamed::<i64>()
            .construct(|args| {
                Ok(Endpoint {
                    host: args.next()?,
                    port: args.next()?,
                })
            })
            .build();

        assert!(result.unwrap_err().is_shape());
    }

    #[test]
    fn schema_rejects_field_strategy_without_setters() {
        let result = SchemaBuilder::<Endpoint>::new()
            .strategy(Strategy::Field)
            .with_default(Endpoint::default)
            .field::<String>("host", |e| e.host.clone())
            .build();

        assert!(result.unwrap_err().is_shape());
    }

    #[test]
    fn schema_order_keys_reorder_fields() {
        let schema = SchemaBuilder::<Endpoint>::new()
            .strategy(Strategy::Field)
            .with_default(Endpoint::default)
            .field_mut::<String>("host", |e| e.host.clone(), |e, v| e.host = v)
            .order(2)
            .field_mut::<i64>("port", |e| e.port, |e, v| e.port = v)
            .order(1)
            .build()
            .unwrap();

        let signature = FieldSignature::from_schema(&schema).unwrap();
        let data = signature
            .object_data(&ObjectRef::new(Endpoint {
                host: "h".into(),
                port: 1,
            }))
            .unwrap();
        let names: Vec<_> = data.iter().map(|part| part.name.clone().unwrap()).collect();
        assert_eq!(names, vec!["port", "host"]);
    }

    #[test]
    fn constructor_signature_refuses_prebuilt() {
        let schema = endpoint_schema();
        let signature = ConstructorSignature::from_schema(&schema).unwrap();

        let err = signature
            .build(
                Some(ObjectRef::new(Endpoint::default())),
                vec![
                    BoundArgument {
                        name: Some("host".into()),
                        value: ObjectRef::new(String::from("h")),
                    },
                    BoundArgument {
                        name: Some("port".into()),
                        value: ObjectRef::new(1i64),
                    },
                ],
            )
            .unwrap_err();
        assert!(err.is_unsupported_prebuilt());
    }

    #[test]
    fn constructor_object_data_reads_matching_fields() {
        let schema = endpoint_schema();
        let signature = ConstructorSignature::from_schema(&schema).unwrap();

        let data = signature
            .object_data(&ObjectRef::new(Endpoint {
                host: "example".into(),
                port: 8080,
            }))
            .unwrap();

        assert_eq!(data.len(), 2);
        assert_eq!(data[0].name.as_deref(), Some("host"));
        assert_eq!(data[0].value.take::<String>().unwrap(), "example");
        assert_eq!(data[1].value.take::<i64>().unwrap(), 8080);
    }

    fn node(entries: &[(&str, ConfigElement)]) -> ConfigElement {
        let node: ConfigNode = entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        ConfigElement::Node(node)
    }

    #[test]
    fn matcher_binds_by_name_in_signature_order() {
        let schema = endpoint_schema();
        let signature: SignatureRef = Arc::new(ConstructorSignature::from_schema(&schema).unwrap());
        let matcher = SignatureMatcher::new(vec![signature], hinter());

        // Key order reversed relative to the signature's argument order.
        let element = node(&[("port", 8080.into()), ("host", "example".into())]);
        let matched = matcher.match_element(&Endpoint::token(), &element).unwrap();

        let names: Vec<_> = matched
            .children
            .iter()
            .map(|(name, _)| name.clone().unwrap())
            .collect();
        assert_eq!(names, vec!["host", "port"]);
    }

    #[test]
    fn matcher_skips_candidate_on_missing_name() {
        let schema = endpoint_schema();
        let signature: SignatureRef = Arc::new(ConstructorSignature::from_schema(&schema).unwrap());
        let matcher = SignatureMatcher::new(vec![signature], hinter());

        let element = node(&[("host", "example".into())]);
        let err = matcher
            .match_element(&Endpoint::token(), &element)
            .unwrap_err();
        assert!(err.is_no_match());
    }

    #[test]
    fn matcher_ignores_surplus_keys_for_named_signatures() {
        let schema = endpoint_schema();
        let signature: SignatureRef = Arc::new(ConstructorSignature::from_schema(&schema).unwrap());
        let matcher = SignatureMatcher::new(vec![signature], hinter());

        let element = node(&[
            ("host", "example".into()),
            ("port", 8080.into()),
            ("comment", "ignored".into()),
        ]);
        let matched = matcher.match_element(&Endpoint::token(), &element).unwrap();
        assert_eq!(matched.children.len(), 2);
    }

    #[test]
    fn matcher_gates_on_type_hints() {
        let schema = endpoint_schema();
        let signature: SignatureRef = Arc::new(ConstructorSignature::from_schema(&schema).unwrap());
        let matcher = SignatureMatcher::new(vec![signature], hinter());

        // "port" is text where the signature wants an integer.
        let element = node(&[("host", "example".into()), ("port", "8080".into())]);
        let err = matcher
            .match_element(&Endpoint::token(), &element)
            .unwrap_err();
        assert!(err.is_no_match());
    }

    #[test]
    fn matcher_rejects_named_signature_for_list_input() {
        let schema = endpoint_schema();
        let signature: SignatureRef = Arc::new(ConstructorSignature::from_schema(&schema).unwrap());
        let matcher = SignatureMatcher::new(vec![signature], hinter());

        let list: ConfigElement = [ConfigElement::from("example"), ConfigElement::from(8080)]
            .into_iter()
            .collect();
        assert!(matcher.match_element(&Endpoint::token(), &list).is_err());
    }

    fn marker_custom(tag: &'static str, priority: i32) -> SignatureRef {
        Arc::new(
            CustomSignature::builder(Endpoint::token())
                .param("host", Token::of::<String>())
                .param("port", Token::of::<i64>())
                .priority(priority)
                .build_with(move |_, _| {
                    Ok(ObjectRef::new(Endpoint {
                        host: tag.to_string(),
                        port: 0,
                    }))
                })
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn higher_priority_candidate_wins() {
        let matcher = SignatureMatcher::new(
            vec![marker_custom("low", 0), marker_custom("high", 10)],
            hinter(),
        );

        let element = node(&[("host", "example".into()), ("port", 8080.into())]);
        let matched = matcher.match_element(&Endpoint::token(), &element).unwrap();
        let built = matched.signature.build(None, Vec::new()).unwrap();
        assert_eq!(built.take::<Endpoint>().unwrap().host, "high");
    }

    #[test]
    fn equal_priority_keeps_registration_order() {
        let matcher = SignatureMatcher::new(
            vec![marker_custom("first", 5), marker_custom("second", 5)],
            hinter(),
        );

        let element = node(&[("host", "example".into()), ("port", 8080.into())]);
        let matched = matcher.match_element(&Endpoint::token(), &element).unwrap();
        let built = matched.signature.build(None, Vec::new()).unwrap();
        assert_eq!(built.take::<Endpoint>().unwrap().host, "first");
    }

    #[test]
    fn sequence_signature_builds_and_introspects() {
        let token = Token::of::<Vec<String>>();
        let signature = SequenceSignature::from_token(&token).unwrap();

        let args = vec![
            BoundArgument {
                name: None,
                value: ObjectRef::new(String::from("a")),
            },
            BoundArgument {
                name: None,
                value: ObjectRef::new(String::from("b")),
            },
        ];
        let built = signature.build(None, args).unwrap();
        assert_eq!(
            built.take::<Vec<String>>().unwrap(),
            vec!["a".to_string(), "b".to_string()]
        );

        let data = signature.object_data(&built).unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0].ty, Token::of::<String>());
    }

    #[test]
    fn array_signature_has_no_prebuilt() {
        let token = Token::of::<Box<[i64]>>();
        let signature = SequenceSignature::from_token(&token).unwrap();
        assert!(!signature.supports_prebuilt());

        let list = ConfigElement::List(ConfigList::new());
        assert!(signature.make_prebuilt(&list).is_err());
    }

    #[test]
    fn abstract_sequence_token_is_unavailable() {
        let token = Token::list_of(Token::of::<String>());
        let err = SequenceSignature::from_token(&token).unwrap_err();
        assert!(matches!(
            err,
            crate::signature::SignatureError::Token(
                crate::token::TokenError::TypeUnavailable { .. }
            )
        ));
    }

    #[test]
    fn source_caches_matchers_per_token() {
        let hinter = hinter();
        let source = crate::signature::SignatureSource::new(
            hinter,
            Strategy::Constructor,
            HashMap::new(),
            HashMap::new(),
        );

        let first = source.matcher_for(&Token::of::<Vec<String>>()).unwrap();
        let second = source.matcher_for(&Token::of::<Vec<String>>()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let err = source.matcher_for(&Endpoint::token()).unwrap_err();
        assert!(matches!(
            err,
            crate::signature::SignatureError::Token(
                crate::token::TokenError::TypeUnavailable { .. }
            )
        ));
    }
}
