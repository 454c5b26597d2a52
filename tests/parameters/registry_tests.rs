//! Integration tests for the class registry
//!
//! The global registry is shared by all tests in this binary, so every test
//! uses its own class names.

use classparams_rs::parameters::{
    all_parameters, get_class, registered_classes, ClassParameters, Converter, Parameter,
    ParameterError, ParameterQuery, ParameterizedClass, ResolveOptions,
};
use serde_json::json;
use std::collections::BTreeSet;
use std::sync::Arc;

#[test]
fn test_registry_completeness() {
    let base = ParameterizedClass::builder("RegistryTestBase")
        .parameter(Parameter::new("size", 10, Converter::int()).with_description("Size"))
        .parameter(Parameter::new("label", "x", Converter::string()))
        .build();
    let derived = base
        .subclass("RegistryTestDerived")
        .parameter(Parameter::new("size", 20, Converter::int()))
        .hide("label")
        .build();

    let names = registered_classes();
    assert!(names.contains(&"RegistryTestBase".to_string()));
    assert!(names.contains(&"RegistryTestDerived".to_string()));
    assert!(Arc::ptr_eq(&get_class("RegistryTestDerived").unwrap(), &derived));

    let all = all_parameters(ParameterQuery::Names).unwrap();
    for class in [&base, &derived] {
        let keys: BTreeSet<String> = class
            .get_parameters(ResolveOptions::default())
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(all[class.name()], ClassParameters::Names(keys));
    }
}

#[test]
fn test_registry_values_and_descriptions() {
    ParameterizedClass::builder("RegistryTestValues")
        .parameter(Parameter::new("rate", 0.5, Converter::float()).with_description("Decay rate"))
        .deprecated(Parameter::untyped("old", 1))
        .build();

    let values = all_parameters("value".parse().unwrap()).unwrap();
    match &values["RegistryTestValues"] {
        ClassParameters::Values(map) => {
            assert_eq!(map.len(), 1);
            assert_eq!(map["rate"], json!(0.5));
        }
        other => panic!("Expected values, got {:?}", other),
    }

    let descriptions = all_parameters(ParameterQuery::Description).unwrap();
    match &descriptions["RegistryTestValues"] {
        ClassParameters::Descriptions(map) => assert_eq!(map["rate"], "Decay rate"),
        other => panic!("Expected descriptions, got {:?}", other),
    }
}

#[test]
fn test_redefinition_replaces_entry() {
    let first = ParameterizedClass::builder("RegistryTestTwice")
        .parameter(Parameter::untyped("a", 1))
        .build();
    let second = ParameterizedClass::builder("RegistryTestTwice")
        .parameter(Parameter::untyped("b", 2))
        .build();

    let found = get_class("RegistryTestTwice").unwrap();
    assert!(Arc::ptr_eq(&found, &second));
    assert!(!Arc::ptr_eq(&found, &first));
}

#[test]
fn test_bad_query_mode() {
    let err = "everything".parse::<ParameterQuery>().unwrap_err();
    assert_eq!(err, ParameterError::BadQueryMode("everything".to_string()));
    assert!(err.to_string().contains("everything"));
}

#[test]
fn test_unknown_class() {
    assert!(matches!(
        get_class("RegistryTestNeverDefined"),
        Err(ParameterError::UnknownClass(_))
    ));
}
