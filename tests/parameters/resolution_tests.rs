//! Integration tests for parameter resolution
//!
//! These tests verify how declarations of an ancestor chain are merged.

use classparams_rs::parameters::{
    Converter, Declaration, HideParameter, Parameter, ParameterError, ParameterizedClass,
    ResolveOptions,
};
use serde_json::json;
use std::sync::Arc;

/// A -> B -> C with A most general
fn hierarchy() -> Vec<Arc<ParameterizedClass>> {
    let a = ParameterizedClass::builder("ResolveA")
        .parameter(Parameter::new("x", 1, Converter::int()).with_description("from A"))
        .parameter(Parameter::untyped("y", 5))
        .build_unregistered();
    let b = a
        .subclass("ResolveB")
        .parameter(Parameter::new("x", 2, Converter::int()).with_description("from B"))
        .declare(HideParameter::new("y"))
        .deprecated(Parameter::new("z", 3, Converter::int()))
        .build_unregistered();
    let c = b
        .subclass("ResolveC")
        .parameter(Parameter::new("u", "c", Converter::string()))
        .build_unregistered();
    vec![a, b, c]
}

#[test]
fn test_merge_correctness() {
    let classes = hierarchy();
    let params = classes[2].get_parameters(ResolveOptions::default()).unwrap();
    assert_eq!(params["x"].default_value(), &json!(2));
    assert_eq!(params["x"].description(), "from B");
    assert_eq!(params.len(), 2);

    let params = classes[0].get_parameters(ResolveOptions::default()).unwrap();
    assert_eq!(params["x"].default_value(), &json!(1));
    assert_eq!(params["y"].default_value(), &json!(5));
}

#[test]
fn test_hide_removes_visibility() {
    let classes = hierarchy();
    let b = &classes[1];

    let params = b.get_parameters(ResolveOptions::default()).unwrap();
    assert!(!params.contains_key("y"));

    let params = b
        .get_parameters(ResolveOptions::default().include_hidden(true))
        .unwrap();
    assert!(params["y"].is_hidden());

    // descendants inherit the hiding
    let params = classes[2].get_parameters(ResolveOptions::default()).unwrap();
    assert!(!params.contains_key("y"));
}

#[test]
fn test_deprecated_exclusion() {
    let classes = hierarchy();
    let c = &classes[2];

    let params = c.get_parameters(ResolveOptions::default()).unwrap();
    assert!(!params.contains_key("z"));

    let params = c
        .get_parameters(ResolveOptions::default().include_deprecated(true))
        .unwrap();
    assert_eq!(params["z"].default_value(), &json!(3));
}

#[test]
fn test_redeclare_after_hide() {
    let classes = hierarchy();
    let d = classes[2]
        .subclass("ResolveD")
        .parameter(Parameter::untyped("y", 50))
        .build_unregistered();
    let params = d.get_parameters(ResolveOptions::default()).unwrap();
    assert_eq!(params["y"].default_value(), &json!(50));
    assert!(!params["y"].is_hidden());
}

#[test]
fn test_insertion_order_without_sort() {
    let classes = hierarchy();
    let d = classes[2]
        .subclass("ResolveOrder")
        .parameter(Parameter::untyped("b", 0))
        .parameter(Parameter::untyped("a", 0))
        .build_unregistered();

    let params = d.get_parameters(ResolveOptions::default().sort(false)).unwrap();
    let names: Vec<&str> = params.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["x", "u", "b", "a"]);

    let params = d.get_parameters(ResolveOptions::default()).unwrap();
    let names: Vec<&str> = params.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["a", "b", "u", "x"]);
}

#[test]
fn test_hide_of_undeclared_parameter() {
    let root = ParameterizedClass::builder("ResolveRoot")
        .declarations(vec![Declaration::from(Parameter::untyped("a", 1))])
        .build_unregistered();
    let child = root
        .subclass("ResolveChild")
        .declare(HideParameter::new("b"))
        .build_unregistered();

    let err = child.get_parameters(ResolveOptions::default()).unwrap_err();
    assert_eq!(
        err,
        ParameterError::ParameterNotFound {
            name: "b".to_string()
        }
    );
}

#[test]
fn test_default_lookup() {
    let classes = hierarchy();
    let c = &classes[2];
    assert_eq!(c.get_parameter_default("x").unwrap(), json!(2));
    assert_eq!(c.get_parameter_default("u").unwrap(), json!("c"));
    assert_eq!(c.get_parameter_default("y").unwrap(), json!(5));
    assert!(c.get_parameter_default("missing").is_err());
    assert!(classes[0].get_parameter_default("u").is_err());
}

#[test]
fn test_defaults_shorthand_matches_untyped_parameters() {
    let shorthand = ParameterizedClass::builder("ResolveShorthand")
        .defaults(vec![("alpha", json!(1)), ("beta", json!([1, 2]))])
        .build_unregistered();
    let explicit = ParameterizedClass::builder("ResolveExplicit")
        .parameter(Parameter::untyped("alpha", 1))
        .parameter(Parameter::untyped("beta", json!([1, 2])))
        .build_unregistered();

    assert_eq!(shorthand.declarations(), explicit.declarations());
}
