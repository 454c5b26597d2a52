//! Integration tests for the Parameter struct
//!
//! These tests verify that parameters convert values and survive persistence.

use approx::assert_relative_eq;
use classparams_rs::parameters::{Converter, Parameter, ParameterError, TypeTable};
use serde_json::json;

#[test]
fn test_parameter_lifecycle() {
    // Create a parameter
    let param = Parameter::new("dt", 0.1, Converter::float())
        .with_description("Time step")
        .with_hidden(false);

    // Check initial state
    assert_eq!(param.name(), "dt");
    assert_eq!(param.type_name(), "float");
    assert_eq!(param.description(), "Time step");
    assert!(!param.is_hidden());
    assert!(param.default_is_consistent());

    // Convert the default and explicit values
    assert_relative_eq!(param.convert(None).unwrap().as_f64().unwrap(), 0.1);
    assert_relative_eq!(param.convert(Some(&json!("0.25"))).unwrap().as_f64().unwrap(), 0.25);
    assert_relative_eq!(param.convert(Some(&json!(2))).unwrap().as_f64().unwrap(), 2.0);

    // Invalid values are reported, not defaulted
    let err = param.convert(Some(&json!([0.1]))).unwrap_err();
    assert!(matches!(err, ParameterError::Conversion { .. }));
}

#[test]
fn test_int_conversion_idempotence() {
    let param = Parameter::new("count", 1, Converter::int());
    for value in [json!(0), json!(7), json!(-12), json!(3.0), json!(9.99), json!("  4")] {
        let once = param.convert(Some(&value)).unwrap();
        assert_eq!(param.convert(Some(&once)).unwrap(), once);
    }
}

#[test]
fn test_untyped_parameter_keeps_values() {
    let param = Parameter::untyped("payload", json!({"a": [1, 2]}));
    assert!(param.converter().is_untyped());
    assert_eq!(param.convert(None).unwrap(), json!({"a": [1, 2]}));
    assert_eq!(param.convert(Some(&json!("anything"))).unwrap(), json!("anything"));
}

#[test]
fn test_custom_converter_round_trip() {
    let positive = Converter::new("app.Positive", |value| match value.as_f64() {
        Some(x) if x > 0.0 => Ok(value.clone()),
        _ => Err("expected a positive number".to_string()),
    });
    let param = Parameter::new("rate", 2.5, positive.clone()).with_description("Rate");
    assert_eq!(param.type_name(), "Positive");
    assert!(param.convert(Some(&json!(-1))).is_err());

    let json = param.to_json().unwrap();

    // the builtin table does not know the custom type
    assert!(Parameter::from_json(&json, &TypeTable::new()).is_err());

    let mut table = TypeTable::new();
    table.register(positive);
    let restored = Parameter::from_json(&json, &table).unwrap();
    assert_eq!(restored, param);
}

#[test]
fn test_state_uses_converted_default() {
    let param = Parameter::new("size", "12", Converter::int());
    let state = param.to_state().unwrap();
    assert_eq!(state.default_value, json!(12));
    assert_eq!(state.type_reference, "builtins.int");

    let broken = Parameter::new("size", "twelve", Converter::int());
    assert!(broken.to_state().is_err());
}
