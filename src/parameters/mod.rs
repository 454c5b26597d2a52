//! # Parameter System
//!
//! This module provides declarative, inheritable parameters for class
//! hierarchies. A class declares named, typed and defaulted parameters;
//! derived classes may add, override, deprecate or hide the parameters of
//! their ancestors; instances are configured by a sparse set of overrides that
//! is merged against the full inherited default set.
//!
//! ## Key Features
//!
//! - **Inheritance**: Declarations of more specific classes replace those of their ancestors
//! - **Hiding and Deprecation**: Remove inherited parameters or keep them settable only on request
//! - **Type Conversion**: Overrides are coerced by a per-parameter [`Converter`]
//! - **Validation**: Unknown overrides are rejected unless explicitly allowed
//! - **Global Registry**: Every built class can be looked up and introspected by name
//! - **Serialization Support**: Externalize parameters and bound values with serde
//!
//! ## Core Components
//!
//! - [`Parameter`], [`Declaration`], [`HideParameter`]: What a class declares
//! - [`ParameterizedClass`] and [`ClassBuilder`]: Classes and the resolution of their parameters
//! - [`ParameterValues`] and [`Parameterized`]: Values bound to an instance
//! - [`ClassRegistry`]: The table of known classes
//!
//! ## Example Usage
//!
//! ```rust
//! use classparams_rs::parameters::{Converter, Overrides, Parameter, ParameterizedClass};
//! use serde_json::json;
//!
//! let base = ParameterizedClass::builder("ExampleBase")
//!     .parameter(Parameter::new("size", 10, Converter::int()))
//!     .parameter(Parameter::new("label", "x", Converter::string()))
//!     .build();
//!
//! let derived = base
//!     .subclass("ExampleDerived")
//!     .parameter(Parameter::new("size", 20, Converter::int()))
//!     .hide("label")
//!     .build();
//!
//! let mut overrides = Overrides::new();
//! overrides.insert("size".to_string(), json!(5));
//! let values = derived.new_parameters(Some(&overrides)).unwrap();
//! assert_eq!(values.get("size"), Some(&json!(5)));
//! assert!(!values.contains("label"));
//! ```

pub mod binder;
pub mod class;
pub mod converter;
pub mod parameter;
pub mod registry;
pub mod summary;


// Re-export key types
pub use binder::{
    load_overrides_json, overrides_from_json, BindOptions, Overrides, ParameterValues,
    Parameterized, SerializationError,
};
pub use class::{ClassBuilder, ParameterMap, ParameterizedClass, ResolveOptions};
pub use converter::{Converter, TypeResolver, TypeTable};
pub use parameter::{
    parameters_from_defaults, Declaration, HideParameter, Parameter, ParameterError,
    ParameterState,
};
pub use registry::{
    all_parameters, get_class, register_class, registered_classes, ClassParameters,
    ClassRegistry, ParameterQuery,
};
pub use summary::SummaryOptions;
