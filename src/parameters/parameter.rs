//! Parameter definition and implementation
//!
//! This module provides the Parameter struct, which is the fundamental building
//! block of the parameter system. A parameter is a named, typed and defaulted
//! option declared by a class. Declarations come in three flavors, see
//! [`Declaration`]: normal parameters, deprecated parameters and directives
//! hiding a parameter inherited from an ancestor.

use crate::parameters::converter::{values_equal, Converter, TypeResolver};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Errors that can occur when working with parameters
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    #[error("Could not convert {value} to {target} for parameter '{name}': {reason}")]
    Conversion {
        name: String,
        value: Value,
        target: String,
        reason: String,
    },

    #[error(
        "Parameters {names:?} were provided in instance specific parameters but are not defined for the class '{class}'"
    )]
    UnknownParameters { class: String, names: Vec<String> },

    #[error("Parameter '{name}' is not defined")]
    ParameterNotFound { name: String },

    #[error("Cannot interpret query mode '{0}'")]
    BadQueryMode(String),

    #[error("Cannot resolve type reference '{0}'")]
    UnknownType(String),

    #[error("Class '{0}' is not registered")]
    UnknownClass(String),
}

/// A single parameter declaration
///
/// The `converter` determines how values for this parameter are coerced. An
/// untyped parameter accepts values as they are.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Name of the parameter
    pub name: String,

    /// Value used when an instance does not set the parameter
    default_value: Value,

    /// Conversion into the parameter's type
    converter: Converter,

    /// Human readable description shown in parameter summaries
    pub description: String,

    /// Whether the parameter is left out of summaries and restricted binds
    pub hidden: bool,
}

impl Parameter {
    /// Create a new typed parameter
    ///
    /// A warning is logged when the default value does not survive conversion
    /// unchanged; this does not prevent the parameter from being created since
    /// the default may legitimately need coercion later.
    ///
    /// # Arguments
    ///
    /// * `name` - Name of the parameter
    /// * `default_value` - The default value
    /// * `converter` - Conversion into the type of the parameter
    ///
    /// # Examples
    ///
    /// ```
    /// use classparams_rs::parameters::{Converter, Parameter};
    /// use serde_json::json;
    ///
    /// let param = Parameter::new("size", 10, Converter::int());
    /// assert_eq!(param.name(), "size");
    /// assert_eq!(param.default_value(), &json!(10));
    /// assert_eq!(param.convert(Some(&json!("12"))).unwrap(), json!(12));
    /// ```
    pub fn new(name: &str, default_value: impl Into<Value>, converter: Converter) -> Self {
        let param = Self {
            name: name.to_string(),
            default_value: default_value.into(),
            converter,
            description: String::new(),
            hidden: false,
        };

        if !param.default_is_consistent() {
            tracing::warn!(
                "Default value of parameter `{}` does not seem to be of type `{}`",
                param.name,
                param.converter.type_name()
            );
        }

        param
    }

    /// Create a parameter without type conversion
    pub fn untyped(name: &str, default_value: impl Into<Value>) -> Self {
        Self::new(name, default_value, Converter::untyped())
    }

    /// Set the description of the parameter
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Set whether the parameter is hidden
    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Turn this parameter into a deprecated declaration
    pub fn deprecated(self) -> Declaration {
        Declaration::Deprecated(self)
    }

    /// Get the name of the parameter
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the raw, unconverted default value
    pub fn default_value(&self) -> &Value {
        &self.default_value
    }

    /// Get the converter of the parameter
    pub fn converter(&self) -> &Converter {
        &self.converter
    }

    /// Get the short name of the parameter type
    pub fn type_name(&self) -> &str {
        self.converter.type_name()
    }

    /// Get the description of the parameter
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Check if the parameter is hidden
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Whether the default value converts to itself
    pub fn default_is_consistent(&self) -> bool {
        if self.converter.is_untyped() {
            return true;
        }
        match self.converter.apply(&self.default_value) {
            Ok(converted) => values_equal(&converted, &self.default_value),
            Err(_) => false,
        }
    }

    /// Convert a value into the type of this parameter
    ///
    /// If `value` is `None` or `null`, the default value is converted. The
    /// returned value is a fresh clone, also for untyped parameters.
    ///
    /// # Arguments
    ///
    /// * `value` - The value to convert
    ///
    /// # Returns
    ///
    /// The converted value, or an error naming the parameter, the value and
    /// the target type if the conversion fails
    pub fn convert(&self, value: Option<&Value>) -> Result<Value, ParameterError> {
        let value = match value {
            Some(v) if !v.is_null() => v,
            _ => &self.default_value,
        };

        self.converter
            .apply(value)
            .map_err(|reason| ParameterError::Conversion {
                name: self.name.clone(),
                value: value.clone(),
                target: self.converter.type_name().to_string(),
                reason,
            })
    }

    /// Externalize the parameter
    ///
    /// The stored default is converted first, so a default that cannot be
    /// converted makes this fail.
    pub fn to_state(&self) -> Result<ParameterState, ParameterError> {
        Ok(ParameterState {
            name: self.name.clone(),
            default_value: self.convert(None)?,
            type_reference: self.converter.type_reference().to_string(),
            description: self.description.clone(),
            hidden: self.hidden,
        })
    }

    /// Restore a parameter from its externalized state
    ///
    /// # Arguments
    ///
    /// * `state` - The externalized parameter
    /// * `resolver` - Turns the stored type reference into a converter
    pub fn from_state(
        state: ParameterState,
        resolver: &impl TypeResolver,
    ) -> Result<Self, ParameterError> {
        let converter = resolver
            .resolve(&state.type_reference)
            .ok_or_else(|| ParameterError::UnknownType(state.type_reference.clone()))?;

        Ok(Self {
            name: state.name,
            default_value: state.default_value,
            converter,
            description: state.description,
            hidden: state.hidden,
        })
    }

    /// Serialize the parameter to a JSON string
    pub fn to_json(&self) -> Result<String, crate::error::ClassParamsError> {
        let state = self.to_state()?;
        Ok(serde_json::to_string_pretty(&state)?)
    }

    /// Restore a parameter from a JSON string produced by [`Parameter::to_json`]
    pub fn from_json(
        json: &str,
        resolver: &impl TypeResolver,
    ) -> Result<Self, crate::error::ClassParamsError> {
        let state: ParameterState = serde_json::from_str(json)?;
        Ok(Self::from_state(state, resolver)?)
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parameter(name=\"{}\", default_value={}, type=\"{}\", description=\"{}\", hidden={})",
            self.name,
            self.default_value,
            self.type_name(),
            self.description,
            self.hidden
        )
    }
}

/// The externalized form of a [`Parameter`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterState {
    pub name: String,
    pub default_value: Value,
    pub type_reference: String,
    pub description: String,
    pub hidden: bool,
}

/// Directive removing a parameter inherited from an ancestor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HideParameter {
    pub name: String,
}

impl HideParameter {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

/// One entry in a class's own declaration list
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    /// A regular parameter, always part of the resolved set
    Parameter(Parameter),

    /// A parameter only resolved when deprecated parameters are requested
    Deprecated(Parameter),

    /// Removes (or hides) an inherited parameter
    Hide(HideParameter),
}

impl Declaration {
    /// Name the declaration refers to
    pub fn name(&self) -> &str {
        match self {
            Declaration::Parameter(p) | Declaration::Deprecated(p) => p.name(),
            Declaration::Hide(h) => &h.name,
        }
    }

    /// The declared parameter, `None` for hide directives
    pub fn parameter(&self) -> Option<&Parameter> {
        match self {
            Declaration::Parameter(p) | Declaration::Deprecated(p) => Some(p),
            Declaration::Hide(_) => None,
        }
    }

    /// Whether this is a deprecated parameter
    pub fn is_deprecated(&self) -> bool {
        matches!(self, Declaration::Deprecated(_))
    }
}

impl From<Parameter> for Declaration {
    fn from(param: Parameter) -> Self {
        Declaration::Parameter(param)
    }
}

impl From<HideParameter> for Declaration {
    fn from(hide: HideParameter) -> Self {
        Declaration::Hide(hide)
    }
}

/// Normalize a name to default mapping into untyped parameter declarations
///
/// This is the shorthand for classes that only need defaults. The order of
/// the input is kept.
///
/// # Examples
///
/// ```
/// use classparams_rs::parameters::parameters_from_defaults;
/// use serde_json::json;
///
/// let decls = parameters_from_defaults([("a", json!(1)), ("b", json!("x"))]);
/// assert_eq!(decls.len(), 2);
/// assert_eq!(decls[1].name(), "b");
/// ```
pub fn parameters_from_defaults<I, S>(defaults: I) -> Vec<Declaration>
where
    I: IntoIterator<Item = (S, Value)>,
    S: AsRef<str>,
{
    defaults
        .into_iter()
        .map(|(name, value)| Declaration::Parameter(Parameter::untyped(name.as_ref(), value)))
        .collect()
}
