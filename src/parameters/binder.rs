//! Binding parameter values to instances
//!
//! This module turns the resolved parameters of a class plus a sparse set of
//! caller supplied overrides into the concrete [`ParameterValues`] held by an
//! instance.

use crate::parameters::class::{ParameterizedClass, ResolveOptions};
use crate::parameters::parameter::ParameterError;
use crate::parameters::summary::{self, SummaryOptions};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Caller supplied parameter values, keyed by name
pub type Overrides = IndexMap<String, Value>;

/// Options controlling how overrides are bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindOptions {
    /// Reject overrides that no ancestor declares. If `false`, they are kept
    /// unconverted in the result.
    pub check_validity: bool,

    /// Allow setting hidden parameters
    pub allow_hidden: bool,

    /// Include deprecated parameters
    pub include_deprecated: bool,
}

impl Default for BindOptions {
    fn default() -> Self {
        Self {
            check_validity: true,
            allow_hidden: true,
            include_deprecated: false,
        }
    }
}

impl BindOptions {
    /// Options used when constructing instances
    ///
    /// Like the defaults, but hide directives remove their target, so a
    /// parameter hidden by a descendant counts as unknown. Parameters
    /// declared with the `hidden` flag are still bound by
    /// [`ParameterizedClass::new_parameters`].
    pub fn construction() -> Self {
        Self::default().allow_hidden(false)
    }

    pub fn check_validity(mut self, check_validity: bool) -> Self {
        self.check_validity = check_validity;
        self
    }

    pub fn allow_hidden(mut self, allow_hidden: bool) -> Self {
        self.allow_hidden = allow_hidden;
        self
    }

    pub fn include_deprecated(mut self, include_deprecated: bool) -> Self {
        self.include_deprecated = include_deprecated;
        self
    }
}

/// The parameter values bound to one instance
#[derive(Debug, Clone)]
pub struct ParameterValues {
    class: Arc<ParameterizedClass>,
    values: IndexMap<String, Value>,
}

impl ParameterValues {
    /// The class the values were bound for
    pub fn class(&self) -> &Arc<ParameterizedClass> {
        &self.class
    }

    /// Get a value by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Get a value by name, deserialized into `T`
    ///
    /// Returns `None` if the parameter is not set or has a different type.
    ///
    /// # Examples
    ///
    /// ```
    /// use classparams_rs::parameters::{Converter, Parameter, ParameterizedClass};
    ///
    /// let class = ParameterizedClass::builder("DocGetAs")
    ///     .parameter(Parameter::new("size", 10, Converter::int()))
    ///     .build_unregistered();
    /// let values = class.new_parameters(None).unwrap();
    /// assert_eq!(values.get_as::<i64>("size"), Some(10));
    /// assert_eq!(values.get_as::<String>("size"), None);
    /// ```
    pub fn get_as<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        self.values
            .get(name)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Check if a value is set
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Names of all set values, in binding order
    pub fn names(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }

    /// Iterate over name and value pairs
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// Number of values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no value is set
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The underlying mapping
    pub fn as_map(&self) -> &IndexMap<String, Value> {
        &self.values
    }

    /// Consume and return the underlying mapping
    pub fn into_map(self) -> IndexMap<String, Value> {
        self.values
    }

    /// Summarize the bound values in human readable form
    ///
    /// With `default_values` the class defaults are shown instead.
    pub fn summary(
        &self,
        options: SummaryOptions,
        default_values: bool,
    ) -> Result<String, ParameterError> {
        let values = if default_values {
            None
        } else {
            Some(&self.values)
        };
        summary::parameter_summary(&self.class, options, values)
    }

    /// Print the summary to standard output
    pub fn show(&self, options: SummaryOptions, default_values: bool) -> Result<(), ParameterError> {
        print!("{}", self.summary(options, default_values)?);
        Ok(())
    }

    /// Save the values to a JSON string
    pub fn to_json(&self) -> Result<String, SerializationError> {
        Ok(serde_json::to_string_pretty(&self.values)?)
    }

    /// Save the values to a JSON file
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), SerializationError> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, &self.values)?;
        Ok(())
    }
}

impl PartialEq for ParameterValues {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.class, &other.class) && self.values == other.values
    }
}

impl ParameterizedClass {
    /// Bind overrides against the parameters of this class
    ///
    /// Every resolved parameter takes its value from `overrides` if present,
    /// otherwise its default, and is converted to the parameter type. Hidden
    /// parameters are skipped unless `allow_hidden` is set. Overrides that are
    /// not declared by any ancestor are rejected when `check_validity` is set
    /// and stored unconverted otherwise.
    ///
    /// The caller's overrides are not modified, and no values are returned if
    /// any conversion fails.
    ///
    /// # Arguments
    ///
    /// * `overrides` - Values replacing the defaults
    /// * `options` - How to treat hidden, deprecated and unknown parameters
    pub fn parse_parameters(
        self: &Arc<Self>,
        overrides: Option<&Overrides>,
        options: BindOptions,
    ) -> Result<ParameterValues, ParameterError> {
        self.bind(overrides, options, !options.allow_hidden)
    }

    /// Bind overrides the way instances are constructed
    ///
    /// Unknown overrides are rejected, and parameters removed by a hide
    /// directive or deprecated are not settable. Parameters declared with the
    /// `hidden` flag are bound like any other, since the flag only affects
    /// summaries. See [`BindOptions::construction`].
    pub fn new_parameters(
        self: &Arc<Self>,
        overrides: Option<&Overrides>,
    ) -> Result<ParameterValues, ParameterError> {
        self.bind(overrides, BindOptions::construction(), false)
    }

    /// Resolve with `options` and bind, skipping hidden-flagged entries if
    /// `skip_hidden` is set
    fn bind(
        self: &Arc<Self>,
        overrides: Option<&Overrides>,
        options: BindOptions,
        skip_hidden: bool,
    ) -> Result<ParameterValues, ParameterError> {
        let mut remaining = overrides.cloned().unwrap_or_default();

        let resolve = ResolveOptions::default()
            .include_hidden(options.allow_hidden)
            .include_deprecated(options.include_deprecated);
        let params = self.get_parameters(resolve)?;

        let mut values = IndexMap::with_capacity(params.len());
        for (name, param) in &params {
            if skip_hidden && param.is_hidden() {
                continue;
            }
            let value = param.convert(remaining.shift_remove(name).as_ref())?;
            values.insert(name.clone(), value);
        }

        if !remaining.is_empty() {
            if options.check_validity {
                let mut names: Vec<String> = remaining.into_keys().collect();
                names.sort();
                return Err(ParameterError::UnknownParameters {
                    class: self.name().to_string(),
                    names,
                });
            }
            values.extend(remaining);
        }

        tracing::debug!(class = %self.name(), "bound {} parameters", values.len());
        Ok(ParameterValues {
            class: Arc::clone(self),
            values,
        })
    }

    /// Bind overrides into `slot` unless it already holds values
    ///
    /// This lets a type set its parameters itself before a shared
    /// initialization path would otherwise bind the defaults.
    pub fn ensure_parameters<'a>(
        self: &Arc<Self>,
        slot: &'a mut Option<ParameterValues>,
        overrides: Option<&Overrides>,
    ) -> Result<&'a ParameterValues, ParameterError> {
        let values = match slot.take() {
            Some(values) => values,
            None => self.new_parameters(overrides)?,
        };
        Ok(slot.insert(values))
    }
}

/// A type whose configuration is managed by a [`ParameterizedClass`]
///
/// # Examples
///
/// ```
/// use classparams_rs::parameters::{
///     Converter, Overrides, Parameter, ParameterValues, Parameterized, ParameterizedClass,
/// };
/// use std::sync::{Arc, OnceLock};
///
/// struct Solver {
///     parameters: ParameterValues,
/// }
///
/// impl Parameterized for Solver {
///     fn parameter_class() -> Arc<ParameterizedClass> {
///         static CLASS: OnceLock<Arc<ParameterizedClass>> = OnceLock::new();
///         CLASS
///             .get_or_init(|| {
///                 ParameterizedClass::builder("DocSolver")
///                     .parameter(Parameter::new("steps", 100, Converter::int()))
///                     .build()
///             })
///             .clone()
///     }
///
///     fn parameters(&self) -> &ParameterValues {
///         &self.parameters
///     }
/// }
///
/// let mut overrides = Overrides::new();
/// overrides.insert("steps".to_string(), serde_json::json!("25"));
/// let solver = Solver {
///     parameters: Solver::parameter_class().new_parameters(Some(&overrides)).unwrap(),
/// };
/// assert_eq!(solver.parameter("steps"), Some(&serde_json::json!(25)));
/// assert_eq!(solver.get_parameter_default("steps").unwrap(), serde_json::json!(100));
/// ```
pub trait Parameterized {
    /// The class describing this type's parameters
    fn parameter_class() -> Arc<ParameterizedClass>
    where
        Self: Sized;

    /// The values bound to this instance
    fn parameters(&self) -> &ParameterValues;

    /// Get a bound value by name
    fn parameter(&self, name: &str) -> Option<&Value> {
        self.parameters().get(name)
    }

    /// Get the declared default of a parameter
    fn get_parameter_default(&self, name: &str) -> Result<Value, ParameterError> {
        self.parameters().class().get_parameter_default(name)
    }

    /// Summarize this instance's parameters
    fn parameter_summary(
        &self,
        options: SummaryOptions,
        default_values: bool,
    ) -> Result<String, ParameterError> {
        self.parameters().summary(options, default_values)
    }
}

/// Errors that can occur when reading or writing parameter values
#[derive(Error, Debug)]
pub enum SerializationError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Read overrides from a JSON object string
///
/// # Examples
///
/// ```
/// use classparams_rs::parameters::overrides_from_json;
///
/// let overrides = overrides_from_json(r#"{"size": 5, "label": "y"}"#).unwrap();
/// assert_eq!(overrides.len(), 2);
/// assert!(overrides_from_json("[1, 2]").is_err());
/// ```
pub fn overrides_from_json(json: &str) -> Result<Overrides, SerializationError> {
    Ok(serde_json::from_str(json)?)
}

/// Read overrides from a JSON file
pub fn load_overrides_json<P: AsRef<Path>>(path: P) -> Result<Overrides, SerializationError> {
    let mut file = File::open(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    overrides_from_json(&contents)
}
