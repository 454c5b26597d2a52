//! Type conversion for parameter values
//!
//! Every parameter carries a [`Converter`] that coerces user supplied values
//! into the parameter's declared type. The untyped converter is the identity
//! and leaves values untouched. Converters are identified by a fully-qualified
//! type reference (for example `builtins.int`), which is what gets persisted;
//! a [`TypeResolver`] turns such a reference back into a converter.

use serde_json::{Number, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Signature of a conversion function
///
/// The error string describes why the value could not be converted and is
/// wrapped into a [`ParameterError::Conversion`](crate::parameters::ParameterError)
/// by the caller.
pub type ConvertFn = dyn Fn(&Value) -> Result<Value, String> + Send + Sync;

/// Type reference of the untyped (identity) converter
pub const UNTYPED: &str = "builtins.object";

/// A named conversion function for parameter values
#[derive(Clone)]
pub struct Converter {
    /// Fully-qualified name of the target type
    type_reference: String,

    /// The conversion function, `None` for the identity
    func: Option<Arc<ConvertFn>>,
}

impl Converter {
    /// Create a custom converter
    ///
    /// # Arguments
    ///
    /// * `type_reference` - Fully-qualified name of the target type
    /// * `func` - Function performing the conversion
    ///
    /// # Examples
    ///
    /// ```
    /// use classparams_rs::parameters::Converter;
    /// use serde_json::json;
    ///
    /// let upper = Converter::new("app.Upper", |v| {
    ///     v.as_str()
    ///         .map(|s| json!(s.to_uppercase()))
    ///         .ok_or_else(|| "expected a string".to_string())
    /// });
    /// assert_eq!(upper.type_name(), "Upper");
    /// assert_eq!(upper.apply(&json!("abc")).unwrap(), json!("ABC"));
    /// ```
    pub fn new<F>(type_reference: &str, func: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        Self {
            type_reference: type_reference.to_string(),
            func: Some(Arc::new(func)),
        }
    }

    /// The identity converter used by untyped parameters
    pub fn untyped() -> Self {
        Self {
            type_reference: UNTYPED.to_string(),
            func: None,
        }
    }

    /// Converter to integers
    pub fn int() -> Self {
        Self::new("builtins.int", to_int)
    }

    /// Converter to floating point numbers
    pub fn float() -> Self {
        Self::new("builtins.float", to_float)
    }

    /// Converter to strings
    pub fn string() -> Self {
        Self::new("builtins.str", to_string)
    }

    /// Converter to booleans using truthiness
    pub fn boolean() -> Self {
        Self::new("builtins.bool", to_bool)
    }

    /// Converter to lists
    pub fn list() -> Self {
        Self::new("builtins.list", to_list)
    }

    /// Converter to dictionaries
    pub fn dict() -> Self {
        Self::new("builtins.dict", to_dict)
    }

    /// All builtin converters, the untyped one included
    pub fn builtins() -> Vec<Converter> {
        vec![
            Self::untyped(),
            Self::int(),
            Self::float(),
            Self::string(),
            Self::boolean(),
            Self::list(),
            Self::dict(),
        ]
    }

    /// Whether this is the identity converter
    pub fn is_untyped(&self) -> bool {
        self.func.is_none()
    }

    /// Fully-qualified name of the target type
    pub fn type_reference(&self) -> &str {
        &self.type_reference
    }

    /// Short name of the target type, the last dotted segment of the reference
    pub fn type_name(&self) -> &str {
        self.type_reference
            .rsplit('.')
            .next()
            .unwrap_or(&self.type_reference)
    }

    /// Apply the conversion to a value
    ///
    /// The untyped converter returns a clone of the input.
    pub fn apply(&self, value: &Value) -> Result<Value, String> {
        match &self.func {
            None => Ok(value.clone()),
            Some(func) => func(value),
        }
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::untyped()
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter")
            .field("type_reference", &self.type_reference)
            .finish()
    }
}

/// Converters compare by type reference
impl PartialEq for Converter {
    fn eq(&self, other: &Self) -> bool {
        self.type_reference == other.type_reference
    }
}

/// Compare two values, treating numbers by numeric value
///
/// `1` and `1.0` are different JSON numbers but the same parameter value.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x == y,
            _ => x.as_f64() == y.as_f64(),
        },
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(k, v)| y.get(k).is_some_and(|w| values_equal(v, w)))
        }
        _ => a == b,
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a dictionary",
    }
}

fn finite_float(x: f64) -> Result<Value, String> {
    Number::from_f64(x)
        .map(Value::Number)
        .ok_or_else(|| format!("{} is not a finite number", x))
}

fn to_int(value: &Value) -> Result<Value, String> {
    match value {
        Value::Bool(b) => Ok(Value::from(i64::from(*b))),
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                Ok(value.clone())
            } else {
                // truncate toward zero, within the i64 or u64 range
                match n.as_f64().map(f64::trunc) {
                    Some(x) if (-9.223_372_036_854_775_808e18..9.223_372_036_854_775_808e18).contains(&x) => {
                        Ok(Value::from(x as i64))
                    }
                    Some(x) if (0.0..1.844_674_407_370_955_2e19).contains(&x) => Ok(Value::from(x as u64)),
                    _ => Err(format!("{} cannot be represented as an integer", n)),
                }
            }
        }
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .map(Value::from)
                .or_else(|_| trimmed.parse::<u64>().map(Value::from))
                .map_err(|_| format!("invalid literal for int: {:?}", s))
        }
        other => Err(format!("cannot convert {} to an integer", describe(other))),
    }
}

fn to_float(value: &Value) -> Result<Value, String> {
    match value {
        Value::Bool(b) => finite_float(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => match n.as_f64() {
            Some(x) => finite_float(x),
            None => Err(format!("{} cannot be represented as a float", n)),
        },
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(x) => finite_float(x),
            Err(_) => Err(format!("could not convert string to float: {:?}", s)),
        },
        other => Err(format!("cannot convert {} to a float", describe(other))),
    }
}

fn to_string(value: &Value) -> Result<Value, String> {
    match value {
        Value::String(_) => Ok(value.clone()),
        other => Ok(Value::String(other.to_string())),
    }
}

fn to_bool(value: &Value) -> Result<Value, String> {
    let truthy = match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|x| x != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    };
    Ok(Value::Bool(truthy))
}

fn to_list(value: &Value) -> Result<Value, String> {
    match value {
        Value::Array(_) => Ok(value.clone()),
        Value::String(s) => Ok(Value::Array(
            s.chars().map(|c| Value::String(c.to_string())).collect(),
        )),
        Value::Object(o) => Ok(Value::Array(
            o.keys().map(|k| Value::String(k.clone())).collect(),
        )),
        other => Err(format!("{} is not iterable", describe(other))),
    }
}

fn to_dict(value: &Value) -> Result<Value, String> {
    match value {
        Value::Object(_) => Ok(value.clone()),
        other => Err(format!("cannot convert {} to a dictionary", describe(other))),
    }
}

/// Resolves a persisted type reference back into a [`Converter`]
///
/// This is the seam for importing types by name; the crate only ships the
/// table-based [`TypeTable`].
pub trait TypeResolver {
    /// Look up the converter for a fully-qualified type reference
    fn resolve(&self, type_reference: &str) -> Option<Converter>;
}

impl<F> TypeResolver for F
where
    F: Fn(&str) -> Option<Converter>,
{
    fn resolve(&self, type_reference: &str) -> Option<Converter> {
        self(type_reference)
    }
}

/// A table of known converters keyed by type reference
#[derive(Debug, Clone)]
pub struct TypeTable {
    converters: HashMap<String, Converter>,
}

impl TypeTable {
    /// Create a table holding the builtin converters
    pub fn new() -> Self {
        let mut table = Self::empty();
        for converter in Converter::builtins() {
            table.register(converter);
        }
        table
    }

    /// Create a table without any converters
    pub fn empty() -> Self {
        Self {
            converters: HashMap::new(),
        }
    }

    /// Add a converter, replacing any with the same type reference
    pub fn register(&mut self, converter: Converter) {
        self.converters
            .insert(converter.type_reference().to_string(), converter);
    }

    /// Whether a type reference is known
    pub fn contains(&self, type_reference: &str) -> bool {
        self.converters.contains_key(type_reference)
    }

    /// Number of known converters
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeResolver for TypeTable {
    fn resolve(&self, type_reference: &str) -> Option<Converter> {
        self.converters.get(type_reference).cloned()
    }
}
