//! Human readable parameter listings

use crate::parameters::class::{ParameterizedClass, ResolveOptions};
use crate::parameters::parameter::{Parameter, ParameterError};
use indexmap::IndexMap;
use serde_json::Value;

/// Flags for parameter summaries, all off by default
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummaryOptions {
    /// Append the parameter description
    pub description: bool,
    /// Sort parameters by name
    pub sort: bool,
    /// Show parameters flagged as hidden
    pub show_hidden: bool,
    /// Show deprecated parameters
    pub show_deprecated: bool,
}

impl SummaryOptions {
    pub fn description(mut self, description: bool) -> Self {
        self.description = description;
        self
    }

    pub fn sort(mut self, sort: bool) -> Self {
        self.sort = sort;
        self
    }

    pub fn show_hidden(mut self, show_hidden: bool) -> Self {
        self.show_hidden = show_hidden;
        self
    }

    pub fn show_deprecated(mut self, show_deprecated: bool) -> Self {
        self.show_deprecated = show_deprecated;
        self
    }
}

/// Format one summary line
///
/// Typed parameters read `name: type = value`, untyped ones `name = value`.
pub fn format_line(param: &Parameter, value: &Value, description: bool) -> String {
    let mut line = if param.converter().is_untyped() {
        format!("{} = {}", param.name(), value)
    } else {
        format!("{}: {} = {}", param.name(), param.type_name(), value)
    };
    if description {
        line.push_str(&format!(" ({})", param.description()));
    }
    line
}

/// List the parameters of `class`, one per line
///
/// Values come from `values` when given; parameters missing there, and all
/// parameters when `values` is `None`, show their default.
pub fn parameter_summary(
    class: &ParameterizedClass,
    options: SummaryOptions,
    values: Option<&IndexMap<String, Value>>,
) -> Result<String, ParameterError> {
    let resolve = ResolveOptions::default()
        .include_deprecated(options.show_deprecated)
        .sort(options.sort);

    let mut out = String::new();
    for param in class.get_parameters(resolve)?.values() {
        if !options.show_hidden && param.is_hidden() {
            continue;
        }
        let value = values
            .and_then(|v| v.get(param.name()))
            .unwrap_or_else(|| param.default_value());
        out.push_str(&format_line(param, value, options.description));
        out.push('\n');
    }
    Ok(out)
}

impl ParameterizedClass {
    /// Summarize the default parameters of this class
    ///
    /// # Examples
    ///
    /// ```
    /// use classparams_rs::parameters::{Converter, Parameter, ParameterizedClass, SummaryOptions};
    ///
    /// let class = ParameterizedClass::builder("DocSummary")
    ///     .parameter(Parameter::new("size", 10, Converter::int()).with_description("Grid size"))
    ///     .parameter(Parameter::untyped("tag", "a"))
    ///     .build_unregistered();
    /// let text = class.parameter_summary(SummaryOptions::default().description(true)).unwrap();
    /// assert_eq!(text, "size: int = 10 (Grid size)\ntag = \"a\" ()\n");
    /// ```
    pub fn parameter_summary(&self, options: SummaryOptions) -> Result<String, ParameterError> {
        parameter_summary(self, options, None)
    }

    /// Print the default parameters of this class to standard output
    pub fn show_parameters(&self, options: SummaryOptions) -> Result<(), ParameterError> {
        print!("{}", self.parameter_summary(options)?);
        Ok(())
    }
}
