//! Parameterized classes and parameter resolution
//!
//! A [`ParameterizedClass`] owns the list of declarations made by one class
//! and links to its parent. The parameters a class supports are obtained by
//! merging the declaration lists of the whole ancestor chain, from the root
//! down to the class itself, so that declarations of more specific classes
//! take precedence.

use crate::parameters::parameter::{parameters_from_defaults, Declaration, HideParameter, Parameter, ParameterError};
use crate::parameters::registry;
use indexmap::IndexMap;
use serde_json::Value;
use std::sync::Arc;

/// Resolved parameters of a class, keyed by name
pub type ParameterMap = IndexMap<String, Parameter>;

/// Options controlling which parameters are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Keep hidden parameters, marking them as hidden instead of removing them
    pub include_hidden: bool,

    /// Include deprecated parameters
    pub include_deprecated: bool,

    /// Sort the result by parameter name instead of declaration order
    pub sort: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            include_hidden: false,
            include_deprecated: false,
            sort: true,
        }
    }
}

impl ResolveOptions {
    pub fn include_hidden(mut self, include_hidden: bool) -> Self {
        self.include_hidden = include_hidden;
        self
    }

    pub fn include_deprecated(mut self, include_deprecated: bool) -> Self {
        self.include_deprecated = include_deprecated;
        self
    }

    pub fn sort(mut self, sort: bool) -> Self {
        self.sort = sort;
        self
    }
}

/// A class declaring parameters
///
/// Classes are immutable once built. They are usually created once through a
/// [`ClassBuilder`], which also records them in the global registry.
#[derive(Debug)]
pub struct ParameterizedClass {
    name: String,
    parent: Option<Arc<ParameterizedClass>>,
    declarations: Vec<Declaration>,
}

impl ParameterizedClass {
    /// Start building a root class
    pub fn builder(name: &str) -> ClassBuilder {
        ClassBuilder::new(name)
    }

    /// Start building a class deriving from `self`
    pub fn subclass(self: &Arc<Self>, name: &str) -> ClassBuilder {
        ClassBuilder::new(name).parent(self)
    }

    /// Name of the class
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The direct parent class, if any
    pub fn parent(&self) -> Option<&Arc<ParameterizedClass>> {
        self.parent.as_ref()
    }

    /// The declarations made by this class itself
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// The ancestor chain, starting with this class and ending with the root
    pub fn ancestors(&self) -> Vec<&ParameterizedClass> {
        let mut chain = vec![self];
        let mut current = self.parent.as_deref();
        while let Some(class) = current {
            chain.push(class);
            current = class.parent.as_deref();
        }
        chain
    }

    /// Whether `other` is this class or one of its ancestors
    pub fn is_subclass_of(&self, other: &ParameterizedClass) -> bool {
        self.ancestors().into_iter().any(|c| std::ptr::eq(c, other))
    }

    /// Return the parameters this class supports
    ///
    /// The declaration lists of all ancestors are merged from the root down to
    /// this class. A later declaration of the same name replaces the earlier
    /// one but keeps its position. Deprecated parameters are only merged when
    /// requested. A hide directive removes the named parameter, or marks it
    /// hidden when hidden parameters are requested.
    ///
    /// # Returns
    ///
    /// The resolved parameters, or an error if a hide directive refers to a
    /// parameter that no ancestor declared
    ///
    /// # Examples
    ///
    /// ```
    /// use classparams_rs::parameters::{
    ///     Converter, HideParameter, Parameter, ParameterizedClass, ResolveOptions,
    /// };
    ///
    /// let base = ParameterizedClass::builder("DocBase")
    ///     .parameter(Parameter::new("size", 10, Converter::int()))
    ///     .parameter(Parameter::new("label", "x", Converter::string()))
    ///     .build_unregistered();
    /// let derived = base
    ///     .subclass("DocDerived")
    ///     .parameter(Parameter::new("size", 20, Converter::int()))
    ///     .hide("label")
    ///     .build_unregistered();
    ///
    /// let params = derived.get_parameters(ResolveOptions::default()).unwrap();
    /// assert_eq!(params.len(), 1);
    /// assert_eq!(params["size"].default_value(), &serde_json::json!(20));
    /// ```
    pub fn get_parameters(&self, options: ResolveOptions) -> Result<ParameterMap, ParameterError> {
        let mut parameters = ParameterMap::new();

        for class in self.ancestors().into_iter().rev() {
            for declaration in &class.declarations {
                match declaration {
                    Declaration::Hide(HideParameter { name }) => {
                        if options.include_hidden {
                            match parameters.get_mut(name) {
                                Some(param) => param.hidden = true,
                                None => return Err(ParameterError::ParameterNotFound { name: name.clone() }),
                            }
                        } else if parameters.shift_remove(name).is_none() {
                            return Err(ParameterError::ParameterNotFound { name: name.clone() });
                        }
                        tracing::trace!(class = %class.name, "hid parameter `{}`", name);
                    }
                    Declaration::Deprecated(param) => {
                        if options.include_deprecated {
                            parameters.insert(param.name.clone(), param.clone());
                        }
                    }
                    Declaration::Parameter(param) => {
                        parameters.insert(param.name.clone(), param.clone());
                    }
                }
            }
        }

        if options.sort {
            parameters.sort_keys();
        }
        Ok(parameters)
    }

    /// Return the default value of the parameter with `name`
    ///
    /// The ancestor chain is searched from this class towards the root and the
    /// first declaration with a matching name wins. Hide directives and
    /// deprecation are not taken into account.
    pub fn get_parameter_default(&self, name: &str) -> Result<Value, ParameterError> {
        self.ancestors()
            .into_iter()
            .flat_map(|class| class.declarations.iter())
            .filter_map(Declaration::parameter)
            .find(|param| param.name == name)
            .map(|param| param.default_value().clone())
            .ok_or_else(|| ParameterError::ParameterNotFound {
                name: name.to_string(),
            })
    }
}

/// Builder for [`ParameterizedClass`]
///
/// Both declaration styles, explicit declarations and plain defaults, end up
/// in the same declaration list.
#[derive(Debug)]
pub struct ClassBuilder {
    name: String,
    parent: Option<Arc<ParameterizedClass>>,
    declarations: Vec<Declaration>,
}

impl ClassBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            parent: None,
            declarations: Vec::new(),
        }
    }

    /// Set the parent class
    pub fn parent(mut self, parent: &Arc<ParameterizedClass>) -> Self {
        self.parent = Some(Arc::clone(parent));
        self
    }

    /// Add any declaration
    pub fn declare(mut self, declaration: impl Into<Declaration>) -> Self {
        self.declarations.push(declaration.into());
        self
    }

    /// Add several declarations
    pub fn declarations<I>(mut self, declarations: I) -> Self
    where
        I: IntoIterator<Item = Declaration>,
    {
        self.declarations.extend(declarations);
        self
    }

    /// Declare a parameter
    pub fn parameter(self, param: Parameter) -> Self {
        self.declare(Declaration::Parameter(param))
    }

    /// Declare a deprecated parameter
    pub fn deprecated(self, param: Parameter) -> Self {
        self.declare(Declaration::Deprecated(param))
    }

    /// Hide a parameter declared by an ancestor
    pub fn hide(self, name: &str) -> Self {
        self.declare(Declaration::Hide(HideParameter::new(name)))
    }

    /// Declare untyped parameters from a name to default mapping
    pub fn defaults<I, S>(self, defaults: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: AsRef<str>,
    {
        self.declarations(parameters_from_defaults(defaults))
    }

    /// Build the class without registering it
    pub fn build_unregistered(self) -> Arc<ParameterizedClass> {
        Arc::new(ParameterizedClass {
            name: self.name,
            parent: self.parent,
            declarations: self.declarations,
        })
    }

    /// Build the class and record it in the global registry
    ///
    /// A class registered earlier under the same name is replaced.
    pub fn build(self) -> Arc<ParameterizedClass> {
        let class = self.build_unregistered();
        registry::register_class(Arc::clone(&class))
    }
}
