//! Registry of parameterized classes
//!
//! Provides a global table of every class built through
//! [`ClassBuilder::build`](crate::parameters::ClassBuilder::build), so classes
//! can be looked up by name and their parameters introspected later.

use crate::parameters::class::{ParameterizedClass, ResolveOptions};
use crate::parameters::parameter::ParameterError;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::str::FromStr;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

/// What [`ClassRegistry::all_parameters`] reports for each class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParameterQuery {
    /// The set of parameter names
    #[default]
    Names,
    /// Parameter names mapped to default values
    Value,
    /// Parameter names mapped to descriptions
    Description,
}

impl FromStr for ParameterQuery {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "names" => Ok(ParameterQuery::Names),
            "value" => Ok(ParameterQuery::Value),
            "description" => Ok(ParameterQuery::Description),
            other => Err(ParameterError::BadQueryMode(other.to_string())),
        }
    }
}

/// Result of a parameter query for a single class
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ClassParameters {
    Names(BTreeSet<String>),
    Values(IndexMap<String, Value>),
    Descriptions(IndexMap<String, String>),
}

/// Registry of parameterized classes keyed by class name
#[derive(Debug, Default)]
pub struct ClassRegistry {
    classes: HashMap<String, Arc<ParameterizedClass>>,
}

impl ClassRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            classes: HashMap::new(),
        }
    }

    /// Get the global registry (lazy initialized).
    pub fn global() -> &'static RwLock<ClassRegistry> {
        static REGISTRY: OnceLock<RwLock<ClassRegistry>> = OnceLock::new();
        REGISTRY.get_or_init(|| RwLock::new(ClassRegistry::new()))
    }

    /// Register a class and return it for sharing.
    ///
    /// A class registered earlier under the same name is replaced.
    pub fn register(&mut self, class: Arc<ParameterizedClass>) -> Arc<ParameterizedClass> {
        let name = class.name().to_string();
        if self.classes.insert(name.clone(), Arc::clone(&class)).is_some() {
            tracing::debug!("Replaced registered class `{}`", name);
        } else {
            tracing::debug!("Registered class `{}`", name);
        }
        class
    }

    /// Get a class by name.
    pub fn get(&self, name: &str) -> Option<Arc<ParameterizedClass>> {
        self.classes.get(name).cloned()
    }

    /// Check if a class is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// All registered class names, sorted.
    pub fn class_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.classes.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Collect the parameters of every registered class
    ///
    /// Parameters are resolved with the default options, so hidden and
    /// deprecated parameters are left out.
    pub fn all_parameters(
        &self,
        query: ParameterQuery,
    ) -> Result<BTreeMap<String, ClassParameters>, ParameterError> {
        let mut result = BTreeMap::new();
        for (name, class) in &self.classes {
            let params = class.get_parameters(ResolveOptions::default())?;
            let entry = match query {
                ParameterQuery::Names => ClassParameters::Names(params.keys().cloned().collect()),
                ParameterQuery::Value => ClassParameters::Values(
                    params
                        .iter()
                        .map(|(k, p)| (k.clone(), p.default_value().clone()))
                        .collect(),
                ),
                ParameterQuery::Description => ClassParameters::Descriptions(
                    params
                        .iter()
                        .map(|(k, p)| (k.clone(), p.description().to_string()))
                        .collect(),
                ),
            };
            result.insert(name.clone(), entry);
        }
        Ok(result)
    }
}

// Convenience functions for working with the global registry

/// Register a class in the global registry.
pub fn register_class(class: Arc<ParameterizedClass>) -> Arc<ParameterizedClass> {
    ClassRegistry::global()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register(class)
}

/// Get a class from the global registry.
pub fn get_class(name: &str) -> Result<Arc<ParameterizedClass>, ParameterError> {
    ClassRegistry::global()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(name)
        .ok_or_else(|| ParameterError::UnknownClass(name.to_string()))
}

/// Names of all classes in the global registry, sorted.
pub fn registered_classes() -> Vec<String> {
    ClassRegistry::global()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .class_names()
}

/// Collect the parameters of every class in the global registry.
pub fn all_parameters(
    query: ParameterQuery,
) -> Result<BTreeMap<String, ClassParameters>, ParameterError> {
    ClassRegistry::global()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .all_parameters(query)
}
