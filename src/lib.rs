//! # classparams-rs
//!
//! `classparams-rs` manages declarative parameters for class hierarchies.
//!
//! The library provides:
//! - Named, typed and defaulted parameter declarations
//! - Merging of declarations along an inheritance chain, with hiding and deprecation
//! - Validated, type-converted binding of per-instance overrides
//! - A global registry of classes for later lookup and introspection
//!
//! ## Basic Usage
//!
//! ```
//! use classparams_rs::parameters::{Converter, Parameter, ParameterizedClass, ResolveOptions};
//!
//! let class = ParameterizedClass::builder("Basic")
//!     .parameter(Parameter::new("steps", 100, Converter::int()).with_description("Iterations"))
//!     .build();
//!
//! let params = class.get_parameters(ResolveOptions::default()).unwrap();
//! assert_eq!(params["steps"].description(), "Iterations");
//! ```

// Public modules
pub mod error;

// Parameter system
pub mod parameters;

// Re-exports for convenience
pub use error::{ClassParamsError, Result};
pub use parameters::{Parameter, ParameterizedClass, Parameterized, ParameterValues};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
