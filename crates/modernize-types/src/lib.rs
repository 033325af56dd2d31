//! Modernize Types
//!
//! Statically inferred types and their canonicalisation.
//!
//! # Core Concepts
//!
//! - [`Type`]: closed subset of the PHP type lattice
//! - [`TypeTraverser`]: callback-driven recursive mapping
//! - [`ReflectionProvider`]: class existence and member oracle
//! - [`DetailedTypeAnalyzer`]: threshold for "too precise to keep"
//! - [`GenericClassStringTypeNormalizer`]: collapses class-name literals
//!
//! # Example
//!
//! ```rust,ignore
//! use modernize_types::{GenericClassStringTypeNormalizer, InMemoryReflectionProvider, Type};
//!
//! let normalizer = GenericClassStringTypeNormalizer::new(InMemoryReflectionProvider::with_builtins());
//! let ty = normalizer.normalize(Type::constant_string("stdClass"));
//! assert_eq!(ty.to_string(), "class-string<stdClass>");
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

mod detailed;
mod normalizer;
mod reflection;
mod traverser;
mod types;

pub use detailed::{DetailedTypeAnalyzer, TooDetailed};
pub use normalizer::GenericClassStringTypeNormalizer;
pub use reflection::{
    ClassReflection, InMemoryReflectionProvider, MethodReflection, ParameterReflection,
    ReflectionProvider,
};
pub use traverser::TypeTraverser;
pub use types::{ObjectType, Type};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
