//! Modernize Rules
//!
//! Idiom recognition and rewriting on top of the syntax tree.
//!
//! # Core Concepts
//!
//! - [`StrStartWithMatchAndRefactor`]: one legacy prefix idiom (`strncmp`, `substr`)
//! - [`MatcherRegistry`]: ordered strategies, first match wins
//! - [`StrStartsWithFuncCallFactory`]: builds the `str_starts_with` replacement
//! - [`StrStartsWithRector`]: applies the registry to a whole tree
//! - [`NodeTypeResolver`]: normalised expression types
//! - [`ArrayCallableMethodMatcher`]: `[$object, 'method']` recognition
//! - [`ClassCollector`]: reflection harvested from parsed sources
//!
//! # Example
//!
//! ```rust,ignore
//! use modernize_rules::{Rector, StrStartsWithRector};
//!
//! let mut tree = modernize_syntax::parse("<?php strncmp($s, 'ab', 2) === 0;")?;
//! let rewrites = StrStartsWithRector::default().refactor(&mut tree);
//! assert_eq!(tree.print(), "<?php str_starts_with($s, 'ab');");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod array_callable;
mod class_collector;
mod match_and_refactor;
mod node_factory;
mod node_type_resolver;
mod rector;
mod registry;
mod value_object;

// Re-exports
pub use array_callable::ArrayCallableMethodMatcher;
pub use class_collector::ClassCollector;
pub use match_and_refactor::{StrStartWithMatchAndRefactor, StrncmpMatchAndRefactor, SubstrMatchAndRefactor};
pub use node_factory::{StrStartsWithFuncCallFactory, STR_STARTS_WITH};
pub use node_type_resolver::NodeTypeResolver;
pub use rector::{Rector, StrStartsWithRector};
pub use registry::MatcherRegistry;
pub use value_object::{ArrayCallable, ArrayCallableMatch, StrStartsWith};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
