//! Modernize Syntax
//!
//! PHP syntax trees for source-to-source rewriting.
//!
//! # Core Concepts
//!
//! - [`parse`]: tree-sitter-php ingestion into an arena [`SyntaxTree`]
//! - [`NodeKind`]: typed view of the constructs rewrites care about
//! - [`AttributeKey`]: typed per-node metadata (parent, scope, class, ...)
//! - [`SyntaxTree::print`]: format-preserving printing after rewrites
//! - [`NodeComparator`], [`NodeNameResolver`], [`ValueResolver`]: read-only
//!   queries used by matchers
//!
//! # Example
//!
//! ```rust,ignore
//! use modernize_syntax::{parse, NodeKind};
//!
//! let mut tree = parse("<?php $a === 'x';")?;
//! let null = tree.alloc(NodeKind::Null);
//! tree.replace(comparison, null);
//! assert_eq!(tree.print(), "<?php null;");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod attributes;
mod comparator;
mod decorator;
mod error;
mod name_resolver;
mod node;
mod parser;
mod printer;
mod tree;
mod value_resolver;

pub use attributes::{AttributeKey, AttributeValue, Attributes};
pub use comparator::NodeComparator;
pub use error::{ParseError, ParseResult};
pub use name_resolver::NodeNameResolver;
pub use node::{BinaryOperator, FunctionKind, Node, NodeId, NodeKind, Span, UnaryOperator};
pub use parser::parse;
pub use tree::SyntaxTree;
pub use value_resolver::{Value, ValueResolver};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
