//! Testing utilities for modernize workspace
//!
//! Shared test helpers, fixtures, and assertions.

#![allow(missing_docs)]
#![allow(clippy::missing_panics_doc)]

use modernize_syntax::{parse, BinaryOperator, NodeId, NodeKind, SyntaxTree};
use modernize_types::{ClassReflection, InMemoryReflectionProvider, MethodReflection, ParameterReflection};

pub const USER_CLASS: &str = "App\\Entity\\User";
pub const POST_CLASS: &str = "App\\Entity\\Post";
pub const COMMENT_CLASS: &str = "App\\Entity\\Comment";

/// Runtime classes plus three entities:
/// `User` needs a constructor argument, `Post` has only optional ones and
/// `Comment` declares no constructor.
pub fn fixture_reflection() -> InMemoryReflectionProvider {
    InMemoryReflectionProvider::with_builtins()
        .with_class(
            ClassReflection::new(USER_CLASS)
                .with_method(
                    MethodReflection::new("__construct").with_parameter(ParameterReflection::required("name")),
                )
                .with_method(MethodReflection::new("getName")),
        )
        .with_class(
            ClassReflection::new(POST_CLASS)
                .with_method(
                    MethodReflection::new("__construct")
                        .with_parameter(ParameterReflection::optional("title", "''")),
                )
                .with_method(MethodReflection::new("publish")),
        )
        .with_class(ClassReflection::new(COMMENT_CLASS).with_method(MethodReflection::new("approve")))
}

pub fn parse_php(source: &str) -> SyntaxTree {
    parse(source).unwrap_or_else(|e| panic!("fixture does not parse: {e}\n{source}"))
}

/// First node in post-order whose kind satisfies `predicate`
pub fn find_first(tree: &SyntaxTree, predicate: impl Fn(&NodeKind) -> bool) -> NodeId {
    find_all(tree, predicate)
        .into_iter()
        .next()
        .unwrap_or_else(|| panic!("no matching node in:\n{}", tree.source()))
}

pub fn find_all(tree: &SyntaxTree, predicate: impl Fn(&NodeKind) -> bool) -> Vec<NodeId> {
    tree.descendants(tree.root())
        .into_iter()
        .filter(|id| predicate(tree.kind(*id)))
        .collect()
}

/// First `===` or `!==` comparison
pub fn first_identity_comparison(tree: &SyntaxTree) -> NodeId {
    find_first(tree, |kind| {
        matches!(
            kind,
            NodeKind::BinaryOp {
                op: BinaryOperator::Identical | BinaryOperator::NotIdentical,
                ..
            }
        )
    })
}
