//! "String starts with" idiom strategies
//!
//! Each strategy recognises one legacy spelling in a `===`/`!==` comparison
//! and, if the remaining arguments prove the prefix semantics, builds the
//! `str_starts_with` replacement.

mod strncmp;
mod substr;

use std::fmt::Debug;

use modernize_syntax::{
    BinaryOperator, NodeComparator, NodeId, NodeKind, NodeNameResolver, SyntaxTree,
};

use crate::value_object::StrStartsWith;

pub use strncmp::StrncmpMatchAndRefactor;
pub use substr::SubstrMatchAndRefactor;

/// Match-and-refactor strategy for one legacy prefix idiom
pub trait StrStartWithMatchAndRefactor: Send + Sync + Debug {
    /// Short identifier, e.g. `"strncmp"`
    fn name(&self) -> &'static str;

    /// Recognise the idiom in an identity comparison
    ///
    /// Returns `None` for anything that is not this strategy's shape,
    /// including non-comparison nodes.
    fn match_str_starts_with(&self, tree: &SyntaxTree, binary_op: NodeId) -> Option<StrStartsWith>;

    /// Build the replacement node, or `None` if the call does not prove
    /// prefix semantics
    ///
    /// Only allocates; the caller decides whether to splice the result in.
    fn refactor_str_starts_with(&self, tree: &mut SyntaxTree, descriptor: &StrStartsWith) -> Option<NodeId>;
}

/// Operands of `left === right` / `left !== right` and the polarity
pub(crate) fn identity_comparison(tree: &SyntaxTree, binary_op: NodeId) -> Option<(NodeId, NodeId, bool)> {
    let NodeKind::BinaryOp { op, left, right } = tree.kind(binary_op) else {
        return None;
    };
    let (left, right) = (skip_parentheses(tree, *left), skip_parentheses(tree, *right));
    match op {
        BinaryOperator::Identical => Some((left, right, true)),
        BinaryOperator::NotIdentical => Some((left, right, false)),
        _ => None,
    }
}

/// Current node behind any number of `( ... )` wrappers
fn skip_parentheses(tree: &SyntaxTree, id: NodeId) -> NodeId {
    let mut current = tree.resolve(id);
    while let NodeKind::Parenthesized { inner } = tree.kind(current) {
        current = tree.resolve(*inner);
    }
    current
}

/// Argument values of a call to `function`
///
/// `None` unless every argument is positional and not unpacked. Values are
/// returned without their parentheses.
pub(crate) fn plain_call_args(
    tree: &SyntaxTree,
    names: &NodeNameResolver,
    call: NodeId,
    function: &str,
) -> Option<Vec<NodeId>> {
    let call = skip_parentheses(tree, call);
    let NodeKind::FuncCall { args, .. } = tree.kind(call) else {
        return None;
    };
    if !names.is_name(tree, call, function) {
        return None;
    }

    args.iter()
        .map(|arg| match tree.kind(*arg) {
            NodeKind::Arg {
                name: None,
                value,
                unpack: false,
            } => Some(skip_parentheses(tree, *value)),
            _ => None,
        })
        .collect()
}

/// Whether `length` is `strlen(<needle>)` or, for a string literal needle,
/// the literal byte length
pub(crate) fn is_needle_length(
    tree: &SyntaxTree,
    names: &NodeNameResolver,
    comparator: &NodeComparator,
    length: NodeId,
    needle: NodeId,
) -> bool {
    if let Some(strlen_args) = plain_call_args(tree, names, length, "strlen") {
        return strlen_args
            .first()
            .is_some_and(|measured| comparator.are_nodes_equal(tree, *measured, needle));
    }

    match (tree.kind(needle), tree.kind(length)) {
        (NodeKind::String { value }, NodeKind::Integer { value: expected }) => {
            i64::try_from(value.len()).is_ok_and(|len| len == *expected)
        }
        _ => false,
    }
}
