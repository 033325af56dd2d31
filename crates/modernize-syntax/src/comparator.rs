//! Structural node equality

use std::mem::discriminant;

use crate::node::{NodeId, NodeKind};
use crate::tree::SyntaxTree;

/// Compares subtrees by structure
///
/// Spans, whitespace and redundant parentheses are ignored. Operand order,
/// operators, names and literal values are significant.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeComparator;

impl NodeComparator {
    /// Create comparator
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Whether `a` and `b` denote the same code
    #[must_use]
    pub fn are_nodes_equal(&self, tree: &SyntaxTree, a: NodeId, b: NodeId) -> bool {
        let a = skip_parentheses(tree, a);
        let b = skip_parentheses(tree, b);
        if a == b {
            return true;
        }

        if !same_head(tree.kind(a), tree.kind(b)) {
            return false;
        }

        let left = tree.children(a);
        let right = tree.children(b);
        left.len() == right.len()
            && left
                .into_iter()
                .zip(right)
                .all(|(x, y)| self.are_nodes_equal(tree, x, y))
    }
}

fn skip_parentheses(tree: &SyntaxTree, id: NodeId) -> NodeId {
    let mut current = tree.resolve(id);
    while let NodeKind::Parenthesized { inner } = tree.kind(current) {
        current = tree.resolve(*inner);
    }
    current
}

/// Compare everything except the children.
fn same_head(a: &NodeKind, b: &NodeKind) -> bool {
    match (a, b) {
        (NodeKind::BinaryOp { op: x, .. }, NodeKind::BinaryOp { op: y, .. }) => x == y,
        (NodeKind::UnaryOp { op: x, .. }, NodeKind::UnaryOp { op: y, .. }) => x == y,
        (
            NodeKind::Arg {
                name: n1,
                unpack: u1,
                ..
            },
            NodeKind::Arg {
                name: n2,
                unpack: u2,
                ..
            },
        ) => n1 == n2 && u1 == u2,
        (
            NodeKind::ArrayItem {
                key: k1,
                unpack: u1,
                ..
            },
            NodeKind::ArrayItem {
                key: k2,
                unpack: u2,
                ..
            },
        ) => k1.is_some() == k2.is_some() && u1 == u2,
        (
            NodeKind::FunctionLike {
                kind: x, name: n1, ..
            },
            NodeKind::FunctionLike {
                kind: y, name: n2, ..
            },
        ) => x == y && n1.is_some() == n2.is_some(),
        (NodeKind::Namespace { name: n1, .. }, NodeKind::Namespace { name: n2, .. })
        | (NodeKind::Class { name: n1, .. }, NodeKind::Class { name: n2, .. }) => {
            n1.is_some() == n2.is_some()
        }
        (NodeKind::Param { default: d1, .. }, NodeKind::Param { default: d2, .. }) => {
            d1.is_some() == d2.is_some()
        }
        (NodeKind::Name { value: x }, NodeKind::Name { value: y })
        | (NodeKind::String { value: x }, NodeKind::String { value: y }) => x == y,
        (NodeKind::Variable { name: x }, NodeKind::Variable { name: y }) => x == y,
        (NodeKind::Integer { value: x }, NodeKind::Integer { value: y }) => x == y,
        (NodeKind::Float { value: x }, NodeKind::Float { value: y }) => x.to_bits() == y.to_bits(),
        (NodeKind::Bool { value: x }, NodeKind::Bool { value: y }) => x == y,
        (
            NodeKind::Opaque {
                kind: k1, text: t1, ..
            },
            NodeKind::Opaque {
                kind: k2, text: t2, ..
            },
        ) => k1 == k2 && t1 == t2,
        _ => discriminant(a) == discriminant(b),
    }
}
