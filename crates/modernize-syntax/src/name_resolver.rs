//! Name lookup on nodes

use crate::node::{NodeId, NodeKind};
use crate::tree::SyntaxTree;

/// Answers "is this node named X"
///
/// Function, class and constant names compare case-insensitively with any
/// leading `\` dropped. Variable names compare exactly.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeNameResolver;

impl NodeNameResolver {
    /// Create resolver
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Name carried by a node, if it has one
    #[must_use]
    pub fn get_name(&self, tree: &SyntaxTree, id: NodeId) -> Option<String> {
        match tree.kind(id) {
            NodeKind::Name { value } => Some(value.trim_start_matches('\\').to_string()),
            NodeKind::Variable { name } => Some(name.clone()),
            NodeKind::FuncCall { name, .. } => self.get_name_of_name(tree, *name),
            NodeKind::New { class, .. } => self.get_name_of_name(tree, *class),
            NodeKind::FunctionLike { name, .. }
            | NodeKind::Class { name, .. }
            | NodeKind::Namespace { name, .. } => {
                name.and_then(|n| self.get_name_of_name(tree, n))
            }
            NodeKind::Param { name, .. } => self.get_name(tree, *name),
            _ => None,
        }
    }

    fn get_name_of_name(&self, tree: &SyntaxTree, id: NodeId) -> Option<String> {
        match tree.kind(id) {
            NodeKind::Name { .. } => self.get_name(tree, id),
            _ => None,
        }
    }

    /// Whether the node is named `name`
    #[must_use]
    pub fn is_name(&self, tree: &SyntaxTree, id: NodeId, name: &str) -> bool {
        let Some(actual) = self.get_name(tree, id) else {
            return false;
        };
        let is_variable = match tree.kind(id) {
            NodeKind::Variable { .. } => true,
            NodeKind::Param { name, .. } => matches!(tree.kind(*name), NodeKind::Variable { .. }),
            _ => false,
        };
        if is_variable {
            actual == name.trim_start_matches('$')
        } else {
            actual.eq_ignore_ascii_case(name.trim_start_matches('\\'))
        }
    }

    /// Whether the node is named any of `names`
    #[must_use]
    pub fn is_names(&self, tree: &SyntaxTree, id: NodeId, names: &[&str]) -> bool {
        names.iter().any(|name| self.is_name(tree, id, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn calls(tree: &SyntaxTree) -> Vec<NodeId> {
        tree.descendants(tree.root())
            .into_iter()
            .filter(|id| matches!(tree.kind(*id), NodeKind::FuncCall { .. }))
            .collect()
    }

    #[test]
    fn function_names_ignore_case_and_leading_backslash() {
        let tree = parse("<?php \\STRNCMP($a, $b, 1); substr($a, 0);").unwrap();
        let resolver = NodeNameResolver::new();
        let found = calls(&tree);

        assert!(resolver.is_name(&tree, found[0], "strncmp"));
        assert!(resolver.is_name(&tree, found[0], "\\strncmp"));
        assert!(!resolver.is_name(&tree, found[0], "substr"));
        assert!(resolver.is_names(&tree, found[1], &["strncmp", "substr"]));
    }

    #[test]
    fn dynamic_calls_have_no_name() {
        let tree = parse("<?php $fn($a);").unwrap();
        let resolver = NodeNameResolver::new();
        let found = calls(&tree);
        assert_eq!(resolver.get_name(&tree, found[0]), None);
        assert!(!resolver.is_name(&tree, found[0], "fn"));
    }

    #[test]
    fn variables_are_case_sensitive() {
        let tree = parse("<?php $Needle;").unwrap();
        let resolver = NodeNameResolver::new();
        let variable = tree
            .descendants(tree.root())
            .into_iter()
            .find(|id| matches!(tree.kind(*id), NodeKind::Variable { .. }))
            .unwrap();
        assert!(resolver.is_name(&tree, variable, "$Needle"));
        assert!(!resolver.is_name(&tree, variable, "needle"));
    }
}
