//! Ordered strategy registry
//!
//! Provides [`MatcherRegistry`] for offering a comparison to each prefix
//! strategy in turn.

use modernize_syntax::{NodeId, SyntaxTree};
use tracing::trace;

use crate::match_and_refactor::{
    identity_comparison, StrStartWithMatchAndRefactor, StrncmpMatchAndRefactor, SubstrMatchAndRefactor,
};

/// Ordered list of prefix strategies
///
/// The first strategy that matches owns the node: if its refactor declines,
/// no other strategy is tried.
#[derive(Debug, Default)]
pub struct MatcherRegistry {
    strategies: Vec<Box<dyn StrStartWithMatchAndRefactor>>,
}

impl MatcherRegistry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Create registry with the built-in strategies, `strncmp` first
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(StrncmpMatchAndRefactor::new());
        registry.register(SubstrMatchAndRefactor::new());
        registry
    }

    /// Append a strategy; it is tried after every registered one
    pub fn register<S: StrStartWithMatchAndRefactor + 'static>(&mut self, strategy: S) {
        self.strategies.push(Box::new(strategy));
    }

    /// Strategy names in trial order
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Get number of registered strategies
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Build the replacement for `node`, if some strategy rewrites it
    ///
    /// Only `===`/`!==` comparisons are considered. The tree gains new
    /// nodes but `node` itself is left in place.
    pub fn try_match_and_refactor(&self, tree: &mut SyntaxTree, node: NodeId) -> Option<NodeId> {
        identity_comparison(tree, node)?;

        for strategy in &self.strategies {
            let Some(descriptor) = strategy.match_str_starts_with(tree, node) else {
                continue;
            };
            trace!(strategy = strategy.name(), %node, "matched");
            return strategy.refactor_str_starts_with(tree, &descriptor);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_object::StrStartsWith;
    use modernize_test_utils::{first_identity_comparison, parse_php};

    /// Claims every comparison and never rewrites
    #[derive(Debug)]
    struct Greedy;

    impl StrStartWithMatchAndRefactor for Greedy {
        fn name(&self) -> &'static str {
            "greedy"
        }

        fn match_str_starts_with(&self, _tree: &SyntaxTree, binary_op: NodeId) -> Option<StrStartsWith> {
            Some(StrStartsWith::new(binary_op, binary_op, binary_op, true))
        }

        fn refactor_str_starts_with(&self, _tree: &mut SyntaxTree, _descriptor: &StrStartsWith) -> Option<NodeId> {
            None
        }
    }

    #[test]
    fn defaults_are_ordered() {
        let registry = MatcherRegistry::with_defaults();
        assert_eq!(registry.names(), vec!["strncmp", "substr"]);
        assert_eq!(registry.len(), 2);
        assert!(MatcherRegistry::new().is_empty());
    }

    #[test]
    fn first_match_owns_the_node() {
        let mut tree = parse_php("<?php strncmp($s, 'ab', 2) === 0;");
        let comparison = first_identity_comparison(&tree);

        let mut registry = MatcherRegistry::new();
        registry.register(Greedy);
        registry.register(StrncmpMatchAndRefactor::new());
        assert_eq!(registry.try_match_and_refactor(&mut tree, comparison), None);

        let replacement = MatcherRegistry::with_defaults()
            .try_match_and_refactor(&mut tree, comparison)
            .unwrap();
        assert_eq!(tree.print_node(replacement), "str_starts_with($s, 'ab')");
    }

    #[test]
    fn only_identity_comparisons_are_offered() {
        let mut tree = parse_php("<?php strncmp($s, 'ab', 2) == 0;");
        let mut registry = MatcherRegistry::new();
        registry.register(Greedy);
        for node in tree.descendants(tree.root()) {
            assert_eq!(registry.try_match_and_refactor(&mut tree, node), None);
        }
    }
}
