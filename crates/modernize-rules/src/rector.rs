//! Tree rewriting rules

use std::fmt::Debug;

use modernize_syntax::SyntaxTree;
use tracing::debug;

use crate::registry::MatcherRegistry;

/// A rewrite rule applied to a whole tree
pub trait Rector: Send + Sync + Debug {
    /// Stable rule identifier, recorded in outcomes
    fn name(&self) -> &'static str;

    /// Rewrite every applicable node; returns the number of rewrites
    fn refactor(&self, tree: &mut SyntaxTree) -> usize;
}

/// Replaces prefix idioms with `str_starts_with`
#[derive(Debug)]
pub struct StrStartsWithRector {
    registry: MatcherRegistry,
}

impl StrStartsWithRector {
    /// Create rule over a custom registry
    #[inline]
    #[must_use]
    pub fn new(registry: MatcherRegistry) -> Self {
        Self { registry }
    }

    /// Registry in use
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &MatcherRegistry {
        &self.registry
    }
}

impl Default for StrStartsWithRector {
    fn default() -> Self {
        Self::new(MatcherRegistry::with_defaults())
    }
}

impl Rector for StrStartsWithRector {
    fn name(&self) -> &'static str {
        "StrStartsWithRector"
    }

    fn refactor(&self, tree: &mut SyntaxTree) -> usize {
        let mut rewrites = 0;
        // children before parents, so nested idioms are rewritten first
        for node in tree.descendants(tree.root()) {
            if tree.is_replaced(node) {
                continue;
            }
            if let Some(replacement) = self.registry.try_match_and_refactor(tree, node) {
                tree.replace(node, replacement);
                rewrites += 1;
            }
        }

        if rewrites > 0 {
            debug!(rule = self.name(), rewrites, "tree rewritten");
        }
        rewrites
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modernize_test_utils::parse_php;
    use pretty_assertions::assert_eq;

    fn run(source: &str) -> (String, usize) {
        let mut tree = parse_php(source);
        let rewrites = StrStartsWithRector::default().refactor(&mut tree);
        (tree.print(), rewrites)
    }

    #[test]
    fn rewrites_every_occurrence() {
        let (printed, rewrites) = run(
            "<?php\nif (strncmp($a, 'x', 1) === 0 && substr($b, 0, strlen($p)) !== $p) {\n    echo 1;\n}\n",
        );
        assert_eq!(rewrites, 2);
        assert_eq!(
            printed,
            "<?php\nif (str_starts_with($a, 'x') && !str_starts_with($b, $p)) {\n    echo 1;\n}\n"
        );
    }

    #[test]
    fn untouched_source_is_verbatim() {
        let source = "<?php\n// nothing here\n$x  =  strncmp($a, 'x', 5) === 0;\n";
        let (printed, rewrites) = run(source);
        assert_eq!(rewrites, 0);
        assert_eq!(printed, source);
    }

    #[test]
    fn rewrites_inside_methods() {
        let (printed, rewrites) = run(
            "<?php\nclass Router\n{\n    public function matches(string $uri): bool\n    {\n        return strncmp($uri, '/api', 4) === 0;\n    }\n}\n",
        );
        assert_eq!(rewrites, 1);
        assert!(printed.contains("return str_starts_with($uri, '/api');"));
        assert!(printed.contains("public function matches(string $uri): bool"));
    }
}
