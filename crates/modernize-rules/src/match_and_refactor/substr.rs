//! `substr($haystack, 0, $length) === $needle`

use modernize_syntax::{NodeComparator, NodeId, NodeNameResolver, SyntaxTree, Value, ValueResolver};
use tracing::trace;

use super::{identity_comparison, is_needle_length, plain_call_args, StrStartWithMatchAndRefactor};
use crate::node_factory::StrStartsWithFuncCallFactory;
use crate::value_object::StrStartsWith;

const FUNCTION_NAME: &str = "substr";

/// Rewrites leading-`substr` equality checks
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstrMatchAndRefactor {
    names: NodeNameResolver,
    values: ValueResolver,
    comparator: NodeComparator,
    factory: StrStartsWithFuncCallFactory,
}

impl SubstrMatchAndRefactor {
    /// Create strategy
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StrStartWithMatchAndRefactor for SubstrMatchAndRefactor {
    fn name(&self) -> &'static str {
        FUNCTION_NAME
    }

    fn match_str_starts_with(&self, tree: &SyntaxTree, binary_op: NodeId) -> Option<StrStartsWith> {
        let (left, right, is_positive) = identity_comparison(tree, binary_op)?;
        let (call, args, needle) = [(left, right), (right, left)]
            .into_iter()
            .find_map(|(call, other)| {
                plain_call_args(tree, &self.names, call, FUNCTION_NAME).map(|args| (call, args, other))
            })?;

        let [haystack, _start, ..] = args[..] else {
            return None;
        };
        Some(StrStartsWith::new(call, haystack, needle, is_positive))
    }

    fn refactor_str_starts_with(&self, tree: &mut SyntaxTree, descriptor: &StrStartsWith) -> Option<NodeId> {
        let args = plain_call_args(tree, &self.names, descriptor.func_call(), FUNCTION_NAME)?;

        let start = *args.get(1)?;
        if !self.values.is_value(tree, start, &Value::Int(0)) {
            trace!(call = %descriptor.func_call(), "substr does not start at 0");
            return None;
        }

        let length = *args.get(2)?;
        if !is_needle_length(tree, &self.names, &self.comparator, length, descriptor.needle_expr()) {
            trace!(call = %descriptor.func_call(), "substr length does not cover needle");
            return None;
        }

        Some(self.factory.create_str_starts_with(tree, descriptor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modernize_test_utils::{first_identity_comparison, parse_php};
    use pretty_assertions::assert_eq;

    fn rewrite(source: &str) -> Option<String> {
        let mut tree = parse_php(source);
        let comparison = first_identity_comparison(&tree);
        let strategy = SubstrMatchAndRefactor::new();
        let descriptor = strategy.match_str_starts_with(&tree, comparison)?;
        let replacement = strategy.refactor_str_starts_with(&mut tree, &descriptor)?;
        Some(tree.print_node(replacement))
    }

    #[test]
    fn strlen_of_needle() {
        assert_eq!(
            rewrite("<?php substr($str, 0, strlen($needle)) === $needle;").as_deref(),
            Some("str_starts_with($str, $needle)")
        );
        assert_eq!(
            rewrite("<?php $prefix !== substr($path, 0, strlen($prefix));").as_deref(),
            Some("!str_starts_with($path, $prefix)")
        );
    }

    #[test]
    fn literal_needle() {
        assert_eq!(
            rewrite("<?php substr($str, 0, 4) === 'http';").as_deref(),
            Some("str_starts_with($str, 'http')")
        );
        assert_eq!(rewrite("<?php substr($str, 0, 3) === 'http';"), None);
    }

    #[test]
    fn escaped_needle_is_measured_in_bytes() {
        assert_eq!(rewrite(r#"<?php substr($s, 0, 2) === "\xff";"#), None);
        assert_eq!(rewrite(r#"<?php substr($s, 0, 1) === "\377";"#), None);
        assert_eq!(
            rewrite(r#"<?php substr($s, 0, 2) === "\101\102";"#).as_deref(),
            Some(r#"str_starts_with($s, "\101\102")"#)
        );
        assert_eq!(
            rewrite(r#"<?php substr($s, 0, 2) === "\u{e9}";"#).as_deref(),
            Some(r#"str_starts_with($s, "\u{e9}")"#)
        );
        assert_eq!(rewrite(r#"<?php substr($s, 0, 6) === "\u{e9}";"#), None);
    }

    #[test]
    fn parenthesized_operands() {
        assert_eq!(
            rewrite("<?php (substr($s, 0, strlen($n))) === $n;").as_deref(),
            Some("str_starts_with($s, $n)")
        );
        assert_eq!(
            rewrite("<?php ($n) !== substr($s, (0), strlen(($n)));").as_deref(),
            Some("!str_starts_with($s, $n)")
        );
    }

    #[test]
    fn offset_must_be_zero() {
        assert_eq!(rewrite("<?php substr($str, 1, strlen($needle)) === $needle;"), None);
    }

    #[test]
    fn length_is_required() {
        assert_eq!(rewrite("<?php substr($str, 0) === $needle;"), None);
    }

    #[test]
    fn too_few_arguments_do_not_match() {
        let tree = parse_php("<?php substr($str) === $needle;");
        let comparison = first_identity_comparison(&tree);
        assert_eq!(SubstrMatchAndRefactor::new().match_str_starts_with(&tree, comparison), None);
    }
}
