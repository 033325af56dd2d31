//! `strncmp($haystack, $needle, $length) === 0`

use modernize_syntax::{NodeComparator, NodeId, NodeNameResolver, SyntaxTree, Value, ValueResolver};
use tracing::trace;

use super::{identity_comparison, is_needle_length, plain_call_args, StrStartWithMatchAndRefactor};
use crate::node_factory::StrStartsWithFuncCallFactory;
use crate::value_object::StrStartsWith;

const FUNCTION_NAME: &str = "strncmp";

/// Rewrites length-bounded `strncmp` comparisons against zero
#[derive(Debug, Clone, Copy, Default)]
pub struct StrncmpMatchAndRefactor {
    names: NodeNameResolver,
    values: ValueResolver,
    comparator: NodeComparator,
    factory: StrStartsWithFuncCallFactory,
}

impl StrncmpMatchAndRefactor {
    /// Create strategy
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StrStartWithMatchAndRefactor for StrncmpMatchAndRefactor {
    fn name(&self) -> &'static str {
        FUNCTION_NAME
    }

    fn match_str_starts_with(&self, tree: &SyntaxTree, binary_op: NodeId) -> Option<StrStartsWith> {
        let (left, right, is_positive) = identity_comparison(tree, binary_op)?;
        let (call, args, other) = [(left, right), (right, left)]
            .into_iter()
            .find_map(|(call, other)| {
                plain_call_args(tree, &self.names, call, FUNCTION_NAME).map(|args| (call, args, other))
            })?;

        if !self.values.is_value(tree, other, &Value::Int(0)) {
            trace!(node = %binary_op, "strncmp not compared with 0");
            return None;
        }

        let [haystack, needle, ..] = args[..] else {
            return None;
        };
        Some(StrStartsWith::new(call, haystack, needle, is_positive))
    }

    fn refactor_str_starts_with(&self, tree: &mut SyntaxTree, descriptor: &StrStartsWith) -> Option<NodeId> {
        let args = plain_call_args(tree, &self.names, descriptor.func_call(), FUNCTION_NAME)?;
        let length = *args.get(2)?;

        if !is_needle_length(tree, &self.names, &self.comparator, length, descriptor.needle_expr()) {
            trace!(call = %descriptor.func_call(), "strncmp length does not cover needle");
            return None;
        }

        Some(self.factory.create_str_starts_with(tree, descriptor))
    }
}
