//! Replacement node construction

use modernize_syntax::{NodeId, NodeKind, SyntaxTree, UnaryOperator};

use crate::value_object::StrStartsWith;

/// Name of the function every prefix idiom is rewritten to
pub const STR_STARTS_WITH: &str = "str_starts_with";

/// Builds `str_starts_with(...)` calls
#[derive(Debug, Clone, Copy, Default)]
pub struct StrStartsWithFuncCallFactory;

impl StrStartsWithFuncCallFactory {
    /// Create factory
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Allocate `str_starts_with(haystack, needle)`, negated unless the
    /// descriptor is positive
    ///
    /// Haystack and needle are the existing nodes, so their text survives
    /// printing unchanged.
    pub fn create_str_starts_with(&self, tree: &mut SyntaxTree, descriptor: &StrStartsWith) -> NodeId {
        let name = tree.alloc(NodeKind::Name {
            value: STR_STARTS_WITH.to_string(),
        });
        let args = [descriptor.haystack_expr(), descriptor.needle_expr()]
            .into_iter()
            .map(|value| {
                tree.alloc(NodeKind::Arg {
                    name: None,
                    value,
                    unpack: false,
                })
            })
            .collect();
        let call = tree.alloc(NodeKind::FuncCall { name, args });

        if descriptor.is_positive() {
            call
        } else {
            tree.alloc(NodeKind::UnaryOp {
                op: UnaryOperator::Not,
                operand: call,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modernize_test_utils::{find_first, parse_php};

    #[test]
    fn builds_call_reusing_operands() {
        let mut tree = parse_php("<?php $ok = foo($text, 'pre');");
        let call = find_first(&tree, |kind| matches!(kind, NodeKind::FuncCall { .. }));
        let values: Vec<_> = tree
            .children(call)
            .into_iter()
            .skip(1)
            .map(|arg| tree.children(arg)[0])
            .collect();

        let factory = StrStartsWithFuncCallFactory::new();
        let positive = factory.create_str_starts_with(&mut tree, &StrStartsWith::new(call, values[0], values[1], true));
        let negative = factory.create_str_starts_with(&mut tree, &StrStartsWith::new(call, values[0], values[1], false));

        assert_eq!(tree.print_node(positive), "str_starts_with($text, 'pre')");
        assert_eq!(tree.print_node(negative), "!str_starts_with($text, 'pre')");
        // allocation alone does not touch the source
        assert!(!tree.has_changes());
    }
}
