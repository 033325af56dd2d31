//! Format-preserving printer
//!
//! Parsed nodes print as their original source text with rewritten children
//! spliced in. Synthetic nodes are pretty-printed. Parsed nodes reused inside
//! a synthetic node keep their original text.

use crate::node::{Node, NodeId, NodeKind, Span, UnaryOperator};
use crate::tree::SyntaxTree;

impl SyntaxTree {
    /// Print the whole file
    #[must_use]
    pub fn print(&self) -> String {
        if !self.has_changes() {
            return self.source().to_string();
        }

        let root = self.raw(self.root());
        let mut out = String::with_capacity(self.source().len());
        match root.span {
            Some(span) if self.resolve(self.root()) == self.root() => {
                out.push_str(self.slice(0, span.start));
                self.write_spliced(root, span, &mut out);
                out.push_str(self.slice(span.end, self.source().len()));
            }
            _ => self.write_node(self.root(), &mut out),
        }
        out
    }

    /// Print a single node
    #[must_use]
    pub fn print_node(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    fn slice(&self, start: usize, end: usize) -> &str {
        self.source().get(start..end).unwrap_or("")
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let id = self.resolve(id);
        let node = self.raw(id);
        match node.span {
            Some(span) => self.write_spliced(node, span, out),
            None => self.write_synthetic(&node.kind, out),
        }
    }

    fn write_spliced(&self, node: &Node, span: Span, out: &mut String) {
        if !self.has_changes() {
            out.push_str(self.slice(span.start, span.end));
            return;
        }

        let mut children: Vec<(Span, NodeId)> = node
            .kind
            .children()
            .into_iter()
            .filter_map(|child| self.raw(child).span.map(|s| (s, child)))
            .collect();
        children.sort_by_key(|(s, _)| s.start);

        let mut cursor = span.start;
        for (child_span, child) in children {
            if child_span.start < cursor || child_span.end > span.end {
                continue;
            }
            out.push_str(self.slice(cursor, child_span.start));
            self.write_node(child, out);
            cursor = child_span.end;
        }
        out.push_str(self.slice(cursor, span.end));
    }

    fn write_list(&self, items: &[NodeId], separator: &str, out: &mut String) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                out.push_str(separator);
            }
            self.write_node(*item, out);
        }
    }

    #[allow(clippy::too_many_lines)]
    fn write_synthetic(&self, kind: &NodeKind, out: &mut String) {
        match kind {
            NodeKind::Program { statements } => self.write_list(statements, "\n", out),
            NodeKind::Namespace { name, body } => {
                out.push_str("namespace");
                if let Some(name) = name {
                    out.push(' ');
                    self.write_node(*name, out);
                }
                out.push_str(" {\n");
                self.write_list(body, "\n", out);
                out.push_str("\n}");
            }
            NodeKind::Class { name, members } => {
                out.push_str("class ");
                if let Some(name) = name {
                    self.write_node(*name, out);
                }
                out.push_str("\n{\n");
                self.write_list(members, "\n", out);
                out.push_str("\n}");
            }
            NodeKind::FunctionLike {
                kind,
                name,
                params,
                body,
            } => {
                out.push_str(match kind {
                    crate::node::FunctionKind::ArrowFn => "fn",
                    _ => "function",
                });
                if let Some(name) = name {
                    out.push(' ');
                    self.write_node(*name, out);
                }
                out.push('(');
                self.write_list(params, ", ", out);
                out.push(')');
                if *kind == crate::node::FunctionKind::ArrowFn {
                    out.push_str(" => ");
                    self.write_list(body, "", out);
                } else {
                    out.push_str(" {\n");
                    self.write_list(body, "\n", out);
                    out.push_str("\n}");
                }
            }
            NodeKind::Param { name, default } => {
                self.write_node(*name, out);
                if let Some(default) = default {
                    out.push_str(" = ");
                    self.write_node(*default, out);
                }
            }
            NodeKind::ExpressionStatement { expr } => {
                self.write_node(*expr, out);
                out.push(';');
            }
            NodeKind::BinaryOp { op, left, right } => {
                self.write_node(*left, out);
                out.push(' ');
                out.push_str(op.as_str());
                out.push(' ');
                self.write_node(*right, out);
            }
            NodeKind::UnaryOp { op, operand } => {
                out.push_str(op.as_str());
                let needs_parens = *op == UnaryOperator::Not
                    && matches!(self.kind(*operand), NodeKind::BinaryOp { .. });
                if needs_parens {
                    out.push('(');
                }
                self.write_node(*operand, out);
                if needs_parens {
                    out.push(')');
                }
            }
            NodeKind::FuncCall { name, args } => {
                self.write_node(*name, out);
                out.push('(');
                self.write_list(args, ", ", out);
                out.push(')');
            }
            NodeKind::New { class, args } => {
                out.push_str("new ");
                self.write_node(*class, out);
                out.push('(');
                self.write_list(args, ", ", out);
                out.push(')');
            }
            NodeKind::Arg {
                name,
                value,
                unpack,
            } => {
                if let Some(name) = name {
                    out.push_str(name);
                    out.push_str(": ");
                }
                if *unpack {
                    out.push_str("...");
                }
                self.write_node(*value, out);
            }
            NodeKind::Name { value } => out.push_str(value),
            NodeKind::Variable { name } => {
                out.push('$');
                out.push_str(name);
            }
            NodeKind::String { value } => {
                out.push('\'');
                out.push_str(&value.replace('\\', "\\\\").replace('\'', "\\'"));
                out.push('\'');
            }
            NodeKind::Integer { value } => out.push_str(&value.to_string()),
            NodeKind::Float { value } => out.push_str(&format!("{value:?}")),
            NodeKind::Bool { value } => out.push_str(if *value { "true" } else { "false" }),
            NodeKind::Null => out.push_str("null"),
            NodeKind::Parenthesized { inner } => {
                out.push('(');
                self.write_node(*inner, out);
                out.push(')');
            }
            NodeKind::Array { items } => {
                out.push('[');
                self.write_list(items, ", ", out);
                out.push(']');
            }
            NodeKind::ArrayItem { key, value, unpack } => {
                if let Some(key) = key {
                    self.write_node(*key, out);
                    out.push_str(" => ");
                }
                if *unpack {
                    out.push_str("...");
                }
                self.write_node(*value, out);
            }
            NodeKind::ClassConstFetch { class, constant } => {
                self.write_node(*class, out);
                out.push_str("::");
                self.write_node(*constant, out);
            }
            NodeKind::Opaque { text, children, .. } => match text {
                Some(text) => out.push_str(text),
                None => self.write_list(children, " ", out),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::node::{NodeKind, UnaryOperator};
    use crate::parser::parse;
    use pretty_assertions::assert_eq;

    #[test]
    fn untouched_source_round_trips() {
        let source = "<?php\n\n// keep me\nif (strncmp($a,'x',1)===0) {\n    echo  \"hi\" ;\n}\n";
        let tree = parse(source).unwrap();
        assert_eq!(tree.print(), source);
    }

    #[test]
    fn replacement_is_spliced_into_original_text() {
        let source = "<?php\n$ok   =  $a === 'x'; // trailing\n";
        let mut tree = parse(source).unwrap();

        let comparison = tree
            .descendants(tree.root())
            .into_iter()
            .find(|id| matches!(tree.kind(*id), NodeKind::BinaryOp { .. }))
            .unwrap();
        let NodeKind::BinaryOp { left, right, .. } = tree.kind(comparison).clone() else {
            unreachable!()
        };

        let name = tree.alloc(NodeKind::Name {
            value: "same".to_string(),
        });
        let args = vec![
            tree.alloc(NodeKind::Arg {
                name: None,
                value: left,
                unpack: false,
            }),
            tree.alloc(NodeKind::Arg {
                name: None,
                value: right,
                unpack: false,
            }),
        ];
        let call = tree.alloc(NodeKind::FuncCall { name, args });
        let negated = tree.alloc(NodeKind::UnaryOp {
            op: UnaryOperator::Not,
            operand: call,
        });
        tree.replace(comparison, negated);

        assert_eq!(tree.print(), "<?php\n$ok   =  !same($a, 'x'); // trailing\n");
    }

    #[test]
    fn negated_binary_operand_gets_parentheses() {
        let mut tree = parse("<?php $a === $b;").unwrap();
        let comparison = tree
            .descendants(tree.root())
            .into_iter()
            .find(|id| matches!(tree.kind(*id), NodeKind::BinaryOp { .. }))
            .unwrap();
        let not = tree.alloc(NodeKind::UnaryOp {
            op: UnaryOperator::Not,
            operand: comparison,
        });
        assert_eq!(tree.print_node(not), "!($a === $b)");
    }

    #[test]
    fn synthetic_strings_are_single_quoted() {
        let mut tree = parse("<?php\n").unwrap();
        let s = tree.alloc(NodeKind::String {
            value: "it's a \\ test".to_string(),
        });
        assert_eq!(tree.print_node(s), "'it\\'s a \\\\ test'");
    }
}
