//! PHP ingestion
//!
//! Parses source with tree-sitter-php and lowers the concrete syntax tree into
//! the arena model. Spans are kept on every lowered node so untouched code can
//! be printed back verbatim.

use tracing::debug;
use tree_sitter::Node as TsNode;

use crate::decorator;
use crate::error::{ParseError, ParseResult};
use crate::node::{BinaryOperator, FunctionKind, Node, NodeId, NodeKind, Span, UnaryOperator};
use crate::tree::SyntaxTree;

/// Parse PHP source into a decorated [`SyntaxTree`]
///
/// # Errors
/// Returns [`ParseError::Syntax`] if the source does not parse cleanly
pub fn parse(source: &str) -> ParseResult<SyntaxTree> {
    let language: tree_sitter::Language = tree_sitter_php::LANGUAGE_PHP.into();

    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&language)
        .map_err(|e| ParseError::Language(e.to_string()))?;

    let ts_tree = parser.parse(source, None).ok_or(ParseError::NoTree)?;
    let ts_root = ts_tree.root_node();

    if ts_root.has_error() {
        return Err(first_error(ts_root));
    }

    let mut lowering = Lowering {
        source,
        nodes: Vec::new(),
    };
    let root = lowering.lower(ts_root);
    debug!(nodes = lowering.nodes.len(), "lowered syntax tree");

    let mut tree = SyntaxTree::from_parts(source.to_string(), lowering.nodes, root);
    decorator::decorate(&mut tree);
    Ok(tree)
}

fn first_error(root: TsNode<'_>) -> ParseError {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            let position = node.start_position();
            let kind = if node.is_missing() {
                format!("missing {}", node.kind())
            } else {
                node.kind().to_string()
            };
            return ParseError::Syntax {
                line: position.row + 1,
                column: position.column + 1,
                kind,
            };
        }
        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).filter(TsNode::has_error).collect();
        stack.extend(children.into_iter().rev());
    }

    let position = root.start_position();
    ParseError::Syntax {
        line: position.row + 1,
        column: position.column + 1,
        kind: root.kind().to_string(),
    }
}

struct Lowering<'s> {
    source: &'s str,
    nodes: Vec<Node>,
}

impl<'s> Lowering<'s> {
    fn push(&mut self, kind: NodeKind, ts: TsNode<'_>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            span: Some(Span::new(ts.start_byte(), ts.end_byte())),
        });
        id
    }

    fn text(&self, ts: TsNode<'_>) -> &'s str {
        self.source.get(ts.start_byte()..ts.end_byte()).unwrap_or("")
    }

    fn lower(&mut self, ts: TsNode<'_>) -> NodeId {
        match self.lower_typed(ts) {
            Some(kind) => self.push(kind, ts),
            None => self.lower_opaque(ts),
        }
    }

    fn lower_all(&mut self, nodes: Vec<TsNode<'_>>) -> Vec<NodeId> {
        nodes.into_iter().map(|n| self.lower(n)).collect()
    }

    fn lower_opaque(&mut self, ts: TsNode<'_>) -> NodeId {
        let named = named_children(ts, true);
        let kind = if named.is_empty() {
            NodeKind::Opaque {
                kind: ts.kind().to_string(),
                text: Some(self.text(ts).to_string()),
                children: Vec::new(),
            }
        } else {
            NodeKind::Opaque {
                kind: ts.kind().to_string(),
                text: None,
                children: self.lower_all(named),
            }
        };
        self.push(kind, ts)
    }

    /// `None` means the construct is kept opaque.
    #[allow(clippy::too_many_lines)]
    fn lower_typed(&mut self, ts: TsNode<'_>) -> Option<NodeKind> {
        let kind = match ts.kind() {
            "program" => NodeKind::Program {
                statements: self.lower_all(named_children(ts, true)),
            },
            "namespace_definition" => {
                let name = ts.child_by_field_name("name").map(|n| self.lower(n));
                let body = match ts.child_by_field_name("body") {
                    Some(body) => self.lower_all(named_children(body, true)),
                    None => Vec::new(),
                };
                NodeKind::Namespace { name, body }
            }
            "class_declaration" => {
                let name = ts.child_by_field_name("name").map(|n| self.lower(n));
                let members = match ts.child_by_field_name("body") {
                    Some(body) => self.lower_all(named_children(body, true)),
                    None => Vec::new(),
                };
                NodeKind::Class { name, members }
            }
            "function_definition" => self.lower_function(ts, FunctionKind::Function),
            "method_declaration" => self.lower_function(ts, FunctionKind::Method),
            "anonymous_function" | "anonymous_function_creation_expression" => {
                self.lower_function(ts, FunctionKind::Closure)
            }
            "arrow_function" => self.lower_function(ts, FunctionKind::ArrowFn),
            "simple_parameter" | "variadic_parameter" | "property_promotion_parameter" => {
                let name = self.lower(ts.child_by_field_name("name")?);
                let default = ts.child_by_field_name("default_value").map(|n| self.lower(n));
                NodeKind::Param { name, default }
            }
            "expression_statement" => {
                let expr = named_children(ts, false).into_iter().next()?;
                NodeKind::ExpressionStatement {
                    expr: self.lower(expr),
                }
            }
            "parenthesized_expression" => {
                let inner = named_children(ts, false).into_iter().next()?;
                NodeKind::Parenthesized {
                    inner: self.lower(inner),
                }
            }
            "binary_expression" => {
                let left = ts.child_by_field_name("left")?;
                let operator = ts
                    .child_by_field_name("operator")
                    .or_else(|| first_token(ts))?;
                let right = ts.child_by_field_name("right")?;
                let op = BinaryOperator::from_token(self.text(operator));
                NodeKind::BinaryOp {
                    op,
                    left: self.lower(left),
                    right: self.lower(right),
                }
            }
            "unary_op_expression" => {
                let op = ts
                    .child_by_field_name("operator")
                    .or_else(|| first_token(ts))
                    .and_then(|o| UnaryOperator::from_token(self.text(o)))?;
                let operand = named_children(ts, false).into_iter().last()?;
                NodeKind::UnaryOp {
                    op,
                    operand: self.lower(operand),
                }
            }
            "function_call_expression" => {
                let function = ts.child_by_field_name("function")?;
                let arguments = ts.child_by_field_name("arguments")?;
                let name = self.lower(function);
                let args = self.lower_all(named_children(arguments, false));
                NodeKind::FuncCall { name, args }
            }
            "object_creation_expression" => {
                let named = named_children(ts, false);
                let class = named.iter().copied().find(|n| n.kind() != "arguments")?;
                let arguments = named.iter().copied().find(|n| n.kind() == "arguments");
                let class = self.lower(class);
                let args = match arguments {
                    Some(arguments) => self.lower_all(named_children(arguments, false)),
                    None => Vec::new(),
                };
                NodeKind::New { class, args }
            }
            "argument" => {
                let name = ts
                    .child_by_field_name("name")
                    .map(|n| self.text(n).to_string());
                let last = named_children(ts, false).into_iter().last()?;
                let (value, unpack) = if last.kind() == "variadic_unpacking" {
                    (named_children(last, false).into_iter().next()?, true)
                } else {
                    (last, false)
                };
                NodeKind::Arg {
                    name,
                    value: self.lower(value),
                    unpack,
                }
            }
            "array_creation_expression" => NodeKind::Array {
                items: self.lower_all(
                    named_children(ts, false)
                        .into_iter()
                        .filter(|n| n.kind() == "array_element_initializer")
                        .collect(),
                ),
            },
            "array_element_initializer" => {
                let named = named_children(ts, false);
                let has_key = has_token(ts, "=>");
                match (has_key, named.as_slice()) {
                    (true, [key, value]) => NodeKind::ArrayItem {
                        key: Some(self.lower(*key)),
                        value: self.lower(*value),
                        unpack: false,
                    },
                    (false, [value]) if value.kind() == "variadic_unpacking" => {
                        let inner = named_children(*value, false).into_iter().next()?;
                        NodeKind::ArrayItem {
                            key: None,
                            value: self.lower(inner),
                            unpack: true,
                        }
                    }
                    (false, [value]) => NodeKind::ArrayItem {
                        key: None,
                        value: self.lower(*value),
                        unpack: false,
                    },
                    _ => return None,
                }
            }
            "class_constant_access_expression" => match named_children(ts, false).as_slice() {
                [class, constant] => NodeKind::ClassConstFetch {
                    class: self.lower(*class),
                    constant: self.lower(*constant),
                },
                _ => return None,
            },
            "name" | "qualified_name" | "relative_scope" | "namespace_name" => NodeKind::Name {
                value: self.text(ts).to_string(),
            },
            "variable_name" => NodeKind::Variable {
                name: self.text(ts).trim_start_matches('$').to_string(),
            },
            "string" | "encapsed_string" => NodeKind::String {
                value: decode_string(self.text(ts))?,
            },
            "integer" => NodeKind::Integer {
                value: parse_integer(self.text(ts))?,
            },
            "float" => NodeKind::Float {
                value: self.text(ts).replace('_', "").parse().ok()?,
            },
            "boolean" => NodeKind::Bool {
                value: self.text(ts).eq_ignore_ascii_case("true"),
            },
            "null" => NodeKind::Null,
            _ => return None,
        };
        Some(kind)
    }

    fn lower_function(&mut self, ts: TsNode<'_>, kind: FunctionKind) -> NodeKind {
        let name = ts.child_by_field_name("name").map(|n| self.lower(n));
        let params = match ts.child_by_field_name("parameters") {
            Some(params) => self.lower_all(named_children(params, false)),
            None => Vec::new(),
        };
        let body = match ts.child_by_field_name("body") {
            Some(body) if body.kind() == "compound_statement" => {
                self.lower_all(named_children(body, true))
            }
            Some(expr) => vec![self.lower(expr)],
            None => Vec::new(),
        };
        NodeKind::FunctionLike {
            kind,
            name,
            params,
            body,
        }
    }
}

fn named_children(ts: TsNode<'_>, keep_comments: bool) -> Vec<TsNode<'_>> {
    let mut cursor = ts.walk();
    ts.named_children(&mut cursor)
        .filter(|n| keep_comments || n.kind() != "comment")
        .collect()
}

fn first_token(ts: TsNode<'_>) -> Option<TsNode<'_>> {
    let mut cursor = ts.walk();
    let found = ts.children(&mut cursor).find(|n| !n.is_named());
    found
}

fn has_token(ts: TsNode<'_>, token: &str) -> bool {
    let mut cursor = ts.walk();
    let found = ts
        .children(&mut cursor)
        .any(|n| !n.is_named() && n.kind() == token);
    found
}

/// Decode a quoted literal
///
/// `None` for interpolated strings and for literals whose bytes are not
/// valid UTF-8; those stay opaque so a decoded value's `len()` is always
/// the PHP `strlen`.
fn decode_string(raw: &str) -> Option<String> {
    let raw = raw
        .strip_prefix('b')
        .or_else(|| raw.strip_prefix('B'))
        .unwrap_or(raw);

    if let Some(inner) = raw.strip_prefix('\'').and_then(|r| r.strip_suffix('\'')) {
        return Some(decode_single_quoted(inner));
    }
    let inner = raw.strip_prefix('"').and_then(|r| r.strip_suffix('"'))?;
    if has_interpolation(inner) {
        return None;
    }
    String::from_utf8(decode_double_quoted(inner)).ok()
}

fn decode_single_quoted(inner: &str) -> String {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if next == '\\' || next == '\'' {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

fn has_interpolation(inner: &str) -> bool {
    let bytes = inner.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b'$' => {
                if let Some(&next) = bytes.get(i + 1) {
                    if next.is_ascii_alphabetic() || next == b'_' || next == b'{' || next >= 0x80 {
                        return true;
                    }
                }
            }
            b'{' if bytes.get(i + 1) == Some(&b'$') => return true,
            _ => {}
        }
        i += 1;
    }
    false
}

/// Decode double-quoted escapes into the raw PHP byte string
fn decode_double_quoted(inner: &str) -> Vec<u8> {
    let bytes = inner.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        i += 1;
        if c != b'\\' {
            out.push(c);
            continue;
        }
        let Some(&next) = bytes.get(i) else {
            out.push(b'\\');
            break;
        };
        let simple = match next {
            b'n' => Some(b'\n'),
            b't' => Some(b'\t'),
            b'r' => Some(b'\r'),
            b'v' => Some(0x0b),
            b'e' => Some(0x1b),
            b'f' => Some(0x0c),
            b'\\' | b'$' | b'"' => Some(next),
            _ => None,
        };
        if let Some(decoded) = simple {
            out.push(decoded);
            i += 1;
            continue;
        }
        match next {
            b'x' => {
                let digits = take_digits(bytes, i + 1, 2, |b| b.is_ascii_hexdigit());
                if digits.is_empty() {
                    out.push(b'\\');
                } else {
                    out.push(parse_radix(digits, 16));
                    i += 1 + digits.len();
                }
            }
            b'0'..=b'7' => {
                let digits = take_digits(bytes, i, 3, |b| (b'0'..=b'7').contains(&b));
                // PHP keeps the low byte of out-of-range octal escapes
                out.push(parse_radix(digits, 8));
                i += digits.len();
            }
            b'u' => match decode_unicode_escape(bytes, i + 1) {
                Some((decoded, consumed)) => {
                    let mut buf = [0u8; 4];
                    out.extend_from_slice(decoded.encode_utf8(&mut buf).as_bytes());
                    i += 1 + consumed;
                }
                None => out.push(b'\\'),
            },
            _ => out.push(b'\\'),
        }
    }
    out
}

fn take_digits(bytes: &[u8], from: usize, max: usize, pred: impl Fn(u8) -> bool) -> &[u8] {
    let rest = bytes.get(from..).unwrap_or_default();
    let len = rest.iter().take(max).take_while(|b| pred(**b)).count();
    &rest[..len]
}

fn parse_radix(digits: &[u8], radix: u32) -> u8 {
    let value = digits.iter().fold(0u32, |acc, d| {
        acc * radix + char::from(*d).to_digit(radix).unwrap_or(0)
    });
    value.to_le_bytes()[0]
}

/// `{hex}` after `\u`; returns the code point and the bytes consumed
fn decode_unicode_escape(bytes: &[u8], from: usize) -> Option<(char, usize)> {
    let rest = bytes.get(from..)?;
    let body = rest.strip_prefix(b"{")?;
    let close = body.iter().position(|b| *b == b'}')?;
    let digits = std::str::from_utf8(&body[..close]).ok()?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let decoded = u32::from_str_radix(digits, 16).ok().and_then(char::from_u32)?;
    Some((decoded, close + 2))
}
