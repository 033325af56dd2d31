//! Syntax node model
//!
//! Nodes live in the [`SyntaxTree`](crate::SyntaxTree) arena and refer to each
//! other through [`NodeId`]. Constructs the rewrite engine reasons about get a
//! typed [`NodeKind`]; everything else is kept as [`NodeKind::Opaque`] so the
//! printer can still reproduce it.

use std::fmt::{self, Display, Formatter};

/// Index of a node inside its tree arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position in the arena
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Byte range of a node in the parsed source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// Inclusive start offset
    pub start: usize,
    /// Exclusive end offset
    pub end: usize,
}

impl Span {
    /// Create new span
    #[inline]
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length in bytes
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if span covers nothing
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A single arena node
///
/// `span` is `None` for nodes synthesised after parsing. Those are
/// pretty-printed instead of copied from the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// What the node is
    pub kind: NodeKind,
    /// Where the node came from
    pub span: Option<Span>,
}

impl Node {
    /// Create synthetic node
    #[inline]
    #[must_use]
    pub fn synthetic(kind: NodeKind) -> Self {
        Self { kind, span: None }
    }

    /// Whether the node was built after parsing
    #[inline]
    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        self.span.is_none()
    }
}

/// Binary operators
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    /// `===`
    Identical,
    /// `!==`
    NotIdentical,
    /// `==`
    Equal,
    /// `!=` or `<>`
    NotEqual,
    /// `<`
    Smaller,
    /// `<=`
    SmallerOrEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterOrEqual,
    /// `&&` or `and`
    BooleanAnd,
    /// `||` or `or`
    BooleanOr,
    /// `.`
    Concat,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// Anything else, kept verbatim
    Other(String),
}

impl BinaryOperator {
    /// Map operator token text
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        match token.to_ascii_lowercase().as_str() {
            "===" => Self::Identical,
            "!==" => Self::NotIdentical,
            "==" => Self::Equal,
            "!=" | "<>" => Self::NotEqual,
            "<" => Self::Smaller,
            "<=" => Self::SmallerOrEqual,
            ">" => Self::Greater,
            ">=" => Self::GreaterOrEqual,
            "&&" | "and" => Self::BooleanAnd,
            "||" | "or" => Self::BooleanOr,
            "." => Self::Concat,
            "+" => Self::Plus,
            "-" => Self::Minus,
            _ => Self::Other(token.to_string()),
        }
    }

    /// Token used when printing
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Identical => "===",
            Self::NotIdentical => "!==",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Smaller => "<",
            Self::SmallerOrEqual => "<=",
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
            Self::BooleanAnd => "&&",
            Self::BooleanOr => "||",
            Self::Concat => ".",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Other(token) => token,
        }
    }

    /// `===` or `!==`
    #[inline]
    #[must_use]
    pub fn is_identity_comparison(&self) -> bool {
        matches!(self, Self::Identical | Self::NotIdentical)
    }
}

/// Prefix operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    /// `!`
    Not,
    /// `-`
    Minus,
    /// `+`
    Plus,
    /// `~`
    BitwiseNot,
}

impl UnaryOperator {
    /// Map operator token text
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "!" => Some(Self::Not),
            "-" => Some(Self::Minus),
            "+" => Some(Self::Plus),
            "~" => Some(Self::BitwiseNot),
            _ => None,
        }
    }

    /// Token used when printing
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Not => "!",
            Self::Minus => "-",
            Self::Plus => "+",
            Self::BitwiseNot => "~",
        }
    }
}

/// Flavour of a function-like declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    /// `function foo()`
    Function,
    /// Class method
    Method,
    /// `function () use (...) {}`
    Closure,
    /// `fn () =>`
    ArrowFn,
}

/// Typed node payload
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// File root
    Program { statements: Vec<NodeId> },
    /// `namespace Foo;` or `namespace Foo { ... }`
    Namespace {
        name: Option<NodeId>,
        body: Vec<NodeId>,
    },
    /// Class declaration
    Class {
        name: Option<NodeId>,
        members: Vec<NodeId>,
    },
    /// Function, method, closure or arrow function
    FunctionLike {
        kind: FunctionKind,
        name: Option<NodeId>,
        params: Vec<NodeId>,
        body: Vec<NodeId>,
    },
    /// Declared parameter
    Param {
        name: NodeId,
        default: Option<NodeId>,
    },
    /// `expr;`
    ExpressionStatement { expr: NodeId },
    /// `left op right`
    BinaryOp {
        op: BinaryOperator,
        left: NodeId,
        right: NodeId,
    },
    /// `op operand`
    UnaryOp { op: UnaryOperator, operand: NodeId },
    /// `name(args)`
    FuncCall { name: NodeId, args: Vec<NodeId> },
    /// `new class(args)`
    New { class: NodeId, args: Vec<NodeId> },
    /// Call argument
    Arg {
        name: Option<String>,
        value: NodeId,
        unpack: bool,
    },
    /// Bare or qualified identifier
    Name { value: String },
    /// `$name` (stored without the sigil)
    Variable { name: String },
    /// String literal (decoded)
    String { value: String },
    /// Integer literal
    Integer { value: i64 },
    /// Float literal
    Float { value: f64 },
    /// `true` / `false`
    Bool { value: bool },
    /// `null`
    Null,
    /// `(inner)`
    Parenthesized { inner: NodeId },
    /// `[...]` or `array(...)`
    Array { items: Vec<NodeId> },
    /// `key => value`, `value` or `...value`
    ArrayItem {
        key: Option<NodeId>,
        value: NodeId,
        unpack: bool,
    },
    /// `Class::CONSTANT`
    ClassConstFetch { class: NodeId, constant: NodeId },
    /// Anything the engine does not model
    ///
    /// Leaves keep their `text`; inner nodes keep their named children.
    Opaque {
        kind: String,
        text: Option<String>,
        children: Vec<NodeId>,
    },
}

impl NodeKind {
    /// Direct children in source order
    #[must_use]
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            Self::Program { statements } => statements.clone(),
            Self::Namespace { name, body } => name.iter().chain(body).copied().collect(),
            Self::Class { name, members } => name.iter().chain(members).copied().collect(),
            Self::FunctionLike {
                name, params, body, ..
            } => name.iter().chain(params).chain(body).copied().collect(),
            Self::Param { name, default } => std::iter::once(name).chain(default).copied().collect(),
            Self::ExpressionStatement { expr } => vec![*expr],
            Self::BinaryOp { left, right, .. } => vec![*left, *right],
            Self::UnaryOp { operand, .. } => vec![*operand],
            Self::FuncCall { name, args } => std::iter::once(name).chain(args).copied().collect(),
            Self::New { class, args } => std::iter::once(class).chain(args).copied().collect(),
            Self::Arg { value, .. } => vec![*value],
            Self::Parenthesized { inner } => vec![*inner],
            Self::Array { items } => items.clone(),
            Self::ArrayItem { key, value, .. } => key.iter().chain(std::iter::once(value)).copied().collect(),
            Self::ClassConstFetch { class, constant } => vec![*class, *constant],
            Self::Opaque { children, .. } => children.clone(),
            Self::Name { .. }
            | Self::Variable { .. }
            | Self::String { .. }
            | Self::Integer { .. }
            | Self::Float { .. }
            | Self::Bool { .. }
            | Self::Null => Vec::new(),
        }
    }

    /// Short kind label for diagnostics
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Program { .. } => "Program",
            Self::Namespace { .. } => "Namespace",
            Self::Class { .. } => "Class",
            Self::FunctionLike { .. } => "FunctionLike",
            Self::Param { .. } => "Param",
            Self::ExpressionStatement { .. } => "ExpressionStatement",
            Self::BinaryOp { .. } => "BinaryOp",
            Self::UnaryOp { .. } => "UnaryOp",
            Self::FuncCall { .. } => "FuncCall",
            Self::New { .. } => "New",
            Self::Arg { .. } => "Arg",
            Self::Name { .. } => "Name",
            Self::Variable { .. } => "Variable",
            Self::String { .. } => "String",
            Self::Integer { .. } => "Integer",
            Self::Float { .. } => "Float",
            Self::Bool { .. } => "Bool",
            Self::Null => "Null",
            Self::Parenthesized { .. } => "Parenthesized",
            Self::Array { .. } => "Array",
            Self::ArrayItem { .. } => "ArrayItem",
            Self::ClassConstFetch { .. } => "ClassConstFetch",
            Self::Opaque { kind, .. } => kind,
        }
    }
}
