//! Match descriptors handed from matchers to factories

use modernize_syntax::NodeId;

/// A recognised "string starts with" idiom
///
/// `func_call` is the legacy call (`strncmp`, `substr`, ...) and the two
/// expressions are existing nodes reused by the rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StrStartsWith {
    func_call: NodeId,
    haystack_expr: NodeId,
    needle_expr: NodeId,
    is_positive: bool,
}

impl StrStartsWith {
    /// Create descriptor
    #[inline]
    #[must_use]
    pub const fn new(
        func_call: NodeId,
        haystack_expr: NodeId,
        needle_expr: NodeId,
        is_positive: bool,
    ) -> Self {
        Self {
            func_call,
            haystack_expr,
            needle_expr,
            is_positive,
        }
    }

    /// Legacy call that was matched
    #[inline]
    #[must_use]
    pub const fn func_call(&self) -> NodeId {
        self.func_call
    }

    /// String being searched
    #[inline]
    #[must_use]
    pub const fn haystack_expr(&self) -> NodeId {
        self.haystack_expr
    }

    /// Prefix looked for
    #[inline]
    #[must_use]
    pub const fn needle_expr(&self) -> NodeId {
        self.needle_expr
    }

    /// `true` for `=== 0`, `false` for `!== 0`
    #[inline]
    #[must_use]
    pub const fn is_positive(&self) -> bool {
        self.is_positive
    }
}

/// `[$object, 'method']` resolved to a concrete class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayCallable {
    callee: NodeId,
    class_name: String,
    method_name: String,
}

impl ArrayCallable {
    /// Create callable
    #[inline]
    #[must_use]
    pub fn new(callee: NodeId, class_name: impl Into<String>, method_name: impl Into<String>) -> Self {
        Self {
            callee,
            class_name: class_name.into(),
            method_name: method_name.into(),
        }
    }

    /// First array item
    #[inline]
    #[must_use]
    pub fn callee(&self) -> NodeId {
        self.callee
    }

    /// Class the method is looked up on
    #[inline]
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Method name literal
    #[inline]
    #[must_use]
    pub fn method_name(&self) -> &str {
        &self.method_name
    }
}

/// Outcome of a successful array-callable match
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArrayCallableMatch {
    /// Callable with a literal method name
    Callable(ArrayCallable),
    /// Looks like a callable but the method name is not static
    Unknown,
}
