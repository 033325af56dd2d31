//! Parse errors

/// Errors while turning source text into a [`SyntaxTree`](crate::SyntaxTree)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Grammar could not be loaded into the parser
    #[error("failed to load PHP grammar: {0}")]
    Language(String),

    /// Parser produced no tree
    #[error("parser returned no tree")]
    NoTree,

    /// Source contains a syntax error
    #[error("syntax error at {line}:{column} near {kind}")]
    Syntax {
        /// 1-based line
        line: usize,
        /// 1-based column
        column: usize,
        /// Offending grammar node kind
        kind: String,
    },
}

/// Result type alias for parsing
pub type ParseResult<T> = Result<T, ParseError>;
