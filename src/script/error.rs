use thiserror::Error;

/// Whole-source parse failure. Fatal: extraction aborts with no partial
/// action list.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("TypeScript grammar could not be loaded: {0}")]
    Grammar(String),

    #[error("parser produced no syntax tree")]
    NoTree,

    #[error("syntax error at line {line}, column {column} near `{near}`")]
    Syntax {
        line: usize,
        column: usize,
        near: String,
    },

    #[error("missing {expected} at line {line}, column {column}")]
    Missing {
        expected: String,
        line: usize,
        column: usize,
    },
}

impl ParseError {
    /// Line of the failure, when known.
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::Syntax { line, .. } | ParseError::Missing { line, .. } => Some(*line),
            ParseError::Grammar(_) | ParseError::NoTree => None,
        }
    }
}
