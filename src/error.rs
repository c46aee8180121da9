use thiserror::Error;

use crate::lexer::Pos;

/// Everything that can go wrong while turning source text into a `Value`.
///
/// All failures are terminal for the call: the pipeline never coerces an
/// error into a default value or returns a partial result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataEvalError {
    /// Input was neither text nor an already-parsed dict value.
    #[error("source must be a string or an already-parsed dict (got {got})")]
    InvalidInput { got: &'static str },

    /// Token- or grammar-level failure.
    #[error("syntax error: {message} at {pos}")]
    Syntax { message: String, pos: Pos },

    /// Syntactically well-formed but semantically disallowed: a bare
    /// non-keyword identifier, a callee outside the whitelist, a non-numeric
    /// negation operand, or an operator the literal grammar never accepts.
    #[error("unsafe construct: {message}: '{descr}' at {pos}")]
    UnsafeConstruct {
        message: String,
        descr: String,
        pos: Pos,
    },

    /// A whitelisted constructor rejected its arguments.
    #[error("{name}() construction failed: {message}")]
    Construction { name: String, message: String },
}

impl DataEvalError {
    pub fn syntax<M: Into<String>>(message: M, pos: Pos) -> Self {
        DataEvalError::Syntax {
            message: message.into(),
            pos,
        }
    }

    pub fn unsafe_construct<M, D>(message: M, descr: D, pos: Pos) -> Self
    where
        M: Into<String>,
        D: Into<String>,
    {
        DataEvalError::UnsafeConstruct {
            message: message.into(),
            descr: descr.into(),
            pos,
        }
    }

    pub fn construction<N, M>(name: N, message: M) -> Self
    where
        N: Into<String>,
        M: Into<String>,
    {
        DataEvalError::Construction {
            name: name.into(),
            message: message.into(),
        }
    }
}
