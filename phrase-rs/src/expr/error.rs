//! Evaluation failure type.
//!
//! Every failure, grammatical or semantic, is reported as a [`SyntaxError`].
//! Callers that only care whether evaluation succeeded can ignore the
//! [`Reason`]; it is there for diagnostics.

use thiserror::Error;

use super::ast::Func;

/// Why a phrase was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Reason {
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),
    #[error("malformed number `{0}`")]
    InvalidNumber(String),
    #[error("expected '(' after function `{0}`")]
    ExpectedOpenParen(Func),
    #[error("expected ')'")]
    UnclosedParen,
    #[error("unconsumed input after expression")]
    TrailingInput,
    #[error("undefined variable `{0}`")]
    UndefinedVariable(String),
    #[error("expression nested deeper than {0} levels")]
    TooDeep(usize),
}

/// The single error kind produced by the evaluator.
///
/// `pos` is a byte offset into the normalised phrase (whitespace removed,
/// leading sign prefixed with `0`), not into the caller's original text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("syntax error at {pos}: {reason}")]
pub struct SyntaxError {
    pub pos: usize,
    pub reason: Reason,
}

impl SyntaxError {
    pub fn new(pos: usize, reason: Reason) -> Self {
        SyntaxError { pos, reason }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
