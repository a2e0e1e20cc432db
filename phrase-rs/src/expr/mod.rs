//! Arithmetic expression evaluator.
//!
//! Evaluates text such as `2 * sin(pi / 4) ^ 2 + x` to an `f64`:
//!
//! - Decimal literals (`42`, `3.25`), no sign or exponent notation
//! - Binary `+ - * / ^`, all grouping to the right (`8-4-2` is `8-(4-2)`)
//! - Parentheses and one-argument functions (`sin`, `sqrt`, `log`, …)
//! - Caller-supplied variables plus the constants `pi` and `e`
//!
//! Whitespace is ignored everywhere and a leading `+` or `-` is read as
//! `0+` / `0-`.  Arithmetic edge cases (`1/0`, `log(0)`) produce IEEE
//! infinities or NaN; only malformed text and undefined variables fail.
//!
//! # Quick start
//!
//! ```rust
//! use std::collections::HashMap;
//! use phrase::expr::evaluate;
//!
//! let vars = HashMap::from([("x".to_owned(), 5.0)]);
//! assert_eq!(evaluate("x * 2", &vars), Ok(10.0));
//! assert!(evaluate("2 + 2 3", &vars).is_err());
//! ```

pub mod ast;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;

// Re-exports for convenience.
pub use ast::{BinOp, Expr, Func};
pub use error::{Reason, SyntaxError};
pub use eval::{evaluate, evaluate_with_limit, Bindings, CONSTANTS};
pub use parser::{parse, parse_with_limit, Parser, DEFAULT_MAX_DEPTH};
