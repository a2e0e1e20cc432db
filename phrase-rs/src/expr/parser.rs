//! Recursive-descent parser.
//!
//! Grammar (lowest → highest precedence, every binary operator groups to the
//! right):
//!
//! ```text
//! additive       := multiplicative ( ('+' | '-') additive )?
//! multiplicative := term ( ('*' | '/') multiplicative )?
//! term           := primary ( '^' term )?
//! primary        := number | function '(' additive ')' | '(' additive ')' | identifier
//! ```
//!
//! Right grouping is observable: `8-4-2` is `8-(4-2)` and `16/4/2` is
//! `16/(4/2)`.

use super::ast::{BinOp, Expr, Func};
use super::error::{Reason, SyntaxError};
use super::lexer::{normalize, Scanner};

/// Default limit on parser recursion.  Tree height never exceeds it, so the
/// evaluator's recursion is bounded by the same number.
///
/// Every `additive`, `multiplicative` and `term` frame costs one level.  A
/// flat chain of `+`/`-` therefore costs one level per operand plus two, and
/// each pair of parentheses or function call costs three.  With the default
/// that allows a sum of 510 operands (509 operators) or 169 nested
/// parentheses; the same holds for `*`, `/` and `^` chains.
pub const DEFAULT_MAX_DEPTH: usize = 512;

pub struct Parser<'a> {
    scan: Scanner<'a>,
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    /// Create a parser over an already-normalised phrase (see
    /// [`normalize`](super::lexer::normalize)).
    pub fn new(phrase: &'a str) -> Self {
        Parser {
            scan: Scanner::new(phrase),
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parse the whole phrase.  Anything left after the top-level expression
    /// is an error.
    pub fn parse(mut self) -> Result<Expr, SyntaxError> {
        let expr = self.parse_additive()?;
        if !self.scan.at_end() {
            return Err(self.error(Reason::TrailingInput));
        }
        Ok(expr)
    }

    fn error(&self, reason: Reason) -> SyntaxError {
        SyntaxError::new(self.scan.pos(), reason)
    }

    fn unexpected(&self) -> SyntaxError {
        match self.scan.peek() {
            Some(c) => self.error(Reason::UnexpectedChar(c)),
            None => self.error(Reason::UnexpectedEnd),
        }
    }

    fn enter(&mut self) -> Result<(), SyntaxError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(self.error(Reason::TooDeep(self.max_depth)));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    // ── Grammar ───────────────────────────────────────────────────────────────

    fn parse_additive(&mut self) -> Result<Expr, SyntaxError> {
        self.enter()?;
        let lhs = self.parse_multiplicative()?;
        let op = if self.scan.eat('+') {
            Some(BinOp::Add)
        } else if self.scan.eat('-') {
            Some(BinOp::Sub)
        } else {
            None
        };
        let expr = match op {
            Some(op) => Expr::binary(op, lhs, self.parse_additive()?),
            None => lhs,
        };
        self.leave();
        Ok(expr)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, SyntaxError> {
        self.enter()?;
        let lhs = self.parse_term()?;
        let op = if self.scan.eat('*') {
            Some(BinOp::Mul)
        } else if self.scan.eat('/') {
            Some(BinOp::Div)
        } else {
            None
        };
        let expr = match op {
            Some(op) => Expr::binary(op, lhs, self.parse_multiplicative()?),
            None => lhs,
        };
        self.leave();
        Ok(expr)
    }

    fn parse_term(&mut self) -> Result<Expr, SyntaxError> {
        self.enter()?;
        let base = self.parse_primary()?;
        let expr = if self.scan.eat('^') {
            Expr::binary(BinOp::Pow, base, self.parse_term()?)
        } else {
            base
        };
        self.leave();
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr, SyntaxError> {
        if let Some(n) = self.scan.number() {
            return Ok(Expr::Num(n?));
        }

        let start = self.scan.pos();
        if let Some(name) = self.scan.identifier() {
            let Some(func) = Func::from_name(name) else {
                return Ok(Expr::Var {
                    name: name.to_owned(),
                    pos: start,
                });
            };
            if !self.scan.eat('(') {
                return Err(self.error(Reason::ExpectedOpenParen(func)));
            }
            let arg = self.parse_additive()?;
            self.expect_close()?;
            return Ok(Expr::Call(func, Box::new(arg)));
        }

        if self.scan.eat('(') {
            let inner = self.parse_additive()?;
            self.expect_close()?;
            return Ok(inner);
        }

        Err(self.unexpected())
    }

    fn expect_close(&mut self) -> Result<(), SyntaxError> {
        if self.scan.eat(')') {
            Ok(())
        } else {
            Err(self.error(Reason::UnclosedParen))
        }
    }
}

/// Normalise `text` and parse it into an [`Expr`].
pub fn parse(text: &str) -> Result<Expr, SyntaxError> {
    parse_with_limit(text, DEFAULT_MAX_DEPTH)
}

/// Like [`parse`], with an explicit recursion limit.
pub fn parse_with_limit(text: &str, max_depth: usize) -> Result<Expr, SyntaxError> {
    let phrase = normalize(text);
    let result = Parser::new(&phrase).with_max_depth(max_depth).parse();
    match &result {
        Ok(expr) => log::trace!("parsed {phrase:?} as {expr}"),
        Err(e) => log::trace!("rejected {phrase:?}: {e}"),
    }
    result
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn grouping(src: &str) -> String {
        parse(src).expect("parse failed").to_string()
    }

    fn reason(src: &str) -> Reason {
        parse(src).expect_err("parse unexpectedly succeeded").reason
    }

    #[test]
    fn additive_groups_right() {
        assert_eq!(grouping("8-4-2"), "(8 - (4 - 2))");
        assert_eq!(grouping("1+2-3"), "(1 + (2 - 3))");
    }

    #[test]
    fn multiplicative_groups_right() {
        assert_eq!(grouping("16/4/2"), "(16 / (4 / 2))");
    }

    #[test]
    fn exponent_groups_right_and_binds_tightest() {
        assert_eq!(grouping("2^3^2"), "(2 ^ (3 ^ 2))");
        assert_eq!(grouping("2*3^2"), "(2 * (3 ^ 2))");
        assert_eq!(grouping("-2^2"), "(0 - (2 ^ 2))");
    }

    #[test]
    fn precedence() {
        assert_eq!(grouping("1+2*3"), "(1 + (2 * 3))");
        assert_eq!(grouping("(1+2)*3"), "((1 + 2) * 3)");
    }

    #[test]
    fn function_takes_one_additive_argument() {
        assert_eq!(grouping("sin(x+1)"), "sin((x + 1))");
        assert_eq!(grouping("sqrt(4)^2"), "(sqrt(4) ^ 2)");
    }

    #[test]
    fn function_name_wins_over_variable() {
        assert_eq!(reason("sin+1"), Reason::ExpectedOpenParen(Func::Sin));
        assert_eq!(reason("sqrt"), Reason::ExpectedOpenParen(Func::Sqrt));
    }

    #[test]
    fn longer_identifier_is_a_variable() {
        assert_eq!(grouping("sinx*2"), "(sinx * 2)");
        assert_eq!(grouping("log_base"), "log_base");
    }

    #[test]
    fn variable_records_position() {
        match parse("1 + abc").unwrap() {
            Expr::Binary(_, _, rhs) => {
                assert_eq!(*rhs, Expr::Var { name: "abc".into(), pos: 2 });
            }
            other => panic!("unexpected tree {other:?}"),
        }
    }

    #[test]
    fn trailing_input_rejected() {
        assert_eq!(reason("2+2 3"), Reason::TrailingInput);
        assert_eq!(reason("1+2)"), Reason::TrailingInput);
        assert_eq!(reason("2x"), Reason::TrailingInput);
    }

    #[test]
    fn unclosed_paren() {
        assert_eq!(reason("(1+2"), Reason::UnclosedParen);
        assert_eq!(reason("cos(0"), Reason::UnclosedParen);
    }

    #[test]
    fn missing_operand() {
        assert_eq!(reason(""), Reason::UnexpectedEnd);
        assert_eq!(reason("1+"), Reason::UnexpectedEnd);
        assert_eq!(reason("()"), Reason::UnexpectedChar(')'));
        assert_eq!(reason("2*-3"), Reason::UnexpectedChar('-'));
        assert_eq!(reason("1 # 2"), Reason::TrailingInput);
    }

    #[test]
    fn only_leading_sign_is_normalised() {
        assert!(parse("-3+5").is_ok());
        assert!(parse("+3").is_ok());
        assert_eq!(reason("--3"), Reason::UnexpectedChar('-'));
        assert_eq!(reason("(-3)"), Reason::UnexpectedChar('-'));
    }

    #[test]
    fn error_position_is_phrase_offset() {
        let err = parse("1 + 2 )").unwrap_err();
        assert_eq!(err.pos, 3);
    }

    #[test]
    fn nesting_limit() {
        let deep = format!("{}1{}", "(".repeat(300), ")".repeat(300));
        assert_eq!(
            parse_with_limit(&deep, 64).unwrap_err().reason,
            Reason::TooDeep(64)
        );
        assert!(parse_with_limit("((1))", 64).is_ok());
    }

    #[test]
    fn long_operator_chain_hits_limit_instead_of_overflowing() {
        let chain = vec!["1"; 10_000].join("+");
        assert_eq!(reason(&chain), Reason::TooDeep(DEFAULT_MAX_DEPTH));
        let short = vec!["1"; 100].join("+");
        assert!(parse(&short).is_ok());
    }

    #[test]
    fn default_limit_cost_per_operator_and_paren() {
        let sum = |n: usize| vec!["1"; n].join("+");
        assert!(parse(&sum(510)).is_ok());
        assert_eq!(reason(&sum(511)), Reason::TooDeep(DEFAULT_MAX_DEPTH));

        let nested = |k: usize| format!("{}1{}", "(".repeat(k), ")".repeat(k));
        assert!(parse(&nested(169)).is_ok());
        assert_eq!(reason(&nested(170)), Reason::TooDeep(DEFAULT_MAX_DEPTH));

        let calls = |k: usize| format!("{}0{}", "sin(".repeat(k), ")".repeat(k));
        assert!(parse(&calls(169)).is_ok());
        assert_eq!(reason(&calls(170)), Reason::TooDeep(DEFAULT_MAX_DEPTH));
    }
}
