//! Evaluation of parsed expressions against caller bindings.

use std::collections::{BTreeMap, HashMap};
use std::f64::consts;
use std::hash::BuildHasher;

use super::ast::Expr;
use super::error::{Reason, SyntaxError};
use super::parser::{parse, parse_with_limit};

/// Built-in constants.  Caller bindings with the same name take precedence.
pub const CONSTANTS: [(&str, f64); 2] = [("pi", consts::PI), ("e", consts::E)];

pub fn constant(name: &str) -> Option<f64> {
    CONSTANTS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(_, value)| value)
}

// ── Bindings ──────────────────────────────────────────────────────────────────

/// Read-only variable environment supplied by the caller.
pub trait Bindings {
    /// Look up a variable by its exact name.
    fn lookup(&self, name: &str) -> Option<f64>;
}

impl<S: BuildHasher> Bindings for HashMap<String, f64, S> {
    fn lookup(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

impl Bindings for BTreeMap<String, f64> {
    fn lookup(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

impl Bindings for [(&str, f64)] {
    fn lookup(&self, name: &str) -> Option<f64> {
        self.iter().find(|(n, _)| *n == name).map(|&(_, v)| v)
    }
}

impl<const N: usize> Bindings for [(&str, f64); N] {
    fn lookup(&self, name: &str) -> Option<f64> {
        self.as_slice().lookup(name)
    }
}

/// No variables; only the constants resolve.
impl Bindings for () {
    fn lookup(&self, _name: &str) -> Option<f64> {
        None
    }
}

impl<B: Bindings + ?Sized> Bindings for &B {
    fn lookup(&self, name: &str) -> Option<f64> {
        (**self).lookup(name)
    }
}

// ── Evaluator ─────────────────────────────────────────────────────────────────

impl Expr {
    /// Evaluate the tree, children before parents, left before right.
    ///
    /// The only failure is a variable that is neither bound nor a constant.
    pub fn eval<B: Bindings + ?Sized>(&self, vars: &B) -> Result<f64, SyntaxError> {
        match self {
            Expr::Num(x) => Ok(*x),
            Expr::Var { name, pos } => vars
                .lookup(name)
                .or_else(|| constant(name))
                .ok_or_else(|| SyntaxError::new(*pos, Reason::UndefinedVariable(name.clone()))),
            Expr::Call(func, arg) => Ok(func.apply(arg.eval(vars)?)),
            Expr::Binary(op, lhs, rhs) => {
                let l = lhs.eval(vars)?;
                let r = rhs.eval(vars)?;
                Ok(op.apply(l, r))
            }
        }
    }
}

/// Parse and evaluate `text`.
///
/// The whole phrase is parsed before any arithmetic happens, so a syntax
/// error anywhere in the text is reported even if evaluation of an earlier
/// part would have failed.
pub fn evaluate<B: Bindings + ?Sized>(text: &str, vars: &B) -> Result<f64, SyntaxError> {
    let result = parse(text).and_then(|expr| expr.eval(vars));
    log_outcome(text, &result);
    result
}

/// Like [`evaluate`], with an explicit parser recursion limit.
pub fn evaluate_with_limit<B: Bindings + ?Sized>(
    text: &str,
    vars: &B,
    max_depth: usize,
) -> Result<f64, SyntaxError> {
    let result = parse_with_limit(text, max_depth).and_then(|expr| expr.eval(vars));
    log_outcome(text, &result);
    result
}

fn log_outcome(text: &str, result: &Result<f64, SyntaxError>) {
    match result {
        Ok(value) => log::debug!("{text:?} = {value}"),
        Err(e) => log::debug!("{text:?} failed: {e}"),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(src: &str) -> f64 {
        evaluate(src, &()).expect("eval failed")
    }

    fn eval_err(src: &str) -> Reason {
        evaluate(src, &()).expect_err("eval unexpectedly succeeded").reason
    }

    #[test]
    fn literals() {
        assert_eq!(eval("42"), 42.0);
        assert_eq!(eval("3.25"), 3.25);
        assert_eq!(eval("007"), 7.0);
    }

    #[test]
    fn arithmetic() {
        assert_eq!(eval("2 + 3"), 5.0);
        assert_eq!(eval("10 - 4"), 6.0);
        assert_eq!(eval("3 * 4"), 12.0);
        assert_eq!(eval("10 / 4"), 2.5);
        assert_eq!(eval("2 ^ 10"), 1024.0);
    }

    #[test]
    fn right_grouping_changes_results() {
        assert_eq!(eval("8-4-2"), 6.0);
        assert_eq!(eval("16/4/2"), 8.0);
        assert_eq!(eval("2^3^2"), 512.0);
        assert_eq!(eval("(8-4)-2"), 2.0);
        assert_eq!(eval("(16/4)/2"), 2.0);
    }

    #[test]
    fn precedence() {
        assert_eq!(eval("2 + 3 * 4"), 14.0);
        assert_eq!(eval("(2 + 3) * 4"), 20.0);
        assert_eq!(eval("2 * 3 ^ 2"), 18.0);
    }

    #[test]
    fn fractional_and_negative_exponents() {
        assert!((eval("4^0.5") - 2.0).abs() < 1e-12);
        assert_eq!(eval("2^(0-1)"), 0.5);
    }

    #[test]
    fn leading_sign() {
        assert_eq!(eval("-3+5"), 2.0);
        assert_eq!(eval("+7"), 7.0);
        assert_eq!(eval("-2^2"), -4.0);
    }

    #[test]
    fn whitespace_is_insignificant() {
        assert_eq!(eval("1 +  2"), 3.0);
        assert_eq!(eval("1+2"), 3.0);
        assert_eq!(eval("\t1\u{3000}+\n2 "), 3.0);
        assert_eq!(eval("sqrt ( 16 )"), 4.0);
    }

    #[test]
    fn functions() {
        assert_eq!(eval("sin(0)"), 0.0);
        assert_eq!(eval("sqrt(4)"), 2.0);
        assert_eq!(eval("floor(2.7) + ceil(2.2)"), 5.0);
        assert_eq!(eval("abs(3-5)"), 2.0);
        assert_eq!(eval("exp(0)"), 1.0);
        assert_eq!(eval("log(1)"), 0.0);
        assert!((eval("cos(pi)") + 1.0).abs() < 1e-12);
    }

    #[test]
    fn constants() {
        assert!((eval("pi") - consts::PI).abs() < 1e-15);
        assert!((eval("e") - consts::E).abs() < 1e-15);
        assert!((eval("2*pi") - consts::TAU).abs() < 1e-15);
    }

    #[test]
    fn ieee_results_are_not_errors() {
        assert_eq!(eval("1/0"), f64::INFINITY);
        assert!(eval("0/0").is_nan());
        assert!(eval("log(0-1)").is_nan());
        assert!(eval("asin(2)").is_nan());
        assert_eq!(eval("log(0)"), f64::NEG_INFINITY);
    }

    #[test]
    fn variables() {
        let vars = HashMap::from([("x".to_owned(), 5.0)]);
        assert_eq!(evaluate("x*2", &vars), Ok(10.0));
        assert_eq!(evaluate("x ^ 2 + x", &vars), Ok(30.0));
    }

    #[test]
    fn zero_valued_variable_is_defined() {
        assert_eq!(evaluate("z + 1", &[("z", 0.0)]), Ok(1.0));
    }

    #[test]
    fn variables_are_case_sensitive() {
        let vars = [("x", 1.0)];
        assert_eq!(
            evaluate("X", &vars).unwrap_err().reason,
            Reason::UndefinedVariable("X".into())
        );
    }

    #[test]
    fn undefined_variable() {
        assert_eq!(eval_err("x+1"), Reason::UndefinedVariable("x".into()));
        assert_eq!(eval_err("PI"), Reason::UndefinedVariable("PI".into()));
    }

    #[test]
    fn undefined_variable_reports_its_position() {
        let err = evaluate("1 + foo", &()).unwrap_err();
        assert_eq!(err.pos, 2);
    }

    #[test]
    fn syntax_error_wins_over_late_undefined_variable() {
        assert_eq!(eval_err("x + (1"), Reason::UnclosedParen);
    }

    #[test]
    fn caller_bindings_override_constants() {
        let vars = BTreeMap::from([("pi".to_owned(), 3.0), ("e".to_owned(), 0.0)]);
        assert_eq!(evaluate("pi", &vars), Ok(3.0));
        assert_eq!(evaluate("e + 1", &vars), Ok(1.0));
    }

    #[test]
    fn caller_binding_cannot_replace_function() {
        let vars = [("sin", 1.0)];
        assert!(evaluate("sin", &vars).is_err());
        assert_eq!(evaluate("sin(0)", &vars), Ok(0.0));
    }

    #[test]
    fn malformed_input() {
        assert_eq!(eval_err("2+2 3"), Reason::TrailingInput);
        assert_eq!(eval_err("(1+2"), Reason::UnclosedParen);
        assert_eq!(eval_err("1+2)"), Reason::TrailingInput);
        assert_eq!(eval_err("1.2.3"), Reason::InvalidNumber("1.2.3".into()));
        assert_eq!(eval_err("1e5"), Reason::TrailingInput);
        assert_eq!(eval_err("2 3"), Reason::TrailingInput);
        assert_eq!(eval_err("x y"), Reason::TrailingInput);
    }

    #[test]
    fn repeated_evaluation_is_identical() {
        let vars = HashMap::from([("t".to_owned(), 0.25)]);
        let first = evaluate("sin(t)^2 + cos(t)^2 - t/3", &vars);
        for _ in 0..3 {
            assert_eq!(evaluate("sin(t)^2 + cos(t)^2 - t/3", &vars), first);
        }
    }

    #[test]
    fn parsed_tree_can_be_reused_with_other_bindings() {
        let expr = parse("x * y").unwrap();
        assert_eq!(expr.eval(&[("x", 2.0), ("y", 3.0)]), Ok(6.0));
        assert_eq!(expr.eval(&[("x", 4.0), ("y", 0.5)]), Ok(2.0));
    }

    #[test]
    fn explicit_limit() {
        assert_eq!(
            evaluate_with_limit("((((1))))", &(), 4).unwrap_err().reason,
            Reason::TooDeep(4)
        );
        assert_eq!(evaluate_with_limit("((((1))))", &(), 64), Ok(1.0));
    }
}
