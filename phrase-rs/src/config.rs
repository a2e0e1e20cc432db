//! Bindings file parser.
//!
//! A bindings file defines one variable per line:
//!
//! | Line | Action |
//! |------|--------|
//! | `name = <expr>` or `name <expr>` | bind `name` to the value of `<expr>` |
//! | Lines starting with `;` or `#` | comment, ignored |
//! | Blank lines | ignored |
//!
//! The right-hand side is evaluated with everything bound on earlier lines in
//! scope, so `tau = 2 * pi` followed by `r = tau / 4` works.  Right-hand
//! sides are parsed under the caller's nesting limit.

use std::path::Path;

use thiserror::Error;

use crate::expr::lexer::is_identifier;
use crate::expr::{evaluate_with_limit, Func};
use crate::var::VarStore;

// ── Public API ────────────────────────────────────────────────────────────────

/// A non-fatal error encountered while loading a bindings file.  The offending
/// line is skipped.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("line {line}: {message}")]
pub struct ConfigError {
    pub line: usize,
    pub message: String,
}

/// Parse bindings from a string.
///
/// Returns the bindings that loaded and a list of errors for lines that did
/// not.  Reporting the errors is left to the caller.
pub fn load_str(s: &str, max_depth: usize) -> (VarStore, Vec<ConfigError>) {
    let mut vars = VarStore::new();
    let mut errors = Vec::new();

    for (i, raw) in s.lines().enumerate() {
        let lineno = i + 1;
        let line = raw.trim();

        if line.is_empty() || line.starts_with([';', '#']) {
            continue;
        }

        if let Err(message) = parse_binding(line, &mut vars, max_depth) {
            log::debug!("bindings line {lineno}: {message}");
            errors.push(ConfigError { line: lineno, message });
        }
    }

    (vars, errors)
}

/// Read and parse a bindings file from disk.
pub fn load_file(
    path: &Path,
    max_depth: usize,
) -> std::io::Result<(VarStore, Vec<ConfigError>)> {
    let s = std::fs::read_to_string(path)?;
    log::debug!("loading bindings from {}", path.display());
    Ok(load_str(&s, max_depth))
}

/// Parse a single `name = expr` (or `name expr`) definition into `vars`.
///
/// Used for bindings file lines and for `-D` command-line definitions.
pub fn parse_binding(def: &str, vars: &mut VarStore, max_depth: usize) -> Result<(), String> {
    let (name, rhs) = split_binding(def)
        .ok_or_else(|| format!("expected `name = value`, got `{def}`"))?;

    if !is_identifier(name) {
        return Err(format!("invalid variable name `{name}`"));
    }
    if Func::from_name(name).is_some() {
        return Err(format!("`{name}` is a function name"));
    }

    let value = evaluate_with_limit(rhs, vars, max_depth).map_err(|e| format!("{name}: {e}"))?;
    vars.set(name, value);
    Ok(())
}

// ── Line splitting ────────────────────────────────────────────────────────────

/// Split `name = rhs` or `name rhs` into its two halves.
fn split_binding(def: &str) -> Option<(&str, &str)> {
    let def = def.trim();
    let (name, rhs) = match def.split_once('=') {
        Some((name, rhs)) => (name.trim(), rhs.trim()),
        None => {
            let (name, rhs) = def.split_once(|c: char| c.is_whitespace())?;
            (name, rhs.trim())
        }
    };
    if name.is_empty() || rhs.is_empty() {
        return None;
    }
    Some((name, rhs))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
