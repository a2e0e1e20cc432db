//! `phrase`: evaluate arithmetic expressions with variables, constants and
//! math functions.
//!
//! The evaluator lives in [`expr`]; [`var`] and [`config`] provide an owned
//! binding environment and a loader for bindings files, and [`cli`] parses
//! the arguments of the `phrase` binary.

pub mod cli;
pub mod config;
pub mod expr;
pub mod var;
