use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use env_logger::Env;
use log::{debug, warn};

use phrase::cli::{self, BindingsFile, CliArgs};
use phrase::config;
use phrase::expr::{evaluate_with_limit, DEFAULT_MAX_DEPTH};
use phrase::var::VarStore;

fn main() {
    let args = match cli::parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("phrase: {e}");
            eprintln!("Usage: phrase [-d] [-f[<file>]] [-D<name>=<value>]... [-m<depth>] [--] [<expr>...]");
            std::process::exit(2);
        }
    };

    let default_level = if args.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    match run(&args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("phrase: {e:#}");
            std::process::exit(1);
        }
    }
}

/// Evaluate the requested expressions.  Returns `Ok(false)` if any of them
/// failed to evaluate.
fn run(args: &CliArgs) -> Result<bool> {
    let max_depth = args.max_depth.unwrap_or(DEFAULT_MAX_DEPTH);
    let vars = load_bindings(args, max_depth)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Some(expr) = &args.expression {
        return eval_line(expr, &vars, max_depth, &mut out);
    }

    let mut all_ok = true;
    for line in io::stdin().lock().lines() {
        let line = line.context("reading stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        all_ok &= eval_line(&line, &vars, max_depth, &mut out)?;
    }
    Ok(all_ok)
}

fn eval_line(text: &str, vars: &VarStore, max_depth: usize, out: &mut impl Write) -> Result<bool> {
    match evaluate_with_limit(text, vars, max_depth) {
        Ok(value) => {
            writeln!(out, "{value}").context("writing result")?;
            Ok(true)
        }
        Err(e) => {
            eprintln!("phrase: {e}");
            Ok(false)
        }
    }
}

/// Build the binding environment: bindings file first, then `-D` options.
/// Every right-hand side is parsed under the same nesting limit as the
/// expressions themselves.
fn load_bindings(args: &CliArgs, max_depth: usize) -> Result<VarStore> {
    let path = match &args.bindings {
        BindingsFile::Skip => None,
        BindingsFile::Explicit(p) => Some(p.clone()),
        BindingsFile::Search => cli::find_user_bindings(),
    };

    let mut vars = VarStore::new();
    if let Some(path) = path {
        let (loaded, errors) = config::load_file(&path, max_depth)
            .with_context(|| format!("can't read bindings file {}", path.display()))?;
        for e in &errors {
            warn!("{}: {e}", path.display());
        }
        debug!("{} bindings from {}", loaded.len(), path.display());
        vars.extend(loaded);
    }

    for def in &args.defines {
        config::parse_binding(def, &mut vars, max_depth)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("-D{def}"))?;
    }

    Ok(vars)
}
