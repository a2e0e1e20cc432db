//! Command-line argument parsing.
//!
//! Usage:
//!   phrase [-d] [-f[<file>]] [-D<name>=<value>]... [-m<depth>] [--] [<expr>...]
//!
//! With no expression arguments, expressions are read from stdin, one per
//! line.  An argument starting with `-` is a flag only if it is a cluster of
//! known flags; `-pi` or `-x+1` is an expression.  `--` ends flag processing.

use std::path::PathBuf;

// ── Public types ──────────────────────────────────────────────────────────────

/// Parsed command-line arguments.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Bindings-file specification.
    pub bindings: BindingsFile,
    /// `-D` definitions, in command-line order.
    pub defines: Vec<String>,
    /// Parser recursion limit override (`-m<depth>`).
    pub max_depth: Option<usize>,
    /// Debug logging (`-d`).
    pub debug: bool,
    /// Expression to evaluate; `None` means read stdin.
    pub expression: Option<String>,
}

/// How to choose the bindings file.
#[derive(Debug, Default, PartialEq)]
pub enum BindingsFile {
    /// Search `$PHRASE_VARS`, `~/.phraserc`, `./.phraserc` in order (default).
    #[default]
    Search,
    /// `-f` with no file argument: load no bindings file.
    Skip,
    /// `-f<file>`: load this specific file.
    Explicit(PathBuf),
}

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Parse `std::env::args()` and return [`CliArgs`] or an error message.
pub fn parse_args() -> Result<CliArgs, String> {
    let raw: Vec<String> = std::env::args().collect();
    parse_argv(&raw[1..])
}

/// Parse a slice of argument strings (exposed for testing).
pub fn parse_argv(argv: &[String]) -> Result<CliArgs, String> {
    let mut args = CliArgs::default();
    let mut positional: Vec<String> = Vec::new();
    let mut i = 0;

    while i < argv.len() {
        let arg = argv[i].as_str();

        // `--` ends flag processing.
        if arg == "--" {
            i += 1;
            positional.extend(argv[i..].iter().cloned());
            break;
        }

        // Non-flag argument.  Anything after `-` that is not a cluster of
        // known flags (`-pi`, `-x+1`, `-3`) is a leading-sign expression.
        if !arg.starts_with('-') || !is_flag_cluster(arg) {
            positional.push(arg.to_owned());
            i += 1;
            continue;
        }

        // Flag argument: iterate over characters after the leading `-`.
        let chars: Vec<char> = arg[1..].chars().collect();
        let mut j = 0;
        while j < chars.len() {
            match chars[j] {
                'd' => args.debug = true,

                // -f[<file>]; the file name must be attached
                'f' => {
                    if j + 1 < chars.len() {
                        let file: String = chars[j + 1..].iter().collect();
                        args.bindings = BindingsFile::Explicit(PathBuf::from(file));
                        j = chars.len();
                    } else {
                        args.bindings = BindingsFile::Skip;
                    }
                }

                // -D<name>=<value>
                'D' => {
                    let def = if j + 1 < chars.len() {
                        let s: String = chars[j + 1..].iter().collect();
                        j = chars.len();
                        s
                    } else if i + 1 < argv.len() {
                        i += 1;
                        argv[i].clone()
                    } else {
                        return Err("-D requires a name=value argument".to_owned());
                    };
                    args.defines.push(def);
                }

                // -m<depth>
                'm' => {
                    let raw = if j + 1 < chars.len() {
                        let s: String = chars[j + 1..].iter().collect();
                        j = chars.len();
                        s
                    } else if i + 1 < argv.len() {
                        i += 1;
                        argv[i].clone()
                    } else {
                        return Err("-m requires a depth argument".to_owned());
                    };
                    let depth: usize = raw
                        .parse()
                        .map_err(|_| format!("invalid depth: {raw}"))?;
                    if depth == 0 {
                        return Err("depth must be at least 1".to_owned());
                    }
                    args.max_depth = Some(depth);
                }

                c => return Err(format!("unknown option: -{c}")),
            }
            j += 1;
        }
        i += 1;
    }

    if !positional.is_empty() {
        args.expression = Some(positional.join(" "));
    }

    Ok(args)
}

/// `true` if every character after the leading `-` is a known flag letter,
/// up to the first value-taking flag (`f`, `D`, `m`), which owns the rest.
/// An attached `-m` value must be digits, so `-max` stays an expression.
fn is_flag_cluster(arg: &str) -> bool {
    let flags = &arg[1..];
    for (k, c) in flags.char_indices() {
        match c {
            'd' => {}
            'f' | 'D' => return true,
            'm' => return flags[k + 1..].chars().all(|c| c.is_ascii_digit()),
            _ => return false,
        }
    }
    !flags.is_empty()
}

// ── Path helpers ──────────────────────────────────────────────────────────────

/// Search for the user bindings file in the standard locations.
/// Returns the first path that exists, or `None`.
pub fn find_user_bindings() -> Option<PathBuf> {
    if let Ok(p) = std::env::var("PHRASE_VARS") {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return Some(pb);
        }
    }
    let home = std::env::var("HOME").unwrap_or_default();
    [format!("{home}/.phraserc"), "./.phraserc".to_owned()]
        .into_iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
