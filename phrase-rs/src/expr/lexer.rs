//! Phrase normalisation and the scan cursor.
//!
//! There is no separate token stream: the parser asks the [`Scanner`] to
//! recognise one token kind at a time at the current cursor, and the cursor
//! only moves forward when a recogniser succeeds.

use std::sync::LazyLock;

use regex::Regex;

use super::error::{Reason, SyntaxError};

/// Maximal run of digits and dots at the cursor.
static NUMBER_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9.]+").expect("number run pattern"));

/// What a number run must look like in full: no sign, no exponent.
static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+(\.[0-9]+)?$").expect("number pattern"));

static IDENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*").expect("identifier pattern"));

/// Remove whitespace and turn a leading sign into a binary operator by
/// prefixing `0`.
///
/// Whitespace between two word characters (`2 3`, `x y`, `1 .5`) is kept as a
/// single space.  No recogniser matches a space, so such input fails instead
/// of silently gluing two tokens into one.
pub fn normalize(text: &str) -> String {
    let mut phrase = String::with_capacity(text.len());
    let mut gap = false;
    for c in text.chars() {
        if c.is_whitespace() {
            gap = true;
            continue;
        }
        if gap && is_word_char(c) && phrase.chars().next_back().is_some_and(is_word_char) {
            phrase.push(' ');
        }
        gap = false;
        phrase.push(c);
    }
    if phrase.starts_with(['+', '-']) {
        phrase.insert(0, '0');
    }
    phrase
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}

/// Returns `true` if `name` is a well-formed identifier.
pub fn is_identifier(name: &str) -> bool {
    IDENT.find(name).is_some_and(|m| m.end() == name.len())
}

// ── Scanner ───────────────────────────────────────────────────────────────────

pub struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(phrase: &'a str) -> Self {
        Scanner { src: phrase, pos: 0 }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn at_end(&self) -> bool {
        self.pos == self.src.len()
    }

    pub fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    /// Consume `ch` if it is the next character.
    pub fn eat(&mut self, ch: char) -> bool {
        if self.peek() == Some(ch) {
            self.pos += ch.len_utf8();
            true
        } else {
            false
        }
    }

    /// Recognise a numeric literal.
    ///
    /// Returns `None` (cursor untouched) if no digit or dot is at the cursor.
    /// A run of digits and dots that is not a well-formed literal is an error
    /// rather than a shorter match.
    pub fn number(&mut self) -> Option<Result<f64, SyntaxError>> {
        let src = self.src;
        let run = NUMBER_RUN.find(&src[self.pos..])?.as_str();
        if !NUMBER.is_match(run) {
            return Some(Err(SyntaxError::new(
                self.pos,
                Reason::InvalidNumber(run.to_owned()),
            )));
        }
        let start = self.pos;
        let value = run
            .parse::<f64>()
            .map_err(|_| SyntaxError::new(start, Reason::InvalidNumber(run.to_owned())));
        self.pos += run.len();
        Some(value)
    }

    /// Recognise the longest identifier at the cursor.
    pub fn identifier(&mut self) -> Option<&'a str> {
        let src = self.src;
        let m = IDENT.find(&src[self.pos..])?;
        let name = &src[self.pos..self.pos + m.end()];
        self.pos += m.end();
        Some(name)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
