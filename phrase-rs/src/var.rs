//! Owned variable store.
//!
//! Holds the bindings loaded from files and `-D` options before they are
//! handed to the evaluator.

use std::collections::HashMap;

use crate::expr::Bindings;

/// Name → value variable store.
#[derive(Debug, Default, Clone)]
pub struct VarStore {
    vars: HashMap<String, f64>,
}

impl VarStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or overwrite) a variable.
    pub fn set(&mut self, name: impl Into<String>, value: f64) {
        self.vars.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.vars.get(name).copied()
    }

    /// Remove a variable.  Returns `true` if it existed.
    pub fn unset(&mut self, name: &str) -> bool {
        self.vars.remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Copy every binding of `other` into `self`, overwriting duplicates.
    pub fn extend(&mut self, other: VarStore) {
        self.vars.extend(other.vars);
    }

    /// Iterate over all variables in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.vars.iter().map(|(k, &v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl Bindings for VarStore {
    fn lookup(&self, name: &str) -> Option<f64> {
        self.get(name)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
