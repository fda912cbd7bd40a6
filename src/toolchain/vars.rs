//! Variable binding.
//!
//! A build edge carries a sparse set of named variable overrides layered
//! over the global defaults that [`crate::toolchain::Toolchain`] declares
//! once per graph. The load-bearing rule: a category whose composed flag
//! list is empty is omitted, not bound to an empty value, so the edge
//! inherits the global default instead of clearing it.

use crate::graph::VarValue;

/// Ordered variable overrides for one build edge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeVars {
    vars: Vec<(String, VarValue)>,
}

impl EdgeVars {
    pub fn new() -> Self {
        EdgeVars::default()
    }

    /// Bind a flag list, omitting the binding entirely when the list is
    /// empty.
    pub fn push_list(&mut self, name: &str, flags: Vec<String>) {
        if !flags.is_empty() {
            self.vars.push((name.to_string(), VarValue::List(flags)));
        }
    }

    /// Bind a scalar unconditionally. Scalars are explicit per-edge values
    /// (e.g. a sysroot path) and may legitimately be empty.
    pub fn push_scalar(&mut self, name: &str, value: impl Into<String>) {
        self.vars
            .push((name.to_string(), VarValue::Scalar(value.into())));
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Consume into the ordered override list attached to a build edge.
    pub fn into_vec(self) -> Vec<(String, VarValue)> {
        self.vars
    }

    pub fn as_slice(&self) -> &[(String, VarValue)] {
        &self.vars
    }
}

/// Resolve the effective variable set for one edge: every binding from
/// `base`, with any name also bound in `overrides` shadowed by the override
/// value. Override-only names append in their own order.
///
/// The writer itself only ever sees the sparse overrides; this merge exists
/// so the layering rule is an explicit, testable operation.
pub fn merge(base: &[(String, VarValue)], overrides: &EdgeVars) -> Vec<(String, VarValue)> {
    let mut merged: Vec<(String, VarValue)> = base
        .iter()
        .map(|(name, value)| {
            let shadowed = overrides
                .as_slice()
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.clone());
            (name.clone(), shadowed.unwrap_or_else(|| value.clone()))
        })
        .collect();

    for (name, value) in overrides.as_slice() {
        if !base.iter().any(|(n, _)| n == name) {
            merged.push((name.clone(), value.clone()));
        }
    }

    merged
}
