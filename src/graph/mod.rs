//! Build-graph writer boundary.
//!
//! The toolchain does not serialize the build description itself; it emits
//! records through the [`GraphWriter`] trait and an external writer owns the
//! file format, path escaping of the persisted output, and depfile wiring.
//! The records are plain serializable values so drivers can also persist a
//! build plan as JSON.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// A value bound to a named substitution slot in a command template.
///
/// Flag lists are order-significant end-to-end: no reordering, no
/// deduplication. Compilers tolerate and sometimes require repetition
/// (e.g. `-l`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VarValue {
    Scalar(String),
    List(Vec<String>),
}

impl VarValue {
    /// Whether the value would expand to nothing in a command line.
    pub fn is_empty(&self) -> bool {
        match self {
            VarValue::Scalar(s) => s.is_empty(),
            VarValue::List(flags) => flags.is_empty(),
        }
    }
}

impl From<String> for VarValue {
    fn from(s: String) -> Self {
        VarValue::Scalar(s)
    }
}

impl From<&str> for VarValue {
    fn from(s: &str) -> Self {
        VarValue::Scalar(s.to_string())
    }
}

impl From<Vec<String>> for VarValue {
    fn from(flags: Vec<String>) -> Self {
        VarValue::List(flags)
    }
}

/// Dependency-file scanner style understood by the external writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepsStyle {
    /// GCC-style Makefile-fragment depfiles (`-MMD -MF`).
    Gcc,
}

/// A command rule: the template one or more build edges instantiate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Rule name referenced by build edges
    pub name: String,

    /// Command template with named `$slot` substitutions
    pub command: String,

    /// Human-readable description shown while building
    pub description: String,

    /// Depfile path pattern (compile rules only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depfile: Option<String>,

    /// Depfile scanner style (compile rules only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deps: Option<DepsStyle>,
}

impl Rule {
    /// Create a rule with no dependency tracking.
    pub fn new(
        name: impl Into<String>,
        command: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Rule {
            name: name.into(),
            command: command.into(),
            description: description.into(),
            depfile: None,
            deps: None,
        }
    }

    /// Attach a depfile pattern and scanner style.
    pub fn with_depfile(mut self, depfile: impl Into<String>, deps: DepsStyle) -> Self {
        self.depfile = Some(depfile.into());
        self.deps = Some(deps);
        self
    }
}

/// One compile/archive/link action in the generated build graph.
///
/// Variable overrides are sparse: a name bound here shadows the global
/// default for this edge only, and names that would bind an empty list are
/// omitted so the edge inherits the default instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildEdge {
    /// Rule name determining the command template
    pub rule: String,

    /// Input paths (sources or objects)
    pub inputs: Vec<PathBuf>,

    /// Output path
    pub output: PathBuf,

    /// Implicit dependencies supplied by the caller, not computed here
    pub implicit: Vec<PathBuf>,

    /// Ordered per-edge variable overrides
    pub vars: Vec<(String, VarValue)>,
}

/// Sink for toolchain output: global defaults, rules, and build edges.
///
/// Implemented by the external build-graph writer. All I/O failures belong
/// to the implementor; the toolchain itself never performs I/O.
pub trait GraphWriter {
    /// Declare a global variable default.
    fn variable(&mut self, name: &str, value: &VarValue) -> Result<()>;

    /// Declare a command rule.
    fn rule(&mut self, rule: &Rule) -> Result<()>;

    /// Emit one build edge.
    fn build(&mut self, edge: &BuildEdge) -> Result<()>;
}
