//! Target kinds: what a build edge produces.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ParseError;

/// The kind of artifact produced by a build edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// Static library (.a / .lib)
    #[serde(alias = "lib", alias = "staticlib")]
    StaticLib,

    /// Shared/dynamic library (.so / .dylib / .dll)
    #[serde(alias = "sharedlib", alias = "dylib")]
    SharedLib,

    /// Executable binary
    #[serde(alias = "bin", alias = "exe")]
    Executable,
}

impl TargetKind {
    /// The symbolic name used in build requests.
    pub fn name(&self) -> &'static str {
        match self {
            TargetKind::StaticLib => "lib",
            TargetKind::SharedLib => "sharedlib",
            TargetKind::Executable => "bin",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TargetKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lib" | "staticlib" | "static" => Ok(TargetKind::StaticLib),
            "sharedlib" | "dylib" | "dynamic" => Ok(TargetKind::SharedLib),
            "bin" | "exe" => Ok(TargetKind::Executable),
            other => Err(ParseError::UnknownTargetKind(other.to_string())),
        }
    }
}
