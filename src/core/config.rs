//! Build configurations (profiles).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ParseError;

/// A named build profile controlling the optimization/debug trade-off.
///
/// Each configuration maps to exactly one define/optimization bundle in the
/// flag composer; the four bundles are pairwise disjoint in their defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildConfig {
    Debug,
    Release,
    Profile,
    Deploy,
}

impl BuildConfig {
    /// All configurations, in declaration order.
    pub const ALL: [BuildConfig; 4] = [
        BuildConfig::Debug,
        BuildConfig::Release,
        BuildConfig::Profile,
        BuildConfig::Deploy,
    ];

    /// The symbolic name used in build requests and output paths.
    pub fn name(&self) -> &'static str {
        match self {
            BuildConfig::Debug => "debug",
            BuildConfig::Release => "release",
            BuildConfig::Profile => "profile",
            BuildConfig::Deploy => "deploy",
        }
    }
}

impl fmt::Display for BuildConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BuildConfig {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debug" => Ok(BuildConfig::Debug),
            "release" => Ok(BuildConfig::Release),
            "profile" => Ok(BuildConfig::Profile),
            "deploy" => Ok(BuildConfig::Deploy),
            other => Err(ParseError::UnknownConfig(other.to_string())),
        }
    }
}
