//! Host/target OS families.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ParseError;

/// The OS family a toolchain targets.
///
/// The variants are mutually exclusive and drive the one-time platform
/// specialization pass at toolchain construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Generic POSIX target with no platform-specific specialization.
    Generic,
    Windows,
    Android,
}

impl Platform {
    pub fn is_windows(&self) -> bool {
        matches!(self, Platform::Windows)
    }

    pub fn is_android(&self) -> bool {
        matches!(self, Platform::Android)
    }

    /// The symbolic name used in preferences and build requests.
    pub fn name(&self) -> &'static str {
        match self {
            Platform::Generic => "generic",
            Platform::Windows => "windows",
            Platform::Android => "android",
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Platform::Generic
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Platform {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "generic" | "posix" => Ok(Platform::Generic),
            "windows" => Ok(Platform::Windows),
            "android" => Ok(Platform::Android),
            other => Err(ParseError::UnknownPlatform(other.to_string())),
        }
    }
}
