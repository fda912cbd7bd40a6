//! Build preferences file support.
//!
//! Preferences are a nested TOML mapping keyed by toolchain name, read once
//! at toolchain construction:
//!
//! ```toml
//! [clang]
//! toolchain = "/opt/llvm/bin"
//!
//! [android]
//! ndk = "/opt/android-ndk"
//! api_level = 21
//! ```
//!
//! Every key is optional; absent keys default to the empty/baseline value,
//! never an error.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Build preferences.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Prefs {
    /// Clang toolchain settings
    pub clang: ClangPrefs,

    /// Android NDK settings
    pub android: AndroidPrefs,
}

/// Clang-specific preferences.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClangPrefs {
    /// Toolchain binary path prefix (e.g. /opt/llvm/bin)
    pub toolchain: Option<String>,
}

/// Android NDK preferences.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AndroidPrefs {
    /// NDK root directory; defaults to the `$ndk` substitution slot
    pub ndk: Option<String>,

    /// Android platform API level; defaults to 21
    pub api_level: Option<u32>,
}

impl Prefs {
    /// Load preferences from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read build prefs: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse build prefs: {}", path.display()))
    }

    /// Load preferences with fallback to defaults if the file is missing
    /// or malformed.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("failed to load build prefs from {}: {}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }
}
