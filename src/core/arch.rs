//! Target instruction-set architectures.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ParseError;

/// One supported target instruction set.
///
/// The set is closed; which members a platform actually specializes for is
/// decided by the flag composer, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Arch {
    X86,
    #[serde(rename = "x86-64")]
    X86_64,
    Arm6,
    Arm7,
    Arm64,
    Mips,
    Mips64,
}

impl Arch {
    /// All architectures, in declaration order.
    pub const ALL: [Arch; 7] = [
        Arch::X86,
        Arch::X86_64,
        Arch::Arm6,
        Arch::Arm7,
        Arch::Arm64,
        Arch::Mips,
        Arch::Mips64,
    ];

    /// The symbolic name used in build requests and output paths.
    pub fn name(&self) -> &'static str {
        match self {
            Arch::X86 => "x86",
            Arch::X86_64 => "x86-64",
            Arch::Arm6 => "arm6",
            Arch::Arm7 => "arm7",
            Arch::Arm64 => "arm64",
            Arch::Mips => "mips",
            Arch::Mips64 => "mips64",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Arch {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x86" => Ok(Arch::X86),
            "x86-64" | "x86_64" => Ok(Arch::X86_64),
            "arm6" => Ok(Arch::Arm6),
            "arm7" => Ok(Arch::Arm7),
            "arm64" => Ok(Arch::Arm64),
            "mips" => Ok(Arch::Mips),
            "mips64" => Ok(Arch::Mips64),
            other => Err(ParseError::UnknownArch(other.to_string())),
        }
    }
}
