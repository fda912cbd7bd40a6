//! Core domain vocabulary: architectures, configurations, target kinds,
//! and platforms.
//!
//! Each set is closed. Parsing an unknown name is a caller error and fails
//! fast with a [`ParseError`]; composition over a well-formed value that a
//! given platform does not support degrades to an empty flag list instead
//! (see `toolchain::flags`).

use thiserror::Error;

mod arch;
mod config;
mod platform;
mod target;

pub use arch::Arch;
pub use config::BuildConfig;
pub use platform::Platform;
pub use target::TargetKind;

/// Error raised when a caller-supplied symbolic name is not in the
/// closed set it claims to belong to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown architecture '{0}'")]
    UnknownArch(String),

    #[error("unknown build configuration '{0}'")]
    UnknownConfig(String),

    #[error("unknown target kind '{0}'")]
    UnknownTargetKind(String),

    #[error("unknown platform '{0}'")]
    UnknownPlatform(String),
}
