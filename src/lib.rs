//! Slipway - a Clang toolchain abstraction for build-graph generation
//!
//! This crate decides, for any (architecture, configuration, target kind,
//! platform) tuple, exactly which compiler/archiver/linker flags apply and
//! how they are bound to named variables on a build edge. It performs no
//! compilation itself: every operation emits one build-edge record through
//! the [`graph::GraphWriter`] boundary, and a separate writer persists the
//! incremental build description.

pub mod core;
pub mod graph;
pub mod toolchain;
pub mod util;

pub use crate::core::{Arch, BuildConfig, ParseError, Platform, TargetKind};
pub use graph::{BuildEdge, DepsStyle, GraphWriter, Rule, VarValue};
pub use toolchain::{Toolchain, ToolchainBuilder};
pub use util::Prefs;
