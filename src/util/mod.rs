//! Shared utilities

pub mod config;
pub mod paths;

pub use config::Prefs;
