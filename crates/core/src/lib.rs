//! # epicurves-core
//!
//! Core types shared by the epicurves crates.
//!
//! This crate provides:
//! - The session-wide error taxonomy
//! - Secrets/configuration loading
//! - Re-exports of the worksheet types from `epicurves-sheet`

/// Startup configuration.
pub mod config;
/// Error types and result aliases.
pub mod error;

/// Re-export worksheet types from `epicurves-sheet`.
pub use epicurves_sheet::*;

/// Re-export configuration types.
pub use config::{spreadsheet_id_from_url, Credential, Secrets, DEFAULT_API_BASE};
/// Re-export core error types.
pub use error::{DashError, DashResult};
