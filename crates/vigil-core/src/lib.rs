//! Core types, configuration, and error handling for Vigil.
//!
//! This crate provides the shared foundation used by the other Vigil crates:
//! - [`VigilError`] — unified error type using `thiserror`
//! - [`VigilConfig`] — configuration loaded from `vigil.toml` with env overrides
//! - Shared types: [`PullRequestRef`], [`ChangedFile`], [`ReviewUnit`],
//!   [`ReviewResult`], [`ContentMode`]

mod config;
mod error;
mod types;

pub use config::{GithubConfig, ModelConfig, ReviewConfig, ServerConfig, VigilConfig};
pub use error::VigilError;
pub use types::{ChangedFile, ContentMode, PullRequestRef, ReviewOutcome, ReviewResult, ReviewUnit};

/// A convenience `Result` type for Vigil operations.
pub type Result<T> = std::result::Result<T, VigilError>;
