//! Command-line front end for the EWX payment API.
//!
//! # Modules
//!
//! - [`args`] - Command-line arguments
//! - [`config`] - Client configuration loading with environment variable expansion
//! - [`error`] - CLI error types

pub mod args;
pub mod config;
pub mod error;
