#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Async HTTP client for the MultiSafepay EWX payment API.
//!
//! [`GatewayClient`] renders each request with the `ewx` crate, posts it to
//! the environment's endpoint, and hands the body back raw or decoded as
//! configured. Every call resolves exactly once, with either the response or
//! a [`ClientError`].
//!
//! # Example
//!
//! ```no_run
//! use ewx::{ClientConfig, Environment, GatewaysQuery};
//! use ewx_http::GatewayClient;
//!
//! # async fn run() -> Result<(), ewx_http::ClientError> {
//! let config = ClientConfig::new("10010206", "1234", "123456")
//!     .with_environment(Environment::Test);
//! let client = GatewayClient::new(config)?;
//!
//! let response = client
//!     .gateways(&GatewaysQuery::new().with_country("NL"))
//!     .await?;
//! # let _ = response;
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`client`] - The gateway client and its shared dispatch routine
//! - [`constants`] - Request header values
//! - [`error`] - Transport and decoding errors
//!
//! # Feature Flags
//!
//! - `telemetry` - Wraps each dispatch in a `tracing` span and logs failures

pub mod client;
pub mod constants;
pub mod error;

pub use client::GatewayClient;
pub use error::ClientError;
