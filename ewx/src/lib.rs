#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Core types for the MultiSafepay EWX payment API.
//!
//! EWX is an XML-over-HTTP API: every operation is a single `POST` of an XML
//! document to one fixed URL per environment, and the operation is selected by
//! the document's root element. This crate holds everything that does not
//! touch the network; the HTTP client lives in `ewx-http`.
//!
//! # Modules
//!
//! - [`config`] - Merchant credentials, environment, and rendering switches
//! - [`request`] - Typed request data for each supported operation
//! - [`xml`] - Element tree and `quick-xml` serializer used by the renderers
//! - [`render`] - Per-operation request body renderers
//! - [`signature`] - Transaction request signature
//! - [`response`] - Generic XML response tree
//! - [`error`] - Configuration, rendering, and decoding errors
//!
//! # Caller responsibility
//!
//! Field values are interpolated into the request body verbatim unless
//! [`RenderOptions::escape_values`](config::RenderOptions::escape_values) is
//! enabled. A value containing `<`, `>` or `&` then corrupts the document.
//!
//! # Feature Flags
//!
//! - `telemetry` - Emits `tracing` events for rendering hazards

pub mod config;
pub mod error;
pub mod render;
pub mod request;
pub mod response;
pub mod signature;
pub mod xml;

pub use config::{ClientConfig, Environment, RenderOptions, ResponseFormat};
pub use error::{ConfigError, DecodeError, RenderError};
pub use request::{
    Customer, DirectTransaction, GatewayInfo, GatewayRequest, GatewaysQuery, GoogleAnalytics,
    MerchantUrls, RedirectTransaction, TransactionDetails,
};
pub use response::{GatewayResponse, XmlNode};
pub use signature::{ResolvedSignature, compute_signature};
