//! The EWX gateway client.
//!
//! Every operation renders its XML body, then goes through one shared
//! dispatch routine, [`GatewayClient::post`], which sends the body to the
//! configured endpoint and converts the reply according to the configured
//! [`ResponseFormat`].
//!
//! ## Error Handling
//!
//! Failures are returned, never raised past the caller:
//! - transport failures (connection refused, TLS, reset) as
//!   [`ClientError::Transport`]
//! - unreadable bodies as [`ClientError::ResponseBodyRead`], and non-UTF-8
//!   bodies in parsed mode as [`ClientError::ResponseEncoding`]
//! - malformed XML in parsed mode as [`ClientError::Decode`]
//!
//! HTTP status codes are not errors: EWX reports failures inside the XML
//! body, so the body is always handed back.

use std::fmt::Display;

use ewx::render;
use ewx::{
    ClientConfig, DirectTransaction, GatewayRequest, GatewayResponse, GatewaysQuery,
    RedirectTransaction, ResponseFormat,
};
use reqwest::Client;
use reqwest::header::{CONNECTION, CONTENT_LENGTH, CONTENT_TYPE};
use url::Url;

#[cfg(feature = "telemetry")]
use tracing::{Span, instrument};

use crate::constants::{CONNECTION_CLOSE, XML_CONTENT_TYPE};
use crate::error::ClientError;

/// A client for the EWX API.
///
/// Holds only immutable configuration, so one instance (or its clones) can
/// serve any number of concurrent calls.
#[derive(Clone, Debug)]
pub struct GatewayClient {
    /// Merchant configuration embedded in every request
    config: ClientConfig,
    /// URL every request is posted to
    endpoint: Url,
    /// Shared Reqwest HTTP client
    client: Client,
}

impl GatewayClient {
    /// Creates a client posting to the endpoint of `config.environment`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::UrlParse`] if the endpoint URL cannot be parsed.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let endpoint =
            Url::parse(config.endpoint()).map_err(|e| ClientError::UrlParse {
                context: "Failed to parse environment endpoint",
                source: e,
            })?;
        Ok(Self {
            config,
            endpoint,
            client: Client::new(),
        })
    }

    /// Posts to `endpoint` instead of the environment's URL.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Uses a preconfigured reqwest client.
    #[must_use]
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Returns the merchant configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the URL requests are posted to.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Renders the body `request` would be sent with, without sending it.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Render`] if serialization fails.
    pub fn render(&self, request: &GatewayRequest) -> Result<String, ClientError> {
        Ok(render::render(request, &self.config)?)
    }

    /// Sends any EWX request.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if rendering, the HTTP exchange, or decoding fails.
    pub async fn send(&self, request: &GatewayRequest) -> Result<GatewayResponse, ClientError> {
        let body = self.render(request)?;
        self.post(body).await
    }

    /// Lists the payment methods available to the merchant.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if rendering, the HTTP exchange, or decoding fails.
    pub async fn gateways(&self, query: &GatewaysQuery) -> Result<GatewayResponse, ClientError> {
        let body = render::gateways_body(query, &self.config)?;
        self.post(body).await
    }

    /// Lists the banks supported by the iDEAL gateway.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if rendering, the HTTP exchange, or decoding fails.
    pub async fn ideal_issuers(&self) -> Result<GatewayResponse, ClientError> {
        let body = render::ideal_issuers_body(&self.config)?;
        self.post(body).await
    }

    /// Starts a hosted-page payment.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if rendering, the HTTP exchange, or decoding fails.
    pub async fn redirect_transaction(
        &self,
        transaction: &RedirectTransaction,
    ) -> Result<GatewayResponse, ClientError> {
        let body = render::redirect_transaction_body(transaction, &self.config)?;
        self.post(body).await
    }

    /// Submits a payment directly.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if rendering, the HTTP exchange, or decoding fails.
    pub async fn direct_transaction(
        &self,
        transaction: &DirectTransaction,
    ) -> Result<GatewayResponse, ClientError> {
        let body = render::direct_transaction_body(transaction, &self.config)?;
        self.post(body).await
    }

    /// Posts a rendered XML document and converts the reply.
    ///
    /// The whole body is buffered before it is converted. In raw mode the
    /// body is returned byte for byte; in parsed mode it is decoded into an
    /// [`XmlNode`](ewx::XmlNode) tree.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the HTTP exchange fails, the body cannot be
    /// read, or it cannot be decoded.
    #[cfg_attr(
        feature = "telemetry",
        instrument(
            name = "ewx.client.post",
            skip_all,
            fields(
                endpoint = %self.endpoint,
                bytes = body.len(),
                otel.status_code = tracing::field::Empty,
                error.message = tracing::field::Empty,
            )
        )
    )]
    pub async fn post(&self, body: String) -> Result<GatewayResponse, ClientError> {
        let result = self.post_inner(body).await;
        record_result_on_span(&result);
        result
    }

    async fn post_inner(&self, body: String) -> Result<GatewayResponse, ClientError> {
        let context = "POST ewx";
        let http_response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, XML_CONTENT_TYPE)
            .header(CONTENT_LENGTH, body.len())
            .header(CONNECTION, CONNECTION_CLOSE)
            .body(body)
            .send()
            .await
            .map_err(|e| ClientError::Transport { context, source: e })?;

        log_status(http_response.status());

        let bytes = http_response
            .bytes()
            .await
            .map_err(|e| ClientError::ResponseBodyRead { context, source: e })?;
        let format = self.config.response_format;
        let text = match format {
            // Raw bodies are handed back whatever their declared encoding.
            ResponseFormat::RawXml => String::from_utf8_lossy(&bytes).into_owned(),
            ResponseFormat::ParsedObject => String::from_utf8(bytes.to_vec())
                .map_err(|e| ClientError::ResponseEncoding { context, source: e })?,
        };

        Ok(GatewayResponse::from_body(text, format)?)
    }
}

/// Logs responses whose status is not 2xx. The body is still delivered.
#[cfg(feature = "telemetry")]
fn log_status(status: reqwest::StatusCode) {
    if !status.is_success() {
        tracing::warn!(%status, "EWX answered with a non-success status");
    }
}

#[cfg(not(feature = "telemetry"))]
const fn log_status(_status: reqwest::StatusCode) {}

/// Records the outcome of a request on a tracing span, including status and errors.
#[cfg(feature = "telemetry")]
fn record_result_on_span<R, E: Display>(result: &Result<R, E>) {
    let span = Span::current();
    match result {
        Ok(_) => {
            span.record("otel.status_code", "OK");
        }
        Err(err) => {
            span.record("otel.status_code", "ERROR");
            span.record("error.message", tracing::field::display(err));
            tracing::event!(tracing::Level::ERROR, error = %err, "Request to EWX failed");
        }
    }
}

/// Records the outcome of a request on a tracing span, including status and errors.
/// Noop if telemetry feature is off.
#[cfg(not(feature = "telemetry"))]
fn record_result_on_span<R, E: Display>(_result: &Result<R, E>) {}
