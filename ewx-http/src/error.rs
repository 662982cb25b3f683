//! Error types for the EWX HTTP client.

/// Errors that can occur while sending a request to the EWX API.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// URL parse error.
    #[error("URL parse error: {context}: {source}")]
    UrlParse {
        /// Human-readable context.
        context: &'static str,
        /// The underlying parse error.
        #[source]
        source: url::ParseError,
    },

    /// The request could not be delivered or no response arrived.
    #[error("HTTP error: {context}: {source}")]
    Transport {
        /// Human-readable context.
        context: &'static str,
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },

    /// The response body could not be read.
    #[error("Failed to read response body: {context}: {source}")]
    ResponseBodyRead {
        /// Human-readable context.
        context: &'static str,
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },

    /// The response body is not UTF-8 and had to be decoded.
    #[error("Response body is not UTF-8: {context}: {source}")]
    ResponseEncoding {
        /// Human-readable context.
        context: &'static str,
        /// The underlying conversion error.
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// The request body could not be rendered.
    #[error("Failed to render request: {0}")]
    Render(#[from] ewx::RenderError),

    /// The response body is not well-formed XML.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] ewx::DecodeError),
}

impl ClientError {
    /// Returns `true` if the error came from the network exchange rather than
    /// from rendering or decoding.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::ResponseBodyRead { .. }
        )
    }
}
