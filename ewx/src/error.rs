//! Error types for configuration, request rendering, and response decoding.

/// Errors raised while building a [`ClientConfig`](crate::ClientConfig).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The environment name is neither `production` nor `test`.
    #[error("unknown environment '{0}', expected 'production' or 'test'")]
    UnknownEnvironment(String),

    /// The response format name is not recognized.
    #[error("unknown response format '{0}', expected 'raw-xml' or 'parsed-object'")]
    UnknownResponseFormat(String),
}

/// Errors raised while serializing a request document.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The XML writer failed.
    #[error("failed to write XML: {0}")]
    Io(#[from] std::io::Error),

    /// The XML writer rejected an event.
    #[error("failed to write XML: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The serialized document is not valid UTF-8.
    #[error("rendered document is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Errors raised while decoding a response body into an
/// [`XmlNode`](crate::XmlNode) tree.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The body is not well-formed XML.
    #[error("malformed XML at byte {position}: {source}")]
    Xml {
        /// Byte offset reported by the reader.
        position: u64,
        /// The underlying reader error.
        #[source]
        source: quick_xml::Error,
    },

    /// An element carries a malformed attribute.
    #[error("malformed attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    /// The body contains no root element.
    #[error("document has no root element")]
    MissingRoot,

    /// The body ended before an element was closed.
    #[error("element <{0}> is not closed")]
    Unclosed(String),

    /// Character data appears before or after the root element.
    #[error("unexpected text '{0}' outside the root element")]
    TextOutsideRoot(String),

    /// A second top-level element follows the root.
    #[error("unexpected element <{0}> after the root element")]
    TrailingElement(String),
}
