//! HTTP constants for EWX requests.

/// `Content-Type` of every request body.
pub const XML_CONTENT_TYPE: &str = "application/xml; charset=utf-8";

/// `Connection` header value; EWX exchanges are one request per connection.
pub const CONNECTION_CLOSE: &str = "close";
