//! Merchant configuration for the EWX client.
//!
//! A [`ClientConfig`] is built once and never mutated afterwards. It carries
//! the merchant credentials embedded in every request, the target
//! [`Environment`], how responses are handed back, and the switches that
//! control request rendering.
//!
//! # Example
//!
//! ```rust
//! use ewx::config::{ClientConfig, Environment, ResponseFormat};
//!
//! let config = ClientConfig::new("10010206", "1234", "123456")
//!     .with_environment(Environment::Test)
//!     .with_response_format(ResponseFormat::RawXml);
//!
//! assert_eq!(config.endpoint(), "https://testapi.multisafepay.com/ewx/");
//! ```
//!
//! # TOML
//!
//! Missing keys fall back to their defaults; unknown environment or format
//! names are rejected when the file is loaded.
//!
//! ```toml
//! account = "10010206"
//! site_id = "1234"
//! site_secure_code = "123456"
//! environment = "test"
//! response_format = "parsed-object"
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Production EWX endpoint.
pub const PRODUCTION_ENDPOINT: &str = "https://api.multisafepay.com/ewx/";

/// Sandbox EWX endpoint.
pub const TEST_ENDPOINT: &str = "https://testapi.multisafepay.com/ewx/";

/// User agent embedded in the `ua` attribute of every request root.
pub const DEFAULT_USER_AGENT: &str = concat!("ewx-rs-", env!("CARGO_PKG_VERSION"));

/// Target EWX environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Live payments.
    #[default]
    Production,
    /// Sandbox host.
    Test,
}

impl Environment {
    /// Returns the fixed endpoint URL for this environment.
    #[must_use]
    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::Production => PRODUCTION_ENDPOINT,
            Self::Test => TEST_ENDPOINT,
        }
    }

    /// Maps a loosely-typed environment value the way older integrations did:
    /// `"test"` selects the sandbox and every other value, including an empty
    /// one, selects production.
    ///
    /// Prefer [`str::parse`], which rejects unknown names.
    #[must_use]
    pub fn from_legacy_value(value: &str) -> Self {
        if value == "test" {
            Self::Test
        } else {
            Self::Production
        }
    }

    /// Returns the configuration name of this environment.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Test => "test",
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "production" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            other => Err(ConfigError::UnknownEnvironment(other.to_owned())),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a response body is handed back to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResponseFormat {
    /// The body text, unchanged.
    #[serde(alias = "xml")]
    RawXml,
    /// The body decoded into an [`XmlNode`](crate::XmlNode) tree.
    #[default]
    #[serde(alias = "object")]
    ParsedObject,
}

impl FromStr for ResponseFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raw-xml" | "xml" => Ok(Self::RawXml),
            "parsed-object" | "object" => Ok(Self::ParsedObject),
            other => Err(ConfigError::UnknownResponseFormat(other.to_owned())),
        }
    }
}

/// Switches controlling how request documents are serialized.
///
/// The defaults reproduce the legacy wire output byte for byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Escape `<`, `>`, `&`, and quotes in field values. Off by default:
    /// values are written verbatim and must already be XML-safe.
    pub escape_values: bool,

    /// Emit transaction leaves whose value is empty as `<name></name>`.
    /// On by default; when off, empty leaves are dropped from the document.
    pub emit_empty_leaves: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            escape_values: false,
            emit_empty_leaves: true,
        }
    }
}

/// Merchant configuration shared by every request a client sends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Merchant account number.
    pub account: String,

    /// Site identifier.
    pub site_id: String,

    /// Site secure code.
    pub site_secure_code: String,

    /// Target environment (default: production).
    pub environment: Environment,

    /// Response decoding mode (default: parsed object).
    pub response_format: ResponseFormat,

    /// Value of the `ua` attribute on every request root.
    pub user_agent: String,

    /// Request serialization switches.
    pub render: RenderOptions,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            account: String::new(),
            site_id: String::new(),
            site_secure_code: String::new(),
            environment: Environment::default(),
            response_format: ResponseFormat::default(),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            render: RenderOptions::default(),
        }
    }
}

impl ClientConfig {
    /// Creates a production configuration for the given merchant credentials.
    #[must_use]
    pub fn new(
        account: impl Into<String>,
        site_id: impl Into<String>,
        site_secure_code: impl Into<String>,
    ) -> Self {
        Self {
            account: account.into(),
            site_id: site_id.into(),
            site_secure_code: site_secure_code.into(),
            ..Self::default()
        }
    }

    /// Sets the target environment.
    #[must_use]
    pub const fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Sets the response decoding mode.
    #[must_use]
    pub const fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = format;
        self
    }

    /// Sets the user agent tag.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sets the request serialization switches.
    #[must_use]
    pub const fn with_render_options(mut self, render: RenderOptions) -> Self {
        self.render = render;
        self
    }

    /// Returns the endpoint URL selected by the configured environment.
    #[must_use]
    pub const fn endpoint(&self) -> &'static str {
        self.environment.endpoint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.account, "");
        assert_eq!(config.site_id, "");
        assert_eq!(config.site_secure_code, "");
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.response_format, ResponseFormat::ParsedObject);
        assert!(config.user_agent.starts_with("ewx-rs-"));
        assert!(!config.render.escape_values);
        assert!(config.render.emit_empty_leaves);
    }

    #[test]
    fn test_endpoint_selection() {
        let test = ClientConfig::default().with_environment(Environment::Test);
        assert_eq!(test.endpoint(), TEST_ENDPOINT);

        let production = ClientConfig::default();
        assert_eq!(production.endpoint(), PRODUCTION_ENDPOINT);
    }

    #[test]
    fn test_legacy_environment_mapping() {
        assert_eq!(Environment::from_legacy_value("test"), Environment::Test);
        assert_eq!(
            Environment::from_legacy_value("production"),
            Environment::Production
        );
        assert_eq!(Environment::from_legacy_value(""), Environment::Production);
        assert_eq!(
            Environment::from_legacy_value("staging"),
            Environment::Production
        );
        assert_eq!(Environment::from_legacy_value("TEST"), Environment::Production);
    }

    #[test]
    fn test_environment_parse_is_strict() {
        assert_eq!("test".parse::<Environment>().unwrap(), Environment::Test);
        assert_eq!(
            "production".parse::<Environment>().unwrap(),
            Environment::Production
        );
        assert_eq!(
            "staging".parse::<Environment>().unwrap_err(),
            ConfigError::UnknownEnvironment("staging".into())
        );
    }

    #[test]
    fn test_response_format_parse() {
        assert_eq!("xml".parse::<ResponseFormat>().unwrap(), ResponseFormat::RawXml);
        assert_eq!(
            "raw-xml".parse::<ResponseFormat>().unwrap(),
            ResponseFormat::RawXml
        );
        assert_eq!(
            "object".parse::<ResponseFormat>().unwrap(),
            ResponseFormat::ParsedObject
        );
        assert!("json".parse::<ResponseFormat>().is_err());
    }

    #[test]
    fn test_toml_merges_over_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
            account = "10010206"
            environment = "test"
            response_format = "xml"
            "#,
        )
        .unwrap();
        assert_eq!(config.account, "10010206");
        assert_eq!(config.site_id, "");
        assert_eq!(config.environment, Environment::Test);
        assert_eq!(config.response_format, ResponseFormat::RawXml);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.render, RenderOptions::default());
    }

    #[test]
    fn test_toml_rejects_unknown_environment() {
        let result: Result<ClientConfig, _> = toml::from_str(r#"environment = "staging""#);
        assert!(result.is_err());
    }
}
