//! Client configuration loading.
//!
//! Reads a [`ClientConfig`] from a TOML file with support for environment
//! variable expansion in string values. Variables use `$VAR` or `${VAR}`
//! syntax, so secrets can stay out of the file.
//!
//! # Example Configuration
//!
//! ```toml
//! account = "10010206"
//! site_id = "1234"
//! site_secure_code = "$EWX_SECURE_CODE"
//! environment = "test"
//! response_format = "parsed-object"
//!
//! [render]
//! escape_values = false
//! emit_empty_leaves = true
//! ```
//!
//! # Environment Variables
//!
//! - `EWX_ACCOUNT` - Override the merchant account
//! - `EWX_SITE_ID` - Override the site identifier
//! - `EWX_SITE_SECURE_CODE` - Override the site secure code
//! - `EWX_ENV` - Override the environment (`production` or `test`)
//! - `EWX_RESPONSE_FORMAT` - Override the response format (`raw-xml` or `parsed-object`)

use std::path::Path;

use ewx::ClientConfig;
use serde::de::DeserializeOwned;

use crate::error::CliError;

/// Overrides the merchant account.
pub const ACCOUNT_VAR: &str = "EWX_ACCOUNT";
/// Overrides the site identifier.
pub const SITE_ID_VAR: &str = "EWX_SITE_ID";
/// Overrides the site secure code.
pub const SITE_SECURE_CODE_VAR: &str = "EWX_SITE_SECURE_CODE";
/// Overrides the environment.
pub const ENVIRONMENT_VAR: &str = "EWX_ENV";
/// Overrides the response format.
pub const RESPONSE_FORMAT_VAR: &str = "EWX_RESPONSE_FORMAT";

/// Loads the client configuration from `path` and applies environment
/// overrides.
///
/// A missing file is not an error: defaults and overrides are used.
///
/// # Errors
///
/// Returns [`CliError`] if the file cannot be read or parsed, or an override
/// names an unknown environment or response format.
pub fn load(path: &Path) -> Result<ClientConfig, CliError> {
    let mut config: ClientConfig = if path.exists() {
        read_toml(path)?
    } else {
        ClientConfig::default()
    };
    apply_overrides(&mut config, |var| std::env::var(var).ok())?;
    Ok(config)
}

/// Reads a TOML file, expanding environment variables before parsing.
///
/// # Errors
///
/// Returns [`CliError`] if the file cannot be read or parsed into `T`.
pub fn read_toml<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_owned(),
        source,
    })?;
    let expanded = expand_env_vars(&content);
    toml::from_str(&expanded).map_err(|source| CliError::Parse {
        path: path.to_owned(),
        source,
    })
}

/// Applies overrides looked up through `lookup`. Unknown environment or
/// format names are rejected rather than defaulted.
fn apply_overrides<F>(config: &mut ClientConfig, lookup: F) -> Result<(), CliError>
where
    F: Fn(&'static str) -> Option<String>,
{
    if let Some(account) = lookup(ACCOUNT_VAR) {
        config.account = account;
    }
    if let Some(site_id) = lookup(SITE_ID_VAR) {
        config.site_id = site_id;
    }
    if let Some(code) = lookup(SITE_SECURE_CODE_VAR) {
        config.site_secure_code = code;
    }
    if let Some(env) = lookup(ENVIRONMENT_VAR) {
        config.environment = env.parse().map_err(|source| CliError::Override {
            var: ENVIRONMENT_VAR,
            source,
        })?;
    }
    if let Some(format) = lookup(RESPONSE_FORMAT_VAR) {
        config.response_format = format.parse().map_err(|source| CliError::Override {
            var: RESPONSE_FORMAT_VAR,
            source,
        })?;
    }
    Ok(())
}

/// Expands `$VAR` and `${VAR}` patterns in a string from environment variables.
///
/// Unresolved variables are left as-is.
fn expand_env_vars(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '$' {
            result.push(ch);
            continue;
        }

        let braced = chars.peek() == Some(&'{');
        if braced {
            chars.next();
        }

        let mut var_name = String::new();
        let mut closed = !braced;
        while let Some(&c) = chars.peek() {
            if braced && c == '}' {
                chars.next();
                closed = true;
                break;
            }
            if !braced && !c.is_ascii_alphanumeric() && c != '_' {
                break;
            }
            var_name.push(c);
            chars.next();
        }

        let value = if closed && !var_name.is_empty() {
            std::env::var(&var_name).ok()
        } else {
            None
        };
        match value {
            Some(value) => result.push_str(&value),
            None => {
                result.push('$');
                if braced {
                    result.push('{');
                }
                result.push_str(&var_name);
                if braced && closed {
                    result.push('}');
                }
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use ewx::{Environment, ResponseFormat};

    use super::*;

    fn lookup(pairs: &[(&'static str, &str)]) -> impl Fn(&'static str) -> Option<String> {
        let map: HashMap<&'static str, String> = pairs
            .iter()
            .map(|(k, v)| (*k, (*v).to_owned()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_expand_leaves_plain_text() {
        assert_eq!(expand_env_vars("account = \"1\""), "account = \"1\"");
        assert_eq!(expand_env_vars("cost $"), "cost $");
    }

    #[test]
    fn test_expand_resolves_known_variables() {
        // PATH is set in any environment the tests run in.
        let path = std::env::var("PATH").unwrap();
        assert_eq!(expand_env_vars("$PATH"), path);
        assert_eq!(expand_env_vars("x${PATH}y"), format!("x{path}y"));
    }

    #[test]
    fn test_expand_keeps_unresolved_variables() {
        assert_eq!(
            expand_env_vars("$EWX_SURELY_UNSET_VARIABLE"),
            "$EWX_SURELY_UNSET_VARIABLE"
        );
        assert_eq!(
            expand_env_vars("${EWX_SURELY_UNSET_VARIABLE}"),
            "${EWX_SURELY_UNSET_VARIABLE}"
        );
        assert_eq!(expand_env_vars("${UNTERMINATED"), "${UNTERMINATED");
    }

    #[test]
    fn test_overrides_replace_credentials() {
        let mut config = ClientConfig::new("a", "b", "c");
        apply_overrides(
            &mut config,
            lookup(&[(ACCOUNT_VAR, "10010206"), (ENVIRONMENT_VAR, "test")]),
        )
        .unwrap();
        assert_eq!(config.account, "10010206");
        assert_eq!(config.site_id, "b");
        assert_eq!(config.environment, Environment::Test);
    }

    #[test]
    fn test_overrides_reject_unknown_environment() {
        let mut config = ClientConfig::default();
        let err = apply_overrides(&mut config, lookup(&[(ENVIRONMENT_VAR, "staging")]))
            .unwrap_err();
        assert!(matches!(err, CliError::Override { var: ENVIRONMENT_VAR, .. }));
    }

    #[test]
    fn test_overrides_parse_response_format() {
        let mut config = ClientConfig::default();
        apply_overrides(&mut config, lookup(&[(RESPONSE_FORMAT_VAR, "xml")])).unwrap();
        assert_eq!(config.response_format, ResponseFormat::RawXml);
    }

    #[test]
    fn test_read_toml_request_file() {
        let path = std::env::temp_dir().join(format!("ewx-cli-test-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            r#"
            signature = "precomputed"

            [transaction]
            id = "order-1"
            currency = "EUR"
            amount = 1000

            [gatewayinfo]
            issuerid = "0031"
            "#,
        )
        .unwrap();
        let tx: ewx::DirectTransaction = read_toml(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(tx.transaction.amount, 1000);
        assert_eq!(tx.signature.as_deref(), Some("precomputed"));
        assert_eq!(
            tx.gateway_info.and_then(|info| info.issuerid).as_deref(),
            Some("0031")
        );
        assert!(tx.issuerid.is_none());
    }

    #[test]
    fn test_read_toml_missing_file() {
        let err = read_toml::<ClientConfig>(Path::new("/nonexistent/ewx.toml")).unwrap_err();
        assert!(matches!(err, CliError::Read { .. }));
    }
}
