//! Request signature for transaction operations.
//!
//! The EWX API checks transaction requests against an MD5 digest of
//! `amount ++ currency ++ account ++ site_id ++ transaction_id`. The digest is
//! required for wire compatibility and carries no security claim.

use md5::{Digest, Md5};

use crate::config::ClientConfig;
use crate::request::TransactionDetails;

/// Computes the lowercase hex MD5 signature over the concatenated fields.
///
/// # Example
///
/// ```rust
/// let signature = ewx::compute_signature("1000", "EUR", "10010206", "1234", "order-1");
/// assert_eq!(signature.len(), 32);
/// ```
#[must_use]
pub fn compute_signature(
    amount: &str,
    currency: &str,
    account: &str,
    site_id: &str,
    transaction_id: &str,
) -> String {
    let mut hasher = Md5::new();
    hasher.update(amount.as_bytes());
    hasher.update(currency.as_bytes());
    hasher.update(account.as_bytes());
    hasher.update(site_id.as_bytes());
    hasher.update(transaction_id.as_bytes());
    hex::encode(hasher.finalize())
}

/// The computed signature for a transaction alongside any caller override.
///
/// The computed value is always produced; an override only decides which of
/// the two ends up in the `<signature>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSignature {
    computed: String,
    override_value: Option<String>,
}

impl ResolvedSignature {
    /// Computes the signature for `transaction` under `config` and records
    /// `override_value`.
    #[must_use]
    pub fn resolve(
        transaction: &TransactionDetails,
        config: &ClientConfig,
        override_value: Option<&str>,
    ) -> Self {
        let computed = compute_signature(
            &transaction.amount.to_string(),
            &transaction.currency,
            &config.account,
            &config.site_id,
            &transaction.id,
        );
        Self {
            computed,
            override_value: override_value.map(str::to_owned),
        }
    }

    /// Returns the signature derived from the transaction fields.
    #[must_use]
    pub fn computed(&self) -> &str {
        &self.computed
    }

    /// Returns the caller-supplied override, if any.
    #[must_use]
    pub fn override_value(&self) -> Option<&str> {
        self.override_value.as_deref()
    }

    /// Returns the value sent on the wire: a non-empty override, otherwise
    /// the computed signature.
    #[must_use]
    pub fn effective(&self) -> &str {
        match self.override_value.as_deref() {
            Some(value) if !value.is_empty() => value,
            _ => &self.computed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_known_digest() {
        // md5("") is a fixed, well-known value.
        assert_eq!(
            compute_signature("", "", "", "", ""),
            "d41d8cd98f00b204e9800998ecf8427e"
        );
        // md5("abc") split across the five fields.
        assert_eq!(
            compute_signature("a", "b", "c", "", ""),
            "900150983cd24fb0d6963f7d28e17f72"
        );
    }

    #[test]
    fn test_signature_is_plain_concatenation() {
        assert_eq!(
            compute_signature("1000", "EUR", "10010206", "1234", "order-1"),
            compute_signature("1000EUR", "", "100102061234", "", "order-1"),
        );
        assert_ne!(
            compute_signature("1000", "EUR", "10010206", "1234", "order-1"),
            compute_signature("EUR", "1000", "10010206", "1234", "order-1"),
        );
    }

    #[test]
    fn test_signature_is_lowercase_hex() {
        let signature = compute_signature("995", "EUR", "acc", "site", "tx");
        assert_eq!(signature.len(), 32);
        assert!(signature.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
    }

    #[test]
    fn test_resolve_uses_config_and_transaction() {
        let config = ClientConfig::new("10010206", "1234", "secret");
        let tx = TransactionDetails::new("order-1", "EUR", 1000);
        let resolved = ResolvedSignature::resolve(&tx, &config, None);
        assert_eq!(
            resolved.computed(),
            compute_signature("1000", "EUR", "10010206", "1234", "order-1")
        );
        assert_eq!(resolved.effective(), resolved.computed());
    }

    #[test]
    fn test_override_wins_but_computed_is_kept() {
        let config = ClientConfig::new("10010206", "1234", "secret");
        let tx = TransactionDetails::new("order-1", "EUR", 1000);
        let resolved = ResolvedSignature::resolve(&tx, &config, Some("precomputed"));
        assert_eq!(resolved.effective(), "precomputed");
        assert_eq!(resolved.override_value(), Some("precomputed"));
        assert_eq!(
            resolved.computed(),
            compute_signature("1000", "EUR", "10010206", "1234", "order-1")
        );
    }

    #[test]
    fn test_empty_override_falls_back() {
        let config = ClientConfig::new("acc", "site", "secret");
        let tx = TransactionDetails::new("1", "EUR", 1);
        let resolved = ResolvedSignature::resolve(&tx, &config, Some(""));
        assert_eq!(resolved.effective(), resolved.computed());
    }
}
