//! Typed request data for the EWX operations.
//!
//! Every optional value here renders as an empty leaf on transaction calls;
//! only [`GatewaysQuery`] omits unset elements.

use serde::{Deserialize, Serialize};

/// Filters for the gateway listing.
///
/// Unset fields are left out of the request entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewaysQuery {
    /// Country shortcode (e.g. `"NL"`).
    pub country: Option<String>,
    /// Locale ISO code (e.g. `"nl_NL"`).
    pub locale: Option<String>,
}

impl GatewaysQuery {
    /// Creates an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the listing to a country.
    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Localizes the listing.
    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }
}

/// Callback URLs and window behavior for a transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MerchantUrls {
    /// URL notified on status changes.
    pub notification_url: Option<String>,
    /// URL the customer returns to after paying.
    pub redirect_url: Option<String>,
    /// URL the customer returns to after cancelling.
    pub cancel_url: Option<String>,
    /// Close the payment window instead of redirecting.
    pub close_window: Option<bool>,
}

/// Customer details sent with a transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Customer {
    /// Locale ISO code.
    pub locale: Option<String>,
    /// Customer IP address.
    pub ipaddress: Option<String>,
    /// Only sent with redirect transactions.
    pub forwardedip: Option<String>,
    /// First name.
    pub firstname: Option<String>,
    /// Last name.
    pub lastname: Option<String>,
    /// Street name.
    pub address1: Option<String>,
    /// Additional address line.
    pub address2: Option<String>,
    /// House number.
    pub housenumber: Option<String>,
    /// Postal code.
    pub zipcode: Option<String>,
    /// City.
    pub city: Option<String>,
    /// State or province.
    pub state: Option<String>,
    /// Country shortcode.
    pub country: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Email address.
    pub email: Option<String>,
}

/// The order being paid for.
///
/// `id`, `currency`, and `amount` feed the request signature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionDetails {
    /// Merchant order identifier.
    pub id: String,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Amount in minor units (cents).
    pub amount: u64,
    /// Description shown to the customer.
    pub description: Option<String>,
    /// Merchant-defined value.
    pub var1: Option<String>,
    /// Merchant-defined value.
    pub var2: Option<String>,
    /// Merchant-defined value.
    pub var3: Option<String>,
    /// Free-form item listing shown on the payment page.
    pub items: Option<String>,
    /// Require manual acceptance.
    pub manual: Option<bool>,
    /// Preselected gateway code (e.g. `"IDEAL"`).
    pub gateway: Option<String>,
    /// Days the payment link stays valid.
    #[serde(rename = "daysactive")]
    pub days_active: Option<u32>,
}

impl TransactionDetails {
    /// Creates transaction details with the signed fields set.
    #[must_use]
    pub fn new(id: impl Into<String>, currency: impl Into<String>, amount: u64) -> Self {
        Self {
            id: id.into(),
            currency: currency.into(),
            amount,
            ..Self::default()
        }
    }
}

/// Google Analytics tracking for the hosted payment page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleAnalytics {
    /// Tracking account (e.g. `"UA-123456-1"`).
    pub account: Option<String>,
}

/// Gateway-specific payment details for a direct transaction.
///
/// Two shapes exist: an issuer id for bank-redirect gateways such as iDEAL,
/// and bank-account details for direct debit. Which leaves are rendered is
/// decided by the presence keys on [`DirectTransaction`], not by this struct.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayInfo {
    /// iDEAL issuer (bank) id.
    pub issuerid: Option<String>,
    /// Bank account number.
    pub accountid: Option<String>,
    /// Account holder name.
    pub accountholdername: Option<String>,
    /// Account holder city.
    pub accountholdercity: Option<String>,
    /// Account holder country.
    pub accountholdercountry: Option<String>,
    /// Account holder IBAN.
    pub accountholderiban: Option<String>,
    /// Account holder BIC.
    pub accountholderbic: Option<String>,
}

/// A payment where the customer is sent to the hosted payment page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedirectTransaction {
    /// Callback URLs and window behavior.
    pub merchant: MerchantUrls,
    /// Customer details.
    pub customer: Customer,
    /// Order details.
    pub transaction: TransactionDetails,
    /// Analytics tracking.
    pub google_analytics: GoogleAnalytics,
    /// Precomputed signature; replaces the computed one when non-empty.
    pub signature: Option<String>,
}

/// A server-to-server payment with the gateway details submitted inline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectTransaction {
    /// Callback URLs and window behavior.
    pub merchant: MerchantUrls,
    /// Customer details.
    pub customer: Customer,
    /// Order details.
    pub transaction: TransactionDetails,
    /// The `<gatewayinfo>` block is rendered only when this is set.
    #[serde(rename = "gatewayinfo")]
    pub gateway_info: Option<GatewayInfo>,
    /// Presence key: when set, the issuer id leaf is rendered from
    /// [`GatewayInfo::issuerid`]. The value itself is not sent.
    pub issuerid: Option<String>,
    /// Presence key: when set, the six bank-account leaves are rendered from
    /// [`GatewayInfo`]. The value itself is not sent.
    pub accountid: Option<String>,
    /// Analytics tracking.
    pub google_analytics: GoogleAnalytics,
    /// Precomputed signature; replaces the computed one when non-empty.
    pub signature: Option<String>,
}

/// One EWX API call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "lowercase")]
pub enum GatewayRequest {
    /// List the payment methods available to the merchant.
    Gateways(GatewaysQuery),
    /// List the banks supported by the iDEAL gateway.
    IdealIssuers,
    /// Start a hosted-page payment.
    RedirectTransaction(RedirectTransaction),
    /// Submit a payment directly.
    DirectTransaction(DirectTransaction),
}

impl GatewayRequest {
    /// Returns the root element name, which selects the operation on the wire.
    #[must_use]
    pub const fn root_name(&self) -> &'static str {
        match self {
            Self::Gateways(_) => "gateways",
            Self::IdealIssuers => "idealissuers",
            Self::RedirectTransaction(_) => "redirecttransaction",
            Self::DirectTransaction(_) => "directtransaction",
        }
    }
}

impl From<GatewaysQuery> for GatewayRequest {
    fn from(query: GatewaysQuery) -> Self {
        Self::Gateways(query)
    }
}

impl From<RedirectTransaction> for GatewayRequest {
    fn from(tx: RedirectTransaction) -> Self {
        Self::RedirectTransaction(tx)
    }
}

impl From<DirectTransaction> for GatewayRequest {
    fn from(tx: DirectTransaction) -> Self {
        Self::DirectTransaction(tx)
    }
}
