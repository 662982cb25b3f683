//! Request body renderers, one per EWX operation.
//!
//! Each renderer is a pure function of its request data and the client
//! configuration. Element order follows the EWX request schema; transaction
//! leaves are always present, with unset values rendered empty.

use crate::config::ClientConfig;
use crate::error::RenderError;
use crate::request::{
    Customer, DirectTransaction, GatewayInfo, GatewayRequest, GatewaysQuery, GoogleAnalytics,
    MerchantUrls, RedirectTransaction, TransactionDetails,
};
use crate::signature::ResolvedSignature;
use crate::xml::{Element, XmlWriter};

/// Renders the request body for any operation.
///
/// # Errors
///
/// Returns [`RenderError`] if serialization fails.
pub fn render(request: &GatewayRequest, config: &ClientConfig) -> Result<String, RenderError> {
    match request {
        GatewayRequest::Gateways(query) => gateways_body(query, config),
        GatewayRequest::IdealIssuers => ideal_issuers_body(config),
        GatewayRequest::RedirectTransaction(tx) => redirect_transaction_body(tx, config),
        GatewayRequest::DirectTransaction(tx) => direct_transaction_body(tx, config),
    }
}

/// Renders a `<gateways>` listing request.
///
/// `country` and `locale` appear in that order, each only when set and
/// non-empty.
///
/// # Errors
///
/// Returns [`RenderError`] if serialization fails.
pub fn gateways_body(query: &GatewaysQuery, config: &ClientConfig) -> Result<String, RenderError> {
    let filters = Element::new("customer")
        .optional_leaf("country", query.country.as_deref().filter(|c| !c.is_empty()))
        .optional_leaf("locale", query.locale.as_deref().filter(|l| !l.is_empty()));

    let root = root("gateways", config)
        .child(credentials(config))
        .child(filters);
    XmlWriter::new(config.render).document(&root)
}

/// Renders an `<idealissuers>` listing request.
///
/// # Errors
///
/// Returns [`RenderError`] if serialization fails.
pub fn ideal_issuers_body(config: &ClientConfig) -> Result<String, RenderError> {
    let root = root("idealissuers", config).child(credentials(config));
    XmlWriter::new(config.render).document(&root)
}

/// Renders a `<redirecttransaction>` request.
///
/// # Errors
///
/// Returns [`RenderError`] if serialization fails.
pub fn redirect_transaction_body(
    tx: &RedirectTransaction,
    config: &ClientConfig,
) -> Result<String, RenderError> {
    let signature = ResolvedSignature::resolve(&tx.transaction, config, tx.signature.as_deref());

    let root = root("redirecttransaction", config)
        .child(transaction_merchant(config, &tx.merchant))
        .child(customer(&tx.customer, true))
        .child(transaction(&tx.transaction))
        .child(google_analytics(&tx.google_analytics))
        .leaf("signature", signature.effective());
    XmlWriter::new(config.render).document(&root)
}

/// Renders a `<directtransaction>` request.
///
/// The `<gatewayinfo>` block is emitted only when
/// [`DirectTransaction::gateway_info`] is set. Inside it, the issuer leaf is
/// gated on the top-level [`DirectTransaction::issuerid`] key and the six
/// bank-account leaves on the top-level [`DirectTransaction::accountid`] key,
/// while their values are read from the nested block. Both groups may appear
/// together.
///
/// # Errors
///
/// Returns [`RenderError`] if serialization fails.
pub fn direct_transaction_body(
    tx: &DirectTransaction,
    config: &ClientConfig,
) -> Result<String, RenderError> {
    let signature = ResolvedSignature::resolve(&tx.transaction, config, tx.signature.as_deref());

    let mut root = root("directtransaction", config)
        .child(transaction_merchant(config, &tx.merchant))
        .child(customer(&tx.customer, false))
        .child(transaction(&tx.transaction));
    if let Some(info) = &tx.gateway_info {
        root = root.child(gateway_info(
            info,
            tx.issuerid.is_some(),
            tx.accountid.is_some(),
        ));
    }
    let root = root
        .child(google_analytics(&tx.google_analytics))
        .leaf("signature", signature.effective());
    XmlWriter::new(config.render).document(&root)
}

fn root(name: &'static str, config: &ClientConfig) -> Element {
    Element::new(name).attr("ua", config.user_agent.as_str())
}

fn credentials(config: &ClientConfig) -> Element {
    Element::new("merchant")
        .leaf("account", config.account.as_str())
        .leaf("site_id", config.site_id.as_str())
        .leaf("site_secure_code", config.site_secure_code.as_str())
}

fn transaction_merchant(config: &ClientConfig, urls: &MerchantUrls) -> Element {
    credentials(config)
        .leaf("notification_url", text(urls.notification_url.as_ref()))
        .leaf("redirect_url", text(urls.redirect_url.as_ref()))
        .leaf("cancel_url", text(urls.cancel_url.as_ref()))
        .leaf("close_window", text(urls.close_window))
}

fn customer(customer: &Customer, forwarded_ip: bool) -> Element {
    let element = Element::new("customer")
        .leaf("locale", text(customer.locale.as_ref()))
        .leaf("ipaddress", text(customer.ipaddress.as_ref()));
    let element = if forwarded_ip {
        element.leaf("forwardedip", text(customer.forwardedip.as_ref()))
    } else {
        element
    };
    element
        .leaf("firstname", text(customer.firstname.as_ref()))
        .leaf("lastname", text(customer.lastname.as_ref()))
        .leaf("address1", text(customer.address1.as_ref()))
        .leaf("address2", text(customer.address2.as_ref()))
        .leaf("housenumber", text(customer.housenumber.as_ref()))
        .leaf("zipcode", text(customer.zipcode.as_ref()))
        .leaf("city", text(customer.city.as_ref()))
        .leaf("state", text(customer.state.as_ref()))
        .leaf("country", text(customer.country.as_ref()))
        .leaf("phone", text(customer.phone.as_ref()))
        .leaf("email", text(customer.email.as_ref()))
}

fn transaction(tx: &TransactionDetails) -> Element {
    Element::new("transaction")
        .leaf("id", tx.id.as_str())
        .leaf("currency", tx.currency.as_str())
        .leaf("amount", tx.amount.to_string())
        .leaf("description", text(tx.description.as_ref()))
        .leaf("var1", text(tx.var1.as_ref()))
        .leaf("var2", text(tx.var2.as_ref()))
        .leaf("var3", text(tx.var3.as_ref()))
        .leaf("items", text(tx.items.as_ref()))
        .leaf("manual", text(tx.manual))
        .leaf("gateway", text(tx.gateway.as_ref()))
        .leaf("daysactive", text(tx.days_active))
}

fn gateway_info(info: &GatewayInfo, issuer: bool, account: bool) -> Element {
    let mut element = Element::new("gatewayinfo");
    if issuer {
        element = element.leaf("issuerid", text(info.issuerid.as_ref()));
    }
    if account {
        element = element
            .leaf("accountid", text(info.accountid.as_ref()))
            .leaf("accountholdername", text(info.accountholdername.as_ref()))
            .leaf("accountholdercity", text(info.accountholdercity.as_ref()))
            .leaf("accountholdercountry", text(info.accountholdercountry.as_ref()))
            .leaf("accountholderiban", text(info.accountholderiban.as_ref()))
            .leaf("accountholderbic", text(info.accountholderbic.as_ref()));
    }
    element
}

fn google_analytics(analytics: &GoogleAnalytics) -> Element {
    Element::new("google_analytics").leaf("account", text(analytics.account.as_ref()))
}

/// Unset values render as empty text.
fn text<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
