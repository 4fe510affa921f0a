//! Playground configuration validator.
//!
//! [`validate`] checks a loosely-typed draft (the JSON the playground form
//! produces) against the rule table in [`rules`] and, when every rule
//! passes, returns the typed [`CheckoutConfiguration`] with defaults applied.
//! Failures are returned as data: one message per offending field.

mod draft;
mod rules;

pub(crate) use draft::set_path;
pub use rules::is_ethereum_address_str as is_ethereum_address;
pub use tixpay_sdk::objects::ValidationErrors;

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tixpay_sdk::objects::{
    BuyerInfo, CurrencyId, CurrencyList, ProductInfo, SellerInfo, ZERO_ADDRESS,
    is_unset_fee_address,
};

use draft::{decimal_at, flag_at, lookup, prune_blank, text_at, type_name};
use rules::RULES;

/// A validated playground configuration.
///
/// `fee_address` holds [`ZERO_ADDRESS`] when no fee recipient is configured,
/// in which case `fee_amount` is always zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutConfiguration {
    pub seller_address: String,
    pub amount_in_usd: Decimal,
    pub supported_currencies: CurrencyList,
    pub seller_info: Option<SellerInfo>,
    pub buyer_info: Option<BuyerInfo>,
    pub product_info: Option<ProductInfo>,
    pub invoice_number: Option<String>,
    pub fee_address: String,
    pub fee_amount: Decimal,
    pub enable_buyer_info: bool,
    pub hide_total_amount: bool,
}

impl CheckoutConfiguration {
    /// Whether a real fee recipient is configured.
    pub fn has_fee(&self) -> bool {
        !is_unset_fee_address(&self.fee_address)
    }
}

/// Validate a playground draft.
///
/// Every rule runs even after another has failed, so all offending fields
/// are reported at once.
pub fn validate(draft: &Value) -> Result<CheckoutConfiguration, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if !draft.is_object() {
        errors.add("", format!("Expected object, received {}", type_name(draft)));
        return Err(errors);
    }

    for rule in RULES {
        rule.apply(draft, &mut errors);
    }
    let configuration = assemble(draft, &mut errors);

    if errors.is_empty() {
        Ok(configuration)
    } else {
        tracing::debug!(fields = errors.len(), "Playground draft failed validation");
        Err(errors)
    }
}

/// Build a configuration from whatever the draft holds.
///
/// Never fails: missing or malformed parts fall back to their defaults and
/// section shape problems are recorded in `errors`. Used both by
/// [`validate`] and for the live preview of an invalid draft.
pub(crate) fn assemble(draft: &Value, errors: &mut ValidationErrors) -> CheckoutConfiguration {
    let draft = prune_blank(draft.clone());

    let supported_currencies = lookup(&draft, "supportedCurrencies")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .filter_map(CurrencyId::parse)
                .collect()
        })
        .unwrap_or_default();

    let (fee_address, fee_amount) = match text_at(&draft, "feeAddress") {
        Some(address) if !is_unset_fee_address(address) => (
            address.to_owned(),
            decimal_at(&draft, "feeAmount").unwrap_or(Decimal::ZERO),
        ),
        _ => (ZERO_ADDRESS.to_owned(), Decimal::ZERO),
    };

    CheckoutConfiguration {
        seller_address: text_at(&draft, "sellerAddress").unwrap_or_default().to_owned(),
        amount_in_usd: decimal_at(&draft, "amountInUSD").unwrap_or(Decimal::ZERO),
        supported_currencies,
        seller_info: section::<SellerInfo>(&draft, "sellerInfo", errors)
            .filter(|info| !info.is_empty()),
        buyer_info: section::<BuyerInfo>(&draft, "buyerInfo", errors)
            .filter(|info| !info.is_empty()),
        product_info: section::<ProductInfo>(&draft, "productInfo", errors)
            .filter(|info| !info.is_empty()),
        invoice_number: text_at(&draft, "invoiceNumber").map(str::to_owned),
        fee_address,
        fee_amount,
        enable_buyer_info: flag_at(&draft, "enableBuyerInfo").unwrap_or(true),
        hide_total_amount: flag_at(&draft, "hideTotalAmount").unwrap_or(false),
    }
}

/// Deserialize an optional object section, recording shape errors.
fn section<T: DeserializeOwned>(
    draft: &Value,
    path: &str,
    errors: &mut ValidationErrors,
) -> Option<T> {
    let value = lookup(draft, path)?;
    if !value.is_object() {
        // already reported by the rule table
        return None;
    }
    match serde_json::from_value(value.clone()) {
        Ok(section) => Some(section),
        Err(e) => {
            errors.add(path, format!("Invalid {path}: {e}"));
            None
        }
    }
}
