//! Property object of the external payment widget.
//!
//! The widget itself is opaque. These types only describe what it accepts so
//! that the checkout flow and the playground can hand it a well-formed
//! configuration.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::currencies::CurrencyId;

/// Placeholder fee recipient meaning "no fee configured".
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Ordered currency selection; rarely more than a handful of entries.
pub type CurrencyList = smallvec::SmallVec<[CurrencyId; 4]>;

/// Returns `true` when `address` is empty or the [`ZERO_ADDRESS`] sentinel.
pub fn is_unset_fee_address(address: &str) -> bool {
    address.is_empty() || address.eq_ignore_ascii_case(ZERO_ADDRESS)
}

/// Postal address in the vCard-style field names the widget uses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalAddress {
    #[serde(rename = "street-address", default, skip_serializing_if = "Option::is_none")]
    pub street_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(rename = "postal-code", default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(rename = "country-name", default, skip_serializing_if = "Option::is_none")]
    pub country_name: Option<String>,
}

impl PostalAddress {
    pub fn is_empty(&self) -> bool {
        self.street_address.is_none()
            && self.locality.is_none()
            && self.region.is_none()
            && self.postal_code.is_none()
            && self.country_name.is_none()
    }
}

/// Billing contact shared by the seller and buyer blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_registration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<PostalAddress>,
}

impl ContactInfo {
    pub fn is_empty(&self) -> bool {
        self.business_name.is_none()
            && self.tax_registration.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.address.as_ref().is_none_or(PostalAddress::is_empty)
    }
}

/// Seller branding plus billing contact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellerInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(flatten)]
    pub contact: ContactInfo,
}

impl SellerInfo {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.logo.is_none() && self.contact.is_empty()
    }
}

/// Buyer billing contact. Same shape as the seller's, without branding.
pub type BuyerInfo = ContactInfo;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ProductInfo {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.image.is_none() && self.description.is_none()
    }
}

/// Properties handed to the payment widget.
///
/// Built either from the cart total (checkout flow) or from a validated
/// playground configuration. `hide_total_amount` and `enable_buyer_info`
/// only change how the widget renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentWidgetProps {
    #[serde(rename = "amountInUSD", with = "rust_decimal::serde::float")]
    pub amount_in_usd: Decimal,
    pub seller_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_info: Option<SellerInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyer_info: Option<BuyerInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_info: Option<ProductInfo>,
    pub supported_currencies: CurrencyList,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    pub fee_address: String,
    #[serde(rename = "feeAmountInUSD", with = "rust_decimal::serde::float")]
    pub fee_amount_in_usd: Decimal,
    #[serde(default)]
    pub hide_total_amount: bool,
    #[serde(default)]
    pub enable_buyer_info: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub builder_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn test_unset_fee_address() {
        assert!(is_unset_fee_address(""));
        assert!(is_unset_fee_address(ZERO_ADDRESS));
        assert!(!is_unset_fee_address(
            "0xb07D2398d2004378cad234DA0EF14f1c94A530e4"
        ));
    }

    #[test]
    fn test_seller_info_flattens_contact() {
        let json = r#"{
            "name": "Request Network",
            "firstName": "John",
            "address": { "street-address": "123 Main St", "country-name": "USA" }
        }"#;
        let info: SellerInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.name.as_deref(), Some("Request Network"));
        assert_eq!(info.contact.first_name.as_deref(), Some("John"));
        let address = info.contact.address.unwrap();
        assert_eq!(address.street_address.as_deref(), Some("123 Main St"));
        assert_eq!(address.country_name.as_deref(), Some("USA"));
    }

    #[test]
    fn test_props_wire_names() {
        let props = PaymentWidgetProps {
            amount_in_usd: Decimal::new(2550, 2),
            seller_address: "0xb07D2398d2004378cad234DA0EF14f1c94A530e4".to_string(),
            seller_info: None,
            buyer_info: None,
            product_info: None,
            supported_currencies: smallvec![CurrencyId::EthSepolia],
            invoice_number: None,
            fee_address: ZERO_ADDRESS.to_string(),
            fee_amount_in_usd: Decimal::ZERO,
            hide_total_amount: true,
            enable_buyer_info: false,
            builder_id: None,
        };
        let value = serde_json::to_value(&props).unwrap();
        assert_eq!(value["amountInUSD"], serde_json::json!(25.5));
        assert_eq!(value["feeAmountInUSD"], serde_json::json!(0.0));
        assert_eq!(
            value["supportedCurrencies"],
            serde_json::json!(["ETH-sepolia-sepolia"])
        );
        assert_eq!(value["hideTotalAmount"], serde_json::json!(true));
        assert!(value.get("sellerInfo").is_none());
    }
}
