//! Projection of a configuration into the widget: live preview props and
//! the copy-paste integration snippet.

use itertools::Itertools;
use rust_decimal::Decimal;
use serde::Serialize;
use tixpay_sdk::objects::PaymentWidgetProps;

use crate::validation::CheckoutConfiguration;

/// Package the snippet imports the widget from.
pub const WIDGET_PACKAGE: &str = "@requestnetwork/payment-widget";

const PROP_INDENT: &str = "\n      ";

/// Widget properties for the live preview.
pub fn widget_props(config: &CheckoutConfiguration, builder_id: Option<&str>) -> PaymentWidgetProps {
    PaymentWidgetProps {
        amount_in_usd: config.amount_in_usd,
        seller_address: config.seller_address.clone(),
        seller_info: config.seller_info.clone(),
        buyer_info: config.buyer_info.clone(),
        product_info: config.product_info.clone(),
        supported_currencies: config.supported_currencies.clone(),
        invoice_number: config.invoice_number.clone(),
        fee_address: config.fee_address.clone(),
        fee_amount_in_usd: if config.has_fee() {
            config.fee_amount
        } else {
            Decimal::ZERO
        },
        hide_total_amount: config.hide_total_amount,
        enable_buyer_info: config.enable_buyer_info,
        builder_id: builder_id.map(str::to_owned),
    }
}

/// Render the JSX snippet a merchant pastes into their app.
///
/// `amountInUSD` is always present. Optional props are left out when empty,
/// and both fee props are left out when no fee recipient is configured.
pub fn integration_code(config: &CheckoutConfiguration) -> String {
    let mut props = vec![format!("amountInUSD={{{}}}", number(config.amount_in_usd))];

    if let Some(json) = config.seller_info.as_ref().and_then(pretty_json) {
        props.push(format!("sellerInfo={{{json}}}"));
    }
    if let Some(json) = config.buyer_info.as_ref().and_then(pretty_json) {
        props.push(format!("buyerInfo={{{json}}}"));
    }
    if let Some(product) = &config.product_info {
        let fields = [
            ("name", &product.name),
            ("description", &product.description),
            ("image", &product.image),
        ]
        .into_iter()
        .filter_map(|(field, value)| {
            value
                .as_deref()
                .map(|v| format!("        {field}: {},", js_string(v)))
        })
        .join("\n");
        if !fields.is_empty() {
            props.push(format!("productInfo={{{{\n{fields}\n      }}}}"));
        }
    }
    if !config.seller_address.is_empty() {
        props.push(format!("sellerAddress=\"{}\"", jsx_attr(&config.seller_address)));
    }
    if !config.supported_currencies.is_empty() {
        let ids = config.supported_currencies.iter().map(|c| js_string(c.as_str())).join(",");
        props.push(format!("supportedCurrencies={{[{ids}]}}"));
    }
    if let Some(invoice) = &config.invoice_number {
        props.push(format!("invoiceNumber=\"{}\"", jsx_attr(invoice)));
    }
    if config.has_fee() {
        props.push(format!("feeAddress=\"{}\"", jsx_attr(&config.fee_address)));
        if !config.fee_amount.is_zero() {
            props.push(format!("feeAmountInUSD={{{}}}", number(config.fee_amount)));
        }
    }

    format!(
        r#"import PaymentWidget from "{WIDGET_PACKAGE}/react";

const YourComponent = () => {{
  return (
    <PaymentWidget
      {}
    />
  );
}};"#,
        props.iter().join(PROP_INDENT)
    )
}

/// Shell command installing the widget package.
pub fn install_command() -> String {
    format!("npm install {WIDGET_PACKAGE}")
}

fn number(value: Decimal) -> String {
    value.normalize().to_string()
}

fn pretty_json<T: Serialize>(value: &T) -> Option<String> {
    match serde_json::to_string_pretty(value) {
        Ok(json) => Some(json),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to render integration code section");
            None
        }
    }
}

/// Double-quoted JS string literal.
fn js_string(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}

fn jsx_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;
    use tixpay_sdk::objects::{CurrencyId, ProductInfo, SellerInfo, ZERO_ADDRESS};

    fn base() -> CheckoutConfiguration {
        CheckoutConfiguration {
            seller_address: "0xb07D2398d2004378cad234DA0EF14f1c94A530e4".to_string(),
            amount_in_usd: Decimal::new(2550, 2),
            supported_currencies: smallvec![CurrencyId::EthSepolia, CurrencyId::FakeUsdcSepolia],
            seller_info: None,
            buyer_info: None,
            product_info: None,
            invoice_number: None,
            fee_address: ZERO_ADDRESS.to_string(),
            fee_amount: Decimal::ZERO,
            enable_buyer_info: true,
            hide_total_amount: false,
        }
    }

    #[test]
    fn test_minimal_snippet() {
        let code = integration_code(&base());
        assert_eq!(
            code,
            r#"import PaymentWidget from "@requestnetwork/payment-widget/react";

const YourComponent = () => {
  return (
    <PaymentWidget
      amountInUSD={25.5}
      sellerAddress="0xb07D2398d2004378cad234DA0EF14f1c94A530e4"
      supportedCurrencies={["ETH-sepolia-sepolia","fUSDC-sepolia"]}
    />
  );
};"#
        );
    }

    #[test]
    fn test_sentinel_fee_is_omitted() {
        let mut config = base();
        config.fee_amount = Decimal::from(3);
        let code = integration_code(&config);
        assert!(!code.contains("feeAddress"));
        assert!(!code.contains("feeAmountInUSD"));
        assert_eq!(widget_props(&config, None).fee_amount_in_usd, Decimal::ZERO);
    }

    #[test]
    fn test_fee_rendered_for_real_recipient() {
        let mut config = base();
        config.fee_address = format!("0x{}", "b".repeat(40));
        config.fee_amount = Decimal::new(150, 2);
        let code = integration_code(&config);
        assert!(code.contains(&format!("feeAddress=\"0x{}\"", "b".repeat(40))));
        assert!(code.contains("feeAmountInUSD={1.5}"));
    }

    #[test]
    fn test_sections_rendered_when_present() {
        let mut config = base();
        config.seller_info = Some(SellerInfo {
            name: Some("Request Network".to_string()),
            ..SellerInfo::default()
        });
        config.product_info = Some(ProductInfo {
            name: Some("Concert \"VIP\"".to_string()),
            image: None,
            description: Some("Front row".to_string()),
        });
        config.invoice_number = Some("INV-001".to_string());

        let code = integration_code(&config);
        assert!(code.contains("sellerInfo={{\n  \"name\": \"Request Network\"\n}}"));
        assert!(code.contains(
            "productInfo={{\n        name: \"Concert \\\"VIP\\\"\",\n        description: \"Front row\",\n      }}"
        ));
        assert!(!code.contains("image:"));
        assert!(!code.contains("buyerInfo"));
        assert!(code.contains("invoiceNumber=\"INV-001\""));
    }

    #[test]
    fn test_widget_props_projection() {
        let props = widget_props(&base(), Some("demo-builder"));
        assert_eq!(props.amount_in_usd, Decimal::new(2550, 2));
        assert_eq!(props.fee_address, ZERO_ADDRESS);
        assert!(props.enable_buyer_info);
        assert_eq!(props.builder_id.as_deref(), Some("demo-builder"));
    }

    #[test]
    fn test_install_command() {
        assert_eq!(install_command(), "npm install @requestnetwork/payment-widget");
    }
}
