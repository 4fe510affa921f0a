//! Declarative rule table for playground drafts.
//!
//! Each [`FieldRule`] names a path, whether the field must be present, the
//! JSON type it must have and an optional check on its value. Rules run
//! independently; the first message recorded for a path wins.

use rust_decimal::Decimal;
use serde_json::{Value, json};
use tixpay_sdk::objects::{CurrencyId, ValidationErrors};

use super::draft::{lookup, to_decimal, type_name};

pub(crate) enum Requirement {
    /// Absent fields report [`REQUIRED_MESSAGE`].
    Required,
    /// Absent fields, `null` and `""` are skipped.
    Optional,
    /// Absent fields are checked as if they held this default.
    Default(fn() -> Value),
}

#[derive(Clone, Copy)]
pub(crate) enum Kind {
    Text,
    Number,
    Flag,
    List,
    Object,
}

impl Kind {
    fn accepts(self, value: &Value) -> bool {
        match self {
            Kind::Text => value.is_string(),
            Kind::Number => value.is_number(),
            Kind::Flag => value.is_boolean(),
            Kind::List => value.is_array(),
            Kind::Object => value.is_object(),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Kind::Text => "string",
            Kind::Number => "number",
            Kind::Flag => "boolean",
            Kind::List => "array",
            Kind::Object => "object",
        }
    }
}

pub(crate) enum Check {
    None,
    /// The value must satisfy the predicate, otherwise the message is reported.
    Holds(fn(&Value) -> bool, &'static str),
    /// Every list entry is checked; failures are reported at `{path}.{index}`.
    EachItem(fn(&Value) -> Option<String>),
}

pub(crate) struct FieldRule {
    pub path: &'static str,
    pub requirement: Requirement,
    pub kind: Kind,
    pub check: Check,
}

pub(crate) const REQUIRED_MESSAGE: &str = "Required";

/// A JSON number that has no exact decimal form.
pub(crate) const OUT_OF_RANGE_MESSAGE: &str = "Number is out of range";

pub(crate) static RULES: &[FieldRule] = &[
    FieldRule {
        path: "sellerAddress",
        requirement: Requirement::Required,
        kind: Kind::Text,
        check: Check::Holds(is_ethereum_address, "Invalid seller address"),
    },
    FieldRule {
        path: "amountInUSD",
        requirement: Requirement::Default(zero),
        kind: Kind::Number,
        check: Check::Holds(is_positive, "Amount needs to be higher than 0"),
    },
    FieldRule {
        path: "supportedCurrencies",
        requirement: Requirement::Default(empty_list),
        kind: Kind::List,
        check: Check::Holds(is_non_empty_list, "At least one currency must be selected"),
    },
    FieldRule {
        path: "supportedCurrencies",
        requirement: Requirement::Default(empty_list),
        kind: Kind::List,
        check: Check::EachItem(unsupported_currency),
    },
    FieldRule {
        path: "sellerInfo",
        requirement: Requirement::Optional,
        kind: Kind::Object,
        check: Check::None,
    },
    FieldRule {
        path: "sellerInfo.name",
        requirement: Requirement::Optional,
        kind: Kind::Text,
        check: Check::Holds(has_min_two_chars, "Seller name needs to be at least 2 characters"),
    },
    FieldRule {
        path: "sellerInfo.logo",
        requirement: Requirement::Optional,
        kind: Kind::Text,
        check: Check::Holds(is_url, "Invalid seller logo"),
    },
    FieldRule {
        path: "buyerInfo",
        requirement: Requirement::Optional,
        kind: Kind::Object,
        check: Check::None,
    },
    FieldRule {
        path: "productInfo",
        requirement: Requirement::Optional,
        kind: Kind::Object,
        check: Check::None,
    },
    FieldRule {
        path: "productInfo.name",
        requirement: Requirement::Optional,
        kind: Kind::Text,
        check: Check::Holds(has_min_two_chars, "Product name needs to be at least 2 characters"),
    },
    FieldRule {
        path: "productInfo.image",
        requirement: Requirement::Optional,
        kind: Kind::Text,
        check: Check::Holds(is_url, "Invalid product image"),
    },
    FieldRule {
        path: "productInfo.description",
        requirement: Requirement::Optional,
        kind: Kind::Text,
        check: Check::None,
    },
    FieldRule {
        path: "invoiceNumber",
        requirement: Requirement::Optional,
        kind: Kind::Text,
        check: Check::None,
    },
    FieldRule {
        path: "feeAddress",
        requirement: Requirement::Optional,
        kind: Kind::Text,
        check: Check::None,
    },
    FieldRule {
        path: "feeAmount",
        requirement: Requirement::Optional,
        kind: Kind::Number,
        check: Check::None,
    },
    FieldRule {
        path: "enableBuyerInfo",
        requirement: Requirement::Optional,
        kind: Kind::Flag,
        check: Check::None,
    },
    FieldRule {
        path: "hideTotalAmount",
        requirement: Requirement::Optional,
        kind: Kind::Flag,
        check: Check::None,
    },
];

impl FieldRule {
    pub(crate) fn apply(&self, draft: &Value, errors: &mut ValidationErrors) {
        let defaulted;
        let value = match (lookup(draft, self.path), &self.requirement) {
            (Some(Value::String(s)), Requirement::Optional) if s.is_empty() => return,
            (Some(value), _) => value,
            (None, Requirement::Optional) => return,
            (None, Requirement::Required) => {
                errors.add(self.path, REQUIRED_MESSAGE);
                return;
            }
            (None, Requirement::Default(default)) => {
                defaulted = default();
                &defaulted
            }
        };

        if !self.kind.accepts(value) {
            errors.add(
                self.path,
                format!(
                    "Expected {}, received {}",
                    self.kind.name(),
                    type_name(value)
                ),
            );
            return;
        }
        if matches!(self.kind, Kind::Number) && to_decimal(value).is_none() {
            errors.add(self.path, OUT_OF_RANGE_MESSAGE);
            return;
        }

        match self.check {
            Check::None => {}
            Check::Holds(predicate, message) => {
                if !predicate(value) {
                    errors.add(self.path, message);
                }
            }
            Check::EachItem(item_error) => {
                let items = value.as_array().map(Vec::as_slice).unwrap_or_default();
                for (index, item) in items.iter().enumerate() {
                    if let Some(message) = item_error(item) {
                        errors.add(format!("{}.{index}", self.path), message);
                    }
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn zero() -> Value {
    json!(0)
}

fn empty_list() -> Value {
    json!([])
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// `0x` followed by 40 hex digits, case-insensitive.
pub(crate) fn is_ethereum_address(value: &Value) -> bool {
    value.as_str().is_some_and(is_ethereum_address_str)
}

pub fn is_ethereum_address_str(address: &str) -> bool {
    let Some(hex) = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
    else {
        return false;
    };
    hex.len() == 40 && hex.bytes().all(|b| b.is_ascii_hexdigit())
}

fn is_positive(value: &Value) -> bool {
    to_decimal(value).is_some_and(|amount| amount > Decimal::ZERO)
}

fn is_non_empty_list(value: &Value) -> bool {
    value.as_array().is_some_and(|items| !items.is_empty())
}

fn has_min_two_chars(value: &Value) -> bool {
    value.as_str().is_some_and(|s| s.chars().count() >= 2)
}

fn is_url(value: &Value) -> bool {
    value.as_str().is_some_and(|s| url::Url::parse(s).is_ok())
}

fn unsupported_currency(item: &Value) -> Option<String> {
    match item.as_str() {
        Some(id) if CurrencyId::parse(id).is_some() => None,
        Some(id) => Some(format!("Unsupported currency `{id}`")),
        None => Some(format!("Expected string, received {}", type_name(item))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(draft: Value) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        for rule in RULES {
            rule.apply(&draft, &mut errors);
        }
        errors
    }

    #[test]
    fn test_address_format() {
        assert!(is_ethereum_address_str(&format!("0x{}", "a".repeat(40))));
        assert!(is_ethereum_address_str(
            "0xb07D2398d2004378cad234DA0EF14f1c94A530e4"
        ));
        assert!(is_ethereum_address_str(&format!("0X{}", "F".repeat(40))));
        assert!(!is_ethereum_address_str(&format!("0x{}", "a".repeat(39))));
        assert!(!is_ethereum_address_str(&format!("0x{}", "g".repeat(40))));
        assert!(!is_ethereum_address_str(&"a".repeat(42)));
        assert!(!is_ethereum_address_str("not-an-address"));
    }

    #[test]
    fn test_missing_seller_address_is_required() {
        let errors = run(json!({}));
        assert_eq!(errors.get("sellerAddress"), Some(REQUIRED_MESSAGE));
        assert_eq!(
            errors.get("amountInUSD"),
            Some("Amount needs to be higher than 0")
        );
        assert_eq!(
            errors.get("supportedCurrencies"),
            Some("At least one currency must be selected")
        );
    }

    #[test]
    fn test_type_mismatch_reported_once() {
        let errors = run(json!({
            "sellerAddress": 42,
            "supportedCurrencies": "ETH-sepolia-sepolia",
            "amountInUSD": "ten"
        }));
        assert_eq!(
            errors.get("sellerAddress"),
            Some("Expected string, received number")
        );
        assert_eq!(
            errors.get("supportedCurrencies"),
            Some("Expected array, received string")
        );
        assert_eq!(
            errors.get("amountInUSD"),
            Some("Expected number, received string")
        );
    }

    #[test]
    fn test_unknown_currency_reported_per_entry() {
        let errors = run(json!({
            "supportedCurrencies": ["ETH-sepolia-sepolia", "DOGE-moon", 7]
        }));
        assert!(!errors.contains("supportedCurrencies"));
        assert!(!errors.contains("supportedCurrencies.0"));
        assert_eq!(
            errors.get("supportedCurrencies.1"),
            Some("Unsupported currency `DOGE-moon`")
        );
        assert_eq!(
            errors.get("supportedCurrencies.2"),
            Some("Expected string, received number")
        );
    }

    #[test]
    fn test_optional_blank_fields_are_skipped() {
        let errors = run(json!({
            "sellerInfo": { "name": "", "logo": "" },
            "productInfo": { "name": "", "image": "" }
        }));
        assert!(!errors.contains("sellerInfo.name"));
        assert!(!errors.contains("sellerInfo.logo"));
        assert!(!errors.contains("productInfo.name"));
        assert!(!errors.contains("productInfo.image"));
    }

    #[test]
    fn test_branding_checks() {
        let errors = run(json!({
            "sellerInfo": { "name": "R", "logo": "logo.png" },
            "productInfo": { "name": "T", "image": "not a url" }
        }));
        assert_eq!(
            errors.get("sellerInfo.name"),
            Some("Seller name needs to be at least 2 characters")
        );
        assert_eq!(errors.get("sellerInfo.logo"), Some("Invalid seller logo"));
        assert_eq!(
            errors.get("productInfo.name"),
            Some("Product name needs to be at least 2 characters")
        );
        assert_eq!(errors.get("productInfo.image"), Some("Invalid product image"));
    }

    #[test]
    fn test_non_object_section() {
        let errors = run(json!({ "sellerInfo": "Acme" }));
        assert_eq!(
            errors.get("sellerInfo"),
            Some("Expected object, received string")
        );
        assert!(!errors.contains("sellerInfo.name"));
    }

    #[test]
    fn test_unrepresentable_numbers_are_out_of_range() {
        for amount in [json!(1e-30), json!(1e30), json!(1.5e300)] {
            let errors = run(json!({ "amountInUSD": amount.clone(), "feeAmount": amount }));
            assert_eq!(errors.get("amountInUSD"), Some(OUT_OF_RANGE_MESSAGE));
            assert_eq!(errors.get("feeAmount"), Some(OUT_OF_RANGE_MESSAGE));
        }

        let errors = run(json!({ "amountInUSD": "12" }));
        assert_eq!(
            errors.get("amountInUSD"),
            Some("Expected number, received string")
        );
    }
}
