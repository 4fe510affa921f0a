//! Playground form state.
//!
//! The playground keeps one explicit draft. Every field change is applied to
//! the draft, the fee fields are normalized and the whole draft is validated
//! again; callers get back what changed in the error set.

use serde_json::{Value, json};
use tixpay_sdk::objects::{PaymentWidgetProps, PlaygroundReport, ValidationErrors, ZERO_ADDRESS};

use crate::codegen;
use crate::validation::{self, CheckoutConfiguration, set_path};

/// Draft the form starts from.
pub fn default_draft() -> Value {
    json!({
        "amountInUSD": 0,
        "supportedCurrencies": [],
        "sellerAddress": "",
        "sellerInfo": {},
        "buyerInfo": {},
        "invoiceNumber": "",
        "enableBuyerInfo": true,
        "feeAddress": ZERO_ADDRESS,
        "feeAmount": 0,
    })
}

/// Difference between two consecutive error sets.
///
/// A field whose message changed shows up in `added` with its new message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorDiff {
    pub added: Vec<(String, String)>,
    pub cleared: Vec<String>,
}

impl ErrorDiff {
    pub fn between(before: &ValidationErrors, after: &ValidationErrors) -> Self {
        let added = after
            .iter()
            .filter(|(path, message)| before.get(path) != Some(*message))
            .map(|(path, message)| (path.to_owned(), message.to_owned()))
            .collect();
        let cleared = before
            .iter()
            .filter(|(path, _)| !after.contains(path))
            .map(|(path, _)| path.to_owned())
            .collect();
        Self { added, cleared }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.cleared.is_empty()
    }
}

pub struct PlaygroundSession {
    draft: Value,
    errors: ValidationErrors,
    builder_id: Option<String>,
}

impl PlaygroundSession {
    pub fn new() -> Self {
        Self::from_draft(default_draft())
    }

    /// Start from an arbitrary draft, e.g. one posted by a client.
    pub fn from_draft(mut draft: Value) -> Self {
        normalize_fee(&mut draft);
        let errors = current_errors(&draft);
        Self {
            draft,
            errors,
            builder_id: None,
        }
    }

    /// Builder id forwarded to the widget preview.
    pub fn with_builder_id(mut self, builder_id: Option<String>) -> Self {
        self.builder_id = builder_id;
        self
    }

    pub fn draft(&self) -> &Value {
        &self.draft
    }

    /// Apply one field change and re-validate.
    pub fn set_field(&mut self, path: &str, value: Value) -> ErrorDiff {
        set_path(&mut self.draft, path, value);
        self.revalidate()
    }

    /// Replace the whole draft and re-validate.
    pub fn replace_draft(&mut self, draft: Value) -> ErrorDiff {
        self.draft = draft;
        self.revalidate()
    }

    fn revalidate(&mut self) -> ErrorDiff {
        normalize_fee(&mut self.draft);
        let errors = current_errors(&self.draft);
        let diff = ErrorDiff::between(&self.errors, &errors);
        self.errors = errors;
        diff
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn configuration(&self) -> Result<CheckoutConfiguration, ValidationErrors> {
        validation::validate(&self.draft)
    }

    /// Widget props for the live preview, built even from an invalid draft.
    pub fn preview(&self) -> PaymentWidgetProps {
        codegen::widget_props(&self.best_effort(), self.builder_id.as_deref())
    }

    /// Integration snippet, built even from an invalid draft.
    pub fn integration_code(&self) -> String {
        codegen::integration_code(&self.best_effort())
    }

    pub fn report(&self) -> PlaygroundReport {
        let configuration = self.best_effort();
        PlaygroundReport {
            valid: self.is_valid(),
            errors: self.errors.clone(),
            preview: codegen::widget_props(&configuration, self.builder_id.as_deref()),
            integration_code: codegen::integration_code(&configuration),
        }
    }

    fn best_effort(&self) -> CheckoutConfiguration {
        let mut ignored = ValidationErrors::new();
        validation::assemble(&self.draft, &mut ignored)
    }
}

impl Default for PlaygroundSession {
    fn default() -> Self {
        Self::new()
    }
}

/// An emptied fee address falls back to the sentinel and zeroes the amount.
fn normalize_fee(draft: &mut Value) {
    let Some(map) = draft.as_object_mut() else {
        return;
    };
    let emptied = match map.get("feeAddress") {
        None | Some(Value::Null) => true,
        Some(Value::String(address)) => address.is_empty(),
        Some(_) => false,
    };
    if emptied {
        map.insert("feeAddress".to_owned(), Value::from(ZERO_ADDRESS));
        map.insert("feeAmount".to_owned(), json!(0));
    }
}

fn current_errors(draft: &Value) -> ValidationErrors {
    validation::validate(draft).err().unwrap_or_default()
}
