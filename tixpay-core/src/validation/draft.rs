//! Access helpers over a loosely-typed JSON draft.
//!
//! Paths are dotted object keys (`sellerInfo.address.locality`). Keys may
//! themselves contain `-` (`street-address`) but never `.`.

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::str::FromStr;

/// Value at `path`, treating `null` as absent.
///
/// Walking through anything that is not an object yields `None`.
pub(crate) fn lookup<'a>(draft: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = draft;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    (!current.is_null()).then_some(current)
}

/// Non-empty string at `path`.
pub(crate) fn text_at<'a>(draft: &'a Value, path: &str) -> Option<&'a str> {
    lookup(draft, path)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Number at `path` as a decimal.
pub(crate) fn decimal_at(draft: &Value, path: &str) -> Option<Decimal> {
    lookup(draft, path).and_then(to_decimal)
}

pub(crate) fn flag_at(draft: &Value, path: &str) -> Option<bool> {
    lookup(draft, path).and_then(Value::as_bool)
}

/// Exact decimal for a JSON number.
///
/// Goes through the number's shortest textual form so `25.55` stays
/// `25.55` instead of picking up binary float noise.
pub(crate) fn to_decimal(value: &Value) -> Option<Decimal> {
    let Value::Number(number) = value else {
        return None;
    };
    let text = number.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

/// Set `value` at `path`, creating intermediate objects as needed.
///
/// An intermediate that is not an object is replaced by one.
pub(crate) fn set_path(draft: &mut Value, path: &str, value: Value) {
    let mut current = draft;
    let mut segments = path.split('.').peekable();
    while let Some(segment) = segments.next() {
        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        let Value::Object(map) = current else {
            return;
        };
        if segments.peek().is_none() {
            map.insert(segment.to_owned(), value);
            return;
        }
        current = map
            .entry(segment.to_owned())
            .or_insert_with(|| Value::Object(Map::new()));
    }
}

/// Drop empty strings and nulls from every object, recursively.
///
/// Form inputs that were touched and cleared come back as `""`; they mean
/// the same as an input that was never filled.
pub(crate) fn prune_blank(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !is_blank(v))
                .map(|(k, v)| (k, prune_blank(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(prune_blank).collect()),
        other => other,
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Type name used in "Expected X, received Y" messages.
pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
