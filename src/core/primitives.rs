use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::Value;

use crate::error::{ChartError, ChartResult};

pub fn decimal_to_f64(value: Decimal, field_name: &str) -> ChartResult<f64> {
    value.to_f64().ok_or_else(|| {
        ChartError::InvalidData(format!("{field_name} cannot be represented as f64"))
    })
}

/// Converts through the shortest round-trip text form, so `0.1` becomes the
/// decimal `0.1` rather than its binary expansion.
///
/// Returns `None` for non-finite values and for values the decimal cannot
/// hold without rounding: magnitudes above its range or fractions finer
/// than 28 places (`1e-30` would otherwise collapse to zero).
#[must_use]
pub fn f64_to_decimal(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_str_exact(&value.to_string())
        .ok()
        .filter(|decimal| !decimal.is_zero() || value == 0.0)
}

/// Nearest `f64` to `value`, rounded once through the decimal text form.
#[must_use]
pub fn decimal_to_nearest_f64(value: Decimal) -> Option<f64> {
    value
        .to_string()
        .parse::<f64>()
        .ok()
        .filter(|parsed| parsed.is_finite())
        .or_else(|| value.to_f64())
}

/// Outcome of reading a numeric field out of a raw row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericField {
    Finite(f64),
    Missing,
    NotNumeric,
    NonFinite,
}

impl NumericField {
    #[must_use]
    pub fn value_or_zero(self) -> f64 {
        match self {
            Self::Finite(value) => value,
            Self::Missing | Self::NotNumeric | Self::NonFinite => 0.0,
        }
    }
}

/// Reads a JSON value as a number.
///
/// Numeric strings are accepted because SQL drivers commonly return
/// `DECIMAL`/`NUMERIC` columns as text.
#[must_use]
pub fn numeric_field(value: Option<&Value>) -> NumericField {
    match value {
        None | Some(Value::Null) => NumericField::Missing,
        Some(Value::Number(number)) => match number.as_f64() {
            Some(v) if v.is_finite() => NumericField::Finite(v),
            Some(_) => NumericField::NonFinite,
            None => NumericField::NotNumeric,
        },
        Some(Value::String(text)) => parse_numeric_text(text.trim()),
        Some(Value::Bool(_) | Value::Array(_) | Value::Object(_)) => NumericField::NotNumeric,
    }
}

fn parse_numeric_text(text: &str) -> NumericField {
    if text.is_empty() {
        return NumericField::Missing;
    }
    if let Ok(decimal) = Decimal::from_str(text) {
        return match decimal_to_f64(decimal, "numeric text") {
            Ok(v) if v.is_finite() => NumericField::Finite(v),
            _ => NumericField::NonFinite,
        };
    }
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => NumericField::Finite(v),
        Ok(_) => NumericField::NonFinite,
        Err(_) => NumericField::NotNumeric,
    }
}

/// Loose truthiness used for "is total" flag columns.
#[must_use]
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().is_some_and(|v| v != 0.0),
        Some(Value::String(text)) => matches!(
            text.trim().to_ascii_lowercase().as_str(),
            "true" | "1" | "yes" | "y"
        ),
        None | Some(Value::Null | Value::Array(_) | Value::Object(_)) => false,
    }
}

/// Plain-text rendering of a category cell.
#[must_use]
pub fn category_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}
