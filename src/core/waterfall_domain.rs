use ordered_float::OrderedFloat;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::core::classification::{BarClassification, classify_bar};
use crate::core::primitives::{
    NumericField, category_text, decimal_to_nearest_f64, f64_to_decimal, is_truthy, numeric_field,
};
use crate::core::types::{BarValue, Domain, RawDataPoint};

pub const DEFAULT_TOTAL_FLAG_KEY: &str = "isTotal";
pub const DEFAULT_TOTAL_LABEL: &str = "Total";

/// Decides which input rows are total rows.
///
/// A row is a total when its flag field is truthy or when its category text
/// equals `category_label`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalRowMatcher {
    #[serde(default = "default_total_flag_key")]
    pub flag_key: Option<String>,
    #[serde(default)]
    pub category_label: Option<String>,
}

impl Default for TotalRowMatcher {
    fn default() -> Self {
        Self {
            flag_key: default_total_flag_key(),
            category_label: None,
        }
    }
}

impl TotalRowMatcher {
    /// Matcher that never flags a row; every row is treated as a delta.
    #[must_use]
    pub fn none() -> Self {
        Self {
            flag_key: None,
            category_label: None,
        }
    }

    #[must_use]
    pub fn with_flag_key(mut self, key: impl Into<String>) -> Self {
        self.flag_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_category_label(mut self, label: impl Into<String>) -> Self {
        self.category_label = Some(label.into());
        self
    }

    #[must_use]
    pub fn matches(&self, row: &RawDataPoint, category: &str) -> bool {
        let flagged = self
            .flag_key
            .as_deref()
            .is_some_and(|key| is_truthy(row.get(key)));
        flagged || self.category_label.as_deref() == Some(category)
    }
}

fn default_total_flag_key() -> Option<String> {
    Some(DEFAULT_TOTAL_FLAG_KEY.to_owned())
}

/// Field selection and total-row policy for one domain computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaterfallDomainOptions {
    pub category_key: String,
    pub value_key: String,
    pub total_rows: TotalRowMatcher,
    /// When set, a synthetic total row with this category label is appended
    /// after the last input row, carrying the final running total.
    pub append_total: Option<String>,
}

impl WaterfallDomainOptions {
    #[must_use]
    pub fn new(category_key: impl Into<String>, value_key: impl Into<String>) -> Self {
        Self {
            category_key: category_key.into(),
            value_key: value_key.into(),
            total_rows: TotalRowMatcher::default(),
            append_total: None,
        }
    }

    #[must_use]
    pub fn with_total_rows(mut self, matcher: TotalRowMatcher) -> Self {
        self.total_rows = matcher;
        self
    }

    #[must_use]
    pub fn with_appended_total(mut self, label: impl Into<String>) -> Self {
        self.append_total = Some(label.into());
        self
    }
}

/// One input row after cumulative stacking.
///
/// `row` is the original row with the value field replaced by the
/// `[start, end]` pair; the typed fields mirror what every renderer needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterfallDatum {
    pub index: usize,
    pub category: String,
    pub row: RawDataPoint,
    pub value: BarValue,
    pub is_total: bool,
    pub classification: BarClassification,
    /// `true` for a total row appended by the calculator rather than supplied by the host.
    #[serde(default)]
    pub synthetic: bool,
}

impl WaterfallDatum {
    /// Value shown on the bar label: the delta for regular bars, the absolute
    /// value for totals.
    #[must_use]
    pub fn delta(&self) -> f64 {
        if self.is_total {
            self.value.end
        } else {
            self.value.delta()
        }
    }

    /// Running total after this bar.
    #[must_use]
    pub fn cumulative(&self) -> f64 {
        self.value.end
    }
}

/// Output of the domain calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterfallDomain {
    pub data_with_domain: Vec<WaterfallDatum>,
    /// Tight range: `[min(0, endpoints), max(0, endpoints)]`.
    pub domain: Domain,
}

impl WaterfallDomain {
    /// Domain used by the value axis: the tight domain grown by `padding_ratio`.
    #[must_use]
    pub fn axis_domain(&self, padding_ratio: f64) -> Domain {
        self.domain.padded(padding_ratio)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data_with_domain.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
enum RunningTotal {
    Exact(Decimal),
    Float(f64),
}

impl RunningTotal {
    fn reset(value: f64) -> Self {
        f64_to_decimal(value).map_or(Self::Float(value), Self::Exact)
    }

    fn add(self, delta: f64) -> Self {
        match self {
            Self::Exact(total) => match f64_to_decimal(delta).and_then(|d| total.checked_add(d)) {
                Some(sum) => Self::Exact(sum),
                None => Self::Float(saturating_sum(Self::Exact(total).value(), delta)),
            },
            Self::Float(total) => Self::Float(saturating_sum(total, delta)),
        }
    }

    fn value(self) -> f64 {
        match self {
            Self::Exact(total) => decimal_to_nearest_f64(total).unwrap_or_default(),
            Self::Float(total) => total,
        }
    }
}

/// Adds in `f64`, pinning an overflowing sum to the largest finite value of
/// the same sign so every bar endpoint stays drawable.
fn saturating_sum(total: f64, delta: f64) -> f64 {
    let sum = total + delta;
    if sum.is_finite() {
        return sum;
    }
    warn!(total, delta, "running total overflowed f64, saturating");
    f64::MAX.copysign(sum)
}

/// Stacks raw rows into cumulative bars and computes the value domain.
///
/// Rows are processed in input order. A total row spans `(0, raw)` and resets
/// the running total to `raw`; every other row spans
/// `(running, running + raw)`. Missing or unusable values count as a zero
/// delta.
#[must_use]
pub fn compute_waterfall_domain(
    data: &[RawDataPoint],
    options: &WaterfallDomainOptions,
) -> WaterfallDomain {
    let mut running = RunningTotal::reset(0.0);
    let mut data_with_domain = Vec::with_capacity(data.len() + 1);

    for (index, raw) in data.iter().enumerate() {
        let category = category_text(raw.get(&options.category_key));
        let is_total = options.total_rows.matches(raw, &category);
        let delta = read_delta(raw, &options.value_key, index);

        let value = if is_total {
            running = RunningTotal::reset(delta);
            BarValue::new(0.0, delta)
        } else {
            let start = running.value();
            running = running.add(delta);
            BarValue::new(start, running.value())
        };

        let mut row = raw.clone();
        row.insert(options.value_key.clone(), value.to_json());
        data_with_domain.push(WaterfallDatum {
            index,
            category,
            row,
            value,
            is_total,
            classification: classify_bar(value.delta(), is_total),
            synthetic: false,
        });
    }

    if let Some(label) = options.append_total.as_deref() {
        if !data.is_empty() {
            let value = BarValue::new(0.0, running.value());
            let row = RawDataPoint::new()
                .with_field(options.category_key.clone(), label)
                .with_field(options.value_key.clone(), value.to_json());
            data_with_domain.push(WaterfallDatum {
                index: data.len(),
                category: label.to_owned(),
                row,
                value,
                is_total: true,
                classification: BarClassification::Total,
                synthetic: true,
            });
        }
    }

    let domain = tight_domain(&data_with_domain);
    trace!(
        rows = data.len(),
        bars = data_with_domain.len(),
        domain_min = domain.min,
        domain_max = domain.max,
        "computed waterfall domain"
    );

    WaterfallDomain {
        data_with_domain,
        domain,
    }
}

fn read_delta(raw: &RawDataPoint, value_key: &str, index: usize) -> f64 {
    let field = numeric_field(raw.get(value_key));
    match field {
        NumericField::Finite(_) => {}
        NumericField::Missing => {
            trace!(index, value_key, "missing waterfall value, using zero delta");
        }
        NumericField::NotNumeric | NumericField::NonFinite => {
            warn!(
                index,
                value_key,
                value = ?raw.get(value_key),
                "unusable waterfall value, using zero delta"
            );
        }
    }
    field.value_or_zero()
}

fn tight_domain(data: &[WaterfallDatum]) -> Domain {
    let endpoints = || {
        data.iter()
            .flat_map(|datum| [datum.value.start, datum.value.end])
            .map(OrderedFloat)
    };
    let min = endpoints().min().map_or(0.0, |v| v.0).min(0.0);
    let max = endpoints().max().map_or(0.0, |v| v.0).max(0.0);
    Domain::new(min, max)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{RunningTotal, TotalRowMatcher, saturating_sum};
    use crate::core::types::RawDataPoint;

    #[test]
    fn running_total_stays_exact_for_decimal_inputs() {
        let total = RunningTotal::reset(0.0).add(0.1).add(0.2);
        assert_eq!(total.value(), 0.3);
    }

    #[test]
    fn running_total_falls_back_to_float_on_overflow() {
        let total = RunningTotal::reset(7.0e28).add(7.0e28);
        assert!(matches!(total, RunningTotal::Float(_)));
        assert!(total.value() > 1.0e29);
    }

    #[test]
    fn running_total_keeps_sub_decimal_values_in_float() {
        let total = RunningTotal::reset(0.0).add(1e-30).add(2.5e-29);
        assert!(matches!(total, RunningTotal::Float(_)));
        assert_eq!(total.value(), 1e-30 + 2.5e-29);
    }

    #[test]
    fn running_total_saturates_instead_of_overflowing() {
        assert_eq!(saturating_sum(f64::MAX, f64::MAX), f64::MAX);
        assert_eq!(saturating_sum(-f64::MAX, -1e308), -f64::MAX);
        let total = RunningTotal::reset(1e308).add(1e308).add(1e308);
        assert_eq!(total.value(), f64::MAX);
    }

    #[test]
    fn total_matcher_accepts_flag_or_label() {
        let matcher = TotalRowMatcher::default().with_category_label("Grand total");
        let flagged = RawDataPoint::new().with_field("isTotal", json!(true));
        let plain = RawDataPoint::new().with_field("isTotal", json!(false));
        assert!(matcher.matches(&flagged, "anything"));
        assert!(matcher.matches(&plain, "Grand total"));
        assert!(!matcher.matches(&plain, "Q1"));
        assert!(!TotalRowMatcher::none().matches(&flagged, "Grand total"));
    }
}
