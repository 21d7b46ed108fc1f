use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// One input row as delivered by the host query layer.
///
/// Field order is preserved so snapshots and re-serialized rows stay stable.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawDataPoint(IndexMap<String, Value>);

impl RawDataPoint {
    #[must_use]
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[must_use]
    pub fn fields(&self) -> &IndexMap<String, Value> {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<IndexMap<String, Value>> for RawDataPoint {
    fn from(fields: IndexMap<String, Value>) -> Self {
        Self(fields)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for RawDataPoint {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Cumulative range `[start, end]` occupied by one bar on the value axis.
///
/// `start` is where the bar leaves the running total and `end` is where it
/// lands, so `end < start` for a decrease.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarValue {
    pub start: f64,
    pub end: f64,
}

impl BarValue {
    #[must_use]
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn delta(self) -> f64 {
        self.end - self.start
    }

    #[must_use]
    pub fn low(self) -> f64 {
        self.start.min(self.end)
    }

    #[must_use]
    pub fn high(self) -> f64 {
        self.start.max(self.end)
    }

    /// Encodes the pair the way it is stored back into a row: `[start, end]`.
    #[must_use]
    pub fn to_json(self) -> Value {
        Value::Array(vec![Value::from(self.start), Value::from(self.end)])
    }
}

/// Value-axis range covering every bar endpoint and zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
}

impl Domain {
    pub const EMPTY: Self = Self { min: 0.0, max: 0.0 };

    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn span(self) -> f64 {
        self.max - self.min
    }

    #[must_use]
    pub fn is_degenerate(self) -> bool {
        self.span() <= 0.0
    }

    #[must_use]
    pub fn contains(self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Grows the domain by `ratio * span` on each side that is not anchored at zero.
    ///
    /// A bound sitting exactly on zero stays there so bars keep growing out of
    /// the axis line. Bounds saturate at the finite `f64` range.
    #[must_use]
    pub fn padded(self, ratio: f64) -> Self {
        if !ratio.is_finite() || ratio <= 0.0 || self.is_degenerate() {
            return self;
        }
        // Half-span keeps the arithmetic finite for domains near +/- f64::MAX.
        let half_pad = (self.max * 0.5 - self.min * 0.5) * ratio;
        let min = if self.min < 0.0 {
            (self.min - half_pad - half_pad).max(f64::MIN)
        } else {
            self.min
        };
        let max = if self.max > 0.0 {
            (self.max + half_pad + half_pad).min(f64::MAX)
        } else {
            self.max
        };
        Self { min, max }
    }
}
