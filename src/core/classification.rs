use serde::{Deserialize, Serialize};

/// Visual kind of a waterfall bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarClassification {
    Increase,
    Decrease,
    Total,
}

impl BarClassification {
    /// Legend order.
    pub const ALL: [Self; 3] = [Self::Increase, Self::Decrease, Self::Total];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Increase => "Increase",
            Self::Decrease => "Decrease",
            Self::Total => "Total",
        }
    }
}

/// Classifies one bar from its delta and total flag.
///
/// A zero delta is an increase: it renders as a flat bar in the increase color.
#[must_use]
pub fn classify_bar(delta: f64, is_total: bool) -> BarClassification {
    if is_total {
        BarClassification::Total
    } else if delta >= 0.0 {
        BarClassification::Increase
    } else {
        BarClassification::Decrease
    }
}
