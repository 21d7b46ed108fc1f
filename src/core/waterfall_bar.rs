use serde::{Deserialize, Serialize};

use crate::core::band_scale::BandScale;
use crate::core::scale::LinearScale;
use crate::core::waterfall_domain::WaterfallDatum;
use crate::error::{ChartError, ChartResult};

pub const DEFAULT_MIN_BAR_HEIGHT_PX: f64 = 1.0;

/// Pixel-space rectangle of one waterfall bar.
///
/// `y_top <= y_bottom` always holds; `start_y`/`end_y` keep the direction of
/// the delta for consumers that draw connectors or arrows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaterfallBarGeometry {
    pub index: usize,
    pub x_left: f64,
    pub x_right: f64,
    pub y_top: f64,
    pub y_bottom: f64,
    pub start_y: f64,
    pub end_y: f64,
}

impl WaterfallBarGeometry {
    #[must_use]
    pub fn width(self) -> f64 {
        self.x_right - self.x_left
    }

    #[must_use]
    pub fn height(self) -> f64 {
        self.y_bottom - self.y_top
    }

    #[must_use]
    pub fn x_center(self) -> f64 {
        (self.x_left + self.x_right) * 0.5
    }

    #[must_use]
    pub fn contains(self, x: f64, y: f64) -> bool {
        x >= self.x_left && x <= self.x_right && y >= self.y_top && y <= self.y_bottom
    }
}

/// Projects stacked bars into pixel rectangles.
///
/// The slice position of each datum selects its category band; the vertical
/// extent comes from mapping `(start, end)` through `value_scale`. Bars
/// thinner than `min_height_px` are grown around their midpoint so zero-delta
/// bars stay visible.
pub fn project_waterfall_bars(
    data: &[WaterfallDatum],
    band: BandScale,
    value_scale: LinearScale,
    min_height_px: f64,
) -> ChartResult<Vec<WaterfallBarGeometry>> {
    if !min_height_px.is_finite() || min_height_px < 0.0 {
        return Err(ChartError::InvalidData(
            "minimum bar height must be finite and >= 0".to_owned(),
        ));
    }
    if data.len() > band.count() {
        return Err(ChartError::InvalidData(format!(
            "band scale has {} bands for {} bars",
            band.count(),
            data.len()
        )));
    }

    #[cfg(feature = "parallel-projection")]
    {
        use rayon::prelude::*;

        data.par_iter()
            .enumerate()
            .map(|(slot, datum)| project_bar(slot, datum, band, value_scale, min_height_px))
            .collect()
    }

    #[cfg(not(feature = "parallel-projection"))]
    {
        data.iter()
            .enumerate()
            .map(|(slot, datum)| project_bar(slot, datum, band, value_scale, min_height_px))
            .collect()
    }
}

fn project_bar(
    slot: usize,
    datum: &WaterfallDatum,
    band: BandScale,
    value_scale: LinearScale,
    min_height_px: f64,
) -> ChartResult<WaterfallBarGeometry> {
    let start_y = value_scale.domain_to_pixel(datum.value.start)?;
    let end_y = value_scale.domain_to_pixel(datum.value.end)?;
    let mut y_top = start_y.min(end_y);
    let mut y_bottom = start_y.max(end_y);
    if y_bottom - y_top < min_height_px {
        let mid = (y_top + y_bottom) * 0.5;
        y_top = mid - min_height_px * 0.5;
        y_bottom = mid + min_height_px * 0.5;
    }

    let x_left = band.band_start(slot);
    Ok(WaterfallBarGeometry {
        index: slot,
        x_left,
        x_right: x_left + band.band_width(),
        y_top,
        y_bottom,
        start_y,
        end_y,
    })
}
