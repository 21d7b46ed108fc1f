use crate::error::{ChartError, ChartResult};

/// Discrete category scale: `count` equal bands across a pixel range.
///
/// Padding is expressed in band units: `padding_inner` between neighbors,
/// `padding_outer` before the first and after the last band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandScale {
    range_start: f64,
    range_end: f64,
    count: usize,
    padding_inner: f64,
    padding_outer: f64,
}

impl BandScale {
    pub const DEFAULT_PADDING_INNER: f64 = 0.2;
    pub const DEFAULT_PADDING_OUTER: f64 = 0.1;

    pub fn new(range_start: f64, range_end: f64, count: usize) -> ChartResult<Self> {
        if !range_start.is_finite() || !range_end.is_finite() {
            return Err(ChartError::InvalidData(
                "band scale range must be finite".to_owned(),
            ));
        }
        Ok(Self {
            range_start: range_start.min(range_end),
            range_end: range_start.max(range_end),
            count,
            padding_inner: Self::DEFAULT_PADDING_INNER,
            padding_outer: Self::DEFAULT_PADDING_OUTER,
        })
    }

    pub fn with_padding(mut self, inner: f64, outer: f64) -> ChartResult<Self> {
        if !inner.is_finite() || !outer.is_finite() || inner < 0.0 || outer < 0.0 {
            return Err(ChartError::InvalidData(
                "band padding must be finite and >= 0".to_owned(),
            ));
        }
        self.padding_inner = inner;
        self.padding_outer = outer;
        Ok(self)
    }

    #[must_use]
    pub fn count(self) -> usize {
        self.count
    }

    #[must_use]
    pub fn band_width(self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        let n = self.count as f64;
        let span = self.range_end - self.range_start;
        let denominator = n + self.padding_inner * (n - 1.0) + 2.0 * self.padding_outer;
        if denominator <= 0.0 {
            0.0
        } else {
            span / denominator
        }
    }

    /// Distance between the left edges of neighboring bands.
    #[must_use]
    pub fn step(self) -> f64 {
        self.band_width() * (1.0 + self.padding_inner)
    }

    /// Left edge of the band at `index`.
    #[must_use]
    pub fn band_start(self, index: usize) -> f64 {
        let band_width = self.band_width();
        self.range_start + band_width * self.padding_outer + self.step() * index as f64
    }

    #[must_use]
    pub fn band_center(self, index: usize) -> f64 {
        self.band_start(index) + self.band_width() * 0.5
    }

    /// Returns the band whose bar area contains `pixel`, ignoring padding gaps.
    #[must_use]
    pub fn band_at(self, pixel: f64) -> Option<usize> {
        if self.count == 0 || !pixel.is_finite() {
            return None;
        }
        let step = self.step();
        if step <= 0.0 {
            return None;
        }
        let offset = pixel - self.band_start(0);
        if offset < 0.0 {
            return None;
        }
        let index = (offset / step).floor() as usize;
        if index >= self.count {
            return None;
        }
        let within = offset - step * index as f64;
        (within <= self.band_width()).then_some(index)
    }
}
