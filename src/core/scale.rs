use crate::core::types::Domain;
use crate::error::{ChartError, ChartResult};

/// Linear value-axis scale mapping a data domain onto a pixel range.
///
/// The range may be inverted (`range_start > range_end`), which is how the
/// vertical axis maps larger values to smaller y pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

impl LinearScale {
    pub fn new(domain_start: f64, domain_end: f64) -> ChartResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(ChartError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
            range_start: 0.0,
            range_end: 1.0,
        })
    }

    /// Builds a scale from a computed waterfall domain.
    ///
    /// A degenerate domain (empty or all-zero data) is widened to `[min, min + 1]`
    /// so the axis still has a drawable extent.
    pub fn from_domain(domain: Domain) -> ChartResult<Self> {
        if domain.is_degenerate() {
            return Self::new(domain.min, domain.min + 1.0);
        }
        Self::new(domain.min, domain.max)
    }

    pub fn with_range(mut self, range_start: f64, range_end: f64) -> ChartResult<Self> {
        if !range_start.is_finite() || !range_end.is_finite() {
            return Err(ChartError::InvalidData(
                "scale range must be finite".to_owned(),
            ));
        }
        self.range_start = range_start;
        self.range_end = range_end;
        Ok(self)
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    pub fn domain_to_pixel(self, value: f64) -> ChartResult<f64> {
        if !value.is_finite() {
            return Err(ChartError::InvalidData("value must be finite".to_owned()));
        }

        let span = self.domain_end - self.domain_start;
        let offset = value - self.domain_start;
        let normalized = if span.is_finite() && offset.is_finite() {
            offset / span
        } else {
            // Distances wider than f64::MAX overflow the plain difference.
            (value * 0.5 - self.domain_start * 0.5)
                / (self.domain_end * 0.5 - self.domain_start * 0.5)
        };
        Ok(self.range_start + normalized * (self.range_end - self.range_start))
    }

    pub fn pixel_to_domain(self, pixel: f64) -> ChartResult<f64> {
        if !pixel.is_finite() {
            return Err(ChartError::InvalidData("pixel must be finite".to_owned()));
        }

        let range_span = self.range_end - self.range_start;
        if range_span == 0.0 {
            return Ok(self.domain_start);
        }
        let normalized = (pixel - self.range_start) / range_span;
        let value = self.domain_start + normalized * (self.domain_end - self.domain_start);
        if value.is_finite() {
            return Ok(value);
        }
        Ok(self.domain_start * (1.0 - normalized) + self.domain_end * normalized)
    }

    /// Returns round tick values (steps of 1, 2 or 5 times a power of ten)
    /// inside the domain, aiming for roughly `target_count` ticks.
    #[must_use]
    pub fn nice_ticks(self, target_count: usize) -> Vec<f64> {
        let lo = self.domain_start.min(self.domain_end);
        let hi = self.domain_start.max(self.domain_end);
        let target = target_count.max(2);
        let raw_step = (hi * 0.5 - lo * 0.5) / (target - 1) as f64 * 2.0;
        if !raw_step.is_finite() {
            return vec![lo, hi];
        }
        let step = nice_step(raw_step);
        if !step.is_finite() || step <= 0.0 {
            return vec![lo, hi];
        }

        let epsilon = step * 1e-9;
        let first = (lo / step - 1e-9).ceil() * step;
        let mut ticks = Vec::with_capacity(target + 2);
        let mut index = 0_u32;
        loop {
            let tick = first + step * f64::from(index);
            if tick > hi + epsilon || index > 1_000 {
                break;
            }
            // Snap values like 0.30000000000000004 and -0.0 to clean labels.
            let snapped = (tick / step).round() * step;
            ticks.push(if snapped == 0.0 { 0.0 } else { snapped });
            index += 1;
        }
        ticks
    }
}

pub(crate) fn nice_step(raw_step: f64) -> f64 {
    if !raw_step.is_finite() || raw_step <= 0.0 {
        return 1.0;
    }

    let magnitude = 10.0_f64.powf(raw_step.log10().floor());
    if !magnitude.is_finite() || magnitude <= 0.0 {
        return raw_step;
    }

    let normalized = raw_step / magnitude;
    let nice = if normalized < 1.5 {
        1.0
    } else if normalized < 3.0 {
        2.0
    } else if normalized < 7.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

#[cfg(test)]
mod tests {
    use super::{LinearScale, nice_step};

    #[test]
    fn nice_step_rounds_to_one_two_five() {
        assert!((nice_step(0.9) - 1.0).abs() <= 1e-12);
        assert_eq!(nice_step(23.0), 20.0);
        assert_eq!(nice_step(4.2), 5.0);
        assert_eq!(nice_step(80.0), 100.0);
    }

    #[test]
    fn nice_ticks_cover_domain_with_round_values() {
        let scale = LinearScale::new(-5.0, 105.0).expect("scale");
        let ticks = scale.nice_ticks(6);
        assert_eq!(ticks, vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
    }

    #[test]
    fn scale_stays_finite_across_the_whole_f64_range() {
        let scale = LinearScale::new(-f64::MAX, f64::MAX)
            .and_then(|scale| scale.with_range(400.0, 0.0))
            .expect("scale");
        assert_eq!(scale.domain_to_pixel(0.0).expect("pixel"), 200.0);
        assert_eq!(scale.domain_to_pixel(f64::MAX).expect("pixel"), 0.0);
        assert_eq!(scale.pixel_to_domain(400.0).expect("value"), -f64::MAX);
        assert!(scale.pixel_to_domain(100.0).expect("value").is_finite());

        let ticks = scale.nice_ticks(5);
        assert!(!ticks.is_empty() && ticks.len() <= 7);
        assert!(ticks.iter().all(|tick| tick.is_finite()));
    }
}
