pub mod band_scale;
pub mod classification;
pub mod primitives;
pub mod scale;
pub mod types;
pub mod waterfall_bar;
pub mod waterfall_domain;

pub use band_scale::BandScale;
pub use classification::{BarClassification, classify_bar};
pub use scale::LinearScale;
pub use types::{BarValue, Domain, RawDataPoint, Viewport};
pub use waterfall_bar::{DEFAULT_MIN_BAR_HEIGHT_PX, WaterfallBarGeometry, project_waterfall_bars};
pub use waterfall_domain::{
    DEFAULT_TOTAL_FLAG_KEY, DEFAULT_TOTAL_LABEL, TotalRowMatcher, WaterfallDatum, WaterfallDomain,
    WaterfallDomainOptions, compute_waterfall_domain,
};
