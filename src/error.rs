use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    /// A chart property failed validation; the chart keeps its previous props.
    #[error("invalid chart property `{field}`: {reason}")]
    InvalidProps { field: &'static str, reason: String },

    #[error("invalid number format `{specifier}`: {reason}")]
    InvalidNumberFormat { specifier: String, reason: String },

    #[error("pointer coordinates must be finite: x={x}, y={y}")]
    InvalidPointer { x: f64, y: f64 },

    #[error("json contract error: {0}")]
    JsonContract(String),
}
