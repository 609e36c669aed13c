use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("row {row} has a zero or non-finite L2 norm")]
    DegenerateVector { row: usize },
    #[error("invalid matrix shape ({rows}, {dim})")]
    ShapeMismatch { rows: usize, dim: usize },
    #[error("dimension mismatch: {left} != {right}")]
    DimensionMismatch { left: usize, right: usize },
    #[error("precision must be positive, got {0}")]
    InvalidPrecision(i32),
    #[error("value {value} does not fit an i32 at precision {precision}")]
    QuantizationOverflow { value: f32, precision: i32 },
    #[error("similarity drift {max_abs_error} exceeds tolerance {tolerance}")]
    SimilarityDrift { max_abs_error: f64, tolerance: f64 },
    #[error("container truncated: expected {expected} bytes, found {actual}")]
    Truncated { expected: usize, actual: usize },
    #[error("container has {0} trailing bytes after the payload")]
    TrailingBytes(usize),
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
