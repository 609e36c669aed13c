//! Fixed-point quantization of unit vectors and the similarity drift it causes.
//!
//! A fixed-point consumer maps every float `v` to `round(v * p)` and recovers a
//! cosine score as `Σ qa·qb / p²`. For unit vectors the per-coordinate rounding
//! error is at most `1/(2p)`, which bounds the score drift by
//! `(‖a‖₁ + ‖b‖₁)/(2p) + d/(4p²) ≤ (√d + d/(4p)) / p`.
use core::fmt;

use num_traits::ToPrimitive;

use crate::error::{Error, Result};
use crate::matrix::FeatureMatrix;

/// Scale used by the reference consumers: a resolution of 1/125 = 0.004.
pub const DEFAULT_PRECISION: i32 = 125;

/// `FeatureMatrix` scaled by `precision` and rounded to integers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantizedMatrix {
    rows: usize,
    dim: usize,
    data: Vec<i32>,
}

impl QuantizedMatrix {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.data
    }

    pub fn row(&self, i: usize) -> &[i32] {
        &self.data[i * self.dim..(i + 1) * self.dim]
    }
}

/// `(rows × cols)` matrix of pairwise scores.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl SimilarityMatrix {
    pub(crate) fn from_fn(rows: usize, cols: usize, f: impl Fn(usize, usize) -> f64) -> Self {
        let data = (0..rows)
            .flat_map(|i| (0..cols).map(move |j| (i, j)))
            .map(|(i, j)| f(i, j))
            .collect();
        Self { rows, cols, data }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.cols + j]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Elementwise `|self - other|`, as a flat iterator.
    pub fn abs_diff<'a>(&'a self, other: &'a Self) -> Result<impl Iterator<Item = f64> + 'a> {
        if (self.rows, self.cols) != (other.rows, other.cols) {
            return Err(Error::DimensionMismatch {
                left: self.data.len(),
                right: other.data.len(),
            });
        }
        Ok(self.data.iter().zip(&other.data).map(|(a, b)| (a - b).abs()))
    }
}

impl fmt::Display for SimilarityMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.rows {
            let row = &self.data[i * self.cols..(i + 1) * self.cols];
            write!(f, "[")?;
            for (j, v) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{v:>9.6}")?;
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}

fn check_precision(precision: i32) -> Result<()> {
    if precision <= 0 {
        return Err(Error::InvalidPrecision(precision));
    }
    Ok(())
}

/// `round(value * precision)`, or an error if that is not a finite `i32`.
pub fn quantize_value(value: f32, precision: i32) -> Result<i32> {
    (value * precision as f32)
        .round()
        .to_i32()
        .ok_or(Error::QuantizationOverflow { value, precision })
}

/// Map every element `v` to `round(v * precision)`.
///
/// Rounding is `f32::round`, ties away from zero, the same as C `roundf`.
pub fn quantize(matrix: &FeatureMatrix, precision: i32) -> Result<QuantizedMatrix> {
    check_precision(precision)?;
    let data = matrix
        .as_slice()
        .iter()
        .map(|&value| quantize_value(value, precision))
        .collect::<Result<Vec<_>>>()?;

    Ok(QuantizedMatrix {
        rows: matrix.rows(),
        dim: matrix.dim(),
        data,
    })
}

pub(crate) fn int_dot(a: &[i32], b: &[i32]) -> i64 {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| i64::from(x) * i64::from(y))
        .sum()
}

/// `a · bᵗ / precision²` over quantized rows. The result has `a.rows()` rows
/// and `b.rows()` columns, so pass the probe bank first.
pub fn score(a: &QuantizedMatrix, b: &QuantizedMatrix, precision: i32) -> Result<SimilarityMatrix> {
    check_precision(precision)?;
    if a.dim != b.dim {
        return Err(Error::DimensionMismatch {
            left: a.dim,
            right: b.dim,
        });
    }
    let scale = f64::from(precision) * f64::from(precision);
    Ok(SimilarityMatrix::from_fn(a.rows, b.rows, |i, j| {
        int_dot(a.row(i), b.row(j)) as f64 / scale
    }))
}

/// `a · bᵗ` on the float vectors, accumulated in `f64`.
pub fn true_score(a: &FeatureMatrix, b: &FeatureMatrix) -> Result<SimilarityMatrix> {
    if a.dim() != b.dim() {
        return Err(Error::DimensionMismatch {
            left: a.dim(),
            right: b.dim(),
        });
    }
    Ok(SimilarityMatrix::from_fn(a.rows(), b.rows(), |i, j| {
        a.row(i)
            .iter()
            .zip(b.row(j))
            .map(|(&x, &y)| f64::from(x) * f64::from(y))
            .sum()
    }))
}

/// Worst-case `|score - true_score|` for unit vectors of dimension `dim`.
pub fn error_bound(dim: usize, precision: i32) -> f64 {
    let d = dim as f64;
    let p = f64::from(precision);
    (d.sqrt() + d / (4.0 * p)) / p
}

/// Outcome of comparing the fixed-point scores against the float ones.
#[derive(Debug, Clone)]
pub struct QuantizationReport {
    pub precision: i32,
    pub dim: usize,
    pub approx: SimilarityMatrix,
    pub exact: SimilarityMatrix,
    pub max_abs_error: f64,
    pub mean_abs_error: f64,
    pub bound: f64,
}

impl QuantizationReport {
    pub fn within_bound(&self) -> bool {
        self.max_abs_error <= self.bound
    }

    /// Turn the report into a hard gate at `tolerance`.
    pub fn ensure_within(&self, tolerance: f64) -> Result<&Self> {
        if self.max_abs_error > tolerance {
            return Err(Error::SimilarityDrift {
                max_abs_error: self.max_abs_error,
                tolerance,
            });
        }
        Ok(self)
    }
}

/// Quantize both banks, score them both ways and measure the drift.
pub fn check(
    probe: &FeatureMatrix,
    gallery: &FeatureMatrix,
    precision: i32,
) -> Result<QuantizationReport> {
    let qp = quantize(probe, precision)?;
    let qg = quantize(gallery, precision)?;
    let approx = score(&qp, &qg, precision)?;
    let exact = true_score(probe, gallery)?;

    let (max_abs_error, total) = approx
        .abs_diff(&exact)?
        .fold((0.0f64, 0.0f64), |(max, sum), e| (max.max(e), sum + e));
    let mean_abs_error = total / approx.as_slice().len() as f64;

    let report = QuantizationReport {
        precision,
        dim: probe.dim(),
        max_abs_error,
        mean_abs_error,
        bound: error_bound(probe.dim(), precision),
        approx,
        exact,
    };
    tracing::debug!(
        precision,
        max_abs_error = report.max_abs_error,
        bound = report.bound,
        "quantization drift"
    );
    Ok(report)
}
