//! Dense row-major `f32` matrices holding one feature vector per row.
use crate::error::{Error, Result};

/// `n` feature vectors of dimension `d`, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    rows: usize,
    dim: usize,
    data: Vec<f32>,
}

impl FeatureMatrix {
    /// Wrap a row-major buffer. Fails if either side of the shape is zero or
    /// the buffer length disagrees with it.
    pub fn from_vec(rows: usize, dim: usize, data: Vec<f32>) -> Result<Self> {
        if rows == 0 || dim == 0 || rows.checked_mul(dim) != Some(data.len()) {
            return Err(Error::ShapeMismatch { rows, dim });
        }
        Ok(Self { rows, dim, data })
    }

    pub fn from_rows(rows: &[Vec<f32>]) -> Result<Self> {
        let dim = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().find(|r| r.len() != dim) {
            return Err(Error::DimensionMismatch {
                left: dim,
                right: bad.len(),
            });
        }
        Self::from_vec(rows.len(), dim, rows.concat())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    pub fn row(&self, i: usize) -> &[f32] {
        &self.data[i * self.dim..(i + 1) * self.dim]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f32]> {
        self.data.chunks_exact(self.dim)
    }

    pub(crate) fn iter_rows_mut(&mut self) -> impl Iterator<Item = &mut [f32]> {
        self.data.chunks_exact_mut(self.dim)
    }

    /// The `(d, n)` transpose: row `j` holds coordinate `j` of every vector.
    pub fn transpose(&self) -> Self {
        let mut out = Vec::with_capacity(self.data.len());
        for j in 0..self.dim {
            out.extend(self.iter_rows().map(|r| r[j]));
        }
        Self {
            rows: self.dim,
            dim: self.rows,
            data: out,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transpose() {
        let m = FeatureMatrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        let t = m.transpose();
        assert_eq!((t.rows(), t.dim()), (3, 2));
        assert_eq!(t.as_slice(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
        assert_eq!(t.transpose(), m);
    }

    #[test]
    fn test_empty_shape_rejected() {
        assert!(matches!(
            FeatureMatrix::from_vec(0, 4, vec![]),
            Err(Error::ShapeMismatch { rows: 0, dim: 4 })
        ));
        assert!(matches!(
            FeatureMatrix::from_vec(2, 2, vec![0.0; 3]),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = FeatureMatrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { left: 2, right: 1 }));
    }
}
