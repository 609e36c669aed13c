//! Generate banks of random unit vectors to serve as fake feature vectors.
use core::iter::Sum;

use num_traits::real::Real;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::error::{Error, Result};
use crate::matrix::FeatureMatrix;

/// Seeded generator for reproducible banks; fresh entropy otherwise.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
}

/// Euclidean length, accumulated in whatever `T` the caller feeds in.
pub fn magnitude<T, I>(x: I) -> T
where
    T: Real + Sum,
    I: IntoIterator<Item = T>,
{
    // ∑(xi^2) |> sqrt
    x.into_iter().map(|xi| xi * xi).sum::<T>().sqrt()
}

/// Draw `rows * dim` independent samples from N(0, 1).
pub fn generate<R: Rng>(rng: &mut R, rows: usize, dim: usize) -> Result<FeatureMatrix> {
    let len = rows
        .checked_mul(dim)
        .ok_or(Error::ShapeMismatch { rows, dim })?;
    let data = (0..len).map(|_| rng.sample(StandardNormal)).collect();
    FeatureMatrix::from_vec(rows, dim, data)
}

/// Scale every row to unit L2 norm.
///
/// The norm is accumulated in `f64` so the result is unit length to well
/// under `1e-5` even at large dimensions.
pub fn normalize(mut matrix: FeatureMatrix) -> Result<FeatureMatrix> {
    for (row, values) in matrix.iter_rows_mut().enumerate() {
        let mag: f64 = magnitude(values.iter().map(|&x| f64::from(x)));
        if mag == 0.0 || !mag.is_finite() {
            return Err(Error::DegenerateVector { row });
        }
        for v in values.iter_mut() {
            *v = (f64::from(*v) / mag) as f32;
        }
    }

    Ok(matrix)
}

/// `generate` followed by `normalize`.
pub fn generate_unit<R: Rng>(rng: &mut R, rows: usize, dim: usize) -> Result<FeatureMatrix> {
    let raw = generate(rng, rows, dim)?;
    tracing::debug!(rows, dim, "sampled gaussian bank");
    normalize(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_are_unit_norm() {
        let mut rng = rng_from_seed(Some(7));
        let m = generate_unit(&mut rng, 16, 512).unwrap();
        for row in m.iter_rows() {
            let mag: f64 = magnitude(row.iter().map(|&x| f64::from(x)));
            assert!((mag - 1.0).abs() <= 1e-5, "norm {mag}");
        }
    }

    #[test]
    fn test_seed_is_reproducible() {
        let a = generate(&mut rng_from_seed(Some(42)), 3, 8).unwrap();
        let b = generate(&mut rng_from_seed(Some(42)), 3, 8).unwrap();
        let c = generate(&mut rng_from_seed(Some(43)), 3, 8).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_zero_row_is_degenerate() {
        let m = FeatureMatrix::from_vec(2, 2, vec![1.0, 1.0, 0.0, 0.0]).unwrap();
        assert!(matches!(normalize(m), Err(Error::DegenerateVector { row: 1 })));
    }

    #[test]
    fn test_scalar_normalizes_to_sign() {
        let pos = normalize(FeatureMatrix::from_vec(1, 1, vec![0.37]).unwrap()).unwrap();
        let neg = normalize(FeatureMatrix::from_vec(1, 1, vec![-2.5]).unwrap()).unwrap();
        assert_eq!(pos.as_slice(), &[1.0]);
        assert_eq!(neg.as_slice(), &[-1.0]);

        let mut rng = rng_from_seed(Some(1));
        let m = generate_unit(&mut rng, 1, 1).unwrap();
        assert_eq!(m.as_slice()[0].abs(), 1.0);
    }

    #[test]
    fn test_magnitude() {
        assert_eq!(magnitude([3.0f32, 4.0]), 5.0);
        assert_eq!(magnitude([0.0f64; 4]), 0.0);
    }

    #[test]
    fn test_zero_shape_rejected() {
        let mut rng = rng_from_seed(Some(0));
        assert!(matches!(generate(&mut rng, 0, 4), Err(Error::ShapeMismatch { .. })));
        assert!(matches!(generate(&mut rng, 4, 0), Err(Error::ShapeMismatch { .. })));
    }
}
