#![allow(dead_code)]

use feature_bank::{distribution, FeatureMatrix};

/// Vector dimension.
pub const V_DIM: usize = 512;
/// Number of vectors within the produced set.
pub const N: usize = 16;

/// Construct a seeded unit-norm bank to work with.
pub fn build_bank(rows: usize, dim: usize, seed: u64) -> FeatureMatrix {
    let mut rng = distribution::rng_from_seed(Some(seed));
    distribution::generate_unit(&mut rng, rows, dim).unwrap()
}

/// Reinterpret a payload as IEEE-754 bit patterns so comparisons are exact.
pub fn bits(values: &[f32]) -> Vec<u32> {
    values.iter().map(|v| v.to_bits()).collect()
}
