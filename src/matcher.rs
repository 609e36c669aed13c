//! Plaintext stand-ins for the two fixed-point matchers that consume the
//! containers. They read the payload in the order each layout stores it,
//! so a layout bug shows up as a score mismatch against `quantize::score`.
use crate::error::{Error, Result};
use crate::layout::Container;
use crate::quantize::{int_dot, quantize_value, SimilarityMatrix};

fn quantize_all(values: &[f32], precision: i32) -> Result<Vec<i32>> {
    values
        .iter()
        .map(|&v| quantize_value(v, precision))
        .collect()
}

fn check_precision(precision: i32) -> Result<f64> {
    if precision <= 0 {
        return Err(Error::InvalidPrecision(precision));
    }
    Ok(f64::from(precision) * f64::from(precision))
}

/// 1-to-1 matching: both containers hold `[n, d]` records; every probe record
/// is compared with every gallery record.
pub fn match_one_to_one(
    gallery: &Container,
    probe: &Container,
    precision: i32,
) -> Result<SimilarityMatrix> {
    let scale = check_precision(precision)?;
    let [num_gallery, dim_gallery] = gallery.header().map(|h| h as usize);
    let [num_probe, dim_probe] = probe.header().map(|h| h as usize);
    if dim_gallery != dim_probe {
        return Err(Error::DimensionMismatch {
            left: dim_gallery,
            right: dim_probe,
        });
    }
    let dim = dim_probe;

    let g = quantize_all(gallery.payload(), precision)?;
    let p = quantize_all(probe.payload(), precision)?;
    Ok(SimilarityMatrix::from_fn(num_probe, num_gallery, |i, j| {
        int_dot(&p[i * dim..(i + 1) * dim], &g[j * dim..(j + 1) * dim]) as f64 / scale
    }))
}

/// 1-to-n matching: the gallery container holds `[d, n]` coordinate records.
/// Each probe coordinate is broadcast against one gallery record and the
/// products accumulate into a score per gallery entry.
pub fn match_one_to_n(
    gallery: &Container,
    probe: &Container,
    precision: i32,
) -> Result<SimilarityMatrix> {
    let scale = check_precision(precision)?;
    let [dim_gallery, num_gallery] = gallery.header().map(|h| h as usize);
    let [num_probe, dim_probe] = probe.header().map(|h| h as usize);
    if dim_gallery != dim_probe {
        return Err(Error::DimensionMismatch {
            left: dim_gallery,
            right: dim_probe,
        });
    }

    let g = quantize_all(gallery.payload(), precision)?;
    let mut scores = Vec::with_capacity(num_probe);
    for probe_vec in probe.payload().chunks_exact(dim_probe) {
        let mut acc = vec![0i64; num_gallery];
        for (coord, &value) in g.chunks_exact(num_gallery).zip(probe_vec) {
            let a = i64::from(quantize_value(value, precision)?);
            for (slot, &b) in acc.iter_mut().zip(coord) {
                *slot += a * i64::from(b);
            }
        }
        scores.push(acc);
    }

    Ok(SimilarityMatrix::from_fn(num_probe, num_gallery, |i, j| {
        scores[i][j] as f64 / scale
    }))
}
