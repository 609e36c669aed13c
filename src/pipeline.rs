//! generate → normalize → check → encode, one named stage at a time.
use std::path::{Path, PathBuf};

use rand::Rng;

use crate::config::{GenerationConfig, Role};
use crate::distribution::{generate_unit, rng_from_seed};
use crate::error::Result;
use crate::layout::encode;
use crate::matrix::FeatureMatrix;
use crate::quantize::{check, QuantizationReport};

/// A gallery bank and the probe bank matched against it.
#[derive(Debug, Clone)]
pub struct Banks {
    pub gallery: FeatureMatrix,
    pub probe: FeatureMatrix,
}

impl Banks {
    pub fn get(&self, role: Role) -> &FeatureMatrix {
        match role {
            Role::Gallery => &self.gallery,
            Role::Probe => &self.probe,
        }
    }
}

#[derive(Debug)]
pub struct RunReport {
    pub quantization: QuantizationReport,
    pub written: Vec<(PathBuf, usize)>,
}

pub fn build_banks<R: Rng>(rng: &mut R, cfg: &GenerationConfig) -> Result<Banks> {
    let gallery = generate_unit(rng, cfg.num_gallery, cfg.dim)?;
    let probe = if cfg.identical_sets {
        gallery.clone()
    } else {
        generate_unit(rng, cfg.num_probe, cfg.dim)?
    };
    Ok(Banks { gallery, probe })
}

/// Fixed-point drift between probe and gallery at the configured precision.
pub fn check_banks(banks: &Banks, cfg: &GenerationConfig) -> Result<QuantizationReport> {
    check(&banks.probe, &banks.gallery, cfg.precision)
}

/// Write every configured artifact under `dir`.
pub fn write_artifacts(
    banks: &Banks,
    cfg: &GenerationConfig,
    dir: &Path,
) -> Result<Vec<(PathBuf, usize)>> {
    cfg.artifacts()
        .into_iter()
        .map(|artifact| -> Result<(PathBuf, usize)> {
            let path = dir.join(&artifact.file_name);
            let len = encode(banks.get(artifact.role), artifact.layout, &path)?;
            Ok((path, len))
        })
        .collect()
}

/// Generate both banks, check them against the analytic drift bound and
/// write them out.
pub fn run(cfg: &GenerationConfig, dir: &Path) -> Result<RunReport> {
    cfg.validate()?;
    let mut rng = rng_from_seed(cfg.seed);

    let banks = build_banks(&mut rng, cfg)?;
    let quantization = check_banks(&banks, cfg)?;
    quantization.ensure_within(quantization.bound)?;
    let written = write_artifacts(&banks, cfg, dir)?;

    tracing::info!(
        dim = cfg.dim,
        num_gallery = cfg.num_gallery,
        num_probe = cfg.num_probe,
        files = written.len(),
        "generated feature banks"
    );
    Ok(RunReport {
        quantization,
        written,
    })
}
