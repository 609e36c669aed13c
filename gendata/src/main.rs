//! Write the standard fixture banks into `$GENDATA_OUT_DIR` (default `.`).
use std::path::PathBuf;
use std::process::ExitCode;

use feature_bank::{pipeline, GenerationConfig};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let dir = std::env::var_os("GENDATA_OUT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    for cfg in [GenerationConfig::one_to_n(), GenerationConfig::identical()] {
        match pipeline::run(&cfg, &dir) {
            Ok(report) => {
                let q = &report.quantization;
                tracing::info!(
                    precision = q.precision,
                    max_abs_error = q.max_abs_error,
                    mean_abs_error = q.mean_abs_error,
                    bound = q.bound,
                    "quantized scores (probe x gallery):\n{}",
                    q.approx
                );
            }
            Err(e) => {
                tracing::error!(dim = cfg.dim, error = %e, "generation failed");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
