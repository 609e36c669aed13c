//! Synthetic unit-norm feature banks for exercising fixed-point matchers.
//!
//! Banks are drawn from a standard normal and normalized per row, checked for
//! how far fixed-point scoring drifts from the float cosine similarity, and
//! written to a small binary container in either the 1-to-1 or the 1-to-n
//! layout.
pub mod config;
pub mod distribution;
pub mod error;
pub mod layout;
pub mod matcher;
pub mod matrix;
pub mod pipeline;
pub mod quantize;

pub use config::{GenerationConfig, Role};
pub use error::{Error, Result};
pub use layout::{decode, encode, encode_batch, encode_pairwise, Layout};
pub use matrix::FeatureMatrix;
pub use quantize::{check, quantize, score, QuantizationReport, SimilarityMatrix};
