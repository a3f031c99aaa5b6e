//! Analysis and result aggregation modules
//!
//! Turns the extracted features into the final swing analysis:
//! - Benchmark corridors per skill tier
//! - Metrics scoring
//! - Validation
//! - Confidence scoring
//! - Result types
//! - Frame-incremental (streaming) analysis

pub mod benchmarks;
pub mod confidence;
pub mod result;
pub mod scoring;
pub mod streaming;
pub mod validation;
