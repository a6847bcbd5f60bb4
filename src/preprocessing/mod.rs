//! Image preprocessing module for OCR enhancement
//!
//! Conditions a scanned certificate for character recognition: grayscale,
//! Gaussian smoothing, then an unsharp mask that boosts local contrast.

pub mod pipeline;
pub mod steps;

pub use pipeline::{Pipeline, PreprocessingResult, StepTiming};
