use image::{DynamicImage, GrayImage};
use serde::Serialize;
use std::time::Instant;

use super::steps;

/// Timing information for a single preprocessing step
#[derive(Debug, Clone, Serialize)]
pub struct StepTiming {
    pub name: String,
    pub time_ms: u64,
}

/// Result of preprocessing including timing stats
#[derive(Debug, Clone, Serialize)]
pub struct PreprocessingResult {
    /// Preprocessed image (not serialized)
    #[serde(skip)]
    pub image: GrayImage,
    /// Total preprocessing time in milliseconds
    pub total_time_ms: u64,
    /// Individual step timings
    pub steps: Vec<StepTiming>,
}

/// Fixed OCR pre-conditioning pipeline: grayscale, 5x5 Gaussian blur, unsharp mask
///
/// Every step produces a new image; the input is never modified.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pipeline;

impl Pipeline {
    pub fn new() -> Self {
        Self
    }

    /// Condition an image for character recognition
    pub fn process(&self, image: &DynamicImage) -> PreprocessingResult {
        let start = Instant::now();
        let mut timings = Vec::with_capacity(3);

        let gray = run_step("grayscale", &mut timings, || steps::grayscale::apply(image));
        let blurred = run_step("blur", &mut timings, || steps::blur::apply(&gray));
        let sharpened = run_step("sharpen", &mut timings, || {
            steps::sharpen::unsharp_mask(&gray, &blurred)
        });

        let result = PreprocessingResult {
            image: sharpened,
            total_time_ms: start.elapsed().as_millis() as u64,
            steps: timings,
        };

        tracing::debug!(
            "Preprocessing completed in {}ms ({:?})",
            result.total_time_ms,
            result.steps
        );

        result
    }
}

fn run_step<F>(name: &str, timings: &mut Vec<StepTiming>, step_fn: F) -> GrayImage
where
    F: FnOnce() -> GrayImage,
{
    let step_start = Instant::now();
    let result = step_fn();
    timings.push(StepTiming {
        name: name.to_string(),
        time_ms: step_start.elapsed().as_millis() as u64,
    });
    result
}
