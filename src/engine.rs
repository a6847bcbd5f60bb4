use crate::error::VerifyError;
use image::GrayImage;

/// OCR recognition result
#[derive(Debug, Clone, Default)]
pub struct OcrResult {
    pub text: String,
    /// Engine-reported confidence in 0.0-1.0, when the engine provides one
    pub confidence: Option<f32>,
}

/// Trait that all OCR engines must implement
///
/// Engines read a single uniform block of text from an already
/// preprocessed grayscale image.
pub trait OcrEngine: Send + Sync {
    /// Returns the engine identifier (e.g., "ocrs", "leptess")
    fn name(&self) -> &'static str;

    /// Returns a human-readable description of the engine
    fn description(&self) -> &'static str;

    /// Recognize the text in a preprocessed grayscale image
    fn recognize(&self, image: &GrayImage) -> Result<OcrResult, VerifyError>;

    /// Get supported languages
    fn supported_languages(&self) -> Vec<String>;
}
