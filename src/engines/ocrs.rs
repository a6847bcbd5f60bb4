//! OCRS engine implementation
//!
//! Pure Rust OCR engine using the ocrs library. No system dependencies required.
//! Downloads neural network models automatically on first use.

use super::{cache_dir, ensure_downloaded};
use crate::config::Config;
use crate::engine::{OcrEngine, OcrResult};
use crate::error::VerifyError;
use image::{DynamicImage, GrayImage};
use ocrs::{DecodeMethod, ImageSource, OcrEngine as OcrsOcrEngine, OcrEngineParams};
use rten::Model;
use std::path::PathBuf;

/// Default model URLs from the ocrs project
const DETECTION_MODEL_URL: &str =
    "https://ocrs-models.s3-accelerate.amazonaws.com/text-detection.rten";
const RECOGNITION_MODEL_URL: &str =
    "https://ocrs-models.s3-accelerate.amazonaws.com/text-recognition.rten";

/// OCR Engine wrapping the ocrs library
pub struct OcrsEngine {
    engine: OcrsOcrEngine,
}

impl OcrsEngine {
    /// Create the engine, downloading models if needed
    pub fn new(_config: &Config) -> Result<Self, VerifyError> {
        let detection_model = load_model(DETECTION_MODEL_URL, "text-detection.rten")?;
        let recognition_model = load_model(RECOGNITION_MODEL_URL, "text-recognition.rten")?;

        let engine = OcrsOcrEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            decode_method: DecodeMethod::Greedy,
            ..Default::default()
        })
        .map_err(|e| {
            VerifyError::EngineUnavailable(format!("Failed to create ocrs engine: {}", e))
        })?;

        tracing::info!("ocrs engine initialized successfully");

        Ok(Self { engine })
    }
}

impl OcrEngine for OcrsEngine {
    fn name(&self) -> &'static str {
        "ocrs"
    }

    fn description(&self) -> &'static str {
        "Pure Rust OCR engine - fast, no system dependencies required"
    }

    fn recognize(&self, image: &GrayImage) -> Result<OcrResult, VerifyError> {
        // ImageSource::from_bytes expects RGB8 in HWC layout
        let rgb_img = DynamicImage::ImageLuma8(image.clone()).into_rgb8();
        let dimensions = rgb_img.dimensions();

        let img_source = ImageSource::from_bytes(rgb_img.as_raw(), dimensions).map_err(|e| {
            VerifyError::OcrFailed(format!("Failed to create image source: {}", e))
        })?;

        let ocr_input = self
            .engine
            .prepare_input(img_source)
            .map_err(|e| VerifyError::OcrFailed(format!("Failed to prepare input: {}", e)))?;

        let word_rects = self
            .engine
            .detect_words(&ocr_input)
            .map_err(|e| VerifyError::OcrFailed(format!("Failed to detect words: {}", e)))?;

        let line_rects = self.engine.find_text_lines(&ocr_input, &word_rects);

        let line_texts = self
            .engine
            .recognize_text(&ocr_input, &line_rects)
            .map_err(|e| VerifyError::OcrFailed(format!("Failed to recognize text: {}", e)))?;

        // Lines come back in reading order; treat the page as one block
        let text = join_lines(line_texts.iter().filter_map(|line| line.as_ref()).map(|line| {
            line.words()
                .map(|word| word.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        }));

        tracing::debug!("ocrs recognized {} lines", line_rects.len());

        Ok(OcrResult {
            text,
            confidence: None,
        })
    }

    fn supported_languages(&self) -> Vec<String> {
        // ocrs currently only supports English/Latin alphabet
        vec!["eng".to_string()]
    }
}

fn load_model(url: &str, filename: &str) -> Result<Model, VerifyError> {
    let path: PathBuf = cache_dir().join("models").join(filename);
    ensure_downloaded(url, &path)?;

    Model::load_file(&path).map_err(|e| {
        VerifyError::EngineUnavailable(format!("Failed to load model {}: {}", filename, e))
    })
}

/// Join recognized lines into a single block, dropping blank lines
fn join_lines(lines: impl Iterator<Item = String>) -> String {
    lines
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_lines_keeps_reading_order() {
        let lines = vec![
            "REPUBLIC OF KENYA".to_string(),
            "  CERTIFICATE OF BIRTH ".to_string(),
            "No. A1234567".to_string(),
        ];
        assert_eq!(
            join_lines(lines.into_iter()),
            "REPUBLIC OF KENYA\nCERTIFICATE OF BIRTH\nNo. A1234567"
        );
    }

    #[test]
    fn test_join_lines_drops_blank_lines() {
        let lines = vec!["".to_string(), "   ".to_string(), "BIRTH".to_string()];
        assert_eq!(join_lines(lines.into_iter()), "BIRTH");
    }

    #[test]
    fn test_join_lines_empty() {
        assert_eq!(join_lines(std::iter::empty()), "");
    }
}
