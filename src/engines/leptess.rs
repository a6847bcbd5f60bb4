//! Leptess/Tesseract engine implementation
//!
//! Tesseract-based OCR engine, run in single-uniform-block page segmentation
//! mode. Uses tesseract-static crate for static linking (no system dependencies).
//! Downloads tessdata (training data) automatically on first use unless a
//! tessdata directory is configured.

use super::{cache_dir, ensure_downloaded};
use crate::config::Config;
use crate::engine::{OcrEngine, OcrResult};
use crate::error::VerifyError;
use image::GrayImage;
use std::path::PathBuf;
use tesseract_static::tesseract::Tesseract;

/// Tesseract page segmentation mode: assume a single uniform block of text
const PAGE_SEG_MODE_SINGLE_BLOCK: &str = "6";

/// Tesseract OCR Engine
pub struct LeptessEngine {
    /// Path to tessdata directory
    tessdata_path: String,
    /// Language for OCR
    language: String,
}

impl LeptessEngine {
    /// Create a new Tesseract-based OCR engine
    pub fn new(config: &Config) -> Result<Self, VerifyError> {
        let language = config.default_language.clone();

        let tessdata_path = match &config.tessdata_path {
            Some(path) => path.clone(),
            None => ensure_tessdata_available(&language)?,
        };

        // Fail at startup rather than on the first request if tessdata is unusable
        Tesseract::new(Some(&tessdata_path), Some(&language)).map_err(|e| {
            VerifyError::EngineUnavailable(format!("Failed to initialize Tesseract: {}", e))
        })?;

        tracing::info!(
            "Leptess engine initialized (tessdata: {}, language: {})",
            tessdata_path,
            language
        );

        Ok(Self {
            tessdata_path,
            language,
        })
    }
}

impl OcrEngine for LeptessEngine {
    fn name(&self) -> &'static str {
        "leptess"
    }

    fn description(&self) -> &'static str {
        "Tesseract OCR engine - better for noisy/messy images like phone photos"
    }

    fn recognize(&self, img: &GrayImage) -> Result<OcrResult, VerifyError> {
        let (width, height) = img.dimensions();

        // BMP is always supported by leptonica
        let mut bmp_data = Vec::new();
        img
            .write_to(&mut std::io::Cursor::new(&mut bmp_data), image::ImageFormat::Bmp)
            .map_err(|e| VerifyError::OcrFailed(format!("Failed to convert to BMP: {}", e)))?;

        tracing::debug!(
            "Processing image: {}x{}, BMP size: {} bytes",
            width,
            height,
            bmp_data.len()
        );

        let mut tess = Tesseract::new(Some(&self.tessdata_path), Some(&self.language))
            .map_err(|e| VerifyError::OcrFailed(format!("Failed to create Tesseract: {}", e)))?
            .set_variable("tessedit_pageseg_mode", PAGE_SEG_MODE_SINGLE_BLOCK)
            .map_err(|e| VerifyError::OcrFailed(format!("Failed to set page mode: {}", e)))?
            .set_image_from_mem(&bmp_data)
            .map_err(|e| VerifyError::OcrFailed(format!("Failed to set image: {}", e)))?
            .recognize()
            .map_err(|e| VerifyError::OcrFailed(format!("Failed to recognize text: {}", e)))?;

        let text = tess
            .get_text()
            .map_err(|e| VerifyError::OcrFailed(format!("Failed to get text: {}", e)))?;

        // 0-100 scale
        let confidence = tess.mean_text_conf() as f32 / 100.0;

        Ok(OcrResult {
            text: text.trim().to_string(),
            confidence: Some(confidence),
        })
    }

    fn supported_languages(&self) -> Vec<String> {
        vec![self.language.clone()]
    }
}

/// Ensure tessdata is available, downloading if needed
fn ensure_tessdata_available(language: &str) -> Result<String, VerifyError> {
    let tessdata_dir: PathBuf = cache_dir().join("tessdata");
    let traineddata_path = tessdata_dir.join(format!("{}.traineddata", language));

    ensure_downloaded(&tessdata_url(language), &traineddata_path)?;

    // Tesseract expects the directory, not the file
    tessdata_dir
        .to_str()
        .map(|s| s.to_string())
        .ok_or_else(|| VerifyError::EngineUnavailable("Invalid tessdata path".to_string()))
}

/// Get tessdata download URL for a language
fn tessdata_url(language: &str) -> String {
    format!(
        "https://github.com/tesseract-ocr/tessdata_fast/raw/main/{}.traineddata",
        language
    )
}
