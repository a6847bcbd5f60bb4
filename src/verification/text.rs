//! Text extraction: preprocessing followed by OCR

use crate::engine::OcrEngine;
use crate::preprocessing::Pipeline;
use image::DynamicImage;
use std::sync::Arc;

/// Reads the text of a certificate image through an injected OCR engine
#[derive(Clone)]
pub struct TextExtractor {
    engine: Arc<dyn OcrEngine>,
    pipeline: Pipeline,
}

impl TextExtractor {
    pub fn new(engine: Arc<dyn OcrEngine>) -> Self {
        Self {
            engine,
            pipeline: Pipeline::new(),
        }
    }

    /// Name of the underlying OCR engine
    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    /// Extract text from an image
    ///
    /// Never fails: an OCR error yields empty text, which downstream
    /// classifies as Unknown / Not Found and lowers the score.
    pub fn extract(&self, image: &DynamicImage) -> String {
        let preprocessed = self.pipeline.process(image);

        match self.engine.recognize(&preprocessed.image) {
            Ok(result) => {
                tracing::debug!(
                    "{} extracted {} chars (confidence: {:?})",
                    self.engine.name(),
                    result.text.len(),
                    result.confidence
                );
                result.text
            }
            Err(e) => {
                tracing::warn!("OCR failed, continuing with empty text: {}", e);
                String::new()
            }
        }
    }
}
