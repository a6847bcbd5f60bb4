//! Birth certificate verification pipeline
//!
//! Data flows one way: the decoded image feeds text extraction (and from
//! there classification and serial detection) and, independently, the visual
//! integrity analysis. The four signals are then scored into a
//! [`ConfidenceReport`].

pub mod classifier;
pub mod report;
pub mod scoring;
pub mod serial;
pub mod text;
pub mod visual;

pub use classifier::{classify, DocumentType};
pub use report::{ReportFields, REPORT_FILENAME};
pub use scoring::{score, ConfidenceReport, Recommendation};
pub use serial::{find_serial, SerialNumber};
pub use text::TextExtractor;
pub use visual::{PixelationSignal, PixelationVerdict, SealSignal, SealVerdict, VisualSignals};

use crate::error::VerifyError;
use image::DynamicImage;
use std::time::Instant;

/// Outcome of verifying one image
#[derive(Debug, Clone)]
pub struct Verification {
    pub report: ConfidenceReport,
    pub extracted_text: String,
}

/// Runs the full pipeline for one image at a time
#[derive(Clone)]
pub struct Verifier {
    extractor: TextExtractor,
}

impl Verifier {
    pub fn new(extractor: TextExtractor) -> Self {
        Self { extractor }
    }

    pub fn engine_name(&self) -> &'static str {
        self.extractor.engine_name()
    }

    /// Decode and verify an uploaded image
    ///
    /// Undecodable or empty images fail with `InvalidImage` before any
    /// analysis runs.
    pub fn verify_bytes(&self, data: &[u8]) -> Result<Verification, VerifyError> {
        let image = decode_image(data)?;
        Ok(self.verify(&image))
    }

    /// Verify an already decoded image
    pub fn verify(&self, image: &DynamicImage) -> Verification {
        let start = Instant::now();

        let extracted_text = self.extractor.extract(image);
        let document_type = classify(&extracted_text);
        let serial_number = find_serial(&extracted_text);
        let visual = visual::analyze(image);

        let report = score(document_type, serial_number, visual.seal, visual.pixelation);

        tracing::info!(
            "Verified {}x{} image in {}ms: {} / serial {} / score {}/{} ({:?})",
            image.width(),
            image.height(),
            start.elapsed().as_millis(),
            report.document_type,
            report.serial_number,
            report.score,
            scoring::MAX_SCORE,
            report.recommendation
        );

        Verification {
            report,
            extracted_text,
        }
    }
}

/// Decode JPEG/PNG (or any format the image crate sniffs) into RGB channel order
pub fn decode_image(data: &[u8]) -> Result<DynamicImage, VerifyError> {
    if data.is_empty() {
        return Err(VerifyError::InvalidImage("empty upload".to_string()));
    }

    let image = image::load_from_memory(data)
        .map_err(|e| VerifyError::InvalidImage(format!("Failed to decode image: {}", e)))?;

    if image.width() == 0 || image.height() == 0 {
        return Err(VerifyError::InvalidImage(format!(
            "image has no pixels ({}x{})",
            image.width(),
            image.height()
        )));
    }

    Ok(image)
}
