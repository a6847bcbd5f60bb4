#![allow(dead_code)]

use certverify::engine::{OcrEngine, OcrResult};
use certverify::error::VerifyError;
use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};

/// OCR engine that returns canned text and counts calls
pub struct StubEngine {
    text: Option<String>,
    calls: AtomicUsize,
}

impl StubEngine {
    pub fn reading(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    /// An engine whose every recognition fails
    pub fn broken() -> Self {
        Self {
            text: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl OcrEngine for StubEngine {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn description(&self) -> &'static str {
        "Canned text for tests"
    }

    fn recognize(&self, _image: &GrayImage) -> Result<OcrResult, VerifyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.text {
            Some(text) => Ok(OcrResult {
                text: text.clone(),
                confidence: Some(0.9),
            }),
            None => Err(VerifyError::OcrFailed("stub engine is broken".to_string())),
        }
    }

    fn supported_languages(&self) -> Vec<String> {
        vec!["eng".to_string()]
    }
}

/// Flat paper: no edges, no texture
pub fn blank_page() -> DynamicImage {
    DynamicImage::ImageLuma8(GrayImage::from_pixel(64, 48, Luma([235])))
}

/// 64x64 checkerboard of 4-pixel squares: dense edges and strong texture
pub fn checkerboard() -> DynamicImage {
    DynamicImage::ImageLuma8(GrayImage::from_fn(64, 64, |x, y| {
        if (x / 4 + y / 4) % 2 == 0 {
            Luma([0])
        } else {
            Luma([255])
        }
    }))
}

pub fn png_bytes(image: &DynamicImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("encode png");
    bytes
}
