//! Rule-based birth certificate verification
//!
//! Extracts text from a scanned certificate, classifies the document,
//! looks for a serial number, measures visual tampering indicators and fuses
//! the four signals into a 0-10 confidence score with a recommendation.

pub mod config;
pub mod engine;
pub mod engines;
pub mod error;
pub mod preprocessing;
pub mod server;
pub mod verification;

pub use engine::{OcrEngine, OcrResult};
pub use error::VerifyError;
