//! Confidence scoring
//!
//! Fuses the four authenticity signals with a fixed additive rule table. The
//! point values and cut-offs below are policy: changing them means redefining
//! the table, not tuning a setting.

use super::classifier::DocumentType;
use super::serial::SerialNumber;
use super::visual::{PixelationSignal, PixelationVerdict, SealSignal, SealVerdict};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const KNOWN_DOCUMENT_POINTS: u8 = 3;
pub const SERIAL_FOUND_POINTS: u8 = 2;
pub const SEAL_DETECTED_POINTS: u8 = 3;
pub const LOW_PIXELATION_POINTS: u8 = 2;
pub const MODERATE_PIXELATION_POINTS: u8 = 1;
pub const HIGH_PIXELATION_POINTS: u8 = 0;

pub const MAX_SCORE: u8 =
    KNOWN_DOCUMENT_POINTS + SERIAL_FOUND_POINTS + SEAL_DETECTED_POINTS + LOW_PIXELATION_POINTS;

/// Scores at or above this proceed
pub const PROCEED_THRESHOLD: u8 = 7;
/// Scores at or above this (and below [`PROCEED_THRESHOLD`]) are held for review
pub const REVIEW_THRESHOLD: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Proceed,
    HoldForReview,
    HighFraudRisk,
}

impl Recommendation {
    pub const ALL: [Recommendation; 3] = [
        Recommendation::Proceed,
        Recommendation::HoldForReview,
        Recommendation::HighFraudRisk,
    ];

    pub fn from_score(score: u8) -> Self {
        if score >= PROCEED_THRESHOLD {
            Self::Proceed
        } else if score >= REVIEW_THRESHOLD {
            Self::HoldForReview
        } else {
            Self::HighFraudRisk
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Proceed => "✅ Proceed - Document appears valid.",
            Self::HoldForReview => "⚠️ Hold for Further Review - Some inconsistencies detected.",
            Self::HighFraudRisk => {
                "🚨 High Fraud Risk - Do not proceed without additional verification."
            }
        }
    }

    pub fn from_message(message: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.message() == message)
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Verdict for one submitted certificate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfidenceReport {
    pub document_type: DocumentType,
    pub serial_number: SerialNumber,
    pub seal: SealSignal,
    pub pixelation: PixelationSignal,
    /// Always in `0..=MAX_SCORE`
    pub score: u8,
    pub recommendation: Recommendation,
}

/// Sum of the rule-table contributions for the four categorical signals
pub fn confidence_points(
    document_type: DocumentType,
    serial_number: &SerialNumber,
    seal: SealVerdict,
    pixelation: PixelationVerdict,
) -> u8 {
    let document_points = if document_type.is_known() {
        KNOWN_DOCUMENT_POINTS
    } else {
        0
    };
    let serial_points = if serial_number.is_found() {
        SERIAL_FOUND_POINTS
    } else {
        0
    };
    let seal_points = match seal {
        SealVerdict::Detected => SEAL_DETECTED_POINTS,
        SealVerdict::NotDetected => 0,
    };
    let pixelation_points = match pixelation {
        PixelationVerdict::LowPixelation => LOW_PIXELATION_POINTS,
        PixelationVerdict::ModeratePixelation => MODERATE_PIXELATION_POINTS,
        PixelationVerdict::HighPixelation => HIGH_PIXELATION_POINTS,
    };

    document_points + serial_points + seal_points + pixelation_points
}

/// Fuse the four signals into a report
pub fn score(
    document_type: DocumentType,
    serial_number: SerialNumber,
    seal: SealSignal,
    pixelation: PixelationSignal,
) -> ConfidenceReport {
    let score = confidence_points(document_type, &serial_number, seal.verdict, pixelation.verdict);

    ConfidenceReport {
        document_type,
        serial_number,
        seal,
        pixelation,
        score,
        recommendation: Recommendation::from_score(score),
    }
}
