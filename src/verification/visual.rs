//! Visual integrity analysis
//!
//! Two independent image-quality signals computed on the grayscale image:
//!
//! - **Edge density**: mean of a Canny edge map. Seals, stamps and signatures
//!   add dense, irregular edges compared to typed text.
//! - **Laplacian variance**: spread of the second-derivative response.
//!   Resaving, recompressing or retouching a scan smooths fine texture and
//!   lowers it.

use image::{DynamicImage, GrayImage};
use imageproc::edges::canny;
use serde::{Deserialize, Serialize};

/// Canny hysteresis thresholds
pub const CANNY_LOW_THRESHOLD: f32 = 100.0;
pub const CANNY_HIGH_THRESHOLD: f32 = 200.0;

/// Mean edge intensity above which a seal or signature is considered present
pub const EDGE_DENSITY_THRESHOLD: f64 = 100.0;

/// Laplacian variance below this is high pixelation
pub const HIGH_PIXELATION_BELOW: f64 = 50.0;
/// Laplacian variance at or above this is low pixelation
pub const LOW_PIXELATION_FROM: f64 = 100.0;

const SEAL_DETECTED: &str = "Seal/Signature Detected";
const SEAL_NOT_DETECTED: &str = "Seal/Signature Not Detected";

const HIGH_PIXELATION: &str = "High Pixelation Detected (Possible Tampering)";
const MODERATE_PIXELATION: &str = "Moderate Pixelation";
const LOW_PIXELATION: &str = "Low Pixelation (Likely Authentic)";
const SCORE_SEPARATOR: &str = " - Score: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SealVerdict {
    Detected,
    NotDetected,
}

impl SealVerdict {
    pub fn from_edge_density(edge_density: f64) -> Self {
        if edge_density > EDGE_DENSITY_THRESHOLD {
            Self::Detected
        } else {
            Self::NotDetected
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Detected => SEAL_DETECTED,
            Self::NotDetected => SEAL_NOT_DETECTED,
        }
    }

    pub fn from_message(message: &str) -> Option<Self> {
        match message {
            SEAL_DETECTED => Some(Self::Detected),
            SEAL_NOT_DETECTED => Some(Self::NotDetected),
            _ => None,
        }
    }
}

/// Seal/signature presence signal
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SealSignal {
    /// Mean of the 0/255 edge map over the whole frame
    pub edge_density: f64,
    pub verdict: SealVerdict,
}

impl SealSignal {
    pub fn from_edge_density(edge_density: f64) -> Self {
        Self {
            edge_density,
            verdict: SealVerdict::from_edge_density(edge_density),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelationVerdict {
    HighPixelation,
    ModeratePixelation,
    LowPixelation,
}

impl PixelationVerdict {
    pub fn from_variance(variance: f64) -> Self {
        if variance < HIGH_PIXELATION_BELOW {
            Self::HighPixelation
        } else if variance < LOW_PIXELATION_FROM {
            Self::ModeratePixelation
        } else {
            Self::LowPixelation
        }
    }

    fn headline(&self) -> &'static str {
        match self {
            Self::HighPixelation => HIGH_PIXELATION,
            Self::ModeratePixelation => MODERATE_PIXELATION,
            Self::LowPixelation => LOW_PIXELATION,
        }
    }
}

/// Pixelation/tampering signal
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PixelationSignal {
    /// Laplacian variance, rounded to two decimal places
    pub variance: f64,
    pub verdict: PixelationVerdict,
}

impl PixelationSignal {
    /// Classify a raw variance; the verdict uses the unrounded value
    pub fn from_variance(variance: f64) -> Self {
        Self {
            variance: round_to_hundredths(variance),
            verdict: PixelationVerdict::from_variance(variance),
        }
    }

    pub fn message(&self) -> String {
        format!(
            "{}{}{:.2}",
            self.verdict.headline(),
            SCORE_SEPARATOR,
            self.variance
        )
    }

    /// Parse a rendered message back into a signal
    pub fn from_message(message: &str) -> Option<Self> {
        let (headline, score) = message.rsplit_once(SCORE_SEPARATOR)?;
        let verdict = [
            PixelationVerdict::HighPixelation,
            PixelationVerdict::ModeratePixelation,
            PixelationVerdict::LowPixelation,
        ]
        .into_iter()
        .find(|v| v.headline() == headline)?;
        let variance = score.parse::<f64>().ok()?;

        Some(Self { variance, verdict })
    }
}

/// Both visual signals for one image
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VisualSignals {
    pub seal: SealSignal,
    pub pixelation: PixelationSignal,
}

/// Run both visual analyses on an image
pub fn analyze(image: &DynamicImage) -> VisualSignals {
    let gray = image.to_luma8();
    let signals = VisualSignals {
        seal: detect_seal(&gray),
        pixelation: analyze_pixelation(&gray),
    };

    tracing::debug!(
        "Visual signals: edge density {:.2} ({:?}), laplacian variance {:.2} ({:?})",
        signals.seal.edge_density,
        signals.seal.verdict,
        signals.pixelation.variance,
        signals.pixelation.verdict
    );

    signals
}

pub fn detect_seal(gray: &GrayImage) -> SealSignal {
    SealSignal::from_edge_density(edge_density(gray))
}

pub fn analyze_pixelation(gray: &GrayImage) -> PixelationSignal {
    PixelationSignal::from_variance(laplacian_variance(gray))
}

/// Mean intensity of the Canny edge map
///
/// imageproc's `canny` pre-smooths (sigma 1.4) and uses the L2 gradient, so
/// one-pixel texture is blurred away before edges are traced.
pub fn edge_density(gray: &GrayImage) -> f64 {
    let (width, height) = gray.dimensions();
    if width == 0 || height == 0 {
        return 0.0;
    }

    let edges = canny(gray, CANNY_LOW_THRESHOLD, CANNY_HIGH_THRESHOLD);
    let total: u64 = edges.pixels().map(|p| p.0[0] as u64).sum();
    total as f64 / (width as u64 * height as u64) as f64
}

/// Population variance of the 3x3 Laplacian response `[0,1,0; 1,-4,1; 0,1,0]`
///
/// Borders are reflected without repeating the edge pixel (`dcb|abcd|cba`).
pub fn laplacian_variance(gray: &GrayImage) -> f64 {
    let (width, height) = gray.dimensions();
    if width == 0 || height == 0 {
        return 0.0;
    }

    let at = |x: i64, y: i64| -> f64 {
        let x = reflect_101(x, width);
        let y = reflect_101(y, height);
        gray.get_pixel(x, y).0[0] as f64
    };

    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;

    for y in 0..height as i64 {
        for x in 0..width as i64 {
            let response =
                at(x, y - 1) + at(x, y + 1) + at(x - 1, y) + at(x + 1, y) - 4.0 * at(x, y);
            sum += response;
            sum_sq += response * response;
        }
    }

    let count = (width as u64 * height as u64) as f64;
    let mean = sum / count;
    (sum_sq / count - mean * mean).max(0.0)
}

fn reflect_101(i: i64, len: u32) -> u32 {
    let len = len as i64;
    if len == 1 {
        return 0;
    }
    let reflected = if i < 0 {
        -i
    } else if i >= len {
        2 * len - 2 - i
    } else {
        i
    };
    reflected.clamp(0, len - 1) as u32
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
