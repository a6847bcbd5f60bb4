//! Serial number detection

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// A standalone run of 7-12 uppercase letters or digits
static SERIAL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z0-9]{7,12}\b").expect("serial pattern is valid"));

const NOT_FOUND_LABEL: &str = "Not Found";

/// Candidate serial number located in the extracted text
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum SerialNumber {
    Found(String),
    NotFound,
}

impl SerialNumber {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Found(token) => token,
            Self::NotFound => NOT_FOUND_LABEL,
        }
    }

    /// Parse a rendered serial number back
    pub fn from_label(label: &str) -> Option<Self> {
        if label == NOT_FOUND_LABEL {
            return Some(Self::NotFound);
        }
        match SERIAL_PATTERN.find(label) {
            Some(m) if m.as_str() == label => Some(Self::Found(label.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for SerialNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Find the first serial-number-shaped token in reading order
///
/// Purely a pattern hit: no checksum or issuing-authority validation.
pub fn find_serial(text: &str) -> SerialNumber {
    SERIAL_PATTERN
        .find(text)
        .map(|m| SerialNumber::Found(m.as_str().to_string()))
        .unwrap_or(SerialNumber::NotFound)
}
