//! Document-type classification by keyword matching

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kinds of birth record the classifier recognises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    CertificateOfBirth,
    CertifiedBirthTranscript,
    CertificateOfLiveBirth,
    Unknown,
}

/// Title phrases in priority order; the first phrase found wins
const TITLE_PHRASES: [(&str, DocumentType); 3] = [
    ("CERTIFICATE OF BIRTH", DocumentType::CertificateOfBirth),
    ("CERTIFIED TRANSCRIPT OF BIRTH", DocumentType::CertifiedBirthTranscript),
    ("CERTIFICATE OF LIVE BIRTH", DocumentType::CertificateOfLiveBirth),
];

impl DocumentType {
    pub const ALL: [DocumentType; 4] = [
        DocumentType::CertificateOfBirth,
        DocumentType::CertifiedBirthTranscript,
        DocumentType::CertificateOfLiveBirth,
        DocumentType::Unknown,
    ];

    /// Label used in rendered reports
    pub fn label(&self) -> &'static str {
        match self {
            Self::CertificateOfBirth => "Certificate of Birth",
            Self::CertifiedBirthTranscript => "Certified Birth Transcript",
            Self::CertificateOfLiveBirth => "Certificate of Live Birth",
            Self::Unknown => "Unknown Document Type",
        }
    }

    /// Inverse of [`DocumentType::label`]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.label() == label)
    }

    pub fn is_known(&self) -> bool {
        *self != Self::Unknown
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify extracted text by case-insensitive title phrase search
///
/// Phrases are tried top to bottom and the first hit wins, so text that
/// contains several titles (a footer disclaimer, say) always classifies the
/// same way.
pub fn classify(text: &str) -> DocumentType {
    let upper = text.to_uppercase();
    TITLE_PHRASES
        .iter()
        .find(|(phrase, _)| upper.contains(phrase))
        .map(|(_, doc_type)| *doc_type)
        .unwrap_or(DocumentType::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_each_title() {
        assert_eq!(
            classify("REPUBLIC OF KENYA\nCERTIFICATE OF BIRTH\n"),
            DocumentType::CertificateOfBirth
        );
        assert_eq!(
            classify("Certified Transcript of Birth"),
            DocumentType::CertifiedBirthTranscript
        );
        assert_eq!(
            classify("STATE OF HAWAII CERTIFICATE OF LIVE BIRTH"),
            DocumentType::CertificateOfLiveBirth
        );
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(
            classify("this is a certificate of birth"),
            DocumentType::CertificateOfBirth
        );
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(classify(""), DocumentType::Unknown);
        assert_eq!(classify("MARRIAGE CERTIFICATE"), DocumentType::Unknown);
        // Words present but not contiguous
        assert_eq!(classify("CERTIFICATE\nOF BIRTH"), DocumentType::Unknown);
    }

    #[test]
    fn test_classify_first_phrase_wins() {
        let text = "CERTIFIED TRANSCRIPT OF BIRTH\n...\nNot a CERTIFICATE OF BIRTH unless sealed";
        assert_eq!(classify(text), DocumentType::CertificateOfBirth);

        let text = "CERTIFICATE OF LIVE BIRTH / CERTIFIED TRANSCRIPT OF BIRTH";
        assert_eq!(classify(text), DocumentType::CertifiedBirthTranscript);
    }

    #[test]
    fn test_classify_is_idempotent() {
        for text in ["", "certificate of live birth", "garbage §±", "CERTIFICATE OF BIRTH"] {
            assert_eq!(classify(text), classify(text));
        }
    }

    #[test]
    fn test_label_round_trip() {
        for doc_type in DocumentType::ALL {
            assert_eq!(DocumentType::from_label(doc_type.label()), Some(doc_type));
        }
        assert_eq!(DocumentType::from_label("Passport"), None);
    }
}
