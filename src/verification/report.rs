//! Plain-text validation report
//!
//! The same rendering is returned inline by the API and served as the
//! downloadable `validation_report.txt`, so it must stay byte-for-byte stable.

use super::classifier::DocumentType;
use super::scoring::{confidence_points, ConfidenceReport, Recommendation, MAX_SCORE};
use super::serial::SerialNumber;
use super::visual::{PixelationSignal, SealVerdict};
use crate::error::VerifyError;
use serde::Serialize;

pub const REPORT_TITLE: &str = "Birth Certificate Validation Report";
pub const REPORT_FILENAME: &str = "validation_report.txt";

const DOCUMENT_TYPE: &str = "Document Type";
const SERIAL_NUMBER: &str = "Serial Number";
const SEAL: &str = "Seal & Signature Detection";
const PIXELATION: &str = "Pixelation & Tampering Analysis";
const SCORE: &str = "Final Confidence Score";
const RECOMMENDATION: &str = "Recommendation";

/// Values a rendered report carries
///
/// The edge density behind the seal verdict is not part of the text, so a
/// parsed report exposes the verdict only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportFields {
    pub document_type: DocumentType,
    pub serial_number: SerialNumber,
    pub seal: SealVerdict,
    pub pixelation: PixelationSignal,
    pub score: u8,
    pub recommendation: Recommendation,
}

impl From<&ConfidenceReport> for ReportFields {
    fn from(report: &ConfidenceReport) -> Self {
        Self {
            document_type: report.document_type,
            serial_number: report.serial_number.clone(),
            seal: report.seal.verdict,
            pixelation: report.pixelation,
            score: report.score,
            recommendation: report.recommendation,
        }
    }
}

/// Render a report; never alters a value
pub fn render(report: &ConfidenceReport) -> String {
    format!(
        "{REPORT_TITLE}\n\
         \n\
         {DOCUMENT_TYPE}: {}\n\
         {SERIAL_NUMBER}: {}\n\
         {SEAL}: {}\n\
         {PIXELATION}: {}\n\
         \n\
         {SCORE}: {}/{MAX_SCORE}\n\
         {RECOMMENDATION}: {}\n",
        report.document_type.label(),
        report.serial_number.as_str(),
        report.seal.verdict.message(),
        report.pixelation.message(),
        report.score,
        report.recommendation.message(),
    )
}

/// Parse a rendered report back into its fields
///
/// Rejects reports whose score disagrees with the rule table or whose
/// recommendation disagrees with the score.
pub fn parse(text: &str) -> Result<ReportFields, VerifyError> {
    let field = |label: &str| field_value(text, label);
    let invalid = |label: &str, value: &str| {
        VerifyError::MalformedReport(format!("unrecognized {} '{}'", label, value))
    };

    let value = field(DOCUMENT_TYPE)?;
    let document_type =
        DocumentType::from_label(value).ok_or_else(|| invalid(DOCUMENT_TYPE, value))?;

    let value = field(SERIAL_NUMBER)?;
    let serial_number =
        SerialNumber::from_label(value).ok_or_else(|| invalid(SERIAL_NUMBER, value))?;

    let value = field(SEAL)?;
    let seal = SealVerdict::from_message(value).ok_or_else(|| invalid(SEAL, value))?;

    let value = field(PIXELATION)?;
    let pixelation =
        PixelationSignal::from_message(value).ok_or_else(|| invalid(PIXELATION, value))?;

    let value = field(SCORE)?;
    let score = value
        .strip_suffix(&format!("/{}", MAX_SCORE))
        .and_then(|n| n.parse::<u8>().ok())
        .ok_or_else(|| invalid(SCORE, value))?;

    let value = field(RECOMMENDATION)?;
    let recommendation =
        Recommendation::from_message(value).ok_or_else(|| invalid(RECOMMENDATION, value))?;

    let expected = confidence_points(document_type, &serial_number, seal, pixelation.verdict);
    if score != expected {
        return Err(VerifyError::MalformedReport(format!(
            "score {} does not match signals (expected {})",
            score, expected
        )));
    }
    if recommendation != Recommendation::from_score(score) {
        return Err(VerifyError::MalformedReport(format!(
            "recommendation does not match score {}",
            score
        )));
    }

    Ok(ReportFields {
        document_type,
        serial_number,
        seal,
        pixelation,
        score,
        recommendation,
    })
}

fn field_value<'a>(text: &'a str, label: &str) -> Result<&'a str, VerifyError> {
    let prefix = format!("{}: ", label);
    text.lines()
        .find_map(|line| line.strip_prefix(prefix.as_str()))
        .ok_or_else(|| VerifyError::MalformedReport(format!("missing field '{}'", label)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verification::scoring::score;
    use crate::verification::visual::SealSignal;

    fn sample_report() -> ConfidenceReport {
        score(
            DocumentType::CertifiedBirthTranscript,
            SerialNumber::NotFound,
            SealSignal::from_edge_density(131.0),
            PixelationSignal::from_variance(87.654),
        )
    }

    #[test]
    fn test_render_exact_text() {
        let expected = "Birth Certificate Validation Report\n\
                        \n\
                        Document Type: Certified Birth Transcript\n\
                        Serial Number: Not Found\n\
                        Seal & Signature Detection: Seal/Signature Detected\n\
                        Pixelation & Tampering Analysis: Moderate Pixelation - Score: 87.65\n\
                        \n\
                        Final Confidence Score: 7/10\n\
                        Recommendation: ✅ Proceed - Document appears valid.\n";
        assert_eq!(render(&sample_report()), expected);
    }

    #[test]
    fn test_render_is_stable() {
        let report = sample_report();
        assert_eq!(render(&report), render(&report.clone()));
    }

    #[test]
    fn test_round_trip() {
        let reports = [
            sample_report(),
            score(
                DocumentType::Unknown,
                SerialNumber::NotFound,
                SealSignal::from_edge_density(0.0),
                PixelationSignal::from_variance(3.1),
            ),
            score(
                DocumentType::CertificateOfBirth,
                SerialNumber::Found("K0012345".to_string()),
                SealSignal::from_edge_density(101.0),
                PixelationSignal::from_variance(1500.0),
            ),
        ];

        for report in &reports {
            let parsed = parse(&render(report)).unwrap();
            assert_eq!(parsed, ReportFields::from(report));
        }
    }

    #[test]
    fn test_parse_rejects_missing_field() {
        let text = render(&sample_report()).replace("Serial Number: Not Found\n", "");
        let err = parse(&text).unwrap_err();
        assert!(matches!(err, VerifyError::MalformedReport(_)));
        assert!(err.to_string().contains("Serial Number"));
    }

    #[test]
    fn test_parse_rejects_tampered_score() {
        let text = render(&sample_report()).replace("7/10", "9/10");
        assert!(matches!(parse(&text), Err(VerifyError::MalformedReport(_))));
    }

    #[test]
    fn test_parse_rejects_unknown_document_type() {
        let text = render(&sample_report()).replace("Certified Birth Transcript", "Passport");
        assert!(matches!(parse(&text), Err(VerifyError::MalformedReport(_))));
    }
}
