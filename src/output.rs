//! Result types returned by the processing entry points.

use crate::error::ThumbnailError;
use serde::Serialize;

/// What happened during a run.
#[derive(Debug)]
pub enum Outcome {
    /// No image path configured; nothing was attempted.
    Disabled,
    /// The thumbnail block was inserted.
    Inserted(InsertionReport),
    /// A stage failed; the document was left unchanged.
    Skipped(ThumbnailError),
}

impl Outcome {
    pub fn is_inserted(&self) -> bool {
        matches!(self, Outcome::Inserted(_))
    }

    pub fn report(&self) -> Option<&InsertionReport> {
        match self {
            Outcome::Inserted(r) => Some(r),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ThumbnailError> {
        match self {
            Outcome::Skipped(e) => Some(e),
            _ => None,
        }
    }
}

/// Details of a successful insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsertionReport {
    /// Base file name of the source image.
    pub image_name: String,
    /// Actual thumbnail width after scaling.
    pub width: u32,
    /// Actual thumbnail height after scaling.
    pub height: u32,
    /// Base64 payload length announced in the header.
    pub encoded_len: usize,
    /// Number of `; ` payload lines.
    pub body_lines: usize,
    /// 0-based layer block that received the thumbnail.
    pub layer: usize,
    /// 0-based index of the marker line in that layer.
    pub line: usize,
    /// Thumbnail blocks removed first (`replace_existing`).
    pub replaced_blocks: usize,
}

/// The document after a run, always usable as the step's output.
#[derive(Debug)]
pub struct ProcessOutput {
    pub document: Vec<String>,
    pub outcome: Outcome,
}

/// Serialisable summary for `--json` output.
#[derive(Debug, Serialize)]
pub struct OutcomeSummary {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<InsertionReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<&Outcome> for OutcomeSummary {
    fn from(outcome: &Outcome) -> Self {
        match outcome {
            Outcome::Disabled => OutcomeSummary {
                status: "disabled",
                report: None,
                message: Some(ThumbnailError::Disabled.to_string()),
            },
            Outcome::Inserted(r) => OutcomeSummary {
                status: "inserted",
                report: Some(r.clone()),
                message: None,
            },
            Outcome::Skipped(e) => OutcomeSummary {
                status: "skipped",
                report: None,
                message: Some(e.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_json_shape() {
        let outcome = Outcome::Skipped(ThumbnailError::MarkerNotFound {
            marker: ";LAYER_COUNT:".into(),
        });
        let json = serde_json::to_value(OutcomeSummary::from(&outcome)).unwrap();
        assert_eq!(json["status"], "skipped");
        assert!(json.get("report").is_none());
        assert!(json["message"].as_str().unwrap().contains(";LAYER_COUNT:"));
    }

    #[test]
    fn inserted_summary_carries_report() {
        let report = InsertionReport {
            image_name: "logo.png".into(),
            width: 300,
            height: 150,
            encoded_len: 200,
            body_lines: 3,
            layer: 0,
            line: 4,
            replaced_blocks: 0,
        };
        let outcome = Outcome::Inserted(report.clone());
        assert!(outcome.is_inserted());
        assert_eq!(outcome.report(), Some(&report));
        let json = serde_json::to_value(OutcomeSummary::from(&outcome)).unwrap();
        assert_eq!(json["report"]["width"], 300);
        assert_eq!(json["status"], "inserted");
    }
}
