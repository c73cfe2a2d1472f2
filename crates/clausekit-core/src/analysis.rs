//! Wire types for the analysis service's `/upload` response.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a clause, unique within one [`AnalysisResult`].
///
/// The service numbers clauses from 1 in extraction order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClauseId(pub u64);

impl fmt::Display for ClauseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A complete analysis of one uploaded document.
///
/// Received whole and never edited afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub filename: String,
    pub statistics: Statistics,
    /// Clauses in extraction order.
    #[serde(default)]
    pub clauses: Vec<Clause>,
    /// Length in characters of the text the service extracted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_text_length: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total: u64,
    /// Clauses with at least one red flag.
    pub high_risk: u64,
    /// Mean clause confidence in `[0, 1]`.
    pub avg_confidence: f32,
    /// Number of distinct clause categories.
    pub clause_types: u64,
}

/// One extracted contractual provision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clause {
    pub id: ClauseId,
    /// Human-readable category, e.g. "Liability Cap".
    #[serde(rename = "type")]
    pub kind: String,
    /// Possibly truncated excerpt.
    pub text: String,
    /// Untruncated section text. Preferred over `text` when non-empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_text: Option<String>,
    pub confidence: f32,
    pub comparison: Comparison,
    /// Snake-case category key, e.g. `liability_cap`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_key: Option<String>,
    /// 1-based index of the source section the clause was found in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_number: Option<u32>,
}

/// Playbook comparison for a single clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub status: ComparisonStatus,
    /// Only meaningful when `status` is not [`ComparisonStatus::NoPlaybook`].
    #[serde(default)]
    pub score: f32,
    #[serde(default)]
    pub red_flags: Vec<String>,
    #[serde(default)]
    pub missing: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonStatus {
    Compliant,
    NeedsReview,
    NoPlaybook,
    /// Any status this client does not know. Keeps the rest of the result
    /// readable when the service adds a new one.
    #[serde(other)]
    Unknown,
}

impl ComparisonStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compliant => "compliant",
            Self::NeedsReview => "needs_review",
            Self::NoPlaybook => "no_playbook",
            Self::Unknown => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "success": true,
        "filename": "msa.pdf",
        "extracted_text_length": 5120,
        "total_clauses": 2,
        "statistics": {"total": 2, "high_risk": 1, "avg_confidence": 0.72, "clause_types": 2},
        "clauses": [
            {
                "id": 1,
                "type": "Liability Cap",
                "type_key": "liability_cap",
                "text": "Total liability shall be unlimited...",
                "full_text": "Total liability shall be unlimited liability for all claims.",
                "confidence": 0.8,
                "section_number": 4,
                "status": "pending",
                "comparison": {
                    "status": "needs_review",
                    "score": 0.5,
                    "red_flags": ["unlimited liability"],
                    "missing": ["cap amount"],
                    "preferred": "Total liability shall not exceed fees paid in the 12 months preceding the claim."
                }
            },
            {
                "id": 2,
                "type": "Governing Law",
                "text": "This Agreement is governed by the law of England.",
                "confidence": 0.64,
                "comparison": {"status": "no_playbook", "score": 0.5, "red_flags": [], "missing": []}
            }
        ]
    }"#;

    #[test]
    fn parses_service_response() {
        let result: AnalysisResult = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(result.filename, "msa.pdf");
        assert_eq!(result.statistics.total, 2);
        assert_eq!(result.extracted_text_length, Some(5120));
        assert_eq!(result.clauses.len(), 2);

        let first = &result.clauses[0];
        assert_eq!(first.id, ClauseId(1));
        assert_eq!(first.kind, "Liability Cap");
        assert_eq!(first.type_key.as_deref(), Some("liability_cap"));
        assert_eq!(first.section_number, Some(4));
        assert_eq!(first.comparison.status, ComparisonStatus::NeedsReview);
        assert_eq!(first.comparison.red_flags, vec!["unlimited liability"]);
        assert!(first.comparison.preferred.is_some());
    }

    #[test]
    fn optional_fields_default_when_absent() {
        let result: AnalysisResult = serde_json::from_str(SAMPLE).unwrap();
        let second = &result.clauses[1];
        assert!(second.full_text.is_none());
        assert!(second.type_key.is_none());
        assert!(second.comparison.preferred.is_none());
        assert_eq!(second.comparison.status, ComparisonStatus::NoPlaybook);
    }

    #[test]
    fn comparison_without_lists() {
        let json = r#"{"status": "compliant", "score": 0.85}"#;
        let cmp: Comparison = serde_json::from_str(json).unwrap();
        assert!(cmp.red_flags.is_empty());
        assert!(cmp.missing.is_empty());
        assert_eq!(cmp.status.as_str(), "compliant");
    }

    #[test]
    fn unknown_status_keeps_the_result() {
        let json = r#"{
            "filename": "nda.pdf",
            "statistics": {"total": 1, "high_risk": 0, "avg_confidence": 0.7, "clause_types": 1},
            "clauses": [{
                "id": 1, "type": "Confidentiality", "text": "Each party shall...",
                "confidence": 0.7, "comparison": {"status": "pending", "score": 0.5}
            }]
        }"#;
        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.clauses.len(), 1);
        assert_eq!(result.clauses[0].comparison.status, ComparisonStatus::Unknown);
    }

    #[test]
    fn clause_id_is_a_bare_number_on_the_wire() {
        assert_eq!(serde_json::to_string(&ClauseId(7)).unwrap(), "7");
        assert_eq!(ClauseId(7).to_string(), "7");
    }
}
