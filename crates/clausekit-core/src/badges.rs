//! Pure derivations from clause data to display badges.
//!
//! Nothing here is stored; every badge is recomputed from the clause it
//! describes.

use crate::analysis::{Clause, ComparisonStatus};

/// Lower bound (inclusive) for a "High" confidence badge.
pub const HIGH_CONFIDENCE: f32 = 0.8;
/// Lower bound (inclusive) for a "Medium" confidence badge.
pub const MEDIUM_CONFIDENCE: f32 = 0.6;
/// Scores at or above this fill the progress bar in the success colour.
pub const PASSING_SCORE: f32 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceBadge {
    High,
    Medium,
    Low,
}

impl ConfidenceBadge {
    pub fn for_confidence(confidence: f32) -> Self {
        if confidence >= HIGH_CONFIDENCE {
            Self::High
        } else if confidence >= MEDIUM_CONFIDENCE {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBadge {
    Compliant,
    NeedsReview,
    NoPlaybook,
}

impl StatusBadge {
    /// Statuses without a badge of their own read as "No Playbook".
    pub fn for_status(status: ComparisonStatus) -> Self {
        match status {
            ComparisonStatus::Compliant => Self::Compliant,
            ComparisonStatus::NeedsReview => Self::NeedsReview,
            ComparisonStatus::NoPlaybook | ComparisonStatus::Unknown => Self::NoPlaybook,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Compliant => "Compliant",
            Self::NeedsReview => "Needs Review",
            Self::NoPlaybook => "No Playbook",
        }
    }
}

/// Fill colour of the compliance score bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTone {
    Success,
    Warning,
}

impl ScoreTone {
    pub fn for_score(score: f32) -> Self {
        if score >= PASSING_SCORE {
            Self::Success
        } else {
            Self::Warning
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Success => "#10b981",
            Self::Warning => "#f59e0b",
        }
    }
}

/// Text shown in an expanded card: `full_text` unless it is missing or empty.
pub fn display_text(clause: &Clause) -> &str {
    match clause.full_text.as_deref() {
        Some(full) if !full.is_empty() => full,
        _ => &clause.text,
    }
}

/// Render a `[0, 1]` ratio as a whole percentage, e.g. `0.72` → `"72%"`.
///
/// Halves round up, so `0.125` is `"13%"`.
pub fn percent(ratio: f32) -> String {
    format!("{:.0}%", (ratio * 100.0).round())
}
