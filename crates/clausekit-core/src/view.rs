//! Presentation state for a received analysis.
//!
//! A [`ResultsView`] owns one [`AnalysisResult`] and the set of clause ids the
//! user has expanded. Cards, badges and comparison details are derived on
//! demand from the result.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::analysis::{AnalysisResult, Clause, ClauseId, ComparisonStatus};
use crate::badges::{self, ConfidenceBadge, ScoreTone, StatusBadge};

/// Clause ids currently expanded. Order is irrelevant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionSet(BTreeSet<ClauseId>);

impl ExpansionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: ClauseId) -> bool {
        self.0.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// A copy of this set with `id`'s membership flipped.
    pub fn toggled(&self, id: ClauseId) -> Self {
        let mut next = self.0.clone();
        if !next.remove(&id) {
            next.insert(id);
        }
        Self(next)
    }

    pub fn iter(&self) -> impl Iterator<Item = ClauseId> + '_ {
        self.0.iter().copied()
    }
}

/// One of the four summary tiles above the clause list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatTile {
    pub label: &'static str,
    pub value: String,
}

/// A clause as it appears in the list, with derived badges.
#[derive(Debug, Clone, Copy)]
pub struct ClauseCard<'a> {
    pub clause: &'a Clause,
    pub confidence: ConfidenceBadge,
    pub status: StatusBadge,
    pub expanded: bool,
}

impl<'a> ClauseCard<'a> {
    fn new(clause: &'a Clause, expanded: bool) -> Self {
        Self {
            clause,
            confidence: ConfidenceBadge::for_confidence(clause.confidence),
            status: StatusBadge::for_status(clause.comparison.status),
            expanded,
        }
    }

    pub fn text(&self) -> &'a str {
        badges::display_text(self.clause)
    }

    /// Playbook comparison section, absent only for an explicit `no_playbook`.
    pub fn comparison(&self) -> Option<ComparisonDetail<'a>> {
        let cmp = &self.clause.comparison;
        if cmp.status == ComparisonStatus::NoPlaybook {
            return None;
        }
        Some(ComparisonDetail {
            score: cmp.score,
            tone: ScoreTone::for_score(cmp.score),
            red_flags: non_empty(&cmp.red_flags),
            missing: non_empty(&cmp.missing),
            preferred: cmp.preferred.as_deref().filter(|p| !p.is_empty()),
        })
    }
}

/// Expanded-card comparison section. List sections are `None` when empty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonDetail<'a> {
    pub score: f32,
    pub tone: ScoreTone,
    pub red_flags: Option<&'a [String]>,
    pub missing: Option<&'a [String]>,
    pub preferred: Option<&'a str>,
}

fn non_empty(items: &[String]) -> Option<&[String]> {
    (!items.is_empty()).then_some(items)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultsView {
    result: AnalysisResult,
    expanded: ExpansionSet,
    received_at: DateTime<Utc>,
}

impl ResultsView {
    /// Display a freshly received result with every clause collapsed.
    pub fn new(result: AnalysisResult) -> Self {
        Self::received_at(result, Utc::now())
    }

    pub fn received_at(result: AnalysisResult, received_at: DateTime<Utc>) -> Self {
        Self {
            result,
            expanded: ExpansionSet::new(),
            received_at,
        }
    }

    pub fn result(&self) -> &AnalysisResult {
        &self.result
    }

    pub fn received(&self) -> DateTime<Utc> {
        self.received_at
    }

    pub fn expanded(&self) -> &ExpansionSet {
        &self.expanded
    }

    pub fn is_expanded(&self, id: ClauseId) -> bool {
        self.expanded.contains(id)
    }

    /// Flip one clause between expanded and collapsed.
    ///
    /// Returns `false` without changing anything if `id` is not a clause of
    /// the current result.
    pub fn toggle(&mut self, id: ClauseId) -> bool {
        if !self.result.clauses.iter().any(|c| c.id == id) {
            debug!(clause = %id, "toggle ignored: unknown clause id");
            return false;
        }
        self.expanded = self.expanded.toggled(id);
        debug!(clause = %id, expanded = self.expanded.contains(id), "clause toggled");
        true
    }

    pub fn expand_all(&mut self) {
        self.expanded = ExpansionSet(self.result.clauses.iter().map(|c| c.id).collect());
    }

    pub fn collapse_all(&mut self) {
        self.expanded = ExpansionSet::new();
    }

    /// Cards in the order the service returned the clauses.
    pub fn cards(&self) -> impl Iterator<Item = ClauseCard<'_>> {
        self.result
            .clauses
            .iter()
            .map(|c| ClauseCard::new(c, self.expanded.contains(c.id)))
    }

    pub fn stat_tiles(&self) -> [StatTile; 4] {
        let stats = &self.result.statistics;
        [
            StatTile {
                label: "Clauses Found",
                value: stats.total.to_string(),
            },
            StatTile {
                label: "Red Flags",
                value: stats.high_risk.to_string(),
            },
            StatTile {
                label: "Avg Confidence",
                value: badges::percent(stats.avg_confidence),
            },
            StatTile {
                label: "Clause Types",
                value: stats.clause_types.to_string(),
            },
        ]
    }
}
