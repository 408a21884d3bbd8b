use serde::Serialize;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One row of the manual result sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentRecord {
    pub identifier: String,
    pub name: String,
    pub department: String,
    pub ca: String,
    pub exam: String,
}

/// One row of the portal template, as originally presented.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateRow {
    pub identifier: String,
    pub name: String,
    pub department: String,
    /// Values of the non-identity, non-score template columns, in header order.
    pub extras: Vec<String>,
}

// ---------------------------------------------------------------------------
// Match outcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MatchTier {
    ExactId,
    ExactNameDept,
    FuzzyName,
}

impl MatchTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchTier::ExactId => "exact_id",
            MatchTier::ExactNameDept => "exact_name_dept",
            MatchTier::FuzzyName => "fuzzy_name",
        }
    }
}

impl std::fmt::Display for MatchTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of looking up one template row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchResult {
    Matched {
        tier: MatchTier,
        /// Position of the selected row in the manual input.
        manual_index: usize,
        /// Similarity that selected the row (fuzzy tier only).
        score: Option<f64>,
    },
    Unmatched,
}

// ---------------------------------------------------------------------------
// Output tables
// ---------------------------------------------------------------------------

/// Completed template row: original identity fields plus filled scores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedRow {
    pub identifier: String,
    pub name: String,
    pub department: String,
    pub ca: String,
    pub exam: String,
    pub extras: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchedEntry {
    pub identifier: String,
    pub name: String,
    pub department: String,
    pub ca: String,
    pub exam: String,
    pub tier: MatchTier,
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmatchedEntry {
    pub identifier: String,
    pub name: String,
    pub department: String,
}

// ---------------------------------------------------------------------------
// Stats + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TierCounts {
    pub exact_id: usize,
    pub exact_name_dept: usize,
    pub fuzzy_name: usize,
}

impl TierCounts {
    pub fn get(&self, tier: MatchTier) -> usize {
        match tier {
            MatchTier::ExactId => self.exact_id,
            MatchTier::ExactNameDept => self.exact_name_dept,
            MatchTier::FuzzyName => self.fuzzy_name,
        }
    }

    pub(crate) fn bump(&mut self, tier: MatchTier) {
        match tier {
            MatchTier::ExactId => self.exact_id += 1,
            MatchTier::ExactNameDept => self.exact_name_dept += 1,
            MatchTier::FuzzyName => self.fuzzy_name += 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconStats {
    pub total_template: usize,
    pub total_manual: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub matched_by_tier: TierCounts,
    /// Rows whose cleaned identifier already appeared earlier in the same table.
    pub duplicate_ids_manual: usize,
    pub duplicate_ids_template: usize,
    /// Manual rows repeating an earlier normalized name+department pair.
    pub duplicate_name_dept_manual: usize,
    pub blank_ids_manual: usize,
    pub blank_ids_template: usize,
    /// Fuzzy lookups where several candidates shared the best score.
    pub fuzzy_ties: usize,
}

/// Everything a run hands back to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconOutput {
    pub completed: Vec<CompletedRow>,
    /// Headers for `CompletedRow::extras`; empty unless extra columns are kept.
    pub extra_headers: Vec<String>,
    pub matched: Vec<MatchedEntry>,
    pub unmatched: Vec<UnmatchedEntry>,
    pub stats: ReconStats,
}
