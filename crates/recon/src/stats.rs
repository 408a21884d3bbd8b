use std::collections::HashSet;

use crate::matcher::{CandidateIndex, Lookup};
use crate::model::{MatchResult, ReconStats, TierCounts};
use crate::normalize::NormalizedKey;

/// Accumulates run statistics while the reconciler walks the template.
pub(crate) struct StatsBuilder {
    stats: ReconStats,
}

impl StatsBuilder {
    pub(crate) fn new(
        manual: &[NormalizedKey],
        template: &[NormalizedKey],
        index: &CandidateIndex<'_>,
    ) -> Self {
        Self {
            stats: ReconStats {
                total_template: template.len(),
                total_manual: manual.len(),
                duplicate_ids_manual: index.duplicate_identifiers(),
                duplicate_ids_template: count_repeats(template),
                duplicate_name_dept_manual: index.duplicate_name_dept(),
                blank_ids_manual: count_blank(manual),
                blank_ids_template: count_blank(template),
                ..ReconStats::default()
            },
        }
    }

    pub(crate) fn record(&mut self, lookup: &Lookup) {
        match lookup.result {
            MatchResult::Matched { tier, .. } => {
                self.stats.matched += 1;
                self.stats.matched_by_tier.bump(tier);
            }
            MatchResult::Unmatched => self.stats.unmatched += 1,
        }
        if lookup.fuzzy_tie {
            self.stats.fuzzy_ties += 1;
        }
    }

    pub(crate) fn finish(self) -> ReconStats {
        self.stats
    }
}

/// Rows whose non-blank identifier already appeared earlier.
fn count_repeats(keys: &[NormalizedKey]) -> usize {
    let mut seen = HashSet::new();
    keys.iter()
        .filter(|k| k.has_identifier())
        .filter(|k| !seen.insert(k.identifier.as_str()))
        .count()
}

fn count_blank(keys: &[NormalizedKey]) -> usize {
    keys.iter().filter(|k| !k.has_identifier()).count()
}

impl ReconStats {
    /// Key/value pairs in presentation order, for human summaries.
    pub fn entries(&self) -> Vec<(&'static str, usize)> {
        let TierCounts {
            exact_id,
            exact_name_dept,
            fuzzy_name,
        } = self.matched_by_tier;
        vec![
            ("total_template", self.total_template),
            ("total_manual", self.total_manual),
            ("matched", self.matched),
            ("matched_exact_id", exact_id),
            ("matched_exact_name_dept", exact_name_dept),
            ("matched_fuzzy_name", fuzzy_name),
            ("unmatched", self.unmatched),
            ("duplicate_ids_manual", self.duplicate_ids_manual),
            ("duplicate_ids_template", self.duplicate_ids_template),
            ("duplicate_name_dept_manual", self.duplicate_name_dept_manual),
            ("blank_ids_manual", self.blank_ids_manual),
            ("blank_ids_template", self.blank_ids_template),
            ("fuzzy_ties", self.fuzzy_ties),
        ]
    }

    /// Matched share of the template, 0-100. Zero for an empty template.
    pub fn match_rate(&self) -> f64 {
        if self.total_template == 0 {
            0.0
        } else {
            self.matched as f64 * 100.0 / self.total_template as f64
        }
    }
}
