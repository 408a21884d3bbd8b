use std::collections::HashMap;

use rapidfuzz::distance::indel;

use crate::config::MatchConfig;
use crate::model::{MatchResult, MatchTier};
use crate::normalize::NormalizedKey;

/// Similarity of two strings on a 0-100 scale; identical strings score 100.
///
/// Normalized InDel similarity, the measure behind the classic `ratio`.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 100.0;
    }
    indel::normalized_similarity(a.chars(), b.chars()) * 100.0
}

/// Lookup tables over the manual rows, built once per run.
///
/// Every lookup returns candidate positions in source order, possibly empty.
pub struct CandidateIndex<'a> {
    keys: &'a [NormalizedKey],
    by_id: HashMap<&'a str, Vec<usize>>,
    by_name_dept: HashMap<(&'a str, &'a str), Vec<usize>>,
    by_dept: HashMap<&'a str, Vec<usize>>,
}

impl<'a> CandidateIndex<'a> {
    pub fn build(keys: &'a [NormalizedKey]) -> Self {
        let mut by_id: HashMap<&str, Vec<usize>> = HashMap::new();
        let mut by_name_dept: HashMap<(&str, &str), Vec<usize>> = HashMap::new();
        let mut by_dept: HashMap<&str, Vec<usize>> = HashMap::new();

        for (i, key) in keys.iter().enumerate() {
            if key.has_identifier() {
                by_id.entry(key.identifier.as_str()).or_default().push(i);
            }
            if key.has_name_dept() {
                by_name_dept
                    .entry((key.name.as_str(), key.department.as_str()))
                    .or_default()
                    .push(i);
                by_dept.entry(key.department.as_str()).or_default().push(i);
            }
        }

        Self {
            keys,
            by_id,
            by_name_dept,
            by_dept,
        }
    }

    pub fn by_identifier(&self, identifier: &str) -> &[usize] {
        if identifier.is_empty() {
            return &[];
        }
        self.by_id.get(identifier).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn by_name_dept<'k>(&'k self, name: &'k str, department: &'k str) -> &'k [usize] {
        if name.is_empty() || department.is_empty() {
            return &[];
        }
        self.by_name_dept
            .get(&(name, department))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Rows in a department that also carry a name.
    pub fn by_department(&self, department: &str) -> &[usize] {
        if department.is_empty() {
            return &[];
        }
        self.by_dept.get(department).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of rows repeating an earlier identifier.
    pub fn duplicate_identifiers(&self) -> usize {
        self.by_id.values().map(|v| v.len() - 1).sum()
    }

    /// Number of rows repeating an earlier name+department pair.
    pub fn duplicate_name_dept(&self) -> usize {
        self.by_name_dept.values().map(|v| v.len() - 1).sum()
    }

    /// Identifiers that occur more than once, sorted, with their counts.
    pub fn duplicated_identifier_keys(&self) -> Vec<(&'a str, usize)> {
        let mut dups: Vec<(&str, usize)> = self
            .by_id
            .iter()
            .filter(|(_, v)| v.len() > 1)
            .map(|(k, v)| (*k, v.len()))
            .collect();
        dups.sort();
        dups
    }
}

/// Best fuzzy candidate for one lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyPick {
    pub index: usize,
    pub score: f64,
    /// Another candidate reached the same best score.
    pub tied: bool,
}

/// Pick the candidate whose name scores highest against `name`.
///
/// The best score must be strictly greater than `threshold`. Equal best
/// scores resolve to the earliest candidate in source order.
pub fn best_fuzzy(
    name: &str,
    candidates: &[usize],
    keys: &[NormalizedKey],
    threshold: f64,
) -> Option<FuzzyPick> {
    if name.is_empty() {
        return None;
    }

    let mut best: Option<FuzzyPick> = None;
    for &ci in candidates {
        let score = similarity(name, &keys[ci].name);
        let replace = match &mut best {
            Some(b) if score == b.score => {
                b.tied = true;
                false
            }
            Some(b) => score > b.score,
            None => true,
        };
        if replace {
            best = Some(FuzzyPick {
                index: ci,
                score,
                tied: false,
            });
        }
    }

    best.filter(|b| b.score > threshold)
}

/// Outcome of one lookup plus the bookkeeping the stats need.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lookup {
    pub result: MatchResult,
    pub fuzzy_tie: bool,
}

/// Run the tiers for one template key. The first tier with a candidate wins.
pub fn match_row(key: &NormalizedKey, index: &CandidateIndex<'_>, config: &MatchConfig) -> Lookup {
    if let Some(&first) = index.by_identifier(&key.identifier).first() {
        return matched(MatchTier::ExactId, first, None);
    }

    if let Some(&first) = index.by_name_dept(&key.name, &key.department).first() {
        return matched(MatchTier::ExactNameDept, first, None);
    }

    if config.fuzzy && key.has_name_dept() {
        let candidates = index.by_department(&key.department);
        if let Some(pick) = best_fuzzy(&key.name, candidates, index.keys, config.fuzzy_threshold) {
            return Lookup {
                result: MatchResult::Matched {
                    tier: MatchTier::FuzzyName,
                    manual_index: pick.index,
                    score: Some(pick.score),
                },
                fuzzy_tie: pick.tied,
            };
        }
    }

    Lookup {
        result: MatchResult::Unmatched,
        fuzzy_tie: false,
    }
}

fn matched(tier: MatchTier, manual_index: usize, score: Option<f64>) -> Lookup {
    Lookup {
        result: MatchResult::Matched {
            tier,
            manual_index,
            score,
        },
        fuzzy_tie: false,
    }
}
