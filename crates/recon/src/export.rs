//! CSV rendering of the three output tables, JSON for the stats.
//!
//! Every table has a header row and no index column. Cells are written
//! as-is; a missing score is an empty cell, never a null marker.

use std::io::{self, Write};

use crate::config::ColumnMapping;
use crate::model::{ReconOutput, ReconStats};

pub const TIER_HEADER: &str = "match_tier";
pub const SCORE_HEADER: &str = "fuzzy_score";

/// Header names used for the output tables.
#[derive(Debug, Clone)]
pub struct OutputHeaders {
    pub identifier: String,
    pub name: String,
    pub department: String,
    pub ca: String,
    pub exam: String,
}

impl OutputHeaders {
    /// Output uses the template's header names.
    pub fn from_mapping(mapping: &ColumnMapping) -> Self {
        Self {
            identifier: mapping.identifier.trim().to_string(),
            name: mapping.name.trim().to_string(),
            department: mapping.department.trim().to_string(),
            ca: mapping.ca.trim().to_string(),
            exam: mapping.exam.trim().to_string(),
        }
    }
}

impl Default for OutputHeaders {
    fn default() -> Self {
        Self::from_mapping(&ColumnMapping::default())
    }
}

fn writer<W: Write>(out: W) -> csv::Writer<W> {
    csv::WriterBuilder::new().has_headers(false).from_writer(out)
}

/// Completed template: identity, CA, Exam, then any kept extra columns.
pub fn write_completed<W: Write>(out: W, result: &ReconOutput, h: &OutputHeaders) -> io::Result<()> {
    let mut w = writer(out);
    let width = result.extra_headers.len();

    let mut header = vec![
        h.identifier.as_str(),
        h.name.as_str(),
        h.department.as_str(),
        h.ca.as_str(),
        h.exam.as_str(),
    ];
    header.extend(result.extra_headers.iter().map(String::as_str));
    w.write_record(&header)?;

    for row in &result.completed {
        let mut rec = vec![
            row.identifier.as_str(),
            row.name.as_str(),
            row.department.as_str(),
            row.ca.as_str(),
            row.exam.as_str(),
        ];
        rec.extend((0..width).map(|i| row.extras.get(i).map(String::as_str).unwrap_or("")));
        w.write_record(&rec)?;
    }
    w.flush()
}

/// Matched log: identity, CA, Exam, tier, fuzzy score (blank for exact tiers).
pub fn write_matched_log<W: Write>(out: W, result: &ReconOutput, h: &OutputHeaders) -> io::Result<()> {
    let mut w = writer(out);
    w.write_record([
        h.identifier.as_str(),
        h.name.as_str(),
        h.department.as_str(),
        h.ca.as_str(),
        h.exam.as_str(),
        TIER_HEADER,
        SCORE_HEADER,
    ])?;
    for e in &result.matched {
        let score = e.score.map(format_score).unwrap_or_default();
        w.write_record([
            e.identifier.as_str(),
            e.name.as_str(),
            e.department.as_str(),
            e.ca.as_str(),
            e.exam.as_str(),
            e.tier.as_str(),
            score.as_str(),
        ])?;
    }
    w.flush()
}

/// Unmatched log: identity columns as originally presented.
pub fn write_unmatched_log<W: Write>(out: W, result: &ReconOutput, h: &OutputHeaders) -> io::Result<()> {
    let mut w = writer(out);
    w.write_record([h.identifier.as_str(), h.name.as_str(), h.department.as_str()])?;
    for e in &result.unmatched {
        w.write_record([e.identifier.as_str(), e.name.as_str(), e.department.as_str()])?;
    }
    w.flush()
}

pub fn stats_json(stats: &ReconStats) -> serde_json::Result<String> {
    serde_json::to_string_pretty(stats)
}

/// Two decimals, fixed, so repeated runs render identically.
pub fn format_score(score: f64) -> String {
    format!("{score:.2}")
}

/// Render one table writer into a `String`.
pub fn to_string<F>(render: F) -> io::Result<String>
where
    F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
{
    let mut buf = Vec::new();
    render(&mut buf)?;
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
