use crate::config::{MatchConfig, ReconConfig};
use crate::error::{ReconError, Source};
use crate::load::{load_manual, load_template, template_extra_headers};
use crate::matcher::{match_row, CandidateIndex};
use crate::model::{
    CompletedRow, MatchResult, MatchedEntry, ReconOutput, StudentRecord, TemplateRow,
    UnmatchedEntry,
};
use crate::normalize::NormalizedKey;
use crate::stats::StatsBuilder;
use crate::table::RawTable;

/// Decode both CSV texts and run. Decoding failures are `Parse` errors.
pub fn run_csv(
    config: &ReconConfig,
    manual_csv: &str,
    template_csv: &str,
    delimiter: u8,
) -> Result<ReconOutput, ReconError> {
    let manual = RawTable::from_csv(Source::Manual, manual_csv, delimiter)?;
    let template = RawTable::from_csv(Source::Template, template_csv, delimiter)?;
    run(config, &manual, &template)
}

/// Check both schemas, extract typed rows, reconcile.
///
/// Fails only when a required column is absent; nothing is produced then.
pub fn run(
    config: &ReconConfig,
    manual: &RawTable,
    template: &RawTable,
) -> Result<ReconOutput, ReconError> {
    let manual_rows = load_manual(manual, &config.columns.manual)?;
    let template_rows = load_template(template, &config.columns.template)?;

    let extras = template_extra_headers(template, &config.columns.template);

    let mut output = reconcile(&manual_rows, &template_rows, &config.matching);
    if config.output.keep_extra_columns {
        output.extra_headers = extras;
    } else {
        if !extras.is_empty() {
            log::debug!("dropping template columns not in output: {}", extras.join(", "));
        }
        for row in &mut output.completed {
            row.extras.clear();
        }
    }
    Ok(output)
}

/// Match every template row against the manual rows.
///
/// Pure: same inputs, same outputs. Data-quality problems (blank or
/// duplicate identifiers, no counterpart) land in the logs and stats.
pub fn reconcile(
    manual: &[StudentRecord],
    template: &[TemplateRow],
    config: &MatchConfig,
) -> ReconOutput {
    let manual_keys: Vec<NormalizedKey> = manual
        .iter()
        .map(|r| normalized(&r.identifier, &r.name, &r.department))
        .collect();
    let template_keys: Vec<NormalizedKey> = template
        .iter()
        .map(|r| normalized(&r.identifier, &r.name, &r.department))
        .collect();

    let index = CandidateIndex::build(&manual_keys);
    for (id, count) in index.duplicated_identifier_keys() {
        log::warn!("manual identifier {id:?} appears {count} times; using the first row");
    }
    let repeated_pairs = index.duplicate_name_dept();
    if repeated_pairs > 0 {
        log::warn!("{repeated_pairs} manual row(s) repeat an earlier name+department pair");
    }

    let mut stats = StatsBuilder::new(&manual_keys, &template_keys, &index);
    let mut completed = Vec::with_capacity(template.len());
    let mut matched = Vec::new();
    let mut unmatched = Vec::new();

    for (row, key) in template.iter().zip(&template_keys) {
        let lookup = match_row(key, &index, config);
        stats.record(&lookup);

        match lookup.result {
            MatchResult::Matched {
                tier,
                manual_index,
                score,
            } => {
                let source = &manual[manual_index];
                let ca = source.ca.trim().to_string();
                let exam = source.exam.trim().to_string();
                log::debug!(
                    "template {:?} matched manual row {} via {tier}",
                    row.identifier,
                    manual_index + 1
                );
                if lookup.fuzzy_tie {
                    log::warn!(
                        "template {:?}: several manual names tie at the best fuzzy score; using the first",
                        row.name
                    );
                }
                matched.push(MatchedEntry {
                    identifier: row.identifier.clone(),
                    name: row.name.clone(),
                    department: row.department.clone(),
                    ca: ca.clone(),
                    exam: exam.clone(),
                    tier,
                    score,
                });
                completed.push(completed_row(row, ca, exam));
            }
            MatchResult::Unmatched => {
                log::debug!("template {:?} ({:?}) unmatched", row.identifier, row.name);
                unmatched.push(UnmatchedEntry {
                    identifier: row.identifier.clone(),
                    name: row.name.clone(),
                    department: row.department.clone(),
                });
                completed.push(completed_row(row, String::new(), String::new()));
            }
        }
    }

    let stats = stats.finish();
    log::info!(
        "reconciled {} template rows against {} manual rows: {} matched, {} unmatched",
        stats.total_template,
        stats.total_manual,
        stats.matched,
        stats.unmatched
    );

    ReconOutput {
        completed,
        extra_headers: Vec::new(),
        matched,
        unmatched,
        stats,
    }
}

fn normalized(identifier: &str, name: &str, department: &str) -> NormalizedKey {
    NormalizedKey::new(Some(identifier), Some(name), Some(department))
}

fn completed_row(row: &TemplateRow, ca: String, exam: String) -> CompletedRow {
    CompletedRow {
        identifier: row.identifier.clone(),
        name: row.name.clone(),
        department: row.department.clone(),
        ca,
        exam,
        extras: row.extras.clone(),
    }
}
