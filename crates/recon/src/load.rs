//! Schema checks and typed row extraction.

use crate::config::ColumnMapping;
use crate::error::{ReconError, Source};
use crate::model::{StudentRecord, TemplateRow};
use crate::table::RawTable;

/// Resolved column positions for the manual sheet.
#[derive(Debug, Clone, Copy)]
struct ManualColumns {
    identifier: usize,
    name: Option<usize>,
    department: Option<usize>,
    ca: usize,
    exam: usize,
}

/// Resolved column positions for the portal template.
#[derive(Debug, Clone)]
struct TemplateColumns {
    identifier: usize,
    name: usize,
    department: usize,
    extras: Vec<usize>,
}

/// Names of template columns carried through as extras, in header order.
pub fn template_extra_headers(table: &RawTable, mapping: &ColumnMapping) -> Vec<String> {
    let reserved = reserved_template_columns(mapping);
    table
        .headers
        .iter()
        .filter(|h| !reserved.contains(&h.as_str()))
        .cloned()
        .collect()
}

fn reserved_template_columns(mapping: &ColumnMapping) -> [&str; 5] {
    [
        mapping.identifier.trim(),
        mapping.name.trim(),
        mapping.department.trim(),
        mapping.ca.trim(),
        mapping.exam.trim(),
    ]
}

/// Look up required columns, collecting every missing one before failing.
fn require(
    source: Source,
    table: &RawTable,
    names: &[&str],
) -> Result<Vec<usize>, ReconError> {
    let mut found = Vec::with_capacity(names.len());
    let mut missing = Vec::new();
    for name in names {
        match table.column(name) {
            Some(i) => found.push(i),
            None => missing.push(name.trim().to_string()),
        }
    }
    if missing.is_empty() {
        Ok(found)
    } else {
        Err(ReconError::Schema { source, missing })
    }
}

fn manual_columns(table: &RawTable, mapping: &ColumnMapping) -> Result<ManualColumns, ReconError> {
    let idx = require(
        Source::Manual,
        table,
        &[mapping.identifier.as_str(), mapping.ca.as_str(), mapping.exam.as_str()],
    )?;
    let name = table.column(&mapping.name);
    let department = table.column(&mapping.department);
    if name.is_none() || department.is_none() {
        log::warn!(
            "manual table has no '{}'/'{}' column; name+department and fuzzy tiers cannot match",
            mapping.name.trim(),
            mapping.department.trim()
        );
    }
    Ok(ManualColumns {
        identifier: idx[0],
        name,
        department,
        ca: idx[1],
        exam: idx[2],
    })
}

fn template_columns(table: &RawTable, mapping: &ColumnMapping) -> Result<TemplateColumns, ReconError> {
    let idx = require(
        Source::Template,
        table,
        &[mapping.identifier.as_str(), mapping.name.as_str(), mapping.department.as_str()],
    )?;
    let reserved = reserved_template_columns(mapping);
    let extras = table
        .headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !reserved.contains(&h.as_str()))
        .map(|(i, _)| i)
        .collect();
    Ok(TemplateColumns {
        identifier: idx[0],
        name: idx[1],
        department: idx[2],
        extras,
    })
}

/// Check that both tables carry their required columns.
///
/// Reports the manual table first; each error lists every missing column
/// of that table.
pub fn check_schema(
    manual: &RawTable,
    manual_mapping: &ColumnMapping,
    template: &RawTable,
    template_mapping: &ColumnMapping,
) -> Result<(), ReconError> {
    manual_columns(manual, manual_mapping)?;
    template_columns(template, template_mapping)?;
    Ok(())
}

fn cell(row: &[String], idx: usize) -> String {
    row.get(idx).cloned().unwrap_or_default()
}

fn opt_cell(row: &[String], idx: Option<usize>) -> String {
    idx.map(|i| cell(row, i)).unwrap_or_default()
}

/// Extract manual rows. Fails only if a required column is absent.
pub fn load_manual(table: &RawTable, mapping: &ColumnMapping) -> Result<Vec<StudentRecord>, ReconError> {
    let cols = manual_columns(table, mapping)?;
    Ok(table
        .rows
        .iter()
        .map(|row| StudentRecord {
            identifier: cell(row, cols.identifier),
            name: opt_cell(row, cols.name),
            department: opt_cell(row, cols.department),
            ca: cell(row, cols.ca),
            exam: cell(row, cols.exam),
        })
        .collect())
}

/// Extract template rows with their values preserved verbatim.
pub fn load_template(table: &RawTable, mapping: &ColumnMapping) -> Result<Vec<TemplateRow>, ReconError> {
    let cols = template_columns(table, mapping)?;
    Ok(table
        .rows
        .iter()
        .map(|row| TemplateRow {
            identifier: cell(row, cols.identifier),
            name: cell(row, cols.name),
            department: cell(row, cols.department),
            extras: cols.extras.iter().map(|&i| cell(row, i)).collect(),
        })
        .collect())
}
