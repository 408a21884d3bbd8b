//! Delimited text → header + string cells.

use crate::error::{ReconError, Source};

/// A decoded table: trimmed header names and one `Vec<String>` per data row.
///
/// Short rows are padded with empty cells so every row is as wide as the
/// header; cells are kept verbatim (no trimming) so output can reproduce them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let headers: Vec<String> = headers.into_iter().map(|h| h.trim().to_string()).collect();
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut r| {
                if r.len() < width {
                    r.resize(width, String::new());
                }
                r
            })
            .collect();
        Self { headers, rows }
    }

    /// Decode CSV text. The first record is the header row.
    ///
    /// Rows wider than the header, a missing header, or an empty header name
    /// are parse errors. A leading UTF-8 BOM is ignored.
    pub fn from_csv(source: Source, data: &str, delimiter: u8) -> Result<Self, ReconError> {
        let parse_err = |message: String| ReconError::Parse { source, message };

        let data = data.strip_prefix('\u{feff}').unwrap_or(data);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(data.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| parse_err(e.to_string()))?
            .iter()
            .map(|h| h.to_string())
            .collect();

        if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
            return Err(parse_err("no header row".into()));
        }
        if let Some(pos) = headers.iter().position(|h| h.trim().is_empty()) {
            return Err(parse_err(format!("header column {} is blank", pos + 1)));
        }

        let mut rows = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let record = record.map_err(|e| parse_err(e.to_string()))?;
            if record.len() > headers.len() {
                return Err(parse_err(format!(
                    "row {} has {} fields, header has {}",
                    i + 2,
                    record.len(),
                    headers.len()
                )));
            }
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self::new(headers, rows))
    }

    /// Decode raw bytes, rejecting input that is not UTF-8.
    pub fn from_csv_bytes(source: Source, data: &[u8], delimiter: u8) -> Result<Self, ReconError> {
        let text = std::str::from_utf8(data).map_err(|e| ReconError::Parse {
            source,
            message: format!("not valid UTF-8: {e}"),
        })?;
        Self::from_csv(source, text, delimiter)
    }

    /// Position of a header, compared after trimming.
    pub fn column(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.headers.iter().position(|h| h == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
