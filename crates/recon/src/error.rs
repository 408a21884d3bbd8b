use std::fmt;

/// Which input table an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Manual,
    Template,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Manual => "manual",
            Source::Template => "template",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub enum ReconError {
    /// One or more required columns are absent from a source table.
    Schema { source: Source, missing: Vec<String> },
    /// A source table cannot be decoded as delimited text.
    Parse { source: Source, message: String },
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (bad threshold, blank column name, etc.).
    ConfigValidation(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schema { source, missing } => {
                let cols: Vec<String> = missing.iter().map(|c| format!("'{c}'")).collect();
                let noun = if missing.len() == 1 { "column" } else { "columns" };
                write!(f, "{source} table: missing required {noun} {}", cols.join(", "))
            }
            Self::Parse { source, message } => {
                write!(f, "{source} table: cannot parse: {message}")
            }
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_names_every_column() {
        let err = ReconError::Schema {
            source: Source::Manual,
            missing: vec!["CA".into(), "Exam".into()],
        };
        assert_eq!(
            err.to_string(),
            "manual table: missing required columns 'CA', 'Exam'"
        );
    }

    #[test]
    fn schema_error_singular() {
        let err = ReconError::Schema {
            source: Source::Template,
            missing: vec!["Department".into()],
        };
        assert_eq!(
            err.to_string(),
            "template table: missing required column 'Department'"
        );
    }
}
