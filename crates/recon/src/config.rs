use serde::Deserialize;

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Run configuration. Every section has a default, so an empty TOML
/// document describes the stock `MatNo`/`Name`/`Department`/`CA`/`Exam` layout.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReconConfig {
    #[serde(default)]
    pub columns: ColumnsConfig,
    #[serde(default)]
    pub matching: MatchConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

// ---------------------------------------------------------------------------
// Column mapping
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnsConfig {
    #[serde(default)]
    pub manual: ColumnMapping,
    #[serde(default)]
    pub template: ColumnMapping,
}

/// Header names for one source. Matched against trimmed headers.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnMapping {
    #[serde(default = "default_identifier")]
    pub identifier: String,
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_department")]
    pub department: String,
    #[serde(default = "default_ca")]
    pub ca: String,
    #[serde(default = "default_exam")]
    pub exam: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            identifier: default_identifier(),
            name: default_name(),
            department: default_department(),
            ca: default_ca(),
            exam: default_exam(),
        }
    }
}

fn default_identifier() -> String {
    "MatNo".into()
}

fn default_name() -> String {
    "Name".into()
}

fn default_department() -> String {
    "Department".into()
}

fn default_ca() -> String {
    "CA".into()
}

fn default_exam() -> String {
    "Exam".into()
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// Which tiers run. Exact tiers are always on; the fuzzy tier is optional.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatchConfig {
    #[serde(default = "default_fuzzy")]
    pub fuzzy: bool,
    /// Similarity on a 0-100 scale that the best fuzzy score must exceed.
    #[serde(default = "default_threshold")]
    pub fuzzy_threshold: f64,
}

pub const DEFAULT_FUZZY_THRESHOLD: f64 = 85.0;

fn default_fuzzy() -> bool {
    true
}

fn default_threshold() -> f64 {
    DEFAULT_FUZZY_THRESHOLD
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            fuzzy: default_fuzzy(),
            fuzzy_threshold: default_threshold(),
        }
    }
}

impl MatchConfig {
    /// Exact tiers only.
    pub fn exact_only() -> Self {
        Self {
            fuzzy: false,
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Append template columns outside the identity/score set to the
    /// completed table, in their original order.
    #[serde(default)]
    pub keep_extra_columns: bool,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        let t = self.matching.fuzzy_threshold;
        if !t.is_finite() || !(0.0..=100.0).contains(&t) {
            return Err(ReconError::ConfigValidation(format!(
                "fuzzy_threshold must be between 0 and 100, got {t}"
            )));
        }

        validate_mapping("manual", &self.columns.manual)?;
        validate_mapping("template", &self.columns.template)?;

        Ok(())
    }
}

fn validate_mapping(source: &str, m: &ColumnMapping) -> Result<(), ReconError> {
    let fields = [
        ("identifier", &m.identifier),
        ("name", &m.name),
        ("department", &m.department),
        ("ca", &m.ca),
        ("exam", &m.exam),
    ];
    for (field, value) in fields {
        if value.trim().is_empty() {
            return Err(ReconError::ConfigValidation(format!(
                "columns.{source}.{field} must not be blank"
            )));
        }
    }

    // Identity columns must be distinct or one header would feed two keys.
    let id = m.identifier.trim();
    let name = m.name.trim();
    let dept = m.department.trim();
    if id == name || id == dept || name == dept {
        return Err(ReconError::ConfigValidation(format!(
            "columns.{source}: identifier, name and department must name different columns"
        )));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
