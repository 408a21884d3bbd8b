//! Comparison keys for identity fields.
//!
//! Normalization never touches the values shown to the user; it only
//! derives the strings the matcher compares. An empty key means "no value"
//! and never matches anything, including another empty key.

/// Trim and uppercase an identifier. Missing or blank input maps to `""`.
///
/// Internal characters are left alone: `" phy/01 "` becomes `"PHY/01"`.
pub fn clean_identifier(raw: Option<&str>) -> String {
    match raw {
        Some(s) => s.trim().to_uppercase(),
        None => String::new(),
    }
}

/// Trim and lowercase a name or department. Missing input maps to `""`.
pub fn normalize_text(raw: Option<&str>) -> String {
    match raw {
        Some(s) => s.trim().to_lowercase(),
        None => String::new(),
    }
}

/// Derived comparison triple for one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedKey {
    pub identifier: String,
    pub name: String,
    pub department: String,
}

impl NormalizedKey {
    pub fn new(identifier: Option<&str>, name: Option<&str>, department: Option<&str>) -> Self {
        Self {
            identifier: clean_identifier(identifier),
            name: normalize_text(name),
            department: normalize_text(department),
        }
    }

    pub fn has_identifier(&self) -> bool {
        !self.identifier.is_empty()
    }

    /// Name and department are both present, so the pair can be compared.
    pub fn has_name_dept(&self) -> bool {
        !self.name.is_empty() && !self.department.is_empty()
    }
}
