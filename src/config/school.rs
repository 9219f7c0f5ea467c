//! School configuration loading from school.toml
//!
//! The roster the finance office works against (class levels, staff, students
//! and fee structures) is described in a TOML file. On start-up every entry
//! that is not yet in the database is inserted; existing rows are left alone.

use crate::errors::{Error, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming the configuration file.
pub const SCHOOL_CONFIG_ENV: &str = "SCHOOL_CONFIG";

/// Configuration file used when [`SCHOOL_CONFIG_ENV`] is unset.
pub const DEFAULT_SCHOOL_CONFIG: &str = "school.toml";

/// Configuration structure representing the entire school.toml file
#[derive(Debug, Default, Deserialize)]
pub struct SchoolConfig {
    /// Class levels to seed
    #[serde(default)]
    pub class_levels: Vec<ClassLevelConfig>,
    /// Bursar office staff to seed
    #[serde(default)]
    pub staff: Vec<StaffConfig>,
    /// Students to seed
    #[serde(default)]
    pub students: Vec<StudentConfig>,
    /// Fee structures to seed
    #[serde(default)]
    pub fee_structures: Vec<FeeStructureConfig>,
}

/// Configuration for a single class level
#[derive(Debug, Deserialize, Clone)]
pub struct ClassLevelConfig {
    /// Identifier (e.g., `"grade-7"`)
    pub id: String,
    /// Display name
    pub name: String,
}

/// Configuration for a single staff member
#[derive(Debug, Deserialize, Clone)]
pub struct StaffConfig {
    /// Identity provider user ID
    pub id: String,
    /// Display name
    pub name: String,
    /// Job title
    #[serde(default = "default_staff_role")]
    pub role: String,
}

fn default_staff_role() -> String {
    "bursar".to_string()
}

/// Configuration for a single student
#[derive(Debug, Deserialize, Clone)]
pub struct StudentConfig {
    /// Admission number
    pub id: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Class level the student is enrolled in
    pub class_level_id: String,
    /// Whether the student is currently enrolled
    #[serde(default = "default_active")]
    pub is_active: bool,
}

const fn default_active() -> bool {
    true
}

/// Configuration for a single fee structure
#[derive(Debug, Deserialize, Clone)]
pub struct FeeStructureConfig {
    /// Identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Class level billed
    pub class_level_id: String,
    /// Amount per student
    pub amount: Decimal,
    /// Optional academic year label
    #[serde(default)]
    pub academic_year: Option<String>,
}

/// Loads school configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SchoolConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Loading school configuration from {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {path_ref:?}: {e}"),
    })?;

    parse_config(&contents)
}

/// Parses school configuration from TOML text.
///
/// # Errors
/// Returns a configuration error when the TOML is invalid.
pub fn parse_config(contents: &str) -> Result<SchoolConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse school configuration: {e}"),
    })
}

/// Path of the school configuration: `$SCHOOL_CONFIG`, falling back to ./school.toml
#[must_use]
pub fn school_config_path() -> PathBuf {
    std::env::var(SCHOOL_CONFIG_ENV)
        .unwrap_or_else(|_| DEFAULT_SCHOOL_CONFIG.into())
        .into()
}

/// Loads the school configuration from [`school_config_path`].
///
/// Returns `Ok(None)` when the file does not exist, so a database that was
/// seeded earlier can start without it. A file that exists but cannot be
/// read or parsed is an error.
pub fn load_default_config() -> Result<Option<SchoolConfig>> {
    let path = school_config_path();
    if !path.exists() {
        tracing::warn!("School configuration {path:?} not found; roster will not be seeded");
        return Ok(None);
    }
    load_config(path).map(Some)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_school_config() {
        let toml_str = r#"
            [[class_levels]]
            id = "grade-7"
            name = "Grade 7"

            [[staff]]
            id = "123456789"
            name = "Mrs. Otieno"

            [[students]]
            id = "STU-001"
            first_name = "Amina"
            last_name = "Kariuki"
            class_level_id = "grade-7"

            [[students]]
            id = "STU-002"
            first_name = "Brian"
            last_name = "Mwangi"
            class_level_id = "grade-7"
            is_active = false

            [[fee_structures]]
            id = "g7-term1"
            name = "Term 1 Tuition"
            class_level_id = "grade-7"
            amount = "1500.00"
            academic_year = "2026"
        "#;

        let config = parse_config(toml_str).unwrap();
        assert_eq!(config.class_levels.len(), 1);
        assert_eq!(config.staff[0].role, "bursar");
        assert_eq!(config.students.len(), 2);
        assert!(config.students[0].is_active);
        assert!(!config.students[1].is_active);
        assert_eq!(config.fee_structures[0].amount, Decimal::from(1500));
        assert_eq!(config.fee_structures[0].academic_year.as_deref(), Some("2026"));
    }

    #[test]
    fn test_empty_config_is_valid() {
        let config = parse_config("").unwrap();
        assert!(config.class_levels.is_empty());
        assert!(config.students.is_empty());
    }

    #[test]
    fn test_missing_required_field_is_config_error() {
        let result = parse_config("[[students]]\nid = \"STU-9\"\n");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = load_config("does/not/exist/school.toml");
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
