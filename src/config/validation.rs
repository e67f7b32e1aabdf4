//! Settings validation.
//!
//! Runs on every load so a malformed record never replaces loaded settings.

use super::types::{DataType, Settings};
use thiserror::Error;

/// Longest accepted purge interval: one year.
pub const MAX_INTERVAL_MINUTES: u64 = 365 * 24 * 60;

/// Validation errors for persisted settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("data_types must not be empty while purging is enabled")]
    NoDataTypes,
    #[error("data_types lists {0} more than once")]
    DuplicateDataType(DataType),
    #[error("triggers.interval_minutes must be between 1 and 525600, got {0}")]
    InvalidInterval(u64),
}

/// Validate settings, returning all errors found.
pub fn validate(settings: &Settings) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if settings.enabled && settings.data_types.is_empty() {
        errors.push(ValidationError::NoDataTypes);
    }

    let mut seen = Vec::with_capacity(settings.data_types.len());
    for data_type in &settings.data_types {
        if seen.contains(data_type) {
            if !errors.contains(&ValidationError::DuplicateDataType(*data_type)) {
                errors.push(ValidationError::DuplicateDataType(*data_type));
            }
        } else {
            seen.push(*data_type);
        }
    }

    if let Some(minutes) = settings.triggers.interval_minutes
        && !(1..=MAX_INTERVAL_MINUTES).contains(&minutes)
    {
        errors.push(ValidationError::InvalidInterval(minutes));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_pass() {
        assert!(validate(&Settings::default()).is_ok());
    }

    #[test]
    fn test_empty_data_types_fails_when_enabled() {
        let settings = Settings::parse("data_types = []").unwrap();
        let errors = validate(&settings).unwrap_err();
        assert_eq!(errors, vec![ValidationError::NoDataTypes]);
    }

    #[test]
    fn test_empty_data_types_allowed_when_disabled() {
        let settings = Settings::parse("enabled = false\ndata_types = []").unwrap();
        assert!(validate(&settings).is_ok());
    }

    #[test]
    fn test_duplicate_data_type_reported_once() {
        let settings =
            Settings::parse(r#"data_types = ["cache", "cookies", "cache", "cache"]"#).unwrap();
        let errors = validate(&settings).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::DuplicateDataType(DataType::Cache)]
        );
    }

    #[test]
    fn test_zero_interval_fails() {
        let toml = r#"
[triggers]
interval_minutes = 0
"#;
        let settings = Settings::parse(toml).unwrap();
        let errors = validate(&settings).unwrap_err();
        assert!(
            errors
                .iter()
                .any(|e| matches!(e, ValidationError::InvalidInterval(0)))
        );
    }

    #[test]
    fn test_interval_above_one_year_fails() {
        let toml = r#"
[triggers]
interval_minutes = 9000000000000000000
"#;
        let settings = Settings::parse(toml).unwrap();
        let errors = validate(&settings).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::InvalidInterval(9_000_000_000_000_000_000)]
        );
    }

    #[test]
    fn test_one_year_interval_passes() {
        let toml = format!("[triggers]\ninterval_minutes = {MAX_INTERVAL_MINUTES}");
        let settings = Settings::parse(&toml).unwrap();
        assert!(validate(&settings).is_ok());
    }

    #[test]
    fn test_all_errors_collected() {
        let toml = r#"
data_types = []

[triggers]
interval_minutes = 0
"#;
        let settings = Settings::parse(toml).unwrap();
        assert_eq!(validate(&settings).unwrap_err().len(), 2);
    }
}
