//! Length limits for free-text fields, enforced before any write.

use super::ValidationError;

pub const MAX_FULL_NAME: usize = 100;
pub const MAX_TITLE: usize = 200;
pub const MAX_PHONE: usize = 20;
pub const MAX_BIO: usize = 1000;
pub const MAX_DESCRIPTION: usize = 2000;
pub const MAX_MESSAGE: usize = 2000;

/// Validates a required free-text field: non-empty after trimming,
/// within `max` characters.
pub fn validate_text(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::TextEmpty(field));
    }

    if trimmed.len() > max {
        return Err(ValidationError::TextTooLong(field, max));
    }

    Ok(())
}

/// Validates an optional free-text field: `None` and empty pass, a
/// present value only needs to respect the maximum.
pub fn validate_optional_text(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<(), ValidationError> {
    match value {
        Some(v) if v.trim().len() > max => Err(ValidationError::TextTooLong(field, max)),
        _ => Ok(()),
    }
}

/// Validates a person's display name.
pub fn validate_full_name(name: &str) -> Result<(), ValidationError> {
    validate_text("Name", name, MAX_FULL_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(validate_full_name("John").is_ok());
        assert!(validate_full_name("John Doe").is_ok());
        assert!(validate_full_name("José García").is_ok());
        assert!(validate_full_name("王小明").is_ok());
    }

    #[test]
    fn test_name_empty() {
        assert_eq!(
            validate_full_name("").unwrap_err(),
            ValidationError::TextEmpty("Name")
        );
        assert_eq!(
            validate_full_name("   ").unwrap_err(),
            ValidationError::TextEmpty("Name")
        );
    }

    #[test]
    fn test_name_too_long() {
        let long_name = "a".repeat(101);
        assert_eq!(
            validate_full_name(&long_name).unwrap_err(),
            ValidationError::TextTooLong("Name", MAX_FULL_NAME)
        );
    }

    #[test]
    fn test_optional_text() {
        assert!(validate_optional_text("Bio", None, MAX_BIO).is_ok());
        assert!(validate_optional_text("Bio", Some(""), MAX_BIO).is_ok());
        assert!(validate_optional_text("Bio", Some("short bio"), MAX_BIO).is_ok());

        let long = "a".repeat(MAX_BIO + 1);
        assert_eq!(
            validate_optional_text("Bio", Some(&long), MAX_BIO).unwrap_err(),
            ValidationError::TextTooLong("Bio", MAX_BIO)
        );
    }

    #[test]
    fn test_boundary_lengths() {
        let exactly_max = "a".repeat(MAX_MESSAGE);
        assert!(validate_text("Message", &exactly_max, MAX_MESSAGE).is_ok());

        let over = "a".repeat(MAX_MESSAGE + 1);
        assert!(validate_text("Message", &over, MAX_MESSAGE).is_err());
    }
}
