//! Structural validation of account creation requests.

use std::borrow::Cow;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

pub const DEFAULT_MAX_NAME_LENGTH: usize = 100;

/// Caller-supplied input of the create account command.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAccountRequest {
    #[validate(custom(
        function = "crate::account::validate_not_blank",
        message = "Name must not be empty."
    ))]
    pub name: String,
}

impl CreateAccountRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Reject values made only of whitespace.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Outcome of validating a [`CreateAccountRequest`].
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    errors: ValidationErrors,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Field errors sorted by field, then by message.
    pub fn errors(&self) -> Vec<FieldError> {
        field_errors(&self.errors)
    }

    /// Turn the result into `Err` when at least one rule failed.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Flatten [`ValidationErrors`] into a stable, ordered list.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut list: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, issues)| {
            issues.iter().map(move |issue| FieldError {
                field: field.to_string(),
                message: issue.to_string(),
            })
        })
        .collect();
    list.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
    list
}

/// Validator applying the static request rules plus the configurable ones.
#[derive(Debug, Clone)]
pub struct CreateAccountValidator {
    max_name_length: usize,
    name_pattern: Option<Regex>,
}

impl Default for CreateAccountValidator {
    fn default() -> Self {
        Self {
            max_name_length: DEFAULT_MAX_NAME_LENGTH,
            name_pattern: None,
        }
    }
}

impl CreateAccountValidator {
    pub fn new(max_name_length: usize, name_pattern: Option<Regex>) -> Self {
        Self {
            max_name_length,
            name_pattern,
        }
    }

    /// Validate `request` without side effects.
    pub fn validate(&self, request: &CreateAccountRequest) -> ValidationResult {
        let mut errors = match request.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        let name = request.name.trim();
        if name.chars().count() > self.max_name_length {
            let mut error = ValidationError::new("length").with_message(Cow::Owned(format!(
                "Name must be at most {} characters long.",
                self.max_name_length
            )));
            error.add_param(Cow::Borrowed("max"), &self.max_name_length);
            errors.add("name", error);
        }

        if let Some(pattern) = &self.name_pattern {
            if !name.is_empty() && !pattern.is_match(name) {
                errors.add(
                    "name",
                    ValidationError::new("charset")
                        .with_message(Cow::Borrowed("Name contains forbidden characters.")),
                );
            }
        }

        ValidationResult { errors }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Acme Corp", true)]
    #[case("a", true)]
    #[case("", false)]
    #[case("   ", false)]
    #[case("\t\n", false)]
    fn test_default_rules(#[case] name: &str, #[case] valid: bool) {
        let result = CreateAccountValidator::default().validate(&CreateAccountRequest::new(name));
        assert_eq!(result.is_valid(), valid);
    }

    #[test]
    fn test_blank_name_reports_field() {
        let result = CreateAccountValidator::default().validate(&CreateAccountRequest::new(""));
        let errors = result.errors();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "name");
        assert_eq!(errors[0].message, "Name must not be empty.");
    }

    #[test]
    fn test_max_length_counts_characters() {
        let validator = CreateAccountValidator::new(5, None);

        assert!(validator.validate(&CreateAccountRequest::new("ééééé")).is_valid());
        assert!(validator.validate(&CreateAccountRequest::new("  abcde  ")).is_valid());

        let result = validator.validate(&CreateAccountRequest::new("abcdef"));
        assert!(!result.is_valid());
        assert_eq!(
            result.errors()[0].message,
            "Name must be at most 5 characters long."
        );
    }

    #[test]
    fn test_name_pattern() {
        let pattern = Regex::new(r"^[A-Za-z0-9 ]+$").unwrap();
        let validator = CreateAccountValidator::new(DEFAULT_MAX_NAME_LENGTH, Some(pattern));

        assert!(validator.validate(&CreateAccountRequest::new("Acme Corp 2")).is_valid());

        let result = validator.validate(&CreateAccountRequest::new("Acme <script>"));
        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].message, "Name contains forbidden characters.");
    }

    #[test]
    fn test_errors_are_ordered() {
        let pattern = Regex::new(r"^[a-z]+$").unwrap();
        let validator = CreateAccountValidator::new(2, Some(pattern));
        let errors = validator.validate(&CreateAccountRequest::new("ABC")).errors();

        assert_eq!(errors.len(), 2);
        assert!(errors[0].message <= errors[1].message);
        assert!(errors.iter().all(|e| e.field == "name"));
    }

    #[test]
    fn test_into_result() {
        let validator = CreateAccountValidator::default();

        assert!(validator.validate(&CreateAccountRequest::new("ok")).into_result().is_ok());
        let errors = validator
            .validate(&CreateAccountRequest::new(" "))
            .into_result()
            .unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }
}
