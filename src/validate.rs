//! Field rules applied to project forms before they are submitted.

use std::fmt;

use clap::ValueEnum;

use crate::types::NewProject;

/// Longest title, in characters, the form accepts.
pub const TITLE_MAX_LEN: usize = 50;

/// Fields of a project form that carry a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Field {
    /// Project title
    Title,
}

impl Field {
    pub const ALL: [Field; 1] = [Field::Title];

    pub fn name(self) -> &'static str {
        match self {
            Field::Title => "title",
        }
    }

    /// Run the rule for this field, returning the error message on failure.
    pub fn check(self, value: &str) -> Option<&'static str> {
        match self {
            Field::Title => check_title(value),
        }
    }

    fn value_of(self, project: &NewProject) -> &str {
        match self {
            Field::Title => &project.title,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

fn check_title(value: &str) -> Option<&'static str> {
    if value.chars().count() <= TITLE_MAX_LEN {
        None
    } else {
        Some("Length of title > 50")
    }
}

/// A rule violation on a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: &'static str,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a single field value.
pub fn validate_prop(field: Field, value: &str) -> Result<(), FieldError> {
    match field.check(value) {
        None => Ok(()),
        Some(message) => Err(FieldError { field, message }),
    }
}

/// Validate every field of a project, collecting all violations.
pub fn validate(project: &NewProject) -> Result<(), Vec<FieldError>> {
    let errors: Vec<FieldError> = Field::ALL
        .iter()
        .filter_map(|&field| validate_prop(field, field.value_of(project)).err())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(title: &str) -> NewProject {
        NewProject {
            title: title.to_string(),
            description: None,
        }
    }

    #[test]
    fn titles_up_to_limit_pass() {
        for len in [0, 1, 25, 49, 50] {
            assert_eq!(validate_prop(Field::Title, &"a".repeat(len)), Ok(()));
        }
    }

    #[test]
    fn titles_over_limit_fail() {
        for len in [51, 52, 200] {
            let err = validate_prop(Field::Title, &"a".repeat(len)).unwrap_err();
            assert_eq!(err.field, Field::Title);
            assert_eq!(err.message, "Length of title > 50");
        }
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let title = "ж".repeat(50);
        assert!(title.len() > TITLE_MAX_LEN);
        assert!(validate_prop(Field::Title, &title).is_ok());
    }

    #[test]
    fn validate_collects_field_errors() {
        assert!(validate(&project("Backend")).is_ok());

        let errors = validate(&project(&"x".repeat(51))).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "title: Length of title > 50");
    }
}
