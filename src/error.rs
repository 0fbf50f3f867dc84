use std::path::PathBuf;
use thiserror::Error;

use crate::types::ProjectId;
use crate::validate::FieldError;

#[derive(Error, Debug)]
pub enum ProjectsError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unauthorized: the server rejected the bearer token")]
    Unauthorized,

    #[error("Project already exists")]
    Duplicate,

    #[error("No token found. Run 'projects login <token>' or set PROJECTS_TOKEN")]
    MissingToken,

    #[error("Failed to read config file at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Load projects error (run with --verbose for details)")]
    LoadFailed,

    #[error("Project not found: {0}")]
    ProjectNotFound(ProjectId),

    #[error("Invalid project: {}", errors.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "))]
    Validation { errors: Vec<FieldError> },
}

impl ProjectsError {
    /// Whether the server refused the request because the project exists.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate)
    }
}

pub type Result<T> = std::result::Result<T, ProjectsError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::Field;

    #[test]
    fn api_error_includes_status() {
        let err = ProjectsError::Api {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "API error (status 500): boom");
    }

    #[test]
    fn validation_error_lists_fields() {
        let err = ProjectsError::Validation {
            errors: vec![FieldError {
                field: Field::Title,
                message: "Length of title > 50",
            }],
        };
        assert_eq!(err.to_string(), "Invalid project: title: Length of title > 50");
    }

    #[test]
    fn only_duplicate_is_duplicate() {
        assert!(ProjectsError::Duplicate.is_duplicate());
        assert!(!ProjectsError::Unauthorized.is_duplicate());
    }
}
