use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors that abort a whole import run
#[derive(Error, Debug)]
pub enum ImportError {
    /// No AnyList email/password could be found
    #[error("Missing AnyList credentials: set ANYLIST_EMAIL and ANYLIST_PASSWORD")]
    MissingCredentials,

    /// The pending recipes file does not exist
    #[error("File not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// The pending recipes file is not valid JSON
    #[error("Invalid JSON in {}: {message}", .path.display())]
    InvalidJson { path: PathBuf, message: String },

    /// The pending recipes file holds neither an object nor an array
    #[error("Invalid JSON format in {}: expected object or array", .0.display())]
    InvalidFormat(PathBuf),

    /// An existing archive file could not be parsed
    #[error("Invalid archive {}: {message}", .path.display())]
    InvalidArchive { path: PathBuf, message: String },

    /// Filesystem error while reading or writing data files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error serializing archive contents
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Session-level failure talking to the recipe service (login, etc.)
    #[error("Recipe service error: {0}")]
    Service(#[from] ServiceError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}

/// Broad category of a failure reported by the recipe service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceErrorKind {
    /// The object being created is already present remotely
    AlreadyExists,
    NotFound,
    Unauthorized,
    /// Network failure or timeout
    Transport,
    /// The service answered with something we could not understand
    Protocol,
    Other,
}

impl ServiceErrorKind {
    /// Map a failed response onto an error kind.
    ///
    /// A `409 Conflict` status, or any message containing "already exists"
    /// (case-insensitive), is `AlreadyExists`. The message check covers
    /// backends that report duplicates with a generic status.
    pub fn classify(status: Option<u16>, message: &str) -> Self {
        if status == Some(409) || message.to_lowercase().contains("already exists") {
            return ServiceErrorKind::AlreadyExists;
        }

        match status {
            Some(401) | Some(403) => ServiceErrorKind::Unauthorized,
            Some(404) => ServiceErrorKind::NotFound,
            _ => ServiceErrorKind::Other,
        }
    }
}

/// Error returned by a [`RecipeService`](crate::service::RecipeService) call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ServiceError {
    pub kind: ServiceErrorKind,
    pub message: String,
}

impl ServiceError {
    pub fn new(kind: ServiceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn is_already_exists(&self) -> bool {
        self.kind == ServiceErrorKind::AlreadyExists
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_decode() {
            ServiceErrorKind::Protocol
        } else if let Some(status) = err.status() {
            ServiceErrorKind::classify(Some(status.as_u16()), &err.to_string())
        } else {
            ServiceErrorKind::Transport
        };
        ServiceError::new(kind, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_conflict_status() {
        assert_eq!(
            ServiceErrorKind::classify(Some(409), "Conflict"),
            ServiceErrorKind::AlreadyExists
        );
    }

    #[test]
    fn test_classify_already_exists_message() {
        assert_eq!(
            ServiceErrorKind::classify(Some(400), "Collection Already Exists"),
            ServiceErrorKind::AlreadyExists
        );
        assert_eq!(
            ServiceErrorKind::classify(None, "collection already exists"),
            ServiceErrorKind::AlreadyExists
        );
    }

    #[test]
    fn test_classify_other_statuses() {
        assert_eq!(
            ServiceErrorKind::classify(Some(401), "nope"),
            ServiceErrorKind::Unauthorized
        );
        assert_eq!(
            ServiceErrorKind::classify(Some(404), "missing"),
            ServiceErrorKind::NotFound
        );
        assert_eq!(
            ServiceErrorKind::classify(Some(500), "boom"),
            ServiceErrorKind::Other
        );
        assert_eq!(ServiceErrorKind::classify(None, "boom"), ServiceErrorKind::Other);
    }

    #[test]
    fn test_display_is_message() {
        let err = ServiceError::new(ServiceErrorKind::Transport, "connection reset");
        assert_eq!(err.to_string(), "connection reset");
    }

    #[test]
    fn test_import_error_messages() {
        let err = ImportError::InputNotFound(PathBuf::from("data/recipes.json"));
        assert_eq!(err.to_string(), "File not found: data/recipes.json");

        let err = ImportError::InvalidFormat(PathBuf::from("data/recipes.json"));
        assert!(err.to_string().contains("expected object or array"));
    }
}
