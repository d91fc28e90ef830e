use thiserror::Error;

/// Top-level error type for the taskweave system.
///
/// Each variant wraps a subsystem-specific failure. Subsystem crates define
/// their own error types and implement `From<SubsystemError> for
/// TaskweaveError` so that the `?` operator works across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TaskweaveError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Confirmation error: {0}")]
    Confirmation(String),

    #[error("Synthesis error: {0}")]
    Synthesis(String),

    #[error("Agent error: {0}")]
    Agent(String),

    #[error("Event bus error: {0}")]
    Bus(String),

    #[error("Language model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for TaskweaveError {
    fn from(err: toml::de::Error) -> Self {
        TaskweaveError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for TaskweaveError {
    fn from(err: toml::ser::Error) -> Self {
        TaskweaveError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for TaskweaveError {
    fn from(err: serde_json::Error) -> Self {
        TaskweaveError::Serialization(err.to_string())
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, TaskweaveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = TaskweaveError::Config("bad section".to_string());
        assert_eq!(err.to_string(), "Configuration error: bad section");

        let err = TaskweaveError::ModelUnavailable("connection refused".to_string());
        assert_eq!(
            err.to_string(),
            "Language model unavailable: connection refused"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: TaskweaveError = io.into();
        assert!(matches!(err, TaskweaveError::Io(_)));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_serde_json_error() {
        let parse_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: TaskweaveError = parse_err.into();
        assert!(matches!(err, TaskweaveError::Serialization(_)));
    }
}
