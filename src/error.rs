use std::path::PathBuf;

use thiserror::Error;

/// Application-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Root or operand path does not exist.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// A directory was required but the path is something else.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Permission denied for a path.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// I/O errors from filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A candidate file name failed validation.
    #[error("Invalid name: {0}")]
    InvalidName(#[from] crate::browser::naming::NameError),

    /// Terminal initialization or rendering errors.
    #[error("Terminal error: {0}")]
    Terminal(String),
}

impl AppError {
    /// Classify an I/O error against the path it occurred on.
    pub fn io_at(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            _ => Self::Io(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
    }

    #[test]
    fn io_at_classifies_not_found() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let app_err = AppError::io_at("/tmp/missing", io_err);
        assert!(matches!(app_err, AppError::NotFound(_)));
        assert!(app_err.to_string().contains("/tmp/missing"));
    }

    #[test]
    fn io_at_classifies_permission() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let app_err = AppError::io_at("/root/secret", io_err);
        assert!(matches!(app_err, AppError::PermissionDenied(_)));
    }

    #[test]
    fn not_a_directory_display() {
        let err = AppError::NotADirectory(PathBuf::from("/tmp/file.txt"));
        assert_eq!(err.to_string(), "Not a directory: /tmp/file.txt");
    }
}
