use std::path::PathBuf;

use thiserror::Error;

use crate::archive::ArchiveError;

/// Application-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types.
///
/// The `Display` text doubles as the message shown in the error modal.
#[derive(Debug, Error)]
pub enum AppError {
    /// I/O errors from filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal initialization or rendering errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Invalid path provided by the user.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// A directory could not be opened or iterated.
    #[error("Can't read directory \"{}\": {source}", path.display())]
    Enumeration {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The requested archive is the one already open.
    #[error("File \"{}\" is already open", .0.display())]
    AlreadyOpen(PathBuf),

    /// An operation needs an open, non-empty archive.
    #[error("No file open")]
    NoArchiveOpen,

    /// The staged file list is empty or has an empty internal path.
    #[error("Every staged file needs an internal path")]
    NotReady,

    /// Failure reported by the archive collaborator.
    #[error(transparent)]
    Archive(#[from] ArchiveError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
        assert!(app_err.to_string().contains("file not found"));
    }

    #[test]
    fn terminal_error_display() {
        let err = AppError::Terminal("failed to enter raw mode".into());
        assert_eq!(err.to_string(), "Terminal error: failed to enter raw mode");
    }

    #[test]
    fn already_open_display() {
        let err = AppError::AlreadyOpen(PathBuf::from("/tmp/a.zip"));
        assert_eq!(err.to_string(), "File \"/tmp/a.zip\" is already open");
    }

    #[test]
    fn enumeration_error_keeps_source() {
        let err = AppError::Enumeration {
            path: PathBuf::from("/nope"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.to_string(), "Can't read directory \"/nope\": gone");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn archive_error_is_transparent() {
        let err: AppError = ArchiveError::Open {
            path: PathBuf::from("x.zip"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "x"),
        }
        .into();
        assert_eq!(err.to_string(), "Can't open file \"x.zip\"");
    }
}
