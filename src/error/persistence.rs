//! Metrics store error types.
//!
//! These errors stop the collector: a monitor that silently drops rows is
//! worse than one that halts and reports why.

use std::fmt;
use std::path::PathBuf;

/// Failure to open, create or append to the metrics store.
#[derive(Debug, Clone, PartialEq)]
pub enum PersistenceError {
    /// Permission denied for the store or its parent directory.
    PermissionDenied { path: PathBuf, operation: String },

    /// A parent directory could not be created.
    DirectoryCreationFailed { path: PathBuf, message: String },

    /// The device holding the store is full.
    InsufficientDiskSpace { path: PathBuf },

    /// Disk quota exceeded.
    QuotaExceeded { path: PathBuf },

    /// Any other I/O failure.
    Io {
        operation: String,
        path: PathBuf,
        message: String,
    },
}

impl PersistenceError {
    /// Path of the store (or directory) involved.
    pub fn path(&self) -> &PathBuf {
        match self {
            PersistenceError::PermissionDenied { path, .. }
            | PersistenceError::DirectoryCreationFailed { path, .. }
            | PersistenceError::InsufficientDiskSpace { path }
            | PersistenceError::QuotaExceeded { path }
            | PersistenceError::Io { path, .. } => path,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            PersistenceError::PermissionDenied { path, operation } => {
                format!(
                    "Permission denied: cannot {} '{}'.\nCheck the permissions of the store path.",
                    operation,
                    path.display()
                )
            }
            PersistenceError::DirectoryCreationFailed { path, .. } => {
                format!("Failed to create directory '{}'.", path.display())
            }
            PersistenceError::InsufficientDiskSpace { path } => {
                format!(
                    "Not enough disk space to append to '{}'.\nFree up some space and restart collection.",
                    path.display()
                )
            }
            PersistenceError::QuotaExceeded { path } => {
                format!("Disk quota exceeded at '{}'.", path.display())
            }
            PersistenceError::Io { operation, path, .. } => {
                format!("Failed to {} '{}'", operation, path.display())
            }
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            PersistenceError::PermissionDenied { .. } => "E_STORE_PERM",
            PersistenceError::DirectoryCreationFailed { .. } => "E_STORE_DIR_CREATE",
            PersistenceError::InsufficientDiskSpace { .. } => "E_STORE_DISK_SPACE",
            PersistenceError::QuotaExceeded { .. } => "E_STORE_QUOTA",
            PersistenceError::Io { .. } => "E_STORE_IO",
        }
    }
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::PermissionDenied { path, operation } => {
                write!(f, "Permission denied: {} '{}'", operation, path.display())
            }
            PersistenceError::DirectoryCreationFailed { path, message } => {
                write!(
                    f,
                    "Failed to create directory '{}': {}",
                    path.display(),
                    message
                )
            }
            PersistenceError::InsufficientDiskSpace { path } => {
                write!(f, "Insufficient disk space at '{}'", path.display())
            }
            PersistenceError::QuotaExceeded { path } => {
                write!(f, "Disk quota exceeded at '{}'", path.display())
            }
            PersistenceError::Io {
                operation,
                path,
                message,
            } => write!(
                f,
                "I/O error during {} at '{}': {}",
                operation,
                path.display(),
                message
            ),
        }
    }
}

impl std::error::Error for PersistenceError {}

/// Classify an I/O error raised while working on `path`.
pub fn classify_io_error(
    err: std::io::Error,
    path: impl Into<PathBuf>,
    operation: &str,
) -> PersistenceError {
    use std::io::ErrorKind;

    let path = path.into();
    match err.kind() {
        ErrorKind::PermissionDenied => PersistenceError::PermissionDenied {
            path,
            operation: operation.to_string(),
        },
        _ if is_disk_space_error(&err) => PersistenceError::InsufficientDiskSpace { path },
        _ if is_quota_error(&err) => PersistenceError::QuotaExceeded { path },
        _ => PersistenceError::Io {
            operation: operation.to_string(),
            path,
            message: err.to_string(),
        },
    }
}

fn is_disk_space_error(err: &std::io::Error) -> bool {
    #[cfg(unix)]
    {
        // ENOSPC
        err.raw_os_error() == Some(28)
    }
    #[cfg(not(unix))]
    {
        let msg = err.to_string().to_lowercase();
        msg.contains("no space") || msg.contains("disk full")
    }
}

fn is_quota_error(err: &std::io::Error) -> bool {
    #[cfg(unix)]
    {
        // EDQUOT is 122 on Linux, 69 on macOS
        let raw = err.raw_os_error();
        raw == Some(122) || raw == Some(69)
    }
    #[cfg(not(unix))]
    {
        err.to_string().to_lowercase().contains("quota")
    }
}
