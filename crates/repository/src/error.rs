//! Repository error types.
//!
//! Structured errors using `exn` for automatic location tracking, in the
//! same shape as the rest of the workspace.

use derive_more::{Display, Error};
use std::io::Error as IoError;
use std::path::PathBuf;

/// A repository error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for repository operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// File does not exist
    #[display("file not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    /// Archive exists but the named member does not
    #[display("member `{member}` not found in archive {}", archive.display())]
    MemberNotFound {
        #[error(not(source))]
        archive: PathBuf,
        member: String,
    },
    /// Access denied
    #[display("permission denied: {}", _0.display())]
    PermissionDenied(#[error(not(source))] PathBuf),
    /// Underlying I/O error
    #[display("I/O error: {_0}")]
    Io(IoError),
    /// Zip archive could not be opened or parsed
    #[display("archive error: {_0}")]
    Archive(#[error(not(source))] String),
}
impl From<IoError> for ErrorKind {
    fn from(err: IoError) -> Self {
        Self::Io(err)
    }
}
impl ErrorKind {
    /// Returns `true` if the error means "the asset simply isn't there",
    /// as opposed to a read that went wrong.
    pub fn is_absence(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::MemberNotFound { .. })
    }
}
