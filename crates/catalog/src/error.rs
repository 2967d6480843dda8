//! Catalog error types.
//!
//! Two failure classes matter here and must stay distinguishable (they are
//! handled differently per the configured failure policy): a single broken
//! resource package, and a server whose content is internally inconsistent
//! (an engine referencing a name that compiles to nothing).

use crate::compile::Kind;
use derive_more::{Display, Error};
use std::io::Error as IoError;
use std::path::PathBuf;

/// A catalog error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// One resource instance is malformed (missing descriptor or required
    /// asset file). Lenient kinds skip the instance; strict kinds abort.
    #[display("broken {kind} package `{name}`: {reason}")]
    Package {
        #[error(not(source))]
        kind: Kind,
        name: String,
        reason: String,
    },
    /// An engine references a resource name that no compiled list contains.
    /// Always a configuration mistake, never a client-visible condition.
    #[display("engine `{engine}` references unknown {kind} `{reference}`")]
    DanglingReference {
        #[error(not(source))]
        engine: String,
        kind: Kind,
        reference: String,
    },
    /// No skin matched the requested theme/engine combination.
    #[display("no skin matches theme `{theme}` for engine `{engine}`")]
    NoMatchingSkin {
        #[error(not(source))]
        theme: String,
        engine: String,
    },
    /// The underlying repository failed to register or resolve an asset
    #[display("repository operation failed")]
    Repository,
    /// Descriptor or configuration JSON could not be parsed
    #[display("malformed JSON in {}: {reason}", context.display())]
    Json {
        #[error(not(source))]
        context: PathBuf,
        reason: String,
    },
    /// A level archive could not be opened or updated
    #[display("archive error in {}: {reason}", archive.display())]
    Archive {
        #[error(not(source))]
        archive: PathBuf,
        reason: String,
    },
    /// Stage image could not be decoded or re-encoded
    #[display("image error: {_0}")]
    Image(#[error(not(source))] String),
    /// A replay or engine option failed validation
    #[display("invalid value for option `{option}`")]
    InvalidOption {
        #[error(not(source))]
        option: String,
    },
    /// Underlying I/O error
    #[display("I/O error: {_0}")]
    Io(IoError),
    /// A blocking compile task was cancelled or panicked
    #[display("compile worker failed: {_0}")]
    Worker(#[error(not(source))] String),
}
impl From<IoError> for ErrorKind {
    fn from(err: IoError) -> Self {
        Self::Io(err)
    }
}
impl ErrorKind {
    /// Whether this failure condemns the whole kind's compilation even
    /// under a lenient policy.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::DanglingReference { .. })
    }
}
