use derive_more::{Display, Error};

/// A configuration error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The configuration sources could not be read or parsed
    #[display("could not parse configuration: {_0}")]
    Parse(#[error(not(source))] String),
    /// The merged configuration is structurally valid but nonsensical
    #[display("invalid configuration: {_0}")]
    Invalid(#[error(not(source))] &'static str),
}
