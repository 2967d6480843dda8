//! Content-addressed asset repository.
//!
//! Every static asset the server exposes (engine binaries, skin textures,
//! background images, level data inside zip archives) is registered here by
//! the digest of its byte content. The repository maps digests back to their
//! on-disk (or in-memory) locations and synthesizes the stable
//! `{hash, url}` references the client protocol uses to fetch them.
//!
//! # Architecture
//! - [`AssetSource`] describes *where* bytes live: a plain file, a member
//!   inside a zip archive, or an in-memory buffer. Reading and hashing
//!   dispatch exhaustively on the variant.
//! - [`digest`](crate::digest::digest) computes a BLAKE3 hex digest of the
//!   byte content only — never of paths or metadata.
//! - [`Repository`] owns the digest → source map. Registering the same path
//!   again after its content changed replaces the stale entry; registering
//!   identical bytes from a different path deduplicates to one entry.

mod digest;
pub mod error;
mod models;
mod repo;
mod source;

pub use crate::digest::{digest, digest_bytes};
pub use crate::models::{AssetReference, ContentDigest};
pub use crate::repo::Repository;
pub use crate::source::AssetSource;
use std::sync::Arc;

/// Shared handle to the process-wide repository instance.
pub type RepositoryHandle = Arc<Repository>;
