use crate::error::Result;
use crate::models::ContentDigest;
use crate::source::AssetSource;

/// Compute the BLAKE3 digest of a source's byte content.
///
/// Deterministic and a pure function of the bytes: a file, an archive
/// member, and a buffer holding identical bytes all produce the same
/// digest. Propagates `NotFound` if the source is absent — the repository
/// decides whether that is fatal.
pub fn digest(source: &AssetSource) -> Result<ContentDigest> {
    let bytes = source.read()?;
    Ok(digest_bytes(&bytes))
}

/// Digest an in-memory buffer directly.
pub fn digest_bytes(bytes: &[u8]) -> ContentDigest {
    ContentDigest::from(blake3::hash(bytes))
}
