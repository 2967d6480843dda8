use derive_more::Display;
use serde::{Deserialize, Serialize};

/// A fixed-length hex string identifying a byte sequence by its BLAKE3 hash.
///
/// Two inputs with identical bytes always produce the same digest, no
/// matter where the bytes came from (file, archive member, buffer). Used as
/// both the repository's map key and the URL path component; never mutated
/// once computed.
#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentDigest(String);

impl ContentDigest {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl From<blake3::Hash> for ContentDigest {
    fn from(hash: blake3::Hash) -> Self {
        Self(hash.to_hex().to_string())
    }
}
impl From<&str> for ContentDigest {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A resolvable `{hash, url}` pair (the protocol calls this an SRL).
///
/// Derived on demand from a known digest via
/// [`Repository::resolve`](crate::Repository::resolve); never stored. The
/// url is always `"{prefix}/{hash}"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetReference {
    pub hash: ContentDigest,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_serializes_as_bare_string() {
        let digest = ContentDigest::from(blake3::hash(b"abc"));
        let json = serde_json::to_string(&digest).unwrap();
        assert_eq!(json, format!("\"{digest}\""));
    }

    #[test]
    fn reference_serializes_with_protocol_field_names() {
        let reference = AssetReference {
            hash: ContentDigest::from("cafe"),
            url: "/sonolus/repository/cafe".to_string(),
        };
        let json = serde_json::to_value(&reference).unwrap();
        assert_eq!(json["hash"], "cafe");
        assert_eq!(json["url"], "/sonolus/repository/cafe");
    }
}
