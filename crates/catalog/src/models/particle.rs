use crate::models::Tag;
use fermata_repository::AssetReference;
use serde::{Deserialize, Serialize};

/// A compiled particle package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleItem {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub version: u32,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub tags: Vec<Tag>,
    pub thumbnail: AssetReference,
    pub data: AssetReference,
    pub texture: AssetReference,
}

impl ParticleItem {
    pub const VERSION: u32 = 3;
}

/// A compiled particle plus the descriptor flags the item itself doesn't
/// carry on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleRecord {
    pub item: ParticleItem,
    /// Particles flagged engine-specific are excluded from the free-choice
    /// pickers the request layer builds.
    pub engine_specific: bool,
}
