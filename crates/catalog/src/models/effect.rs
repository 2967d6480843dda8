use crate::models::Tag;
use fermata_repository::AssetReference;
use serde::{Deserialize, Serialize};

/// A compiled sound-effect package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectItem {
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
    pub audio: AssetReference,
}

impl EffectItem {
    pub const VERSION: u32 = 5;
}
