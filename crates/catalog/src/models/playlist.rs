use crate::models::{LevelItem, Tag};
use fermata_repository::AssetReference;
use serde::{Deserialize, Serialize};

/// A compiled playlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistItem {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub version: u32,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub tags: Vec<Tag>,
    /// Populated by the request layer; static playlist packages ship empty.
    #[serde(default)]
    pub levels: Vec<LevelItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<AssetReference>,
}

impl PlaylistItem {
    pub const VERSION: u32 = 1;
}
