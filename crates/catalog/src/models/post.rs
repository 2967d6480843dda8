use crate::models::Tag;
use fermata_repository::AssetReference;
use serde::{Deserialize, Serialize};

/// A compiled static post (announcement).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostItem {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub version: u32,
    pub title: String,
    /// Publication time, milliseconds since the epoch.
    pub time: i64,
    pub author: String,
    pub tags: Vec<Tag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<AssetReference>,
}

impl PostItem {
    pub const VERSION: u32 = 1;
}
