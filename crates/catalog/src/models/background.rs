use crate::models::Tag;
use fermata_repository::AssetReference;
use serde::{Deserialize, Serialize};

/// A compiled background package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundItem {
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
    pub image: AssetReference,
    pub configuration: AssetReference,
}

impl BackgroundItem {
    pub const VERSION: u32 = 2;
}
