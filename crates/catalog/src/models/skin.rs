use crate::models::Tag;
use fermata_repository::AssetReference;
use serde::{Deserialize, Serialize};

/// A compiled skin package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkinItem {
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

impl SkinItem {
    pub const VERSION: u32 = 4;
}

/// A compiled skin plus the selection metadata used by cross-reference
/// resolution (none of which is serialized on the item).
#[derive(Debug, Clone, PartialEq)]
pub struct SkinRecord {
    pub item: SkinItem,
    /// Engine names this skin may be used by. `None` means compatible with
    /// every engine.
    pub engines: Option<Vec<String>>,
    /// Theme name this skin renders; what requests select by.
    pub theme: String,
    /// `None` means global (any locale).
    pub locale: Option<String>,
}

impl SkinRecord {
    /// Whether this skin may be used by the named engine.
    pub fn supports_engine(&self, engine: &str) -> bool {
        match &self.engines {
            Some(engines) => engines.iter().any(|name| name == engine),
            None => true,
        }
    }
}
