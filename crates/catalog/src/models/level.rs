use crate::models::{BackgroundItem, EngineItem, Tag};
use fermata_repository::AssetReference;
use serde::{Deserialize, Serialize};

/// "Use the engine's default X, or this specific item instead."
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UseItem<T> {
    pub use_default: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<T>,
}

impl<T> UseItem<T> {
    /// Defer to whatever the engine ships with.
    pub fn engine_default() -> Self {
        Self { use_default: true, item: None }
    }

    /// Override with a specific compiled item.
    pub fn custom(item: T) -> Self {
        Self { use_default: false, item: Some(item) }
    }
}

/// A compiled archive-packaged level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelItem {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub version: u32,
    pub rating: i64,
    pub title: String,
    pub artists: String,
    pub author: String,
    pub tags: Vec<Tag>,
    pub engine: EngineItem,
    pub use_skin: UseItem<crate::models::SkinItem>,
    pub use_background: UseItem<BackgroundItem>,
    pub use_effect: UseItem<crate::models::EffectItem>,
    pub use_particle: UseItem<crate::models::ParticleItem>,
    pub cover: AssetReference,
    pub bgm: AssetReference,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<AssetReference>,
    pub data: AssetReference,
}

impl LevelItem {
    pub const VERSION: u32 = 1;
}
