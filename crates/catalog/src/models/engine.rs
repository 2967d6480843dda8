use crate::models::{BackgroundItem, EffectItem, ParticleItem, SkinItem, Tag};
use fermata_repository::AssetReference;
use serde::{Deserialize, Serialize};

/// A compiled engine package.
///
/// Engines embed the *full* compiled skin/background/effect/particle
/// records rather than references: one level of denormalization so an
/// engine payload is self-contained for the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineItem {
    pub name: String,
    pub version: u32,
    pub title: String,
    pub subtitle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub author: String,
    pub tags: Vec<Tag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub skin: SkinItem,
    pub background: BackgroundItem,
    pub effect: EffectItem,
    pub particle: ParticleItem,
    pub thumbnail: AssetReference,
    pub play_data: AssetReference,
    pub watch_data: AssetReference,
    pub preview_data: AssetReference,
    pub tutorial_data: AssetReference,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rom: Option<AssetReference>,
    pub configuration: AssetReference,
}

impl EngineItem {
    pub const VERSION: u32 = 13;
}
