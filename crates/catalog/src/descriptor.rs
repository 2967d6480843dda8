//! On-disk resource descriptors.
//!
//! Every resource instance ships a `<kind>.json` next to its asset files.
//! These structs mirror that JSON exactly; compilers turn them into the
//! protocol-shaped items in [`models`](crate::models).

use crate::error::{ErrorKind, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

fn enabled_default() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct BackgroundDescriptor {
    pub version: u32,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct EffectDescriptor {
    pub version: u32,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ParticleDescriptor {
    pub version: u32,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub engine_specific: bool,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SkinDescriptor {
    pub version: u32,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub theme: String,
    /// Engine names this skin is restricted to; absent means any engine.
    #[serde(default)]
    pub engines: Option<Vec<String>>,
    /// Locale this skin targets; absent means global.
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PostDescriptor {
    pub version: u32,
    pub title: String,
    /// Milliseconds since the epoch.
    pub time: i64,
    pub author: String,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PlaylistDescriptor {
    pub version: u32,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct EngineDescriptor {
    pub title: String,
    pub subtitle: String,
    pub author: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Default skin name, overridable per locale.
    pub skin_name: String,
    #[serde(default)]
    pub skin_name_locale: HashMap<String, String>,
    pub effect_name: String,
    pub particle_name: String,
    pub background_name: String,
    /// Engines without an explicit order sort after all that have one.
    #[serde(default)]
    pub engine_sort_order: Option<i64>,
    #[serde(default)]
    pub can_be_ranked: bool,
    /// Option names whose value must stay pinned to the default for a
    /// replay to count as ranked.
    #[serde(default)]
    pub unrankable_options: Vec<String>,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
}

impl EngineDescriptor {
    /// The skin name to resolve for a locale: the per-locale override if
    /// declared, the default skin name otherwise.
    pub fn skin_name_for(&self, locale: &str) -> &str {
        self.skin_name_locale.get(locale).map_or(&self.skin_name, String::as_str)
    }
}

/// Metadata inside a level archive's `level.json` member.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LevelDescriptor {
    pub rating: i64,
    pub title: String,
    pub artists: String,
    pub author: String,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
}

/// Read and parse a descriptor file.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path).map_err(ErrorKind::Io)?;
    parse_json(&bytes, path)
}

/// Parse descriptor bytes that came from somewhere other than a plain file
/// (an archive member); `context` names the origin for error messages.
pub(crate) fn parse_json<T: DeserializeOwned>(bytes: &[u8], context: &Path) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| {
        exn::Exn::from(ErrorKind::Json { context: context.to_path_buf(), reason: e.to_string() })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enabled_defaults_to_true() {
        let descriptor: BackgroundDescriptor = parse_json(
            br#"{"version": 2, "title": "t", "subtitle": "s", "author": "a"}"#,
            Path::new("background.json"),
        )
        .unwrap();
        assert!(descriptor.enabled);
    }

    #[test]
    fn engine_skin_name_locale_override() {
        let descriptor: EngineDescriptor = parse_json(
            br#"{
                "title": "Engine", "subtitle": "s", "author": "a",
                "skin_name": "default-skin",
                "skin_name_locale": {"ja": "jp-skin"},
                "effect_name": "fx", "particle_name": "px", "background_name": "bg"
            }"#,
            Path::new("engine.json"),
        )
        .unwrap();
        assert_eq!(descriptor.skin_name_for("ja"), "jp-skin");
        assert_eq!(descriptor.skin_name_for("en"), "default-skin");
        assert_eq!(descriptor.engine_sort_order, None);
        assert!(!descriptor.can_be_ranked);
    }

    #[test]
    fn malformed_json_names_its_origin() {
        let err = parse_json::<PostDescriptor>(b"{", Path::new("files/posts/news/post.json")).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Json { .. }));
        assert!(err.to_string().contains("post.json"));
    }
}
