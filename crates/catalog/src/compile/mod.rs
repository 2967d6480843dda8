//! Per-kind resource compilers.
//!
//! Each compiler walks its kind's directory under the content root, reads
//! descriptors, registers asset files with the repository, and produces the
//! compiled item list. Dispatch is enum-keyed on [`Kind`] so every call
//! site is exhaustiveness-checked; there is no string-matched kind anywhere.

pub(crate) mod backgrounds;
pub(crate) mod banner;
pub(crate) mod effects;
pub(crate) mod engines;
pub(crate) mod particles;
pub(crate) mod playlists;
pub(crate) mod posts;
pub(crate) mod skins;

use crate::error::{ErrorKind, Result};
use derive_more::Display;
use exn::{OptionExt, ResultExt};
use fermata_config::FailurePolicy;
use fermata_repository::{AssetReference, RepositoryHandle};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A resource category.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    #[display("background")]
    Background,
    #[display("effect")]
    Effect,
    #[display("particle")]
    Particle,
    #[display("skin")]
    Skin,
    #[display("engine")]
    Engine,
    #[display("post")]
    Post,
    #[display("playlist")]
    Playlist,
    #[display("level")]
    Level,
    #[display("banner")]
    Banner,
}

impl Kind {
    /// Directory under the content root holding this kind's packages.
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Background => "backgrounds",
            Self::Effect => "effects",
            Self::Particle => "particles",
            Self::Skin => "skins",
            Self::Engine => "engines",
            Self::Post => "posts",
            Self::Playlist => "playlists",
            Self::Level => "levels",
            Self::Banner => "banner",
        }
    }

    /// Descriptor file name inside each instance directory.
    pub fn descriptor_name(self) -> &'static str {
        match self {
            Self::Background => "background.json",
            Self::Effect => "effect.json",
            Self::Particle => "particle.json",
            Self::Skin => "skin.json",
            Self::Engine => "engine.json",
            Self::Post => "post.json",
            Self::Playlist => "playlist.json",
            Self::Level => "level.json",
            Self::Banner => "banner.json",
        }
    }

    /// Whether compiled output differs by locale (template tokens or
    /// locale-dependent cross-references).
    pub fn is_localized(self) -> bool {
        matches!(self, Self::Background | Self::Playlist | Self::Engine | Self::Level)
    }
}

/// Everything a compiler needs, owned so compilation can run on a blocking
/// worker.
#[derive(Clone)]
pub(crate) struct Context {
    pub repo: RepositoryHandle,
    /// Content root holding `files/<kind>/...` package directories.
    pub root: PathBuf,
    pub policy: FailurePolicy,
    /// Server base URL stamped onto items as their `source`.
    pub source: Option<String>,
}

impl Context {
    pub fn kind_dir(&self, kind: Kind) -> PathBuf {
        self.root.join(kind.dir_name())
    }

    /// Register a required asset file and resolve its reference. A missing
    /// file is a broken package.
    pub fn required_asset(&self, kind: Kind, name: &str, dir: &Path, file: &str) -> Result<AssetReference> {
        let digest = self
            .repo
            .add_file(dir.join(file), true)
            .or_raise(|| ErrorKind::Package {
                kind,
                name: name.to_string(),
                reason: format!("required asset `{file}` is missing or unreadable"),
            })?
            .ok_or_raise(|| ErrorKind::Repository)?;
        self.repo.resolve(&digest).ok_or_raise(|| ErrorKind::Repository)
    }

    /// Register an optional asset file; `None` (field omitted) if absent.
    pub fn optional_asset(&self, dir: &Path, file: &str) -> Result<Option<AssetReference>> {
        let digest = self.repo.add_file(dir.join(file), false).or_raise(|| ErrorKind::Repository)?;
        Ok(digest.and_then(|digest| self.repo.resolve(&digest)))
    }

    /// Apply the failure policy to one instance's compilation result.
    ///
    /// Under a lenient policy a broken instance becomes `None` (logged and
    /// left out of the list); configuration errors and strict policies
    /// propagate.
    pub fn admit<T>(&self, kind: Kind, name: &str, result: Result<T>) -> Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(err) if self.policy == FailurePolicy::Skip && !err.is_configuration() => {
                tracing::warn!(kind = %kind, name, error = %err, "skipping broken resource instance");
                Ok(None)
            },
            Err(err) => Err(err),
        }
    }
}

/// Enumerate instance directories under a kind's root, in lexicographic
/// name order so compiled lists are deterministic across platforms.
///
/// A missing kind directory yields an empty list, consistent with "no
/// content shipped for this kind".
pub(crate) fn walk_instances(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(dir = %dir.display(), "kind directory absent; compiling empty list");
            return Ok(Vec::new());
        },
        Err(err) => return Err(exn::Exn::from(ErrorKind::Io(err))),
    };
    let mut instances = Vec::new();
    for entry in entries {
        let entry = entry.map_err(ErrorKind::Io)?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        instances.push((name.to_string(), path.clone()));
    }
    instances.sort_by(|(a, _), (b, _)| a.cmp(b));
    Ok(instances)
}
