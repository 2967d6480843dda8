//! Configuration loading and validation.
//!
//! Configuration is merged from three layers, later layers overriding
//! earlier ones: built-in defaults, an optional YAML file, and
//! `FERMATA_*` environment variables (`FERMATA_COMPILE__WORKERS=4`).

pub mod error;

use crate::error::{ErrorKind, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "fermata.yml";

/// What a compiler does when one resource instance is broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log a warning and leave the instance out of the compiled list.
    Skip,
    /// Abort the whole kind's compilation with a configuration error.
    Abort,
}

/// Per-kind failure policy.
///
/// The historical behavior is preserved by the defaults: most kinds skip
/// broken instances quietly, while engines abort loudly because a dangling
/// engine cross-reference means the server's content is internally
/// inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub backgrounds: FailurePolicy,
    pub effects: FailurePolicy,
    pub particles: FailurePolicy,
    pub skins: FailurePolicy,
    pub posts: FailurePolicy,
    pub playlists: FailurePolicy,
    pub levels: FailurePolicy,
    pub engines: FailurePolicy,
}
impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            backgrounds: FailurePolicy::Skip,
            effects: FailurePolicy::Skip,
            particles: FailurePolicy::Skip,
            skins: FailurePolicy::Skip,
            posts: FailurePolicy::Skip,
            playlists: FailurePolicy::Skip,
            levels: FailurePolicy::Skip,
            engines: FailurePolicy::Abort,
        }
    }
}

/// Where content lives on disk and how assets are addressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Root directory holding `files/<kind>/<instance>/` packages.
    pub root: PathBuf,
    /// Root directory holding `levels/<engine>/<level>.zip` archives.
    pub levels_root: PathBuf,
    /// URL prefix repository assets are served under (no trailing slash).
    pub repository_prefix: String,
}
impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("files"),
            levels_root: PathBuf::from("levels"),
            repository_prefix: "/sonolus/repository".to_string(),
        }
    }
}

/// Compilation behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileConfig {
    /// Size of the blocking worker pool compilation is dispatched to.
    pub workers: usize,
    /// Locale used when a request's locale has no message table.
    pub default_locale: String,
    pub policy: PolicyConfig,
}
impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            workers: 16,
            default_locale: "en".to_string(),
            policy: PolicyConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub content: ContentConfig,
    pub compile: CompileConfig,
}

impl Config {
    /// Load configuration from defaults, an optional YAML file, and the
    /// environment.
    ///
    /// A missing file is fine (defaults + environment apply); a file that
    /// exists but fails to parse is an error.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let file = file.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));
        let config: Config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Yaml::file(file))
            .merge(Env::prefixed("FERMATA_").split("__"))
            .extract()
            .map_err(|e| exn::Exn::from(ErrorKind::Parse(e.to_string())))?;
        config.validate()?;
        tracing::debug!(root = %config.content.root.display(), workers = config.compile.workers, "configuration loaded");
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.compile.workers == 0 {
            exn::bail!(ErrorKind::Invalid("compile.workers must be at least 1"));
        }
        if self.content.repository_prefix.ends_with('/') {
            exn::bail!(ErrorKind::Invalid("content.repository_prefix must not end with a slash"));
        }
        if self.compile.default_locale.is_empty() {
            exn::bail!(ErrorKind::Invalid("compile.default_locale must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.compile.workers, 16);
        assert_eq!(config.compile.policy.engines, FailurePolicy::Abort);
        assert_eq!(config.compile.policy.levels, FailurePolicy::Skip);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(&dir.path().join("absent.yml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn yaml_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fermata.yml");
        fs::write(
            &path,
            "content:\n  repository_prefix: /assets\ncompile:\n  workers: 4\n  policy:\n    levels: abort\n",
        )
        .unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.content.repository_prefix, "/assets");
        assert_eq!(config.compile.workers, 4);
        assert_eq!(config.compile.policy.levels, FailurePolicy::Abort);
        // Unspecified values keep their defaults.
        assert_eq!(config.content.root, PathBuf::from("files"));
        assert_eq!(config.compile.policy.engines, FailurePolicy::Abort);
    }

    #[test]
    fn zero_workers_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fermata.yml");
        fs::write(&path, "compile:\n  workers: 0\n").unwrap();
        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Invalid(_)));
    }

    #[test]
    fn trailing_slash_prefix_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fermata.yml");
        fs::write(&path, "content:\n  repository_prefix: /assets/\n").unwrap();
        assert!(Config::load(Some(&path)).is_err());
    }
}
