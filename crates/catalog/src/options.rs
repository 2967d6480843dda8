//! Engine option validation for ranked replays.
//!
//! A rankable engine's gzipped `EngineConfiguration` declares its options;
//! each becomes a validation rule. Options the engine lists as unrankable
//! must stay pinned to their default for a replay to count. A submitted
//! replay configuration (also gzipped JSON) carries option values
//! positionally, in the same order the engine declared them.

use crate::error::{ErrorKind, Result};
use flate2::read::GzDecoder;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// One option declaration inside an `EngineConfiguration`.
#[derive(Debug, Clone, Deserialize)]
struct OptionDescriptor {
    name: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(rename = "def", default)]
    default: Option<f64>,
    #[serde(default)]
    min: Option<f64>,
    #[serde(default)]
    max: Option<f64>,
    #[serde(default)]
    values: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
struct EngineConfiguration {
    options: Vec<OptionDescriptor>,
}

#[derive(Debug, Clone, Deserialize)]
struct ReplayConfiguration {
    options: Vec<f64>,
}

/// Extra data lifted out of a validated replay configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReplayInfo {
    /// Playback speed, if the engine exposes a `#SPEED` option.
    pub speed: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Rule {
    /// Unrankable option: the value must equal the declared default.
    Pinned(f64),
    Slider { min: f64, max: f64 },
    Toggle,
    Select { count: usize },
}

impl Rule {
    fn accepts(self, value: f64) -> bool {
        match self {
            Self::Pinned(default) => value == default,
            Self::Slider { min, max } => value >= min && value <= max,
            Self::Toggle => value == 0.0 || value == 1.0,
            Self::Select { count } => value >= 0.0 && value <= (count.saturating_sub(1)) as f64,
        }
    }
}

/// Ordered per-option validation rules for one engine.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionValidators {
    rules: Vec<(String, Rule)>,
}

impl OptionValidators {
    /// Build rules from a gzipped `EngineConfiguration` blob.
    ///
    /// `unrankable` is the engine descriptor's list of option names whose
    /// value must stay pinned; `context` names the blob's origin for error
    /// messages.
    pub fn from_gzip(compressed: &[u8], unrankable: &[String], context: &Path) -> Result<Self> {
        let configuration: EngineConfiguration = read_gzipped_json(compressed, context)?;
        let mut rules = Vec::with_capacity(configuration.options.len());
        for option in configuration.options {
            let rule = if unrankable.contains(&option.name) {
                Rule::Pinned(option.default.unwrap_or(0.0))
            } else {
                match option.kind.as_str() {
                    "slider" => Rule::Slider {
                        min: option.min.unwrap_or(f64::NEG_INFINITY),
                        max: option.max.unwrap_or(f64::INFINITY),
                    },
                    "toggle" => Rule::Toggle,
                    "select" => Rule::Select {
                        count: option.values.as_ref().map_or(0, Vec::len),
                    },
                    other => {
                        exn::bail!(ErrorKind::Json {
                            context: context.to_path_buf(),
                            reason: format!("unknown option type `{other}` on `{}`", option.name),
                        });
                    },
                }
            };
            rules.push((option.name, rule));
        }
        Ok(Self { rules })
    }

    /// Validate a gzipped replay configuration against these rules.
    ///
    /// Values are matched to rules positionally; extra trailing values are
    /// ignored, matching the submission format's forward-compatibility.
    pub fn validate_replay(&self, compressed: &[u8], context: &Path) -> Result<ReplayInfo> {
        let replay: ReplayConfiguration = read_gzipped_json(compressed, context)?;
        let mut info = ReplayInfo::default();
        for ((name, rule), value) in self.rules.iter().zip(replay.options) {
            if !rule.accepts(value) {
                tracing::warn!(option = name.as_str(), value, "replay option failed validation");
                exn::bail!(ErrorKind::InvalidOption { option: name.clone() });
            }
            if name == "#SPEED" {
                info.speed = Some(value);
            }
        }
        Ok(info)
    }
}

fn read_gzipped_json<T: serde::de::DeserializeOwned>(compressed: &[u8], context: &Path) -> Result<T> {
    let mut decoder = GzDecoder::new(compressed);
    let mut bytes = Vec::new();
    decoder.read_to_end(&mut bytes).map_err(ErrorKind::Io)?;
    crate::descriptor::parse_json(&bytes, context)
}
