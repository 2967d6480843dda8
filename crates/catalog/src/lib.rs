//! Compiled-content pipeline: descriptors in, protocol-shaped items out.
//!
//! The [`Catalog`] facade ties the pieces together: per-kind compilers walk
//! resource packages under the content root, register every asset with the
//! shared content-addressed repository, resolve cross-references (an
//! engine's skin/effect/particle/background, a request's themed skin), and
//! memoize the resulting lists per kind and locale until invalidated.

mod catalog;
pub(crate) mod compile;
mod descriptor;
pub mod error;
mod levels;
pub mod locale;
mod models;
mod options;
mod resolve;

pub use self::catalog::Catalog;
pub use self::compile::posts::sort_by_newest as sort_posts_by_newest;
pub use self::compile::Kind;
pub use self::error::{Error, ErrorKind, Result};
pub use self::models::{
    BackgroundItem, EffectItem, EngineItem, LevelItem, ParticleItem, ParticleRecord, PlaylistItem, PostItem,
    SkinItem, SkinRecord, Tag, UseItem,
};
pub use self::options::{OptionValidators, ReplayInfo};
pub use self::resolve::select_skin;
