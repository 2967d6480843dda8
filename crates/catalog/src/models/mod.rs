//! Compiled-item records, ready to serialize into the protocol's JSON
//! shape.
//!
//! Each kind carries a fixed `version` literal the client uses to pick a
//! parser; the constants live on the item types and compilers stamp them in.
//! Optional asset fields are omitted from the serialized output entirely
//! when absent, matching the wire format.

mod background;
mod effect;
mod engine;
mod level;
mod particle;
mod playlist;
mod post;
mod skin;
mod tag;

pub use self::background::BackgroundItem;
pub use self::effect::EffectItem;
pub use self::engine::EngineItem;
pub use self::level::{LevelItem, UseItem};
pub use self::particle::{ParticleItem, ParticleRecord};
pub use self::playlist::PlaylistItem;
pub use self::post::PostItem;
pub use self::skin::{SkinItem, SkinRecord};
pub use self::tag::Tag;
