//! Engine package compiler.
//!
//! Engines cross-reference a skin, effect, particle, and background by
//! name, and embed the full compiled record for each. The dependency lists
//! are compiled first and handed in, so this compiler never compiles other
//! kinds itself. A reference that matches nothing in its list is a server
//! configuration mistake and aborts the whole kind regardless of policy.

use crate::compile::{walk_instances, Context, Kind};
use crate::descriptor::{self, EngineDescriptor};
use crate::error::{ErrorKind, Result};
use crate::models::{BackgroundItem, EffectItem, EngineItem, ParticleRecord, SkinRecord};
use exn::OptionExt;
use std::path::Path;

/// Pre-compiled lists the engine compiler resolves names against.
pub(crate) struct Dependencies<'a> {
    pub skins: &'a [SkinRecord],
    pub effects: &'a [EffectItem],
    pub particles: &'a [ParticleRecord],
    pub backgrounds: &'a [BackgroundItem],
}

pub(crate) fn compile(ctx: &Context, locale: &str, deps: &Dependencies<'_>) -> Result<Vec<EngineItem>> {
    let mut keyed: Vec<(Option<i64>, EngineItem)> = Vec::new();
    for (name, dir) in walk_instances(&ctx.kind_dir(Kind::Engine))? {
        if let Some(entry) = ctx.admit(Kind::Engine, &name, compile_one(ctx, locale, deps, &name, &dir))?.flatten() {
            keyed.push(entry);
        }
    }
    // Explicit sort order ascending, unordered engines after all ordered
    // ones, ties broken by case-insensitive title.
    keyed.sort_by_key(|(order, item)| (order.unwrap_or(i64::MAX), item.title.to_lowercase()));
    tracing::info!(count = keyed.len(), locale, "compiled engine list");
    Ok(keyed.into_iter().map(|(_, item)| item).collect())
}

fn compile_one(
    ctx: &Context,
    locale: &str,
    deps: &Dependencies<'_>,
    name: &str,
    dir: &Path,
) -> Result<Option<(Option<i64>, EngineItem)>> {
    let descriptor: EngineDescriptor = descriptor::read_json(&dir.join(Kind::Engine.descriptor_name()))?;
    if !descriptor.enabled {
        tracing::debug!(name, "engine disabled; excluded");
        return Ok(None);
    }

    let skin_name = descriptor.skin_name_for(locale);
    let skin = deps
        .skins
        .iter()
        .find(|record| record.item.name == skin_name)
        .ok_or_raise(|| dangling(name, Kind::Skin, skin_name))?
        .item
        .clone();
    let effect = deps
        .effects
        .iter()
        .find(|item| item.name == descriptor.effect_name)
        .ok_or_raise(|| dangling(name, Kind::Effect, &descriptor.effect_name))?
        .clone();
    let particle = deps
        .particles
        .iter()
        .find(|record| record.item.name == descriptor.particle_name)
        .ok_or_raise(|| dangling(name, Kind::Particle, &descriptor.particle_name))?
        .item
        .clone();
    let background = deps
        .backgrounds
        .iter()
        .find(|item| item.name == descriptor.background_name)
        .ok_or_raise(|| dangling(name, Kind::Background, &descriptor.background_name))?
        .clone();

    let item = EngineItem {
        name: name.to_string(),
        version: EngineItem::VERSION,
        title: descriptor.title,
        subtitle: descriptor.subtitle,
        source: ctx.source.clone(),
        author: descriptor.author,
        tags: Vec::new(),
        description: descriptor.description,
        skin,
        background,
        effect,
        particle,
        thumbnail: ctx.required_asset(Kind::Engine, name, dir, "thumbnail.png")?,
        play_data: ctx.required_asset(Kind::Engine, name, dir, "EnginePlayData")?,
        watch_data: ctx.required_asset(Kind::Engine, name, dir, "EngineWatchData")?,
        preview_data: ctx.required_asset(Kind::Engine, name, dir, "EnginePreviewData")?,
        tutorial_data: ctx.required_asset(Kind::Engine, name, dir, "EngineTutorialData")?,
        rom: ctx.optional_asset(dir, "EngineRom")?,
        configuration: ctx.required_asset(Kind::Engine, name, dir, "EngineConfiguration")?,
    };
    Ok(Some((descriptor.engine_sort_order, item)))
}

fn dangling(engine: &str, kind: Kind, reference: &str) -> ErrorKind {
    ErrorKind::DanglingReference {
        engine: engine.to_string(),
        kind,
        reference: reference.to_string(),
    }
}
