//! Sound-effect package compiler.

use crate::compile::{walk_instances, Context, Kind};
use crate::descriptor::{self, EffectDescriptor};
use crate::error::Result;
use crate::models::EffectItem;
use std::path::Path;

pub(crate) fn compile(ctx: &Context) -> Result<Vec<EffectItem>> {
    let mut items = Vec::new();
    for (name, dir) in walk_instances(&ctx.kind_dir(Kind::Effect))? {
        if let Some(item) = ctx.admit(Kind::Effect, &name, compile_one(ctx, &name, &dir))?.flatten() {
            items.push(item);
        }
    }
    tracing::info!(count = items.len(), "compiled effect list");
    Ok(items)
}

fn compile_one(ctx: &Context, name: &str, dir: &Path) -> Result<Option<EffectItem>> {
    let descriptor: EffectDescriptor = descriptor::read_json(&dir.join(Kind::Effect.descriptor_name()))?;
    if !descriptor.enabled {
        tracing::debug!(name, "effect disabled; excluded");
        return Ok(None);
    }
    Ok(Some(EffectItem {
        name: name.to_string(),
        source: ctx.source.clone(),
        version: EffectItem::VERSION,
        title: descriptor.title,
        subtitle: descriptor.subtitle,
        author: descriptor.author,
        tags: Vec::new(),
        thumbnail: ctx.required_asset(Kind::Effect, name, dir, "thumbnail.png")?,
        data: ctx.required_asset(Kind::Effect, name, dir, "data")?,
        audio: ctx.required_asset(Kind::Effect, name, dir, "audio")?,
    }))
}
