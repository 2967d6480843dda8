//! Particle package compiler.

use crate::compile::{walk_instances, Context, Kind};
use crate::descriptor::{self, ParticleDescriptor};
use crate::error::Result;
use crate::models::{ParticleItem, ParticleRecord};
use std::path::Path;

pub(crate) fn compile(ctx: &Context) -> Result<Vec<ParticleRecord>> {
    let mut records = Vec::new();
    for (name, dir) in walk_instances(&ctx.kind_dir(Kind::Particle))? {
        if let Some(record) = ctx.admit(Kind::Particle, &name, compile_one(ctx, &name, &dir))?.flatten() {
            records.push(record);
        }
    }
    tracing::info!(count = records.len(), "compiled particle list");
    Ok(records)
}

fn compile_one(ctx: &Context, name: &str, dir: &Path) -> Result<Option<ParticleRecord>> {
    let descriptor: ParticleDescriptor = descriptor::read_json(&dir.join(Kind::Particle.descriptor_name()))?;
    if !descriptor.enabled {
        tracing::debug!(name, "particle disabled; excluded");
        return Ok(None);
    }
    let item = ParticleItem {
        name: name.to_string(),
        source: ctx.source.clone(),
        version: ParticleItem::VERSION,
        title: descriptor.title,
        subtitle: descriptor.subtitle,
        author: descriptor.author,
        tags: Vec::new(),
        thumbnail: ctx.required_asset(Kind::Particle, name, dir, "thumbnail.png")?,
        data: ctx.required_asset(Kind::Particle, name, dir, "data")?,
        texture: ctx.required_asset(Kind::Particle, name, dir, "texture")?,
    };
    Ok(Some(ParticleRecord { item, engine_specific: descriptor.engine_specific }))
}
