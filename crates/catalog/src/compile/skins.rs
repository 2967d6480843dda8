//! Skin package compiler.
//!
//! Skins carry selection metadata (theme, engine compatibility, locale tag)
//! that never hits the wire but drives the cross-reference resolver.

use crate::compile::{walk_instances, Context, Kind};
use crate::descriptor::{self, SkinDescriptor};
use crate::error::Result;
use crate::models::{SkinItem, SkinRecord};
use std::path::Path;

pub(crate) fn compile(ctx: &Context) -> Result<Vec<SkinRecord>> {
    let mut records = Vec::new();
    for (name, dir) in walk_instances(&ctx.kind_dir(Kind::Skin))? {
        if let Some(record) = ctx.admit(Kind::Skin, &name, compile_one(ctx, &name, &dir))?.flatten() {
            records.push(record);
        }
    }
    tracing::info!(count = records.len(), "compiled skin list");
    Ok(records)
}

fn compile_one(ctx: &Context, name: &str, dir: &Path) -> Result<Option<SkinRecord>> {
    let descriptor: SkinDescriptor = descriptor::read_json(&dir.join(Kind::Skin.descriptor_name()))?;
    if !descriptor.enabled {
        tracing::debug!(name, "skin disabled; excluded");
        return Ok(None);
    }
    let item = SkinItem {
        name: name.to_string(),
        source: ctx.source.clone(),
        version: SkinItem::VERSION,
        title: descriptor.title,
        subtitle: descriptor.subtitle,
        author: descriptor.author,
        tags: Vec::new(),
        thumbnail: ctx.required_asset(Kind::Skin, name, dir, "thumbnail.png")?,
        data: ctx.required_asset(Kind::Skin, name, dir, "data")?,
        texture: ctx.required_asset(Kind::Skin, name, dir, "texture")?,
    };
    Ok(Some(SkinRecord {
        item,
        engines: descriptor.engines,
        theme: descriptor.theme,
        locale: descriptor.locale,
    }))
}
