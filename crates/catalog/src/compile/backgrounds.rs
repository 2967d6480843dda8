//! Background package compiler.
//!
//! Background titles may contain `#BACKGROUNDSELECT`/`#BACKGROUNDSELECTSUB`
//! template tokens, so the compiled list is locale-dependent.

use crate::compile::{walk_instances, Context, Kind};
use crate::descriptor::{self, BackgroundDescriptor};
use crate::error::Result;
use crate::locale::Messages;
use crate::models::BackgroundItem;
use std::path::Path;

pub(crate) fn compile(ctx: &Context, messages: &Messages) -> Result<Vec<BackgroundItem>> {
    let mut items = Vec::new();
    for (name, dir) in walk_instances(&ctx.kind_dir(Kind::Background))? {
        if let Some(item) = ctx.admit(Kind::Background, &name, compile_one(ctx, messages, &name, &dir))?.flatten() {
            items.push(item);
        }
    }
    tracing::info!(count = items.len(), locale = messages.locale, "compiled background list");
    Ok(items)
}

fn compile_one(ctx: &Context, messages: &Messages, name: &str, dir: &Path) -> Result<Option<BackgroundItem>> {
    let descriptor: BackgroundDescriptor = descriptor::read_json(&dir.join(Kind::Background.descriptor_name()))?;
    if !descriptor.enabled {
        tracing::debug!(name, "background disabled; excluded");
        return Ok(None);
    }
    Ok(Some(BackgroundItem {
        name: name.to_string(),
        source: ctx.source.clone(),
        version: BackgroundItem::VERSION,
        title: messages.fill_background(&descriptor.title),
        subtitle: messages.fill_background(&descriptor.subtitle),
        author: messages.fill_background(&descriptor.author),
        tags: Vec::new(),
        thumbnail: ctx.required_asset(Kind::Background, name, dir, "thumbnail.png")?,
        data: ctx.required_asset(Kind::Background, name, dir, "data")?,
        image: ctx.required_asset(Kind::Background, name, dir, "image.png")?,
        configuration: ctx.required_asset(Kind::Background, name, dir, "configuration.json.gz")?,
    }))
}
