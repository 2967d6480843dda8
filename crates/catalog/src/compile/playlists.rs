//! Playlist package compiler.
//!
//! Playlist strings may contain `#YOU`/`#UPLOADED`/`#UPLOADEDSUB` template
//! tokens, so the compiled list is locale-dependent. Static playlist
//! packages compile with an empty level list; the request layer fills it.

use crate::compile::{walk_instances, Context, Kind};
use crate::descriptor::{self, PlaylistDescriptor};
use crate::error::Result;
use crate::locale::Messages;
use crate::models::PlaylistItem;
use std::path::Path;

pub(crate) fn compile(ctx: &Context, messages: &Messages) -> Result<Vec<PlaylistItem>> {
    let mut items = Vec::new();
    for (name, dir) in walk_instances(&ctx.kind_dir(Kind::Playlist))? {
        if let Some(item) = ctx.admit(Kind::Playlist, &name, compile_one(ctx, messages, &name, &dir))?.flatten() {
            items.push(item);
        }
    }
    tracing::info!(count = items.len(), locale = messages.locale, "compiled playlist list");
    Ok(items)
}

fn compile_one(ctx: &Context, messages: &Messages, name: &str, dir: &Path) -> Result<Option<PlaylistItem>> {
    let descriptor: PlaylistDescriptor = descriptor::read_json(&dir.join(Kind::Playlist.descriptor_name()))?;
    if !descriptor.enabled {
        tracing::debug!(name, "playlist disabled; excluded");
        return Ok(None);
    }
    Ok(Some(PlaylistItem {
        name: name.to_string(),
        source: ctx.source.clone(),
        version: PlaylistItem::VERSION,
        title: messages.fill_playlist(&descriptor.title),
        subtitle: messages.fill_playlist(&descriptor.subtitle),
        author: messages.fill_playlist(&descriptor.author),
        tags: Vec::new(),
        levels: Vec::new(),
        thumbnail: ctx.optional_asset(dir, "thumbnail.png")?,
    }))
}
