//! Static post (announcement) compiler.

use crate::compile::{walk_instances, Context, Kind};
use crate::descriptor::{self, PostDescriptor};
use crate::error::Result;
use crate::models::PostItem;
use std::path::Path;

pub(crate) fn compile(ctx: &Context) -> Result<Vec<PostItem>> {
    let mut items = Vec::new();
    for (name, dir) in walk_instances(&ctx.kind_dir(Kind::Post))? {
        if let Some(item) = ctx.admit(Kind::Post, &name, compile_one(ctx, &name, &dir))?.flatten() {
            items.push(item);
        }
    }
    tracing::info!(count = items.len(), "compiled post list");
    Ok(items)
}

fn compile_one(ctx: &Context, name: &str, dir: &Path) -> Result<Option<PostItem>> {
    let descriptor: PostDescriptor = descriptor::read_json(&dir.join(Kind::Post.descriptor_name()))?;
    if !descriptor.enabled {
        tracing::debug!(name, "post disabled; excluded");
        return Ok(None);
    }
    Ok(Some(PostItem {
        name: name.to_string(),
        source: ctx.source.clone(),
        version: PostItem::VERSION,
        title: descriptor.title,
        time: descriptor.time,
        author: descriptor.author,
        tags: Vec::new(),
        thumbnail: ctx.optional_asset(dir, "thumbnail.png")?,
    }))
}

/// Most recent first. Ties keep their compiled (name) order.
pub fn sort_by_newest(posts: &mut [PostItem]) {
    posts.sort_by_key(|post| std::cmp::Reverse(post.time));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::testutil;
    use fermata_config::FailurePolicy;

    fn descriptor(time: i64) -> String {
        format!(r#"{{"version": 1, "title": "t", "time": {time}, "author": "a"}}"#)
    }

    #[test]
    fn thumbnail_is_optional() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = testutil::context(dir.path(), FailurePolicy::Skip);
        testutil::write_instance(dir.path(), Kind::Post, "bare", &descriptor(1), &[]);
        testutil::write_instance(dir.path(), Kind::Post, "rich", &descriptor(2), &["thumbnail.png"]);
        let items = compile(&ctx).unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.iter().find(|p| p.name == "bare").unwrap().thumbnail.is_none());
        assert!(items.iter().find(|p| p.name == "rich").unwrap().thumbnail.is_some());
    }

    #[test]
    fn sorting_puts_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = testutil::context(dir.path(), FailurePolicy::Skip);
        testutil::write_instance(dir.path(), Kind::Post, "ancient", &descriptor(100), &[]);
        testutil::write_instance(dir.path(), Kind::Post, "fresh", &descriptor(300), &[]);
        testutil::write_instance(dir.path(), Kind::Post, "middle", &descriptor(200), &[]);
        let mut items = compile(&ctx).unwrap();
        sort_by_newest(&mut items);
        let names: Vec<_> = items.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["fresh", "middle", "ancient"]);
    }
}
