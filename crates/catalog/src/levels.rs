//! Archive-packaged level compiler.
//!
//! Levels ship as `.zip` archives grouped under per-engine directories:
//! `levels/<engine>/<level>.zip`. Every asset registration goes through
//! [`AssetSource::ArchiveMember`] so nothing is extracted to disk.
//!
//! A `stage.png` member turns into a level-specific background variant. Its
//! thumbnail (`stage_thumbnail.png`) is derived on first compile and written
//! back into the archive; once present it is reused as-is, so recompiling
//! never rewrites the archive.

use crate::compile::{walk_instances, Context, Kind};
use crate::descriptor::{self, LevelDescriptor};
use crate::error::{ErrorKind, Result};
use crate::models::{BackgroundItem, EngineItem, LevelItem, UseItem};
use exn::ResultExt;
use fermata_repository::{AssetReference, AssetSource};
use image::ImageFormat;
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;

const STAGE_MEMBER: &str = "stage.png";
const STAGE_THUMBNAIL_MEMBER: &str = "stage_thumbnail.png";
/// Side length of the derived square stage thumbnail.
const THUMBNAIL_SIDE: u32 = 512;

pub(crate) fn compile(ctx: &Context, levels_root: &Path, engines: &[EngineItem]) -> Result<Vec<LevelItem>> {
    let mut items = Vec::new();
    for (engine_name, dir) in walk_instances(levels_root)? {
        let Some(engine) = engines.iter().find(|engine| engine.name == engine_name) else {
            tracing::warn!(engine = engine_name, "level directory names no compiled engine; skipping");
            continue;
        };
        for archive in zip_archives(&dir)? {
            let Some(name) = archive.file_stem().and_then(|stem| stem.to_str()).map(str::to_string) else {
                continue;
            };
            if let Some(item) = ctx.admit(Kind::Level, &name, compile_one(ctx, engine, &archive, &name))?.flatten() {
                items.push(item);
            }
        }
    }
    tracing::info!(count = items.len(), "compiled level list");
    Ok(items)
}

fn compile_one(ctx: &Context, engine: &EngineItem, archive: &Path, name: &str) -> Result<Option<LevelItem>> {
    let metadata = AssetSource::archive_member(archive, "level.json")
        .read()
        .or_raise(|| broken(name, "missing level.json"))?;
    let descriptor: LevelDescriptor = descriptor::parse_json(&metadata, &archive.join("level.json"))?;
    if !descriptor.enabled {
        tracing::debug!(name, "level disabled; excluded");
        return Ok(None);
    }

    let data = member_asset(ctx, name, archive, "level.data")?;
    let bgm = member_asset(ctx, name, archive, "music.mp3")?;
    let cover = member_asset(ctx, name, archive, "jacket.png")?;
    let preview = optional_member_asset(ctx, archive, "music_pre.mp3")?;

    let use_background = match stage_background(ctx, engine, archive, name, &descriptor.title)? {
        Some(background) => UseItem::custom(background),
        None => UseItem::engine_default(),
    };

    Ok(Some(LevelItem {
        name: name.to_string(),
        source: ctx.source.clone(),
        version: LevelItem::VERSION,
        rating: descriptor.rating,
        title: descriptor.title,
        artists: descriptor.artists,
        author: descriptor.author,
        tags: Vec::new(),
        engine: engine.clone(),
        use_skin: UseItem::engine_default(),
        use_background,
        use_effect: UseItem::engine_default(),
        use_particle: UseItem::engine_default(),
        cover,
        bgm,
        preview,
        data,
    }))
}

/// Build the level-specific background variant from a `stage.png` member,
/// if the archive carries one.
///
/// The variant reuses the parent engine's background `data` and
/// `configuration` and substitutes the level's own image and derived
/// thumbnail.
fn stage_background(
    ctx: &Context,
    engine: &EngineItem,
    archive: &Path,
    name: &str,
    title: &str,
) -> Result<Option<BackgroundItem>> {
    let stage = AssetSource::archive_member(archive, STAGE_MEMBER);
    if !stage.exists() {
        return Ok(None);
    }
    ensure_stage_thumbnail(archive)?;
    let image = member_asset(ctx, name, archive, STAGE_MEMBER)?;
    let thumbnail = member_asset(ctx, name, archive, STAGE_THUMBNAIL_MEMBER)?;
    Ok(Some(BackgroundItem {
        name: format!("{name}-stage"),
        source: ctx.source.clone(),
        version: BackgroundItem::VERSION,
        title: title.to_string(),
        subtitle: engine.background.subtitle.clone(),
        author: engine.background.author.clone(),
        tags: Vec::new(),
        thumbnail,
        data: engine.background.data.clone(),
        image,
        configuration: engine.background.configuration.clone(),
    }))
}

/// Derive and append `stage_thumbnail.png` unless the archive already has
/// one. Derivation is deterministic, so the appended bytes are identical
/// across servers compiling the same archive.
fn ensure_stage_thumbnail(archive: &Path) -> Result<()> {
    if AssetSource::archive_member(archive, STAGE_THUMBNAIL_MEMBER).exists() {
        return Ok(());
    }
    let stage = AssetSource::archive_member(archive, STAGE_MEMBER).read().or_raise(|| ErrorKind::Repository)?;
    let thumbnail = derive_thumbnail(&stage)?;
    tracing::info!(archive = %archive.display(), "appending derived stage thumbnail");
    append_member(archive, STAGE_THUMBNAIL_MEMBER, &thumbnail)
}

/// Centered square crop of the stage image, resized to a fixed side, PNG
/// encoded.
fn derive_thumbnail(stage_png: &[u8]) -> Result<Vec<u8>> {
    let stage = image::load_from_memory_with_format(stage_png, ImageFormat::Png)
        .map_err(|e| ErrorKind::Image(e.to_string()))?;
    let (width, height) = (stage.width(), stage.height());
    let side = width.min(height);
    let cropped = stage.crop_imm((width - side) / 2, (height - side) / 2, side, side);
    let thumbnail = cropped.resize_exact(THUMBNAIL_SIDE, THUMBNAIL_SIDE, image::imageops::FilterType::Lanczos3);
    let mut bytes = Vec::new();
    thumbnail
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| ErrorKind::Image(e.to_string()))?;
    Ok(bytes)
}

fn append_member(archive: &Path, member: &str, bytes: &[u8]) -> Result<()> {
    let file = fs::OpenOptions::new().read(true).write(true).open(archive).map_err(ErrorKind::Io)?;
    let mut writer = zip::ZipWriter::new_append(file).map_err(|e| archive_error(archive, e))?;
    writer
        .start_file(member, SimpleFileOptions::default())
        .map_err(|e| archive_error(archive, e))?;
    writer.write_all(bytes).map_err(ErrorKind::Io)?;
    writer.finish().map_err(|e| archive_error(archive, e))?;
    Ok(())
}

fn archive_error(archive: &Path, err: impl ToString) -> ErrorKind {
    ErrorKind::Archive { archive: archive.to_path_buf(), reason: err.to_string() }
}

fn broken(name: &str, reason: &str) -> ErrorKind {
    ErrorKind::Package {
        kind: Kind::Level,
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

fn member_asset(ctx: &Context, name: &str, archive: &Path, member: &str) -> Result<AssetReference> {
    let digest = ctx
        .repo
        .add_source(AssetSource::archive_member(archive, member), true)
        .or_raise(|| broken(name, &format!("required member `{member}` is missing or unreadable")))?
        .ok_or_else(|| exn::Exn::from(ErrorKind::Repository))?;
    ctx.repo
        .resolve(&digest)
        .ok_or_else(|| exn::Exn::from(ErrorKind::Repository))
}

fn optional_member_asset(ctx: &Context, archive: &Path, member: &str) -> Result<Option<AssetReference>> {
    let digest = ctx
        .repo
        .add_source(AssetSource::archive_member(archive, member), false)
        .or_raise(|| ErrorKind::Repository)?;
    Ok(digest.and_then(|digest| ctx.repo.resolve(&digest)))
}

/// Zip archives directly inside a directory, sorted by file name.
fn zip_archives(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut archives = Vec::new();
    for entry in fs::read_dir(dir).map_err(ErrorKind::Io)? {
        let path = entry.map_err(ErrorKind::Io)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("zip")) {
            archives.push(path);
        }
    }
    archives.sort();
    Ok(archives)
}
