//! Where asset bytes live.
//!
//! The original server overloaded "path" to mean either a real filesystem
//! path or an `archive|member` convention string. Here that distinction is
//! a proper enum so the read/hash dispatch is exhaustive and type-checked,
//! and callers can't forget the archive case.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// A readable source of asset bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetSource {
    /// A file on the local filesystem.
    PlainFile(PathBuf),
    /// A named member inside a zip archive on the local filesystem.
    ArchiveMember { archive: PathBuf, member: String },
    /// An in-memory buffer. Not re-addressable: once registered its content
    /// is assumed immutable for the entry's lifetime.
    Memory(Vec<u8>),
}

impl AssetSource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::PlainFile(path.into())
    }

    pub fn archive_member(archive: impl Into<PathBuf>, member: impl Into<String>) -> Self {
        Self::ArchiveMember { archive: archive.into(), member: member.into() }
    }

    /// Stable identity used for update semantics: re-registering the same
    /// location with changed content replaces the old entry.
    ///
    /// `None` for in-memory buffers — they have no location to come back to.
    /// Archive members use the composite form `"{archive}|{member}"` with
    /// the archive path resolved to an absolute path where possible.
    pub fn identity(&self) -> Option<String> {
        match self {
            Self::PlainFile(path) => Some(resolved(path).display().to_string()),
            Self::ArchiveMember { archive, member } => {
                Some(format!("{}|{member}", resolved(archive).display()))
            },
            Self::Memory(_) => None,
        }
    }

    /// Whether the source currently holds readable bytes.
    ///
    /// For archive members this opens the archive and looks the member up by
    /// name; a missing or unreadable archive counts as absent.
    pub fn exists(&self) -> bool {
        match self {
            Self::PlainFile(path) => path.is_file(),
            Self::ArchiveMember { archive, member } => {
                let Ok(file) = fs::File::open(archive) else {
                    return false;
                };
                match ZipArchive::new(file) {
                    Ok(zip) => zip.file_names().any(|name| name == member),
                    Err(_) => false,
                }
            },
            Self::Memory(_) => true,
        }
    }

    /// Read the full byte content of the source.
    pub fn read(&self) -> Result<Vec<u8>> {
        match self {
            Self::PlainFile(path) => Ok(fs::read(path).map_err(|e| map_io_error(e, path))?),
            Self::ArchiveMember { archive, member } => read_member(archive, member),
            Self::Memory(buffer) => Ok(buffer.clone()),
        }
    }
}

fn resolved(path: &Path) -> PathBuf {
    // Canonicalization needs the file to exist; fall back to joining onto
    // the current directory so identities stay comparable for paths that
    // were deleted between registrations.
    path.canonicalize().unwrap_or_else(|_| match path.is_absolute() {
        true => path.to_path_buf(),
        false => std::env::current_dir().unwrap_or_default().join(path),
    })
}

fn map_io_error(e: std::io::Error, path: &Path) -> ErrorKind {
    match e.kind() {
        std::io::ErrorKind::NotFound => ErrorKind::NotFound(path.to_path_buf()),
        std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied(path.to_path_buf()),
        _ => ErrorKind::Io(e),
    }
}

fn read_member(archive: &Path, member: &str) -> Result<Vec<u8>> {
    let file = fs::File::open(archive).map_err(|e| map_io_error(e, archive))?;
    let mut zip = ZipArchive::new(file).or_raise(|| ErrorKind::Archive(archive.display().to_string()))?;
    let mut entry = match zip.by_name(member) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => exn::bail!(ErrorKind::MemberNotFound {
            archive: archive.to_path_buf(),
            member: member.to_string(),
        }),
        Err(e) => exn::bail!(ErrorKind::Archive(e.to_string())),
    };
    let mut buffer = Vec::with_capacity(entry.size() as usize);
    entry.read_to_end(&mut buffer).map_err(ErrorKind::Io)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn write_archive(dir: &Path, members: &[(&str, &[u8])]) -> PathBuf {
        let path = dir.join("bundle.zip");
        let file = fs::File::create(&path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        for (name, bytes) in members {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(bytes).unwrap();
        }
        writer.finish().unwrap();
        path
    }

    #[test]
    fn plain_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        fs::write(&path, b"content").unwrap();
        let source = AssetSource::file(&path);
        assert!(source.exists());
        assert_eq!(source.read().unwrap(), b"content");
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let source = AssetSource::file(dir.path().join("nope.bin"));
        assert!(!source.exists());
        let err = source.read().unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }

    #[test]
    fn archive_member_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let archive = write_archive(dir.path(), &[("level.json", b"{}"), ("level.data", b"\x1f\x8b")]);
        let source = AssetSource::archive_member(&archive, "level.data");
        assert!(source.exists());
        assert_eq!(source.read().unwrap(), b"\x1f\x8b");
    }

    #[test]
    fn missing_member_is_member_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let archive = write_archive(dir.path(), &[("level.json", b"{}")]);
        let source = AssetSource::archive_member(&archive, "music.mp3");
        assert!(!source.exists());
        let err = source.read().unwrap_err();
        assert!(matches!(&*err, ErrorKind::MemberNotFound { .. }));
    }

    #[test]
    fn identity_distinguishes_members_of_one_archive() {
        let dir = tempfile::tempdir().unwrap();
        let archive = write_archive(dir.path(), &[("a", b"1"), ("b", b"2")]);
        let a = AssetSource::archive_member(&archive, "a").identity().unwrap();
        let b = AssetSource::archive_member(&archive, "b").identity().unwrap();
        assert_ne!(a, b);
        assert!(a.ends_with("|a"));
    }

    #[test]
    fn memory_has_no_identity() {
        assert_eq!(AssetSource::Memory(vec![1, 2, 3]).identity(), None);
    }

    #[test]
    fn identity_is_stable_across_relative_and_absolute_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        fs::write(&path, b"content").unwrap();
        let absolute = AssetSource::file(&path).identity().unwrap();
        let roundabout = AssetSource::file(dir.path().join(".").join("data.bin")).identity().unwrap();
        assert_eq!(absolute, roundabout);
    }
}
