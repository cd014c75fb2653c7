//! Zip archives of directory trees.
//!
//! Entries carry paths relative to the archived root with `/` separators,
//! directories included, in file-name order so repeated runs over the same
//! tree produce the same entry list. Symlinks are resolved but never
//! descended: a linked file is stored with its target's contents, a linked
//! directory as an empty directory entry, and a dangling link is skipped.

use std::fs::{self, File};
use std::io::{self, Seek, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;
use zip::result::ZipError;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const ARCHIVE_EXTENSION: &str = "zip";

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Only accepts zip format. Object key '{key}' must end with .zip")]
    UnsupportedFormat { key: String },
    #[error("source directory '{}' is not accessible: {source}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to create archive '{}': {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write archive '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: ZipError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub files: usize,
    pub directories: usize,
    pub size_bytes: u64,
}

/// Checks that `key` names a zip archive and returns its final path segment.
pub fn validate_archive_key(key: &str) -> Result<&str, ArchiveError> {
    let file_name = key.rsplit('/').next().unwrap_or(key);
    let is_zip = Path::new(file_name)
        .extension()
        .map(|extension| extension == ARCHIVE_EXTENSION)
        .unwrap_or(false);
    if !is_zip {
        return Err(ArchiveError::UnsupportedFormat {
            key: key.to_string(),
        });
    }
    Ok(file_name)
}

/// Writes the whole tree under `source_dir` to a new zip file at `destination`.
pub fn archive_directory(
    source_dir: &Path,
    destination: &Path,
) -> Result<ArchiveSummary, ArchiveError> {
    ensure_directory(source_dir)?;

    let file = File::create(destination).map_err(|source| ArchiveError::Create {
        path: destination.to_path_buf(),
        source,
    })?;
    let mut zip = ZipWriter::new(file);
    let counts = write_tree(&mut zip, source_dir, "", destination)?;
    zip.finish().map_err(|source| ArchiveError::Write {
        path: destination.to_path_buf(),
        source,
    })?;

    let size_bytes = fs::metadata(destination)
        .map(|metadata| metadata.len())
        .map_err(|source| ArchiveError::Create {
            path: destination.to_path_buf(),
            source,
        })?;

    Ok(ArchiveSummary {
        files: counts.files,
        directories: counts.directories,
        size_bytes,
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeCounts {
    pub files: usize,
    pub directories: usize,
}

/// Appends every entry below `root` to an open archive, nested under
/// `prefix` (empty for the archive root). `archive_path` only labels errors.
pub fn write_tree<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    root: &Path,
    prefix: &str,
    archive_path: &Path,
) -> Result<TreeCounts, ArchiveError> {
    ensure_directory(root)?;

    let write_error = |source: ZipError| ArchiveError::Write {
        path: archive_path.to_path_buf(),
        source,
    };
    let base_options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut counts = TreeCounts::default();

    let prefix = prefix.trim_matches('/');
    if !prefix.is_empty() {
        zip.add_directory(prefix, base_options).map_err(write_error)?;
        counts.directories += 1;
    }

    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|error| ArchiveError::Read {
            path: error.path().unwrap_or(root).to_path_buf(),
            source: error.into(),
        })?;
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let name = entry_name(prefix, relative);
        let metadata = if entry.path_is_symlink() {
            match fs::metadata(entry.path()) {
                Ok(metadata) => metadata,
                Err(_) => continue,
            }
        } else {
            entry.metadata().map_err(|error| ArchiveError::Read {
                path: entry.path().to_path_buf(),
                source: error.into(),
            })?
        };
        let options = with_permissions(base_options, &metadata);

        if metadata.is_dir() {
            zip.add_directory(name, options).map_err(write_error)?;
            counts.directories += 1;
        } else if metadata.is_file() {
            let mut source = File::open(entry.path()).map_err(|source| ArchiveError::Read {
                path: entry.path().to_path_buf(),
                source,
            })?;
            zip.start_file(name, options).map_err(write_error)?;
            io::copy(&mut source, zip).map_err(|source| ArchiveError::Read {
                path: entry.path().to_path_buf(),
                source,
            })?;
            counts.files += 1;
        }
    }

    Ok(counts)
}

fn ensure_directory(path: &Path) -> Result<(), ArchiveError> {
    let metadata = fs::metadata(path).map_err(|source| ArchiveError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(ArchiveError::SourceUnavailable {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "not a directory"),
        });
    }
    Ok(())
}

fn entry_name(prefix: &str, relative: &Path) -> String {
    let mut parts = Vec::new();
    if !prefix.is_empty() {
        parts.push(prefix.to_string());
    }
    parts.extend(
        relative
            .components()
            .map(|component| component.as_os_str().to_string_lossy().into_owned()),
    );
    parts.join("/")
}

#[cfg(unix)]
fn with_permissions(options: FileOptions, metadata: &fs::Metadata) -> FileOptions {
    use std::os::unix::fs::PermissionsExt;
    options.unix_permissions(metadata.permissions().mode() & 0o7777)
}

#[cfg(not(unix))]
fn with_permissions(options: FileOptions, _metadata: &fs::Metadata) -> FileOptions {
    options
}
