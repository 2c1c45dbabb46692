use std::fs::File;
use std::io::BufReader;
use std::path::{Component, Path, PathBuf};

use flate2::read::GzDecoder;

/// Errors from unpacking an artifact archive.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt archive: {0}")]
    Corrupt(String),

    #[error("refusing to unpack entry outside the tree: {}", .0.display())]
    UnsafePath(PathBuf),
}

/// Unpack a gzipped tarball into `dest`, returning the number of regular
/// files written.
///
/// Repository archives wrap everything in one root directory (GitHub uses
/// `owner-repo-sha/`); that first component is stripped so the archive's
/// contents land directly in `dest`. Top-level entries outside the root
/// directory, such as `pax_global_header`, are skipped.
///
/// This is blocking I/O; async callers should run it on a blocking thread.
pub fn extract_tarball(archive_path: &Path, dest: &Path) -> Result<usize, ArchiveError> {
    std::fs::create_dir_all(dest)?;

    let file = File::open(archive_path)?;
    let decoder = GzDecoder::new(BufReader::new(file));
    let mut archive = tar::Archive::new(decoder);

    let entries = archive
        .entries()
        .map_err(|e| ArchiveError::Corrupt(format!("failed to read tar entries: {e}")))?;

    let mut written = 0;

    for entry_result in entries {
        let mut entry = entry_result
            .map_err(|e| ArchiveError::Corrupt(format!("failed to read tar entry: {e}")))?;

        let entry_type = entry.header().entry_type();
        if entry_type.is_pax_global_extensions() || entry_type.is_pax_local_extensions() {
            continue;
        }

        let entry_path = entry
            .path()
            .map_err(|e| ArchiveError::Corrupt(format!("invalid path in tar: {e}")))?
            .into_owned();

        let Some(relative) = strip_root(&entry_path)? else {
            continue;
        };

        reject_symlinked_path(dest, &relative)?;

        let target = dest.join(&relative);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }

        entry.unpack(&target).map_err(|e| {
            ArchiveError::Corrupt(format!("failed to unpack {}: {e}", relative.display()))
        })?;

        if entry_type.is_file() {
            written += 1;
        }
    }

    Ok(written)
}

/// Fail if any existing path between `dest` and `dest/relative`, the
/// target included, is a symlink. Earlier entries may have planted links;
/// unpacking through one would write outside `dest`.
fn reject_symlinked_path(dest: &Path, relative: &Path) -> Result<(), ArchiveError> {
    let mut current = dest.to_path_buf();
    for component in relative.components() {
        current.push(component);
        match std::fs::symlink_metadata(&current) {
            Ok(meta) if meta.file_type().is_symlink() => {
                return Err(ArchiveError::UnsafePath(relative.to_path_buf()));
            }
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

/// Drop the archive's root directory from `path`. Returns `None` for the
/// root itself and for top-level entries.
fn strip_root(path: &Path) -> Result<Option<PathBuf>, ArchiveError> {
    let mut components = path
        .components()
        .skip_while(|c| matches!(c, Component::CurDir));

    match components.next() {
        Some(Component::Normal(_)) => {}
        None => return Ok(None),
        Some(_) => return Err(ArchiveError::UnsafePath(path.to_path_buf())),
    }

    let mut relative = PathBuf::new();
    for component in components {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            _ => return Err(ArchiveError::UnsafePath(path.to_path_buf())),
        }
    }

    if relative.as_os_str().is_empty() {
        Ok(None)
    } else {
        Ok(Some(relative))
    }
}
