use std::io::{self, Write};
use std::path::Path;

/// Replace `path` with `contents` so readers see either the old or the new
/// file, never a partial write.
///
/// The data goes to a temporary file in the same directory, is fsynced,
/// then renamed over the target. The directory is fsynced after the rename
/// so the new entry survives a crash. Parent directories are created.
pub fn write_text_atomic(path: &Path, contents: &str) -> Result<(), io::Error> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    sync_dir(parent)
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> Result<(), io::Error> {
    std::fs::File::open(dir)?.sync_all()
}

// Directory handles cannot be opened for fsync on Windows.
#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> Result<(), io::Error> {
    Ok(())
}

/// Read `path` as UTF-8, returning `None` when it does not exist.
pub fn read_text_if_exists(path: &Path) -> Result<Option<String>, io::Error> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}
