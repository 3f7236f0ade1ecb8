use std::path::{Path, PathBuf};

/// Data directory mounted into the container image.
pub const CONTAINER_DATA_DIR: &str = "/data";

/// Fallback data directory (relative to the working directory) for local runs.
pub const LOCAL_DATA_DIR: &str = "data_test";

/// Filename of the persisted seed record inside the data directory.
pub const SEED_FILENAME: &str = "seed.txt";

/// Default private key location, relative to the working directory.
pub const DEFAULT_PRIVATE_KEY: &str = "student_private.pem";

/// Pick the data directory: `/data` when it exists (container), otherwise
/// `./data_test` under the current working directory.
pub fn detect_data_dir() -> PathBuf {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    detect_data_dir_from(Path::new(CONTAINER_DATA_DIR), &cwd)
}

/// Same as [`detect_data_dir`] with the candidate locations supplied.
pub fn detect_data_dir_from(container_dir: &Path, cwd: &Path) -> PathBuf {
    if container_dir.is_dir() {
        return container_dir.to_path_buf();
    }
    let local = cwd.join(LOCAL_DATA_DIR);
    tracing::warn!(path = %local.display(), "Running locally: container data dir not found");
    local
}

/// Location of the seed record inside `data_dir`.
pub fn seed_path(data_dir: &Path) -> PathBuf {
    data_dir.join(SEED_FILENAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_dir_wins_when_present() {
        let container = tempfile::tempdir().unwrap();
        let cwd = tempfile::tempdir().unwrap();
        let picked = detect_data_dir_from(container.path(), cwd.path());
        assert_eq!(picked, container.path());
    }

    #[test]
    fn falls_back_to_local_dir() {
        let cwd = tempfile::tempdir().unwrap();
        let missing = cwd.path().join("no-such-data");
        let picked = detect_data_dir_from(&missing, cwd.path());
        assert_eq!(picked, cwd.path().join(LOCAL_DATA_DIR));
    }

    #[test]
    fn seed_path_joins_filename() {
        assert_eq!(
            seed_path(Path::new("/data")),
            PathBuf::from("/data").join("seed.txt")
        );
    }
}
