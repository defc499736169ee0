//! On-disk layout.
//!
//! ```text
//! ~/.language-companion/       (or $LC_DATA_DIR)
//! ├── config.toml              optional scheduler settings
//! └── srs_db.json              lessons + cards document
//! ```

use std::env;
use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "LC_DATA_DIR";

pub const DB_FILE_NAME: &str = "srs_db.json";

pub const CONFIG_FILE_NAME: &str = "config.toml";

fn dirs_home() -> PathBuf {
    env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

/// Default base directory for all Language Companion data.
pub fn default_base_dir() -> PathBuf {
    dirs_home().join(".language-companion")
}

/// `$LC_DATA_DIR` if set and non-empty, else [`default_base_dir`].
pub fn data_dir_from_env() -> PathBuf {
    env::var(DATA_DIR_ENV)
        .ok()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(default_base_dir)
}

pub fn db_path(data_dir: &Path) -> PathBuf {
    data_dir.join(DB_FILE_NAME)
}

pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILE_NAME)
}

/// Sibling path the document is staged at before being renamed into place.
pub(crate) fn staging_path(path: &Path) -> PathBuf {
    let mut staged = path.as_os_str().to_owned();
    staged.push(".tmp");
    PathBuf::from(staged)
}

/// Where an unparseable document is copied before it can be overwritten.
pub(crate) fn unreadable_copy_path(path: &Path) -> PathBuf {
    let mut copy = path.as_os_str().to_owned();
    copy.push(".corrupt");
    PathBuf::from(copy)
}
