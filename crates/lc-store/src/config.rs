//! Scheduler settings from `{data_dir}/config.toml`.
//!
//! ```toml
//! intervals = [1, 3, 7, 14, 30]
//! default_ease = 2.5
//! review_batch_size = 15
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use lc_core::SchedulerConfig;

use crate::paths::config_path;

/// Load scheduler settings for a data directory.
///
/// - Missing file: defaults.
/// - Unreadable, malformed or invalid file (empty ladder, zero interval, ease
///   out of range): logs a warning and returns defaults.
pub fn load_config(data_dir: &Path) -> SchedulerConfig {
    let path = config_path(data_dir);

    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::debug!("no config.toml at {}, using defaults", path.display());
            return SchedulerConfig::default();
        }
        Err(err) => {
            tracing::warn!("failed to read {}: {err}, using defaults", path.display());
            return SchedulerConfig::default();
        }
    };

    match toml::from_str::<SchedulerConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("failed to parse {}: {err}, using defaults", path.display());
            SchedulerConfig::default()
        }
    }
}
