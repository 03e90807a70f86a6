use crate::consts::APP_NAME;
use std::path::{Path, PathBuf};

/// Overrides the data directory (server records, games, locks).
pub const DATA_DIR_ENV: &str = "LANSERVE_DATA_DIR";

/// Overrides the base directory under which server working directories are derived.
pub const STORAGE_ROOT_ENV: &str = "LANSERVE_STORAGE_ROOT";

/// Overrides the directory bundle references are resolved against.
pub const ARCHIVE_DIR_ENV: &str = "LANSERVE_ARCHIVE_DIR";

/// Returns the user's home directory
#[cfg(windows)]
pub fn home_dir() -> PathBuf {
  let userprofile = std::env::var("USERPROFILE").expect("USERPROFILE not set");
  PathBuf::from(userprofile)
}

/// Returns the user's home directory
#[cfg(not(windows))]
pub fn home_dir() -> PathBuf {
  let home = std::env::var("HOME").expect("HOME not set");
  PathBuf::from(home)
}

/// Returns the platform data directory for the application, ignoring overrides.
#[cfg(windows)]
fn default_data_dir() -> PathBuf {
  let appdata = std::env::var("APPDATA").expect("APPDATA not set");
  PathBuf::from(appdata).join(APP_NAME)
}

/// Returns the platform data directory for the application, ignoring overrides.
#[cfg(not(windows))]
fn default_data_dir() -> PathBuf {
  let data_home = std::env::var("XDG_DATA_HOME")
    .map(PathBuf::from)
    .unwrap_or_else(|_| home_dir().join(".local").join("share"));
  data_home.join(APP_NAME)
}

/// Returns the directory for data files for the application
pub fn data_dir() -> PathBuf {
  if let Ok(path) = std::env::var(DATA_DIR_ENV) {
    return PathBuf::from(path);
  }
  default_data_dir()
}

/// Per-server import lock files.
pub fn locks_dir() -> PathBuf {
  locks_dir_under(&data_dir())
}

pub fn locks_dir_under(data_dir: &Path) -> PathBuf {
  data_dir.join("locks")
}

/// Base directory for server working directories.
pub fn storage_root() -> PathBuf {
  storage_root_under(&data_dir())
}

/// Storage root for an explicit data directory; the env override still wins.
pub fn storage_root_under(data_dir: &Path) -> PathBuf {
  if let Ok(path) = std::env::var(STORAGE_ROOT_ENV) {
    return PathBuf::from(path);
  }
  data_dir.join("server-files")
}

/// Directory bundle references are resolved against.
pub fn archive_dir() -> PathBuf {
  archive_dir_under(&data_dir())
}

pub fn archive_dir_under(data_dir: &Path) -> PathBuf {
  if let Ok(path) = std::env::var(ARCHIVE_DIR_ENV) {
    return PathBuf::from(path);
  }
  data_dir.join("archives")
}
