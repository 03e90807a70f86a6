//! Bundle archive access.
//!
//! A bundle is a zip archive with a fixed layout:
//!
//! ```text
//! Manifest.yml          # desired state
//! Scripts/<script-id>   # one raw-text entry per script
//! Files/...             # working-directory tree, directories end in '/'
//! ```
//!
//! [`Bundle`] owns the open file handle for as long as it lives; dropping it
//! releases the archive on every exit path of an import.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;
use zip::ZipArchive;
use zip::result::ZipError;

use crate::consts::MANIFEST_FILENAME;

/// Errors that can occur while reading a bundle.
#[derive(Debug, Error)]
pub enum ArchiveError {
  /// The bundle file could not be opened.
  #[error("failed to open bundle {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// The file is not a readable zip archive.
  #[error("corrupt bundle {path}: {source}")]
  Corrupt {
    path: PathBuf,
    #[source]
    source: ZipError,
  },

  /// The bundle has no manifest at the well-known path.
  #[error("bundle {path} has no Manifest.yml")]
  ManifestMissing { path: PathBuf },

  /// An entry exists but its content could not be read.
  #[error("failed to read bundle entry {name}: {source}")]
  Entry {
    name: String,
    #[source]
    source: io::Error,
  },
}

/// One archive entry under a namespace prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleEntry {
  /// Full name inside the archive.
  pub name: String,
  /// Name with the namespace prefix stripped, separators untouched.
  pub relative_path: String,
  /// Directory entries end with a path separator.
  pub is_dir: bool,
  index: usize,
}

/// An opened bundle archive.
pub struct Bundle {
  path: PathBuf,
  archive: ZipArchive<BufReader<File>>,
  names: Vec<String>,
}

impl std::fmt::Debug for Bundle {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Bundle")
      .field("path", &self.path)
      .field("entries", &self.names.len())
      .finish()
  }
}

impl Bundle {
  /// Open a bundle from a zip file on disk.
  pub fn open(path: &Path) -> Result<Self, ArchiveError> {
    let file = File::open(path).map_err(|source| ArchiveError::Io {
      path: path.to_path_buf(),
      source,
    })?;

    let archive = ZipArchive::new(BufReader::new(file)).map_err(|source| ArchiveError::Corrupt {
      path: path.to_path_buf(),
      source,
    })?;

    // Entry order is fixed at open time so every listing is repeatable.
    let mut names = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
      let name = archive.name_for_index(index).ok_or_else(|| ArchiveError::Corrupt {
        path: path.to_path_buf(),
        source: ZipError::InvalidArchive("entry index out of range".into()),
      })?;
      names.push(name.to_string());
    }

    debug!(path = %path.display(), entries = names.len(), "opened bundle");

    Ok(Self {
      path: path.to_path_buf(),
      archive,
      names,
    })
  }

  /// Path of the archive on disk.
  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Read the manifest document as text.
  pub fn read_manifest_text(&mut self) -> Result<String, ArchiveError> {
    self
      .read_text(MANIFEST_FILENAME)?
      .ok_or_else(|| ArchiveError::ManifestMissing {
        path: self.path.clone(),
      })
  }

  /// Read a UTF-8 entry by its full name.
  ///
  /// Returns `Ok(None)` if the bundle has no such entry.
  pub fn read_text(&mut self, name: &str) -> Result<Option<String>, ArchiveError> {
    let mut file = match self.archive.by_name(name) {
      Ok(file) => file,
      Err(ZipError::FileNotFound) => return Ok(None),
      Err(source) => {
        return Err(ArchiveError::Corrupt {
          path: self.path.clone(),
          source,
        });
      }
    };

    let mut content = String::new();
    file.read_to_string(&mut content).map_err(|source| ArchiveError::Entry {
      name: name.to_string(),
      source,
    })?;
    Ok(Some(content))
  }

  /// List every entry whose name starts with `prefix`, in archive order.
  ///
  /// The prefix entry itself (e.g. a bare `Files/` directory) is skipped.
  pub fn entries(&self, prefix: &str) -> Vec<BundleEntry> {
    self
      .names
      .iter()
      .enumerate()
      .filter_map(|(index, name)| {
        let relative = name.strip_prefix(prefix)?;
        if relative.is_empty() {
          return None;
        }
        Some(BundleEntry {
          name: name.clone(),
          relative_path: relative.to_string(),
          is_dir: name.ends_with('/') || name.ends_with('\\'),
          index,
        })
      })
      .collect()
  }

  /// Open an entry's content for reading.
  pub fn reader(&mut self, entry: &BundleEntry) -> Result<impl Read + '_, ArchiveError> {
    self.archive.by_index(entry.index).map_err(|source| ArchiveError::Corrupt {
      path: self.path.clone(),
      source,
    })
  }

  /// Unix permission bits recorded for an entry, if any.
  pub fn unix_mode(&mut self, entry: &BundleEntry) -> Option<u32> {
    self.archive.by_index(entry.index).ok().and_then(|file| file.unix_mode())
  }
}
