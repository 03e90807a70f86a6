//! Resolution of bundle references to files on disk.

use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum LocateError {
  #[error("bundle reference {reference:?} is not a plain relative path")]
  InvalidReference { reference: String },

  #[error("bundle {reference} not found under {dir}")]
  NotFound { reference: String, dir: PathBuf },
}

/// Turns an opaque bundle reference into a readable file path.
pub trait BundleLocator {
  fn locate(&self, reference: &str) -> Result<PathBuf, LocateError>;
}

/// Resolves references against a single archive directory.
///
/// A reference that already names an existing file is used as-is, so callers
/// can pass either `bundle.zip` (looked up under the archive dir) or a full
/// path.
#[derive(Debug, Clone)]
pub struct DirectoryLocator {
  dir: PathBuf,
}

impl DirectoryLocator {
  pub fn new(dir: PathBuf) -> Self {
    Self { dir }
  }
}

impl BundleLocator for DirectoryLocator {
  fn locate(&self, reference: &str) -> Result<PathBuf, LocateError> {
    let literal = Path::new(reference);
    if literal.is_file() {
      debug!(path = %literal.display(), "bundle reference is a literal path");
      return Ok(literal.to_path_buf());
    }

    let invalid = || LocateError::InvalidReference {
      reference: reference.to_string(),
    };
    if reference.is_empty() {
      return Err(invalid());
    }
    for component in literal.components() {
      match component {
        Component::Normal(_) | Component::CurDir => {}
        Component::ParentDir | Component::RootDir | Component::Prefix(_) => return Err(invalid()),
      }
    }

    let resolved = self.dir.join(literal);
    if !resolved.is_file() {
      return Err(LocateError::NotFound {
        reference: reference.to_string(),
        dir: self.dir.clone(),
      });
    }

    debug!(path = %resolved.display(), "resolved bundle reference");
    Ok(resolved)
  }
}
