use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::archive::ArchiveError;
use crate::import_lock::ImportLockError;
use crate::locate::LocateError;
use crate::manifest::ManifestError;
use crate::materialize::MaterializeError;
use crate::reconcile::ReconcileError;
use crate::store::StoreError;

/// Any failure of a single import. The import either fully succeeds or
/// reports exactly one of these.
#[derive(Debug, Error)]
pub enum ImportError {
  #[error(transparent)]
  Locate(#[from] LocateError),

  #[error(transparent)]
  Archive(#[from] ArchiveError),

  #[error(transparent)]
  Manifest(#[from] ManifestError),

  #[error(transparent)]
  Lock(#[from] ImportLockError),

  #[error(transparent)]
  Reconcile(#[from] ReconcileError),

  #[error(transparent)]
  Materialize(#[from] MaterializeError),

  #[error("persistence error: {0}")]
  Persistence(#[from] StoreError),
}

/// Flat classification of [`ImportError`] for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportErrorKind {
  BundleNotFound,
  CorruptArchive,
  ManifestMissing,
  MalformedManifest,
  ScriptContentMissing,
  PathEscape,
  WriteFailure,
  PersistenceError,
  Locked,
}

impl ImportErrorKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      ImportErrorKind::BundleNotFound => "bundle not found",
      ImportErrorKind::CorruptArchive => "corrupt archive",
      ImportErrorKind::ManifestMissing => "manifest missing",
      ImportErrorKind::MalformedManifest => "malformed manifest",
      ImportErrorKind::ScriptContentMissing => "script content missing",
      ImportErrorKind::PathEscape => "path escape",
      ImportErrorKind::WriteFailure => "write failure",
      ImportErrorKind::PersistenceError => "persistence error",
      ImportErrorKind::Locked => "locked",
    }
  }
}

impl fmt::Display for ImportErrorKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

fn archive_kind(err: &ArchiveError) -> ImportErrorKind {
  match err {
    ArchiveError::ManifestMissing { .. } => ImportErrorKind::ManifestMissing,
    ArchiveError::Io { .. } | ArchiveError::Corrupt { .. } | ArchiveError::Entry { .. } => {
      ImportErrorKind::CorruptArchive
    }
  }
}

impl ImportError {
  pub fn kind(&self) -> ImportErrorKind {
    match self {
      ImportError::Locate(_) => ImportErrorKind::BundleNotFound,
      ImportError::Archive(e) => archive_kind(e),
      ImportError::Manifest(_) => ImportErrorKind::MalformedManifest,
      ImportError::Lock(_) => ImportErrorKind::Locked,
      ImportError::Reconcile(ReconcileError::ScriptContentMissing { .. }) => ImportErrorKind::ScriptContentMissing,
      ImportError::Reconcile(ReconcileError::Archive(e)) => archive_kind(e),
      ImportError::Reconcile(ReconcileError::Store(_)) => ImportErrorKind::PersistenceError,
      ImportError::Materialize(MaterializeError::PathEscape { .. }) => ImportErrorKind::PathEscape,
      ImportError::Materialize(MaterializeError::Write { .. }) => ImportErrorKind::WriteFailure,
      ImportError::Materialize(MaterializeError::Archive(e)) => archive_kind(e),
      ImportError::Persistence(_) => ImportErrorKind::PersistenceError,
    }
  }
}
