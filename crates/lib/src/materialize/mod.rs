//! File materialization into a server's working directory.
//!
//! Materialization happens in two passes. The plan pass maps every entry under
//! the namespace prefix to a destination and rejects the whole set if any
//! single entry could land outside the working directory. Only a fully valid
//! plan is executed, so a hostile bundle writes nothing at all.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::archive::{ArchiveError, Bundle, BundleEntry};
use crate::util::path::normalize_relative;

#[derive(Debug, Error)]
pub enum MaterializeError {
  /// An entry would resolve outside the working directory.
  #[error("bundle entry {entry} escapes the working directory")]
  PathEscape { entry: String },

  #[error("failed to write {path}: {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error(transparent)]
  Archive(#[from] ArchiveError),
}

/// One validated entry and where it goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedEntry {
  pub entry: BundleEntry,
  pub destination: PathBuf,
}

/// A fully validated set of destinations under one working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializePlan {
  pub working_dir: PathBuf,
  pub entries: Vec<PlannedEntry>,
}

impl MaterializePlan {
  /// Counts of what executing this plan would write.
  pub fn summary(&self) -> MaterializeSummary {
    let directories_created = self.entries.iter().filter(|p| p.entry.is_dir).count();
    MaterializeSummary {
      files_written: self.entries.len() - directories_created,
      directories_created,
      bytes_written: 0,
    }
  }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MaterializeSummary {
  pub files_written: usize,
  pub directories_created: usize,
  pub bytes_written: u64,
}

/// Validate every entry under `prefix` against `working_dir` without writing.
pub fn plan_materialize(bundle: &Bundle, prefix: &str, working_dir: &Path) -> Result<MaterializePlan, MaterializeError> {
  let mut entries = Vec::new();

  for entry in bundle.entries(prefix) {
    let escape = || MaterializeError::PathEscape {
      entry: entry.name.clone(),
    };

    let relative = normalize_relative(&entry.relative_path).ok_or_else(escape)?;
    if relative.as_os_str().is_empty() {
      if entry.is_dir {
        continue;
      }
      return Err(escape());
    }

    let destination = working_dir.join(&relative);
    if !destination.starts_with(working_dir) {
      return Err(escape());
    }

    entries.push(PlannedEntry { entry, destination });
  }

  Ok(MaterializePlan {
    working_dir: working_dir.to_path_buf(),
    entries,
  })
}

/// Extract all entries under `prefix` into `working_dir`.
///
/// Existing files are overwritten; existing directories are reused. Fails with
/// [`MaterializeError::PathEscape`] before touching the filesystem if any entry
/// is unsafe.
pub fn materialize(bundle: &mut Bundle, prefix: &str, working_dir: &Path) -> Result<MaterializeSummary, MaterializeError> {
  let plan = plan_materialize(bundle, prefix, working_dir)?;
  execute(bundle, &plan)
}

/// Execute a validated plan.
pub fn execute(bundle: &mut Bundle, plan: &MaterializePlan) -> Result<MaterializeSummary, MaterializeError> {
  create_dir(&plan.working_dir)?;

  let mut summary = MaterializeSummary::default();

  for planned in &plan.entries {
    if planned.entry.is_dir {
      create_dir(&planned.destination)?;
      summary.directories_created += 1;
      debug!(path = %planned.destination.display(), "created directory");
      continue;
    }

    if let Some(parent) = planned.destination.parent() {
      create_dir(parent)?;
    }

    let write_err = |source| MaterializeError::Write {
      path: planned.destination.clone(),
      source,
    };

    let mut output = File::create(&planned.destination).map_err(write_err)?;
    let mut input = bundle.reader(&planned.entry)?;
    let written = io::copy(&mut input, &mut output).map_err(write_err)?;
    drop(input);

    apply_mode(bundle, planned)?;

    summary.files_written += 1;
    summary.bytes_written += written;
    debug!(path = %planned.destination.display(), bytes = written, "wrote file");
  }

  info!(
    working_dir = %plan.working_dir.display(),
    files = summary.files_written,
    directories = summary.directories_created,
    bytes = summary.bytes_written,
    "materialized bundle files"
  );

  Ok(summary)
}

fn create_dir(path: &Path) -> Result<(), MaterializeError> {
  fs::create_dir_all(path).map_err(|source| MaterializeError::Write {
    path: path.to_path_buf(),
    source,
  })
}

#[cfg(unix)]
fn apply_mode(bundle: &mut Bundle, planned: &PlannedEntry) -> Result<(), MaterializeError> {
  use std::os::unix::fs::PermissionsExt;

  let Some(mode) = bundle.unix_mode(&planned.entry) else {
    return Ok(());
  };

  // Owner must keep write access or the next import cannot overwrite.
  let mode = (mode & 0o777) | 0o200;
  fs::set_permissions(&planned.destination, fs::Permissions::from_mode(mode)).map_err(|source| {
    warn!(path = %planned.destination.display(), mode, "failed to apply archived permissions");
    MaterializeError::Write {
      path: planned.destination.clone(),
      source,
    }
  })
}

#[cfg(not(unix))]
fn apply_mode(_bundle: &mut Bundle, _planned: &PlannedEntry) -> Result<(), MaterializeError> {
  Ok(())
}
