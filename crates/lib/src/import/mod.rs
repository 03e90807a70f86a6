//! Import orchestration.
//!
//! An import takes a bundle reference and drives it through the whole
//! pipeline:
//!
//! 1. Resolve the reference through a [`BundleLocator`]
//! 2. Open the bundle and decode its manifest
//! 3. Lock the server ID so concurrent imports of it serialize
//! 4. Load current state and reconcile in memory
//! 5. Materialize `Files/` into the working directory
//! 6. Commit the reconciled server
//!
//! Failures before step 5 leave both disk and store untouched. A failure in
//! step 6 can leave freshly written files behind; re-running the import
//! converges because both steps are idempotent.

mod error;

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::archive::Bundle;
use crate::consts::FILES_PREFIX;
use crate::import_lock::ImportLock;
use crate::locate::BundleLocator;
use crate::manifest;
use crate::materialize::{self, MaterializeSummary};
use crate::model::Server;
use crate::reconcile::{ReconcileSummary, reconcile_with_store};
use crate::store::ServerStore;

pub use error::{ImportError, ImportErrorKind};

#[derive(Debug, Default, Clone, Copy)]
pub struct ImportOptions {
  /// Reconcile and plan file writes without touching disk or store.
  pub dry_run: bool,
}

/// Result of a successful import.
#[derive(Debug, Clone, Serialize)]
pub struct ImportOutcome {
  pub bundle: PathBuf,
  /// The committed server (or, in a dry run, the one that would be committed).
  pub server: Server,
  pub reconcile: ReconcileSummary,
  pub files: MaterializeSummary,
  pub dry_run: bool,
}

/// Imports bundles into a store and a storage root.
#[derive(Debug)]
pub struct Importer<L, S> {
  locator: L,
  store: S,
  storage_root: PathBuf,
  lock_dir: PathBuf,
}

impl<L: BundleLocator, S: ServerStore> Importer<L, S> {
  pub fn new(locator: L, store: S, storage_root: PathBuf, lock_dir: PathBuf) -> Self {
    Self {
      locator,
      store,
      storage_root,
      lock_dir,
    }
  }

  pub fn store(&self) -> &S {
    &self.store
  }

  pub fn storage_root(&self) -> &Path {
    &self.storage_root
  }

  /// Import the bundle `reference` points at.
  pub fn import(&self, reference: &str, options: ImportOptions) -> Result<ImportOutcome, ImportError> {
    let path = self.locator.locate(reference)?;
    let mut bundle = Bundle::open(&path)?;

    let manifest = manifest::decode(&bundle.read_manifest_text()?)?;
    let server_id = manifest.server_id();

    let _lock = ImportLock::acquire(&self.lock_dir, server_id, &format!("import {reference}"))?;

    let reconciled = reconcile_with_store(&self.store, &manifest, &self.storage_root, &mut bundle)?;
    let working_dir = reconciled.server.working_directory.clone();

    if options.dry_run {
      let files = materialize::plan_materialize(&bundle, FILES_PREFIX, &working_dir)?.summary();
      info!(
        %server_id,
        bundle = %path.display(),
        working_dir = %working_dir.display(),
        files = files.files_written,
        "dry run complete, nothing written"
      );
      return Ok(ImportOutcome {
        bundle: path,
        server: reconciled.server,
        reconcile: reconciled.summary,
        files,
        dry_run: true,
      });
    }

    let files = materialize::materialize(&mut bundle, FILES_PREFIX, &working_dir)?;
    let server = self.store.commit(reconciled.server)?;

    info!(
      %server_id,
      name = %server.name,
      bundle = %path.display(),
      created = reconciled.summary.created,
      files = files.files_written,
      "imported server"
    );

    Ok(ImportOutcome {
      bundle: path,
      server,
      reconcile: reconciled.summary,
      files,
      dry_run: false,
    })
  }
}
