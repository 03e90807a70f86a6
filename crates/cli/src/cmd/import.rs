//! Implementation of the `lanserve import` command.
//!
//! Resolves a bundle, reconciles its manifest against the stored server and
//! extracts its files into the server's working directory.

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;
use tracing::info;

use lanserve_lib::import::{ImportOptions, ImportOutcome, Importer};
use lanserve_lib::locate::DirectoryLocator;
use lanserve_lib::platform::paths;
use lanserve_lib::store::JsonStore;

use crate::output::{OutputFormat, format_bytes, format_changes, print_json, print_stat, print_success, print_warning};

/// Directory overrides for a single import. Flags win over environment.
#[derive(Debug, Default)]
pub struct ImportArgs {
  pub dry_run: bool,
  pub data_dir: Option<PathBuf>,
  pub storage_root: Option<PathBuf>,
  pub archive_dir: Option<PathBuf>,
}

#[derive(Serialize)]
struct ImportReport<'a> {
  #[serde(flatten)]
  outcome: &'a ImportOutcome,
  storage_root: PathBuf,
}

pub fn cmd_import(bundle: &str, args: ImportArgs, output: OutputFormat) -> Result<()> {
  let data_dir = args.data_dir.unwrap_or_else(paths::data_dir);
  let storage_root = args
    .storage_root
    .unwrap_or_else(|| paths::storage_root_under(&data_dir));
  let archive_dir = args.archive_dir.unwrap_or_else(|| paths::archive_dir_under(&data_dir));

  info!(
    bundle,
    data_dir = %data_dir.display(),
    storage_root = %storage_root.display(),
    dry_run = args.dry_run,
    "starting import"
  );

  let importer = Importer::new(
    DirectoryLocator::new(archive_dir),
    JsonStore::new(data_dir.clone()),
    storage_root.clone(),
    paths::locks_dir_under(&data_dir),
  );

  let outcome = importer
    .import(bundle, ImportOptions { dry_run: args.dry_run })
    .map_err(|err| {
      let kind = err.kind();
      anyhow::Error::new(err).context(format!("Import of {bundle} failed ({kind})"))
    })?;

  if output.is_json() {
    return print_json(&ImportReport {
      outcome: &outcome,
      storage_root,
    });
  }

  let server = &outcome.server;
  let summary = &outcome.reconcile;

  if outcome.dry_run {
    print_warning("Dry run: nothing was written");
  }
  let verb = match (outcome.dry_run, summary.created) {
    (true, true) => "Would create",
    (true, false) => "Would update",
    (false, true) => "Created",
    (false, false) => "Updated",
  };
  print_success(&format!("{verb} server {} ({})", server.name, server.id));
  print_stat("Bundle", &dunce::simplified(&outcome.bundle).display().to_string());
  print_stat(
    "Working directory",
    &dunce::simplified(&server.working_directory).display().to_string(),
  );
  print_stat(
    "Game",
    &server.game_id.map_or_else(|| "not linked".to_string(), |id| id.to_string()),
  );
  print_stat("Consoles", &format_changes(&summary.consoles));
  print_stat("HTTP paths", &format_changes(&summary.http_paths));
  print_stat("Scripts", &format_changes(&summary.scripts));
  print_stat("Actions", &summary.actions.to_string());
  print_stat(
    "Files",
    &format!(
      "{} files, {} directories, {}",
      outcome.files.files_written,
      outcome.files.directories_created,
      format_bytes(outcome.files.bytes_written)
    ),
  );

  Ok(())
}
