//! Reconciliation of a decoded manifest against current server state.
//!
//! The reconciler is pure over its inputs: it receives the current server (if
//! any), the desired manifest, and a [`ReconcileContext`], and returns the new
//! server graph without touching persistence. Nested collections go through a
//! [`CollectionPlan`]; actions are replaced wholesale.

mod plan;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::archive::{ArchiveError, Bundle};
use crate::consts::SCRIPTS_PREFIX;
use crate::manifest::{ActionManifest, ConsoleManifest, HttpPathManifest, ScriptManifest, ServerManifest};
use crate::model::{Action, Script, Server, ServerConsole, ServerHttpPath};
use crate::store::{ServerStore, StoreError};
use crate::util::path::sanitize_filename;

pub use plan::{CollectionChanges, CollectionPlan, Identified, PlanOp};

#[derive(Debug, Error)]
pub enum ReconcileError {
  #[error("script {script_id} of server {server_id} has no content entry in the bundle")]
  ScriptContentMissing { server_id: Uuid, script_id: Uuid },

  #[error(transparent)]
  Archive(#[from] ArchiveError),

  #[error(transparent)]
  Store(#[from] StoreError),
}

/// Source of script bodies, keyed by script ID.
pub trait ScriptSource {
  /// Returns `Ok(None)` when no body exists for the script.
  fn script_content(&mut self, script_id: Uuid) -> Result<Option<String>, ArchiveError>;
}

impl ScriptSource for Bundle {
  fn script_content(&mut self, script_id: Uuid) -> Result<Option<String>, ArchiveError> {
    self.read_text(&format!("{SCRIPTS_PREFIX}{script_id}"))
  }
}

/// Everything reconciliation needs besides current and desired state.
#[derive(Debug, Clone)]
pub struct ReconcileContext<'a> {
  /// Base directory working directories are derived under.
  pub storage_root: &'a Path,
  /// Game ID from the manifest, present only if the game is known locally.
  pub verified_game: Option<Uuid>,
  /// Creation timestamp for scripts that do not carry one.
  pub now: DateTime<Utc>,
}

/// What reconciliation changed.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileSummary {
  /// The root did not exist before this import.
  pub created: bool,
  /// The server ended up linked to a game.
  pub game_linked: bool,
  pub consoles: CollectionChanges,
  pub http_paths: CollectionChanges,
  pub scripts: CollectionChanges,
  /// Number of actions after replacement.
  pub actions: usize,
}

/// Result of reconciling one manifest.
#[derive(Debug, Clone)]
pub struct Reconciled {
  pub server: Server,
  pub summary: ReconcileSummary,
}

impl Identified for ServerConsole {
  fn id(&self) -> Uuid {
    self.id
  }
}

impl Identified for ConsoleManifest {
  fn id(&self) -> Uuid {
    self.id
  }
}

impl Identified for ServerHttpPath {
  fn id(&self) -> Uuid {
    self.id
  }
}

impl Identified for HttpPathManifest {
  fn id(&self) -> Uuid {
    self.id
  }
}

impl Identified for Script {
  fn id(&self) -> Uuid {
    self.id
  }
}

impl Identified for ScriptManifest {
  fn id(&self) -> Uuid {
    self.id
  }
}

/// Load current state and reconcile a manifest against it.
///
/// Reads from `store` (current server, game existence) but never commits.
pub fn reconcile_with_store<S: ServerStore + ?Sized>(
  store: &S,
  manifest: &ServerManifest,
  storage_root: &Path,
  scripts: &mut dyn ScriptSource,
) -> Result<Reconciled, ReconcileError> {
  let server_id = manifest.server_id();
  let current = store.load_server(server_id)?;

  let verified_game = match manifest.game_id() {
    Some(game_id) if store.game_exists(game_id)? => Some(game_id),
    Some(game_id) => {
      info!(%server_id, %game_id, "referenced game is not known locally, leaving server unlinked");
      None
    }
    None => None,
  };

  let ctx = ReconcileContext {
    storage_root,
    verified_game,
    now: Utc::now(),
  };
  reconcile_server(current, manifest, &ctx, scripts)
}

/// Reconcile a manifest against the current server, returning the new graph.
///
/// On error nothing is returned, so callers never observe partially updated
/// state.
pub fn reconcile_server(
  current: Option<Server>,
  manifest: &ServerManifest,
  ctx: &ReconcileContext<'_>,
  scripts: &mut dyn ScriptSource,
) -> Result<Reconciled, ReconcileError> {
  let server_id = manifest.server_id();
  let created = current.is_none();
  let mut server = current.unwrap_or_else(|| Server::new(server_id));

  server.name = manifest.name.clone();
  server.autostart = manifest.autostart;
  server.autostart_method = manifest.autostart_method.into();
  server.autostart_delay = manifest.autostart_delay;
  server.process_termination_method = manifest.process_termination_method.into();
  server.on_start_script_path = manifest.on_start_script_path.clone();
  server.on_stop_script_path = manifest.on_stop_script_path.clone();
  server.working_directory = working_directory(ctx.storage_root, &manifest.name, server_id);
  server.game_id = ctx.verified_game;

  let mut summary = ReconcileSummary {
    created,
    game_linked: server.game_id.is_some(),
    ..Default::default()
  };

  let plan = CollectionPlan::compute(&server.consoles, &manifest.server_consoles);
  summary.consoles = plan.changes();
  server.consoles = plan.apply::<_, _, ReconcileError>(
    std::mem::take(&mut server.consoles),
    &manifest.server_consoles,
    |console, desired| {
      update_console(console, desired);
      Ok(())
    },
    |desired| Ok(new_console(desired)),
  )?;

  let rebase = LocalPathRebase {
    from: &manifest.working_directory,
    to: &server.working_directory,
  };
  let plan = CollectionPlan::compute(&server.http_paths, &manifest.http_paths);
  summary.http_paths = plan.changes();
  server.http_paths = plan.apply::<_, _, ReconcileError>(
    std::mem::take(&mut server.http_paths),
    &manifest.http_paths,
    |http_path, desired| {
      http_path.path = desired.path.clone();
      http_path.local_path = rebase.apply(&desired.local_path);
      Ok(())
    },
    |desired| {
      Ok(ServerHttpPath {
        id: desired.id,
        path: desired.path.clone(),
        local_path: rebase.apply(&desired.local_path),
      })
    },
  )?;

  let plan = CollectionPlan::compute(&server.scripts, &manifest.scripts);
  summary.scripts = plan.changes();
  // Every desired script needs a body before anything is applied.
  let mut bodies: HashMap<Uuid, String> = HashMap::with_capacity(manifest.scripts.len());
  for desired in &manifest.scripts {
    let contents = scripts
      .script_content(desired.id)?
      .ok_or(ReconcileError::ScriptContentMissing {
        server_id,
        script_id: desired.id,
      })?;
    bodies.insert(desired.id, contents);
  }
  let content_for = |id: Uuid| bodies.get(&id).cloned().unwrap_or_default();
  server.scripts = plan.apply::<_, _, ReconcileError>(
    std::mem::take(&mut server.scripts),
    &manifest.scripts,
    |script, desired| {
      script.name = desired.name.clone();
      script.description = desired.description.clone();
      script.requires_admin = desired.requires_admin;
      script.script_type = desired.script_type.into();
      script.contents = content_for(desired.id);
      Ok(())
    },
    |desired| {
      Ok(Script {
        id: desired.id,
        name: desired.name.clone(),
        description: desired.description.clone(),
        requires_admin: desired.requires_admin,
        script_type: desired.script_type.into(),
        contents: content_for(desired.id),
        created_on: desired.created_on.unwrap_or(ctx.now),
      })
    },
  )?;

  server.actions = replace_actions(server_id, &manifest.actions);
  summary.actions = server.actions.len();

  info!(
    %server_id,
    created,
    game_linked = summary.game_linked,
    consoles_added = summary.consoles.added,
    consoles_removed = summary.consoles.removed,
    http_paths_added = summary.http_paths.added,
    http_paths_removed = summary.http_paths.removed,
    scripts_added = summary.scripts.added,
    scripts_removed = summary.scripts.removed,
    actions = summary.actions,
    "reconciled server"
  );

  Ok(Reconciled { server, summary })
}

/// Derive a server's working directory from its name.
///
/// Falls back to the server ID when the name sanitizes to nothing, so the
/// result is always a direct child of `storage_root`.
pub fn working_directory(storage_root: &Path, name: &str, server_id: Uuid) -> PathBuf {
  let sanitized = sanitize_filename(name);
  if sanitized.is_empty() {
    storage_root.join(server_id.to_string())
  } else {
    storage_root.join(sanitized)
  }
}

fn update_console(console: &mut ServerConsole, desired: &ConsoleManifest) {
  console.name = desired.name.clone();
  console.console_type = desired.console_type.into();
  console.path = desired.path.clone();
  console.host = desired.host.clone();
  console.port = desired.port;
  if desired.password.is_some() {
    console.password = desired.password.clone();
  }
}

fn new_console(desired: &ConsoleManifest) -> ServerConsole {
  ServerConsole {
    id: desired.id,
    name: desired.name.clone(),
    console_type: desired.console_type.into(),
    path: desired.path.clone(),
    host: desired.host.clone(),
    port: desired.port,
    password: desired.password.clone(),
  }
}

/// Rewrites local paths recorded relative to the exporter's working directory.
struct LocalPathRebase<'a> {
  from: &'a str,
  to: &'a Path,
}

impl LocalPathRebase<'_> {
  fn apply(&self, local_path: &str) -> String {
    let from = self.from.trim_end_matches(['/', '\\']);
    if from.is_empty() {
      return local_path.to_string();
    }
    // Only whole components match: `C:\Quake` must not claim `C:\Quake2`.
    let rest = local_path
      .strip_prefix(from)
      .filter(|rest| rest.is_empty() || rest.starts_with(['/', '\\']));
    match rest {
      Some(rest) => {
        let rebased = format!("{}{rest}", self.to.display());
        debug!(from = local_path, to = %rebased, "rebased http local path");
        rebased
      }
      None => local_path.to_string(),
    }
  }
}

/// Build the action list from the manifest, ordered by sort order then
/// position. Missing IDs are derived from the server ID and position.
fn replace_actions(server_id: Uuid, desired: &[ActionManifest]) -> Vec<Action> {
  let mut actions: Vec<(usize, &ActionManifest)> = desired.iter().enumerate().collect();
  actions.sort_by_key(|(position, action)| (action.sort_order, *position));

  actions
    .into_iter()
    .map(|(position, action)| Action {
      id: action
        .id
        .filter(|id| !id.is_nil())
        .unwrap_or_else(|| derived_action_id(server_id, position)),
      name: action.name.clone(),
      arguments: action.arguments.clone(),
      path: action.path.clone(),
      working_directory: action.working_directory.clone(),
      primary_action: action.is_primary_action,
      sort_order: action.sort_order,
    })
    .collect()
}

fn derived_action_id(server_id: Uuid, position: usize) -> Uuid {
  Uuid::new_v5(&server_id, format!("action:{position}").as_bytes())
}
