//! Persisted server entity graph.
//!
//! A [`Server`] is the current-state root that imports reconcile into. It owns
//! its four nested collections outright; the only outward link is `game_id`,
//! a weak reference that is set only when the game is known locally.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutostartMethod {
  #[default]
  OnApplicationStart,
  OnPlayerActivity,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessTerminationMethod {
  SigHup,
  SigInt,
  SigKill,
  SigTerm,
  #[default]
  Close,
  Kill,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsoleType {
  #[default]
  LogFile,
  Rcon,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptType {
  #[default]
  Install,
  Uninstall,
  NameChange,
  KeyChange,
  SaveUpload,
  SaveDownload,
  DetectInstall,
  BeforeStart,
  AfterStop,
}

/// A game server as stored locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
  /// Caller-assigned identity, shared with the manifest that produced it.
  pub id: Uuid,
  pub name: String,
  pub autostart: bool,
  pub autostart_method: AutostartMethod,
  /// Delay in seconds before an autostart fires.
  pub autostart_delay: u32,
  /// Derived from the storage root and the sanitized name, never declared.
  pub working_directory: PathBuf,
  pub process_termination_method: ProcessTerminationMethod,
  pub on_start_script_path: Option<String>,
  pub on_stop_script_path: Option<String>,
  /// Weak reference to a locally known game.
  pub game_id: Option<Uuid>,
  #[serde(default)]
  pub consoles: Vec<ServerConsole>,
  #[serde(default)]
  pub http_paths: Vec<ServerHttpPath>,
  #[serde(default)]
  pub scripts: Vec<Script>,
  #[serde(default)]
  pub actions: Vec<Action>,
}

impl Server {
  /// Create an empty server carrying the given identity.
  pub fn new(id: Uuid) -> Self {
    Self {
      id,
      name: String::new(),
      autostart: false,
      autostart_method: AutostartMethod::default(),
      autostart_delay: 0,
      working_directory: PathBuf::new(),
      process_termination_method: ProcessTerminationMethod::default(),
      on_start_script_path: None,
      on_stop_script_path: None,
      game_id: None,
      consoles: Vec::new(),
      http_paths: Vec::new(),
      scripts: Vec::new(),
      actions: Vec::new(),
    }
  }
}

/// A locally known game. Servers point at games by ID only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
  pub id: Uuid,
  #[serde(default)]
  pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConsole {
  pub id: Uuid,
  pub name: String,
  pub console_type: ConsoleType,
  pub path: String,
  pub host: String,
  pub port: u16,
  /// Local credential. Bundles usually omit it, so imports keep the stored value.
  pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerHttpPath {
  pub id: Uuid,
  /// URL path the server is reachable under.
  pub path: String,
  /// Filesystem path served for `path`.
  pub local_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
  pub id: Uuid,
  pub name: String,
  pub description: String,
  pub requires_admin: bool,
  pub script_type: ScriptType,
  pub contents: String,
  pub created_on: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
  pub id: Uuid,
  pub name: String,
  pub arguments: String,
  pub path: String,
  pub working_directory: String,
  pub primary_action: bool,
  pub sort_order: i32,
}
