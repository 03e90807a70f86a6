//! Manifest types for server bundles.
//!
//! The manifest is the desired-state document shipped at the root of a bundle.
//! It describes one server and its nested collections exactly as the exporting
//! side saw them; the reconciler decides what that means for local state.
//!
//! # Format
//!
//! Keys are PascalCase, enumerations are written by name:
//!
//! ```yaml
//! Id: 5f0b6d8e-2c1a-4b53-9a0e-0d6b2f6f8e11
//! Name: Quake Server
//! Autostart: true
//! AutostartMethod: OnApplicationStart
//! WorkingDirectory: C:\Servers\Quake
//! Game:
//!   Id: 8a1e3c0d-6f4b-4e8e-b1b5-3e2f1d0c9b7a
//! ServerConsoles:
//!   - Id: 0c4f...
//!     Name: Log
//!     Type: LogFile
//!     Port: 27500
//! ```
//!
//! Every field except the root `Id` is optional. Unknown keys are ignored so
//! newer exporters can add fields without breaking older importers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutostartMethod {
  #[default]
  OnApplicationStart,
  OnPlayerActivity,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessTerminationMethod {
  #[serde(rename = "SIGHUP")]
  SigHup,
  #[serde(rename = "SIGINT")]
  SigInt,
  #[serde(rename = "SIGKILL")]
  SigKill,
  #[serde(rename = "SIGTERM")]
  SigTerm,
  #[default]
  Close,
  Kill,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsoleType {
  #[default]
  LogFile,
  #[serde(rename = "RCON")]
  Rcon,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
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

/// Desired state of one server, decoded from a bundle.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ServerManifest {
  /// Root identity. Optional at the serde level so a missing value surfaces
  /// as a decode error rather than a parse error.
  pub id: Option<Uuid>,
  pub name: String,
  pub autostart: bool,
  pub autostart_method: AutostartMethod,
  pub autostart_delay: u32,
  /// Working directory on the exporting machine.
  pub working_directory: String,
  pub process_termination_method: ProcessTerminationMethod,
  pub on_start_script_path: Option<String>,
  pub on_stop_script_path: Option<String>,
  pub game: Option<GameReference>,
  pub server_consoles: Vec<ConsoleManifest>,
  pub http_paths: Vec<HttpPathManifest>,
  pub scripts: Vec<ScriptManifest>,
  pub actions: Vec<ActionManifest>,
}

impl ServerManifest {
  /// The root identity, nil when absent. Decoded manifests always carry one.
  pub fn server_id(&self) -> Uuid {
    self.id.unwrap_or_default()
  }

  /// The referenced game, if the manifest names a non-nil one.
  pub fn game_id(&self) -> Option<Uuid> {
    self.game.as_ref().map(|g| g.id).filter(|id| !id.is_nil())
  }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct GameReference {
  pub id: Uuid,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ConsoleManifest {
  pub id: Uuid,
  pub name: String,
  #[serde(rename = "Type")]
  pub console_type: ConsoleType,
  pub path: String,
  pub host: String,
  pub port: u16,
  pub password: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct HttpPathManifest {
  pub id: Uuid,
  pub path: String,
  pub local_path: String,
}

/// Script metadata. The body lives in the bundle at `Scripts/{id}`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ScriptManifest {
  pub id: Uuid,
  pub name: String,
  pub description: String,
  pub requires_admin: bool,
  #[serde(rename = "Type")]
  pub script_type: ScriptType,
  pub created_on: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ActionManifest {
  pub id: Option<Uuid>,
  pub name: String,
  pub arguments: String,
  pub path: String,
  pub working_directory: String,
  pub is_primary_action: bool,
  pub sort_order: i32,
}
