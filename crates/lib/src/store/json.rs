//! JSON-file persistence.
//!
//! # Storage Layout
//!
//! ```text
//! {data_dir}/
//! ├── servers/
//! │   └── <server-id>.json   # full Server graph
//! └── games/
//!     └── <game-id>.json     # Game record
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

use super::{ServerStore, StoreError};
use crate::model::{Game, Server};

const SERVERS_DIR: &str = "servers";
const GAMES_DIR: &str = "games";

/// Store that keeps one JSON document per record.
///
/// Writes go through a temp file and a rename so a crash never leaves a
/// half-written record behind.
#[derive(Debug, Clone)]
pub struct JsonStore {
  base_path: PathBuf,
}

impl JsonStore {
  pub fn new(base_path: PathBuf) -> Self {
    Self { base_path }
  }

  pub fn base_path(&self) -> &Path {
    &self.base_path
  }

  fn server_path(&self, id: Uuid) -> PathBuf {
    self.base_path.join(SERVERS_DIR).join(format!("{id}.json"))
  }

  fn game_path(&self, id: Uuid) -> PathBuf {
    self.base_path.join(GAMES_DIR).join(format!("{id}.json"))
  }

  /// Record a game as locally known.
  pub fn register_game(&self, game: &Game) -> Result<(), StoreError> {
    write_atomic(&self.game_path(game.id), game.id, game)?;
    debug!(game_id = %game.id, "registered game");
    Ok(())
  }

  /// Load a game record, if registered.
  pub fn load_game(&self, id: Uuid) -> Result<Option<Game>, StoreError> {
    let game: Option<Game> = read_record(&self.game_path(id))?;
    match game {
      Some(game) if game.id != id => Err(StoreError::IdMismatch {
        path: self.game_path(id),
        expected: id,
        found: game.id,
      }),
      other => Ok(other),
    }
  }
}

impl ServerStore for JsonStore {
  fn load_server(&self, id: Uuid) -> Result<Option<Server>, StoreError> {
    let path = self.server_path(id);
    let server: Option<Server> = read_record(&path)?;
    match server {
      Some(server) if server.id != id => Err(StoreError::IdMismatch {
        path,
        expected: id,
        found: server.id,
      }),
      other => Ok(other),
    }
  }

  fn game_exists(&self, id: Uuid) -> Result<bool, StoreError> {
    let path = self.game_path(id);
    path.try_exists().map_err(|source| StoreError::Read { path, source })
  }

  fn commit(&self, server: Server) -> Result<Server, StoreError> {
    let path = self.server_path(server.id);
    write_atomic(&path, server.id, &server)?;
    debug!(server_id = %server.id, path = %path.display(), "committed server");
    Ok(server)
  }
}

/// Read and parse a record. Returns `Ok(None)` if the file does not exist.
fn read_record<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
  let content = match fs::read_to_string(path) {
    Ok(content) => content,
    Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
    Err(source) => {
      return Err(StoreError::Read {
        path: path.to_path_buf(),
        source,
      });
    }
  };

  serde_json::from_str(&content)
    .map(Some)
    .map_err(|source| StoreError::Parse {
      path: path.to_path_buf(),
      source,
    })
}

/// Write a record via temp file + rename.
fn write_atomic<T: Serialize>(path: &Path, id: Uuid, value: &T) -> Result<(), StoreError> {
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
      path: parent.to_path_buf(),
      source,
    })?;
  }

  let content = serde_json::to_string_pretty(value).map_err(|source| StoreError::Serialize { id, source })?;

  let temp_path = path.with_extension("json.tmp");
  fs::write(&temp_path, content).map_err(|source| StoreError::Write {
    path: temp_path.clone(),
    source,
  })?;
  fs::rename(&temp_path, path).map_err(|source| StoreError::Write {
    path: path.to_path_buf(),
    source,
  })?;

  Ok(())
}
