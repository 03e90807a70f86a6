//! Persistence gateway for server records.
//!
//! The import engine never talks to storage directly; it loads current state,
//! checks game existence and commits through [`ServerStore`]. Two
//! implementations ship with the crate:
//!
//! - [`MemoryStore`]: process-local maps, used by tests and dry tooling.
//! - [`JsonStore`]: one pretty-printed JSON document per record on disk.

mod json;
mod memory;

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

use crate::model::Server;

pub use json::JsonStore;
pub use memory::MemoryStore;

/// Errors raised by a [`ServerStore`].
#[derive(Debug, Error)]
pub enum StoreError {
  #[error("failed to create directory {path}: {source}")]
  CreateDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to read {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to parse {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("failed to serialize record {id}: {source}")]
  Serialize {
    id: Uuid,
    #[source]
    source: serde_json::Error,
  },

  #[error("failed to write {path}: {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// A record on disk carries a different ID than its file name.
  #[error("record {path} holds id {found}, expected {expected}")]
  IdMismatch { path: PathBuf, expected: Uuid, found: Uuid },

  /// Another thread panicked while holding the store.
  #[error("store is poisoned")]
  Poisoned,
}

/// Load, existence-check and commit operations the import engine depends on.
pub trait ServerStore {
  /// Load a server by ID. Returns `Ok(None)` if it has never been committed.
  fn load_server(&self, id: Uuid) -> Result<Option<Server>, StoreError>;

  /// Whether a game with this ID is known locally.
  fn game_exists(&self, id: Uuid) -> Result<bool, StoreError>;

  /// Persist the full server graph, replacing any previous record.
  fn commit(&self, server: Server) -> Result<Server, StoreError>;
}

impl<S: ServerStore + ?Sized> ServerStore for &S {
  fn load_server(&self, id: Uuid) -> Result<Option<Server>, StoreError> {
    (**self).load_server(id)
  }

  fn game_exists(&self, id: Uuid) -> Result<bool, StoreError> {
    (**self).game_exists(id)
  }

  fn commit(&self, server: Server) -> Result<Server, StoreError> {
    (**self).commit(server)
  }
}
