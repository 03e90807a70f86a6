use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use uuid::Uuid;

use super::{ServerStore, StoreError};
use crate::model::Server;

/// In-process store backed by hash maps.
#[derive(Debug, Default)]
pub struct MemoryStore {
  servers: Mutex<HashMap<Uuid, Server>>,
  games: Mutex<HashSet<Uuid>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Register a game so servers can link to it.
  pub fn add_game(&self, id: Uuid) -> Result<(), StoreError> {
    self.games.lock().map_err(|_| StoreError::Poisoned)?.insert(id);
    Ok(())
  }

  /// Number of committed servers.
  pub fn server_count(&self) -> Result<usize, StoreError> {
    Ok(self.servers.lock().map_err(|_| StoreError::Poisoned)?.len())
  }
}

impl ServerStore for MemoryStore {
  fn load_server(&self, id: Uuid) -> Result<Option<Server>, StoreError> {
    let servers = self.servers.lock().map_err(|_| StoreError::Poisoned)?;
    Ok(servers.get(&id).cloned())
  }

  fn game_exists(&self, id: Uuid) -> Result<bool, StoreError> {
    let games = self.games.lock().map_err(|_| StoreError::Poisoned)?;
    Ok(games.contains(&id))
  }

  fn commit(&self, server: Server) -> Result<Server, StoreError> {
    let mut servers = self.servers.lock().map_err(|_| StoreError::Poisoned)?;
    servers.insert(server.id, server.clone());
    Ok(server)
  }
}
