//! Implementation of the `lanserve games` commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use uuid::Uuid;

use lanserve_lib::model::Game;
use lanserve_lib::platform::paths;
use lanserve_lib::store::JsonStore;

use crate::output::print_success;

pub fn cmd_games_add(id: Uuid, title: String, data_dir: Option<PathBuf>) -> Result<()> {
  let store = JsonStore::new(data_dir.unwrap_or_else(paths::data_dir));
  let game = Game { id, title };

  store
    .register_game(&game)
    .with_context(|| format!("Failed to register game {id}"))?;

  if game.title.is_empty() {
    print_success(&format!("Registered game {id}"));
  } else {
    print_success(&format!("Registered game {} ({id})", game.title));
  }
  Ok(())
}
