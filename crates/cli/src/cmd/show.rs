//! Implementation of the `lanserve show` command.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use uuid::Uuid;

use lanserve_lib::model::Server;
use lanserve_lib::platform::paths;
use lanserve_lib::store::{JsonStore, ServerStore};

use crate::output::{self, OutputFormat, print_info, print_json, print_stat, print_success};

pub fn cmd_show(id: Uuid, data_dir: Option<PathBuf>, output: OutputFormat) -> Result<()> {
  let store = JsonStore::new(data_dir.unwrap_or_else(paths::data_dir));

  let Some(server) = store
    .load_server(id)
    .with_context(|| format!("Failed to load server {id}"))?
  else {
    bail!("Server {id} not found in {}", store.base_path().display());
  };

  if output.is_json() {
    return print_json(&server);
  }

  print_server(&server);
  Ok(())
}

fn print_server(server: &Server) {
  print_success(&format!("{} ({})", server.name, server.id));
  print_stat("Working directory", &server.working_directory.display().to_string());
  print_stat(
    "Autostart",
    &format!("{} ({:?}, {}s delay)", server.autostart, server.autostart_method, server.autostart_delay),
  );
  print_stat("Termination", &format!("{:?}", server.process_termination_method));
  print_stat(
    "Game",
    &server.game_id.map_or_else(|| "not linked".to_string(), |id| id.to_string()),
  );

  if server.consoles.is_empty() && server.http_paths.is_empty() && server.scripts.is_empty() && server.actions.is_empty()
  {
    println!();
    print_info("No consoles, HTTP paths, scripts or actions");
    return;
  }

  if !server.consoles.is_empty() {
    println!();
    println!("Consoles:");
    for console in &server.consoles {
      println!(
        "  {} {} [{:?}] {}",
        output::symbols::INFO,
        console.name,
        console.console_type,
        console.id
      );
    }
  }

  if !server.http_paths.is_empty() {
    println!();
    println!("HTTP paths:");
    for http_path in &server.http_paths {
      println!("  {} {} -> {}", output::symbols::INFO, http_path.path, http_path.local_path);
    }
  }

  if !server.scripts.is_empty() {
    println!();
    println!("Scripts:");
    for script in &server.scripts {
      println!(
        "  {} {} [{:?}] {}",
        output::symbols::INFO,
        script.name,
        script.script_type,
        script.id
      );
    }
  }

  if !server.actions.is_empty() {
    println!();
    println!("Actions:");
    for action in &server.actions {
      let marker = if action.primary_action { " (primary)" } else { "" };
      println!("  {} {}{}: {} {}", output::symbols::INFO, action.name, marker, action.path, action.arguments);
    }
  }
}
