//! End-to-end import scenarios: first import, re-import, hostile bundle.

use std::fs;

use lanserve_lib::import::{ImportErrorKind, ImportOptions};
use lanserve_lib::model::{AutostartMethod, ConsoleType, ProcessTerminationMethod};
use lanserve_lib::store::ServerStore;

use super::common::{C1, C2, GAME_ID, S1, SERVER_ID, TestEnv, file_tree, quake_manifest, script_entry};

#[test]
fn first_import_creates_server_and_files() {
  let env = TestEnv::new();
  env.register_game(GAME_ID);
  let manifest = quake_manifest(&[C1, C2]);
  let script = script_entry();
  env.write_bundle(
    "quake.zip",
    &[
      ("Manifest.yml", manifest.as_str()),
      (script.as_str(), "echo install"),
      ("Files/", ""),
      ("Files/data/", ""),
      ("Files/data/readme.txt", "hello"),
    ],
  );

  let outcome = env.importer().import("quake.zip", ImportOptions::default()).unwrap();
  let server = env.store().load_server(SERVER_ID).unwrap().unwrap();

  assert_eq!(outcome.server, server);
  assert_eq!(server.name, "Quake Server");
  assert_eq!(server.working_directory, env.storage_root().join("Quake Server"));
  assert_eq!(server.game_id, Some(GAME_ID));
  assert!(server.autostart);
  assert_eq!(server.autostart_method, AutostartMethod::OnPlayerActivity);
  assert_eq!(server.autostart_delay, 5);
  assert_eq!(server.process_termination_method, ProcessTerminationMethod::SigTerm);

  assert_eq!(server.consoles.iter().map(|c| c.id).collect::<Vec<_>>(), vec![C1, C2]);
  assert_eq!(server.consoles[0].console_type, ConsoleType::Rcon);
  assert_eq!(server.scripts.len(), 1);
  assert_eq!(server.scripts[0].id, S1);
  assert_eq!(server.scripts[0].contents, "echo install");
  assert_eq!(server.actions.len(), 1);
  assert!(server.actions[0].primary_action);

  let http = &server.http_paths[0];
  assert!(http.local_path.starts_with(&server.working_directory.display().to_string()));
  assert!(http.local_path.ends_with("baseq3"));

  assert_eq!(
    fs::read_to_string(server.working_directory.join("data").join("readme.txt")).unwrap(),
    "hello"
  );
}

#[test]
fn reimport_without_console_removes_it() {
  let env = TestEnv::new();
  let script = script_entry();

  let first = quake_manifest(&[C1, C2]);
  env.write_bundle("quake.zip", &[("Manifest.yml", first.as_str()), (script.as_str(), "echo install")]);
  env.importer().import("quake.zip", ImportOptions::default()).unwrap();

  let second = quake_manifest(&[C1]);
  env.write_bundle("quake.zip", &[("Manifest.yml", second.as_str()), (script.as_str(), "echo install")]);
  let outcome = env.importer().import("quake.zip", ImportOptions::default()).unwrap();

  let server = env.store().load_server(SERVER_ID).unwrap().unwrap();
  assert_eq!(server.consoles.len(), 1);
  assert_eq!(server.consoles[0].id, C1);
  assert!(!outcome.reconcile.created);
  assert_eq!(outcome.reconcile.consoles.removed, 1);
  assert_eq!(outcome.reconcile.consoles.updated, 1);
  assert_eq!(outcome.reconcile.consoles.added, 0);
}

#[test]
fn traversal_entry_rejects_whole_import() {
  let env = TestEnv::new();
  let manifest = quake_manifest(&[C1]);
  let script = script_entry();
  env.write_bundle(
    "evil.zip",
    &[
      ("Manifest.yml", manifest.as_str()),
      (script.as_str(), "echo install"),
      ("Files/ok.txt", "fine"),
      ("Files/data/../../escape.txt", "gotcha"),
    ],
  );

  let err = env.importer().import("evil.zip", ImportOptions::default()).unwrap_err();

  assert_eq!(err.kind(), ImportErrorKind::PathEscape);
  assert!(!env.storage_root().exists());
  assert!(!env.temp.path().join("escape.txt").exists());
  assert!(!env.server_record(SERVER_ID).exists());
  assert!(file_tree(env.temp.path()).keys().all(|path| !path.ends_with("escape.txt")));
}
