//! Import properties: idempotence, identity, soft references, failure isolation.

use std::fs;

use lanserve_lib::import::{ImportErrorKind, ImportOptions};
use lanserve_lib::model::{ConsoleType, ScriptType};
use lanserve_lib::store::ServerStore;

use super::common::{C1, C2, GAME_ID, S1, SERVER_ID, TestEnv, file_tree, quake_manifest, script_entry};

fn write_quake_bundle(env: &TestEnv) {
  let manifest = quake_manifest(&[C1, C2]);
  let script = script_entry();
  env.write_bundle(
    "quake.zip",
    &[
      ("Manifest.yml", manifest.as_str()),
      (script.as_str(), "echo install"),
      ("Files/baseq3/", ""),
      ("Files/baseq3/server.cfg", "set sv_hostname lan"),
    ],
  );
}

#[test]
fn importing_twice_is_idempotent() {
  let env = TestEnv::new();
  env.register_game(GAME_ID);
  write_quake_bundle(&env);

  env.importer().import("quake.zip", ImportOptions::default()).unwrap();
  let record_after_first = fs::read_to_string(env.server_record(SERVER_ID)).unwrap();
  let files_after_first = file_tree(&env.storage_root());

  let outcome = env.importer().import("quake.zip", ImportOptions::default()).unwrap();

  assert_eq!(fs::read_to_string(env.server_record(SERVER_ID)).unwrap(), record_after_first);
  assert_eq!(file_tree(&env.storage_root()), files_after_first);
  assert_eq!(outcome.reconcile.consoles.added, 0);
  assert_eq!(outcome.reconcile.consoles.removed, 0);
  assert_eq!(outcome.reconcile.consoles.updated, 2);
}

#[test]
fn update_preserves_local_console_password() {
  let env = TestEnv::new();
  write_quake_bundle(&env);
  env.importer().import("quake.zip", ImportOptions::default()).unwrap();

  let store = env.store();
  let mut server = store.load_server(SERVER_ID).unwrap().unwrap();
  server.consoles[0].password = Some("hunter2".into());
  store.commit(server).unwrap();

  env.importer().import("quake.zip", ImportOptions::default()).unwrap();

  let server = store.load_server(SERVER_ID).unwrap().unwrap();
  assert_eq!(server.consoles[0].id, C1);
  assert_eq!(server.consoles[0].password.as_deref(), Some("hunter2"));
}

#[test]
fn unknown_game_leaves_reference_unset() {
  let env = TestEnv::new();
  write_quake_bundle(&env);

  let outcome = env.importer().import("quake.zip", ImportOptions::default()).unwrap();

  assert_eq!(outcome.server.game_id, None);
  assert!(!outcome.reconcile.game_linked);
}

#[test]
fn game_registered_later_is_linked_on_reimport() {
  let env = TestEnv::new();
  write_quake_bundle(&env);
  env.importer().import("quake.zip", ImportOptions::default()).unwrap();

  env.register_game(GAME_ID);
  let outcome = env.importer().import("quake.zip", ImportOptions::default()).unwrap();

  assert_eq!(outcome.server.game_id, Some(GAME_ID));
}

#[test]
fn literal_bundle_path_is_accepted() {
  let env = TestEnv::new();
  write_quake_bundle(&env);
  let path = env.archive_dir().join("quake.zip");

  let outcome = env
    .importer()
    .import(path.to_str().unwrap(), ImportOptions::default())
    .unwrap();
  assert_eq!(outcome.bundle, path);
}

#[test]
fn missing_manifest_is_reported() {
  let env = TestEnv::new();
  env.write_bundle("empty.zip", &[("Files/readme.txt", "hi")]);

  let err = env.importer().import("empty.zip", ImportOptions::default()).unwrap_err();
  assert_eq!(err.kind(), ImportErrorKind::ManifestMissing);
}

#[test]
fn corrupt_archive_is_reported() {
  let env = TestEnv::new();
  fs::create_dir_all(env.archive_dir()).unwrap();
  fs::write(env.archive_dir().join("broken.zip"), b"PK not really").unwrap();

  let err = env.importer().import("broken.zip", ImportOptions::default()).unwrap_err();
  assert_eq!(err.kind(), ImportErrorKind::CorruptArchive);
}

#[test]
fn missing_script_body_writes_nothing() {
  let env = TestEnv::new();
  let manifest = quake_manifest(&[C1]);
  env.write_bundle(
    "quake.zip",
    &[("Manifest.yml", manifest.as_str()), ("Files/server.cfg", "set sv_hostname lan")],
  );

  let err = env.importer().import("quake.zip", ImportOptions::default()).unwrap_err();

  assert_eq!(err.kind(), ImportErrorKind::ScriptContentMissing);
  assert!(!env.storage_root().exists());
  assert!(!env.server_record(SERVER_ID).exists());
}

#[test]
fn failed_reimport_keeps_previous_state() {
  let env = TestEnv::new();
  write_quake_bundle(&env);
  env.importer().import("quake.zip", ImportOptions::default()).unwrap();
  let before = fs::read_to_string(env.server_record(SERVER_ID)).unwrap();

  env.write_bundle("quake.zip", &[("Manifest.yml", "Id: not-a-uuid\n")]);
  let err = env.importer().import("quake.zip", ImportOptions::default()).unwrap_err();

  assert_eq!(err.kind(), ImportErrorKind::MalformedManifest);
  assert_eq!(fs::read_to_string(env.server_record(SERVER_ID)).unwrap(), before);
}

#[test]
fn dry_run_touches_neither_disk_nor_store() {
  let env = TestEnv::new();
  write_quake_bundle(&env);

  let outcome = env
    .importer()
    .import("quake.zip", ImportOptions { dry_run: true })
    .unwrap();

  assert!(outcome.dry_run);
  assert_eq!(outcome.files.files_written, 1);
  assert_eq!(outcome.files.directories_created, 1);
  assert!(!env.storage_root().exists());
  assert!(!env.server_record(SERVER_ID).exists());
}

#[test]
fn reimport_updates_every_attribute_of_matched_items() {
  let env = TestEnv::new();
  write_quake_bundle(&env);
  let first = env.importer().import("quake.zip", ImportOptions::default()).unwrap().server;

  let manifest = quake_manifest(&[C1])
    .replace(
      "    Name: Console 0\n    Type: RCON\n    Port: 27960\n",
      "    Name: Server log\n    Type: LogFile\n    Path: logs/qconsole.log\n    Host: 10.0.0.5\n    Port: 27961\n",
    )
    .replace("    Path: /maps\n", "    Path: /downloads\n")
    .replace(
      "    Name: Install\n    Type: Install\n",
      "    Name: Prepare\n    Description: Warm caches\n    RequiresAdmin: true\n    Type: BeforeStart\n",
    );
  let script = script_entry();
  env.write_bundle(
    "quake.zip",
    &[("Manifest.yml", manifest.as_str()), (script.as_str(), "echo prepare")],
  );

  let outcome = env.importer().import("quake.zip", ImportOptions::default()).unwrap();
  let server = env.store().load_server(SERVER_ID).unwrap().unwrap();
  assert_eq!(server, outcome.server);

  let console = &server.consoles[0];
  assert_eq!(console.id, C1);
  assert_eq!(console.name, "Server log");
  assert_eq!(console.console_type, ConsoleType::LogFile);
  assert_eq!(console.path, "logs/qconsole.log");
  assert_eq!(console.host, "10.0.0.5");
  assert_eq!(console.port, 27961);

  assert_eq!(server.http_paths[0].id, first.http_paths[0].id);
  assert_eq!(server.http_paths[0].path, "/downloads");

  let script = &server.scripts[0];
  assert_eq!(script.id, S1);
  assert_eq!(script.name, "Prepare");
  assert_eq!(script.description, "Warm caches");
  assert!(script.requires_admin);
  assert_eq!(script.script_type, ScriptType::BeforeStart);
  assert_eq!(script.contents, "echo prepare");
  assert_eq!(script.created_on, first.scripts[0].created_on);
}
