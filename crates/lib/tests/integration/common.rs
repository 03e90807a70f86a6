//! Shared test helpers for import integration tests.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use lanserve_lib::import::Importer;
use lanserve_lib::locate::DirectoryLocator;
use lanserve_lib::model::Game;
use lanserve_lib::store::JsonStore;
use tempfile::TempDir;
use uuid::Uuid;
use walkdir::WalkDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

pub const SERVER_ID: Uuid = Uuid::from_u128(0x5f0b_6d8e_2c1a_4b53_9a0e_0d6b_2f6f_8e11);
pub const GAME_ID: Uuid = Uuid::from_u128(0x8a1e_3c0d_6f4b_4e8e_b1b5_3e2f_1d0c_9b7a);
pub const C1: Uuid = Uuid::from_u128(0x0c4f_0000_0000_4000_8000_0000_0000_0c01);
pub const C2: Uuid = Uuid::from_u128(0x0c4f_0000_0000_4000_8000_0000_0000_0c02);
pub const S1: Uuid = Uuid::from_u128(0x05c1_0000_0000_4000_8000_0000_0000_0501);

/// Isolated test environment.
///
/// Each test gets its own temporary directory with isolated archive, data and
/// storage paths.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn new() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  pub fn archive_dir(&self) -> PathBuf {
    self.temp.path().join("archives")
  }

  pub fn data_dir(&self) -> PathBuf {
    self.temp.path().join("data")
  }

  pub fn storage_root(&self) -> PathBuf {
    self.temp.path().join("server-files")
  }

  pub fn store(&self) -> JsonStore {
    JsonStore::new(self.data_dir())
  }

  pub fn importer(&self) -> Importer<DirectoryLocator, JsonStore> {
    Importer::new(
      DirectoryLocator::new(self.archive_dir()),
      self.store(),
      self.storage_root(),
      self.data_dir().join("locks"),
    )
  }

  pub fn register_game(&self, id: Uuid) {
    self
      .store()
      .register_game(&Game {
        id,
        title: "Quake".into(),
      })
      .unwrap();
  }

  /// Write a bundle into the archive directory. Names ending in `/` become
  /// directory entries.
  pub fn write_bundle(&self, name: &str, entries: &[(&str, &str)]) -> PathBuf {
    std::fs::create_dir_all(self.archive_dir()).unwrap();
    let path = self.archive_dir().join(name);
    let mut zip = ZipWriter::new(File::create(&path).unwrap());
    let options = SimpleFileOptions::default();

    for (entry, content) in entries {
      if entry.ends_with('/') {
        zip.add_directory(*entry, options).unwrap();
      } else {
        zip.start_file(*entry, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
      }
    }

    zip.finish().unwrap();
    path
  }

  /// Path of the persisted server record.
  pub fn server_record(&self, id: Uuid) -> PathBuf {
    self.data_dir().join("servers").join(format!("{id}.json"))
  }
}

/// Every file under `root` with its content, keyed by relative path.
pub fn file_tree(root: &Path) -> BTreeMap<String, Vec<u8>> {
  WalkDir::new(root)
    .into_iter()
    .map(|entry| entry.unwrap())
    .filter(|entry| entry.file_type().is_file())
    .map(|entry| {
      let relative = entry.path().strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/");
      (relative, std::fs::read(entry.path()).unwrap())
    })
    .collect()
}

/// Manifest for the Quake server with the given consoles.
pub fn quake_manifest(consoles: &[Uuid]) -> String {
  let mut manifest = format!(
    "\
Id: {SERVER_ID}
Name: Quake Server
Autostart: true
AutostartMethod: OnPlayerActivity
AutostartDelay: 5
ProcessTerminationMethod: SIGTERM
WorkingDirectory: C:\\Servers\\Quake
Game:
  Id: {GAME_ID}
HttpPaths:
  - Id: 00000000-0000-0000-0000-00000000b001
    Path: /maps
    LocalPath: C:\\Servers\\Quake\\baseq3
Scripts:
  - Id: {S1}
    Name: Install
    Type: Install
Actions:
  - Name: Start
    Path: quake3.exe
    Arguments: +set dedicated 2
    IsPrimaryAction: true
    SortOrder: 0
"
  );

  if !consoles.is_empty() {
    manifest.push_str("ServerConsoles:\n");
    for (index, id) in consoles.iter().enumerate() {
      manifest.push_str(&format!("  - Id: {id}\n    Name: Console {index}\n    Type: RCON\n    Port: 27960\n"));
    }
  }

  manifest
}

/// Script body entry name for `S1`.
pub fn script_entry() -> String {
  format!("Scripts/{S1}")
}
