//! Test utilities for lanserve-lib.
//!
//! Helpers for building bundle archives on disk without fixture files.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Write a zip bundle named `bundle.zip` into `dir` and return its path.
///
/// Names ending in `/` become directory entries; everything else is written
/// as a file with the given content, in the order given.
pub fn write_bundle(dir: &Path, entries: &[(&str, &str)]) -> PathBuf {
  let path = dir.join("bundle.zip");
  let file = File::create(&path).unwrap();
  let mut zip = ZipWriter::new(file);
  let options = SimpleFileOptions::default();

  for (name, content) in entries {
    if name.ends_with('/') {
      zip.add_directory(*name, options).unwrap();
    } else {
      zip.start_file(*name, options).unwrap();
      zip.write_all(content.as_bytes()).unwrap();
    }
  }

  zip.finish().unwrap();
  path
}
