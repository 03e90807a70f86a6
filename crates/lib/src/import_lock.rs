//! Per-server file locking so two imports of the same server never interleave.
//!
//! Imports of different servers proceed independently; each takes an
//! exclusive advisory lock on `{lock_dir}/{server_id}.lock` for the duration of
//! load, reconcile, materialize and commit.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct LockMetadata {
  pub version: u32,
  pub pid: u32,
  pub started_at: DateTime<Utc>,
  pub command: String,
  pub server_id: Uuid,
}

#[derive(Debug, Error)]
pub enum ImportLockError {
  #[error(
    "Server {server_id} is being imported by another process: {command} (PID {pid}, started {started_at})\n\
             If you're sure no lanserve process is running, remove the lock file:\n  {lock_path}"
  )]
  Contention {
    server_id: Uuid,
    command: String,
    pid: u32,
    started_at: String,
    lock_path: PathBuf,
  },

  #[error(
    "Server {server_id} is locked (could not read lock metadata)\n\
             If you're sure no lanserve process is running, remove the lock file:\n  {lock_path}"
  )]
  ContentionUnknown { server_id: Uuid, lock_path: PathBuf },

  #[error("Failed to create lock directory: {0}")]
  CreateDir(#[source] io::Error),

  #[error("Failed to open lock file: {0}")]
  OpenFile(#[source] io::Error),

  #[error("Failed to write lock metadata: {0}")]
  WriteMetadata(#[source] io::Error),

  #[error("Failed to acquire lock: {0}")]
  LockFailed(#[source] io::Error),
}

/// Held exclusive lock for one server. Released on drop.
#[derive(Debug)]
pub struct ImportLock {
  file: File,
  lock_path: PathBuf,
}

impl ImportLock {
  /// Take the lock without blocking; contention is an immediate error.
  pub fn acquire(lock_dir: &Path, server_id: Uuid, command: &str) -> Result<Self, ImportLockError> {
    let lock_path = lock_dir.join(format!("{server_id}.lock"));

    if !lock_dir.exists() {
      std::fs::create_dir_all(lock_dir).map_err(ImportLockError::CreateDir)?;
    }

    let file = OpenOptions::new()
      .read(true)
      .write(true)
      .create(true)
      .truncate(false)
      .open(&lock_path)
      .map_err(ImportLockError::OpenFile)?;

    if let Err(err) = try_lock_exclusive(&file) {
      if err.kind() == io::ErrorKind::WouldBlock {
        return Err(read_contention_error(&lock_path, server_id));
      }
      return Err(ImportLockError::LockFailed(err));
    }

    write_metadata(&file, command, server_id)?;
    debug!(%server_id, path = %lock_path.display(), "acquired import lock");

    Ok(ImportLock { file, lock_path })
  }

  /// Reads the lock metadata from the held file handle.
  ///
  /// Opening a second handle would fail on Windows due to mandatory locking.
  pub fn read_metadata(&self) -> io::Result<LockMetadata> {
    use std::io::{Seek, SeekFrom};

    let mut file = &self.file;
    file.seek(SeekFrom::Start(0))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    serde_json::from_str(&contents).map_err(io::Error::other)
  }

  pub fn lock_path(&self) -> &Path {
    &self.lock_path
  }
}

fn write_metadata(file: &File, command: &str, server_id: Uuid) -> Result<(), ImportLockError> {
  let metadata = LockMetadata {
    version: 1,
    pid: std::process::id(),
    started_at: Utc::now(),
    command: command.to_string(),
    server_id,
  };

  file.set_len(0).map_err(ImportLockError::WriteMetadata)?;
  let mut writer = io::BufWriter::new(file);
  serde_json::to_writer_pretty(&mut writer, &metadata)
    .map_err(|e| ImportLockError::WriteMetadata(io::Error::other(e)))?;
  writer.flush().map_err(ImportLockError::WriteMetadata)?;

  Ok(())
}

fn read_contention_error(lock_path: &Path, server_id: Uuid) -> ImportLockError {
  if let Ok(mut file) = File::open(lock_path) {
    let mut contents = String::new();
    if file.read_to_string(&mut contents).is_ok()
      && let Ok(metadata) = serde_json::from_str::<LockMetadata>(&contents)
    {
      return ImportLockError::Contention {
        server_id,
        command: metadata.command,
        pid: metadata.pid,
        started_at: metadata.started_at.to_rfc3339(),
        lock_path: lock_path.to_path_buf(),
      };
    }
  }

  ImportLockError::ContentionUnknown {
    server_id,
    lock_path: lock_path.to_path_buf(),
  }
}

#[cfg(unix)]
fn try_lock_exclusive(file: &File) -> io::Result<()> {
  use rustix::fs::{FlockOperation, flock};
  use std::os::unix::io::AsFd;

  flock(file.as_fd(), FlockOperation::NonBlockingLockExclusive)
    .map_err(|e| io::Error::from_raw_os_error(e.raw_os_error()))
}

#[cfg(windows)]
fn try_lock_exclusive(file: &File) -> io::Result<()> {
  use std::os::windows::io::AsRawHandle;
  use windows_sys::Win32::Foundation::HANDLE;
  use windows_sys::Win32::Storage::FileSystem::{LOCKFILE_EXCLUSIVE_LOCK, LOCKFILE_FAIL_IMMEDIATELY, LockFileEx};

  let handle = file.as_raw_handle() as HANDLE;

  // SAFETY: OVERLAPPED is a plain data struct that is valid when zero-initialized.
  // LockFileEx is safe to call with a valid file handle and zeroed OVERLAPPED.
  let result = unsafe {
    let mut overlapped = std::mem::zeroed();
    LockFileEx(
      handle,
      LOCKFILE_FAIL_IMMEDIATELY | LOCKFILE_EXCLUSIVE_LOCK,
      0,
      1,
      0,
      &mut overlapped,
    )
  };

  if result == 0 {
    Err(io::Error::last_os_error())
  } else {
    Ok(())
  }
}
