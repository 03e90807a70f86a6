//! Manifest decoding and structural validation.

use std::collections::HashSet;

use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use super::types::ServerManifest;

/// The manifest could not be turned into a usable desired state.
#[derive(Debug, Error)]
pub enum ManifestError {
  /// The document is not valid YAML or does not match the manifest shape.
  #[error("malformed manifest: {0}")]
  Parse(#[source] serde_yaml::Error),

  /// The root identity is absent or nil.
  #[error("malformed manifest: missing server Id")]
  MissingId,

  /// A collection item has no identity to match on.
  #[error("malformed manifest: {collection} entry {index} has no Id")]
  MissingItemId { collection: &'static str, index: usize },

  /// Two items in one collection share an identity.
  #[error("malformed manifest: duplicate Id {id} in {collection}")]
  DuplicateId { collection: &'static str, id: Uuid },
}

/// Decode manifest text into a validated [`ServerManifest`].
///
/// Pure: performs no I/O. Everything but the root `Id` is optional; missing
/// collections decode as empty and a missing game reference as `None`.
pub fn decode(text: &str) -> Result<ServerManifest, ManifestError> {
  let manifest: ServerManifest = serde_yaml::from_str(text).map_err(ManifestError::Parse)?;

  match manifest.id {
    Some(id) if !id.is_nil() => {}
    _ => return Err(ManifestError::MissingId),
  }

  check_ids("ServerConsoles", manifest.server_consoles.iter().map(|c| Some(c.id)))?;
  check_ids("HttpPaths", manifest.http_paths.iter().map(|p| Some(p.id)))?;
  check_ids("Scripts", manifest.scripts.iter().map(|s| Some(s.id)))?;

  // Action IDs are optional and a nil ID counts as absent; only real ones must be unique.
  let action_ids = manifest.actions.iter().filter_map(|a| a.id).filter(|id| !id.is_nil()).map(Some);
  check_ids("Actions", action_ids)?;

  debug!(
    server_id = %manifest.server_id(),
    consoles = manifest.server_consoles.len(),
    http_paths = manifest.http_paths.len(),
    scripts = manifest.scripts.len(),
    actions = manifest.actions.len(),
    "decoded manifest"
  );

  Ok(manifest)
}

fn check_ids(collection: &'static str, ids: impl Iterator<Item = Option<Uuid>>) -> Result<(), ManifestError> {
  let mut seen = HashSet::new();
  for (index, id) in ids.enumerate() {
    let id = match id {
      Some(id) if !id.is_nil() => id,
      _ => return Err(ManifestError::MissingItemId { collection, index }),
    };
    if !seen.insert(id) {
      return Err(ManifestError::DuplicateId { collection, id });
    }
  }
  Ok(())
}
