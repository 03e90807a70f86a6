//! Lexical path helpers for archive entries and derived directories.
//!
//! Nothing here touches the filesystem: containment is decided on the path
//! text alone so a hostile entry is rejected before any directory exists.

use std::path::PathBuf;

/// Characters that are invalid in a file name on at least one supported platform.
const INVALID_FILENAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Strip characters that cannot appear in a single path component.
///
/// Control characters and platform-reserved punctuation are removed, then
/// surrounding whitespace and trailing dots are trimmed. Returns an empty
/// string when nothing usable remains (including `.` and `..`).
pub fn sanitize_filename(name: &str) -> String {
  let filtered: String = name
    .chars()
    .filter(|c| !c.is_control() && !INVALID_FILENAME_CHARS.contains(c))
    .collect();

  let trimmed = filtered.trim().trim_end_matches('.').trim_end();
  trimmed.to_string()
}

/// Normalize an archive-relative path into platform components.
///
/// Accepts both `/` and `\` as separators and drops empty and `.` segments.
/// Returns `None` for anything that could leave the directory it is joined
/// onto: a `..` segment, a leading separator, or a drive/stream designator.
pub fn normalize_relative(raw: &str) -> Option<PathBuf> {
  if raw.starts_with('/') || raw.starts_with('\\') {
    return None;
  }

  let mut normalized = PathBuf::new();
  for segment in raw.split(['/', '\\']) {
    match segment {
      "" | "." => continue,
      ".." => return None,
      s if s.contains(':') => return None,
      s => normalized.push(s),
    }
  }
  Some(normalized)
}
