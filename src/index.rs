//! Reading and encoding the JSON index file, the ordered list of every post
//! published so far.
//!
//! Existing entries are kept as plain JSON values rather than
//! [`crate::post::PostRecord`]s: whatever an entry holds (missing fields,
//! extra keys, key order) is written back exactly as it was read.

use serde_json::Value;
use std::io;
use std::path::Path;
use tracing::debug;

/// Loads the entries of the index file at `path`.
///
/// A missing file, or one which isn't a JSON array, is treated as an empty
/// index so the first run works without any setup. The next successful
/// publish overwrites such a file. Other I/O failures (e.g., permission
/// denied) are returned since overwriting an index we couldn't read would
/// silently drop its posts.
pub fn load(path: &Path) -> io::Result<Vec<Value>> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "index file not found; starting empty");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e),
    };

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Array(entries)) => Ok(entries),
        Ok(_) => {
            debug!(path = %path.display(), "index file is not an array; starting empty");
            Ok(Vec::new())
        }
        Err(err) => {
            debug!(path = %path.display(), %err, "index file is malformed; starting empty");
            Ok(Vec::new())
        }
    }
}

/// Returns an entry's `id`, or 0 if it has none (or it isn't a non-negative
/// integer).
pub fn entry_id(entry: &Value) -> u64 {
    entry.get("id").and_then(Value::as_u64).unwrap_or(0)
}

/// Returns the id for the next post: one more than the largest id in
/// `entries`, or 1 if there are none. Returns `None` if the largest id is
/// already `u64::MAX`.
pub fn next_id(entries: &[Value]) -> Option<u64> {
    entries.iter().map(entry_id).max().unwrap_or(0).checked_add(1)
}

/// Encodes `entries` as a pretty-printed JSON array with 2-space indentation.
pub fn encode(entries: &[Value]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(entries)
}
