//! Whole-file persistence helpers shared by the stores.
//!
//! Writes go to a temporary file in the destination directory and are
//! renamed into place, so a reader sees either the old or the new
//! collection, never a partial one.

use crate::error::CardError;
use serde::{Serialize, de::DeserializeOwned};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Read and parse a JSON file. `Ok(None)` when the file does not exist.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, CardError> {
    let contents = match fs::read(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(read_error(path, e)),
    };
    serde_json::from_slice(&contents)
        .map(Some)
        .map_err(|e| read_error(path, e))
}

pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), CardError> {
    let payload = serde_json::to_vec_pretty(value).map_err(|e| write_error(path, e))?;
    write_bytes(path, &payload)
}

pub fn write_bytes(path: &Path, bytes: &[u8]) -> Result<(), CardError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| write_error(path, e))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| write_error(path, e))?;
    tmp.write_all(bytes).map_err(|e| write_error(path, e))?;
    tmp.as_file().sync_all().map_err(|e| write_error(path, e))?;
    tmp.persist(path).map_err(|e| write_error(path, e.error))?;
    Ok(())
}

/// Remove a file. `Ok(false)` when there was nothing to remove.
pub fn remove(path: &Path) -> Result<bool, CardError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(write_error(path, e)),
    }
}

fn read_error(path: &Path, e: impl std::fmt::Display) -> CardError {
    CardError::StorageRead {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}

fn write_error(path: &Path, e: impl std::fmt::Display) -> CardError {
    CardError::StorageWrite {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}
