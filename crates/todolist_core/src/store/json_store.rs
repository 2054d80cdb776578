//! JSON file store.
//!
//! # Responsibility
//! - Persist the collection as one JSON array in a single file.
//! - Replace the file atomically on save (temp file + rename).
//!
//! # Invariants
//! - A missing file reads as an empty collection.
//! - Unknown, missing or mistyped fields are rejected, never defaulted.

use super::{StoreError, StoreResult, TodoStore};
use crate::model::record::Record;
use log::{error, info};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Default file name used when the caller does not pick one.
pub const DEFAULT_SAVE_FILE: &str = "todo_save.json";

/// File-backed store holding the collection as a JSON array.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `DEFAULT_SAVE_FILE` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(DEFAULT_SAVE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_records(&self) -> StoreResult<Vec<Record>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(StoreError::io(self.name(), err.to_string())),
        };

        serde_json::from_slice::<Vec<Record>>(&bytes)
            .map_err(|err| StoreError::deserialization(self.name(), err.to_string()))
    }

    fn write_records(&self, items: &[Record]) -> StoreResult<()> {
        let io_err = |path: &Path, err: std::io::Error| {
            StoreError::io(self.name(), format!("{}: {err}", path.display()))
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| io_err(parent, err))?;
            }
        }

        let tmp_path = tmp_write_path(&self.path);
        let write_result = (|| -> StoreResult<()> {
            let file = File::create(&tmp_path).map_err(|err| io_err(&tmp_path, err))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, items)
                .map_err(|err| StoreError::io(self.name(), err.to_string()))?;
            writer.flush().map_err(|err| io_err(&tmp_path, err))?;
            let file = writer
                .into_inner()
                .map_err(|err| io_err(&tmp_path, err.into_error()))?;
            file.sync_all().map_err(|err| io_err(&tmp_path, err))?;
            Ok(())
        })();

        if let Err(err) = write_result {
            let _ = fs::remove_file(&tmp_path);
            return Err(err);
        }

        fs::rename(&tmp_path, &self.path).map_err(|err| {
            let _ = fs::remove_file(&tmp_path);
            io_err(&self.path, err)
        })
    }
}

impl TodoStore for JsonFileStore {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> StoreResult<Vec<Record>> {
        let started_at = Instant::now();
        match self.read_records() {
            Ok(records) => {
                info!(
                    "event=store_load module=store status=ok backend=json count={} duration_ms={}",
                    records.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(records)
            }
            Err(err) => {
                error!(
                    "event=store_load module=store status=error backend=json duration_ms={} error_code={} error={}",
                    started_at.elapsed().as_millis(),
                    err.code(),
                    err
                );
                Err(err)
            }
        }
    }

    fn save(&self, items: &[Record]) -> StoreResult<()> {
        let started_at = Instant::now();
        match self.write_records(items) {
            Ok(()) => {
                info!(
                    "event=store_save module=store status=ok backend=json count={} duration_ms={}",
                    items.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=store_save module=store status=error backend=json duration_ms={} error_code={} error={}",
                    started_at.elapsed().as_millis(),
                    err.code(),
                    err
                );
                Err(err)
            }
        }
    }
}

fn tmp_write_path(path: &Path) -> PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let mut tmp: OsString = path.as_os_str().to_os_string();
    tmp.push(format!(".tmp.{}.{}", std::process::id(), unique));
    PathBuf::from(tmp)
}
