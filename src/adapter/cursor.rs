//! JSON file [`CursorStore`].
//!
//! The file records the last block whose lifecycle events were fully
//! applied. It is rewritten atomically after every advance so a crash
//! never leaves a half-written cursor behind.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};
use crate::port::CursorStore;

/// Current cursor file format version.
const CURSOR_VERSION: &str = "1";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CursorFile {
    version: String,
    last_scanned_block: u64,
    updated_at: DateTime<Utc>,
}

/// Cursor persisted as a small JSON document.
#[derive(Debug, Clone)]
pub struct JsonCursorStore {
    path: PathBuf,
}

impl JsonCursorStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl CursorStore for JsonCursorStore {
    fn load(&self) -> Result<Option<u64>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e).into()),
        };

        let file: CursorFile =
            serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
                path: self.path.display().to_string(),
                source,
            })?;

        Ok(Some(file.last_scanned_block))
    }

    /// Write to a sibling temp file, sync, then rename over the target.
    fn save(&self, cursor: u64) -> Result<()> {
        let json = serde_json::to_string_pretty(&CursorFile {
            version: CURSOR_VERSION.to_string(),
            last_scanned_block: cursor,
            updated_at: Utc::now(),
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let temp_path = self.path.with_extension("tmp");
        let cleanup_and_err = |e| {
            let _ = fs::remove_file(&temp_path);
            self.io_error(e)
        };

        let mut file = fs::File::create(&temp_path).map_err(|e| self.io_error(e))?;
        file.write_all(json.as_bytes()).map_err(cleanup_and_err)?;
        file.sync_all().map_err(cleanup_and_err)?;

        fs::rename(&temp_path, &self.path).map_err(cleanup_and_err)?;

        Ok(())
    }
}
