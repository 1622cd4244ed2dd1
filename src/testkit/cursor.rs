//! In-memory [`CursorStore`].

use parking_lot::Mutex;

use crate::error::{Result, StoreError};
use crate::port::CursorStore;

/// Cursor store that keeps the value in memory and can be told to fail.
#[derive(Default)]
pub struct MemoryCursorStore {
    cursor: Mutex<Option<u64>>,
    fail_saves: Mutex<bool>,
}

impl MemoryCursorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cursor(cursor: u64) -> Self {
        Self {
            cursor: Mutex::new(Some(cursor)),
            ..Self::default()
        }
    }

    pub fn current(&self) -> Option<u64> {
        *self.cursor.lock()
    }

    pub fn fail_saves(&self, fail: bool) {
        *self.fail_saves.lock() = fail;
    }
}

impl CursorStore for MemoryCursorStore {
    fn load(&self) -> Result<Option<u64>> {
        Ok(*self.cursor.lock())
    }

    fn save(&self, cursor: u64) -> Result<()> {
        if *self.fail_saves.lock() {
            return Err(StoreError::Io {
                path: "memory".into(),
                source: std::io::Error::other("injected failure"),
            }
            .into());
        }
        *self.cursor.lock() = Some(cursor);
        Ok(())
    }
}
