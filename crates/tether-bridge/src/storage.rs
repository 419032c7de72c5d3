//! Persistent key/value storage for the application state blob.

use crate::error::Result;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Key the application state is stored under.
pub const DEFAULT_STORAGE_KEY: &str = "model";

/// Synchronous string storage, shaped after the browser's `localStorage`.
pub trait Storage {
    /// Stored text for `key`, or `None` if nothing was stored.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the text stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// In-memory storage.
///
/// Clones share the same entries, so a handle kept outside the bridge sees
/// every write the bridge makes.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    pub fn get_raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.get_raw(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.insert(key, value);
        Ok(())
    }
}
