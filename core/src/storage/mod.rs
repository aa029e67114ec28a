//! Durable key-value storage for the session token and checklist state.
//!
//! Every key is namespaced and versioned so a future format change can live
//! next to old data instead of misreading it.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::prelude::FireResult;
use log::debug;
use std::collections::BTreeSet;

const KEY_PREFIX: &str = "fireflight";
const KEY_VERSION: u32 = 1;

/// Backend for raw string values.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> FireResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> FireResult<()>;
    fn remove(&self, key: &str) -> FireResult<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKey {
    Token,
    CheckedItems,
}

impl StorageKey {
    pub const ALL: [StorageKey; 2] = [StorageKey::Token, StorageKey::CheckedItems];

    fn name(self) -> &'static str {
        match self {
            StorageKey::Token => "token",
            StorageKey::CheckedItems => "checked_items",
        }
    }

    pub fn versioned(self) -> String {
        format!("{KEY_PREFIX}.v{KEY_VERSION}.{}", self.name())
    }
}

/// Typed access to the persisted client state.
pub struct Storage {
    backend: Box<dyn KeyValueStore>,
}

impl Storage {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    pub fn token(&self) -> FireResult<Option<String>> {
        Ok(self
            .backend
            .get(&StorageKey::Token.versioned())?
            .filter(|token| !token.is_empty()))
    }

    pub fn set_token(&self, token: &str) -> FireResult<()> {
        self.backend.set(&StorageKey::Token.versioned(), token)
    }

    pub fn clear_token(&self) -> FireResult<()> {
        self.backend.remove(&StorageKey::Token.versioned())
    }

    pub fn checked_items(&self) -> FireResult<BTreeSet<String>> {
        match self.backend.get(&StorageKey::CheckedItems.versioned())? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(BTreeSet::new()),
        }
    }

    pub fn set_checked_items(&self, items: &BTreeSet<String>) -> FireResult<()> {
        let raw = serde_json::to_string(items)?;
        self.backend.set(&StorageKey::CheckedItems.versioned(), &raw)
    }

    /// Removes every key this client owns.
    pub fn clear(&self) -> FireResult<()> {
        for key in StorageKey::ALL {
            self.backend.remove(&key.versioned())?;
        }
        debug!("cleared local storage");
        Ok(())
    }
}
