// ABOUTME: Host boundary for reading and writing token collections
// ABOUTME: TokenStore trait, a serde-backed in-memory store, and write-set application

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use swatchsmith_logging::{debug, info};
use swatchsmith_types::{
    CollectionInfo, CollectionMode, ExistingTokenSnapshot, TokenRecord, TokenValue, TokenWriteSet,
    WriteSummary,
};

use crate::capture::FALLBACK_MODE_NAME;
use crate::error::{Result, SwatchError};

/// Synchronous access to a host's token collections.
///
/// Collections are addressed by id or name. Modes are addressed by name.
pub trait TokenStore {
    fn collections(&self) -> Vec<CollectionInfo>;

    /// Everything known about one collection.
    fn snapshot(&self, collection: &str) -> Result<ExistingTokenSnapshot>;

    /// Find a collection by name, creating it with `modes` if absent. Modes
    /// missing from an existing collection are added.
    fn ensure_collection(&mut self, name: &str, modes: &[&str]) -> Result<CollectionInfo>;

    fn get_token(&self, collection: &str, name: &str) -> Result<Option<TokenRecord>>;

    /// Set the value of `name` in `mode`, creating the token if needed.
    fn put_token(
        &mut self,
        collection: &str,
        name: &str,
        mode: &str,
        value: TokenValue,
    ) -> Result<()>;

    /// Add a mode, or return the existing one with that name.
    fn add_mode(&mut self, collection: &str, name: &str) -> Result<CollectionMode>;
}

/// A token store held in memory and persisted as JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InMemoryTokenStore {
    collections: Vec<ExistingTokenSnapshot>,
    next_id: u64,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let store: Self = serde_json::from_str(&content)?;
        debug!(
            path = %path.display(),
            collections = store.collections.len(),
            "Loaded token store"
        );
        Ok(store)
    }

    /// Load a store, or start empty if the file does not exist yet.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            debug!(path = %path.display(), "No token store on disk; starting empty");
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        debug!(path = %path.display(), "Saved token store");
        Ok(())
    }

    fn next_id(&mut self, kind: &str) -> String {
        self.next_id += 1;
        format!("{}:{}", kind, self.next_id)
    }

    fn find(&self, collection: &str) -> Result<&ExistingTokenSnapshot> {
        self.collections
            .iter()
            .find(|c| c.collection_id == collection || c.collection_name == collection)
            .ok_or_else(|| SwatchError::missing_collection(collection))
    }

    fn position(&self, collection: &str) -> Result<usize> {
        self.collections
            .iter()
            .position(|c| c.collection_id == collection || c.collection_name == collection)
            .ok_or_else(|| SwatchError::missing_collection(collection))
    }
}

impl TokenStore for InMemoryTokenStore {
    fn collections(&self) -> Vec<CollectionInfo> {
        self.collections
            .iter()
            .map(|c| CollectionInfo {
                id: c.collection_id.clone(),
                name: c.collection_name.clone(),
            })
            .collect()
    }

    fn snapshot(&self, collection: &str) -> Result<ExistingTokenSnapshot> {
        self.find(collection).cloned()
    }

    fn ensure_collection(&mut self, name: &str, modes: &[&str]) -> Result<CollectionInfo> {
        let existing = self.find(name).ok().map(|c| c.collection_id.clone());
        let id = match existing {
            Some(id) => id,
            None => {
                let id = self.next_id("collection");
                info!(collection = name, "Creating collection");
                self.collections.push(ExistingTokenSnapshot {
                    collection_id: id.clone(),
                    collection_name: name.to_string(),
                    modes: Vec::new(),
                    tokens: Vec::new(),
                });
                id
            }
        };

        let wanted: &[&str] = if modes.is_empty() && self.find(&id)?.modes.is_empty() {
            &[FALLBACK_MODE_NAME]
        } else {
            modes
        };
        for mode in wanted {
            self.add_mode(&id, mode)?;
        }

        Ok(CollectionInfo {
            id,
            name: name.to_string(),
        })
    }

    fn get_token(&self, collection: &str, name: &str) -> Result<Option<TokenRecord>> {
        Ok(self.find(collection)?.token_by_name(name).cloned())
    }

    fn put_token(
        &mut self,
        collection: &str,
        name: &str,
        mode: &str,
        value: TokenValue,
    ) -> Result<()> {
        let index = self.position(collection)?;
        let mode_id = self.collections[index]
            .mode_by_name(mode)
            .map(|m| m.id.clone())
            .ok_or_else(|| {
                SwatchError::missing_mode(&self.collections[index].collection_name, mode)
            })?;

        let existing = self.collections[index]
            .tokens
            .iter()
            .position(|t| t.name == name);
        let token_index = match existing {
            Some(i) => i,
            None => {
                let id = self.next_id("token");
                let tokens = &mut self.collections[index].tokens;
                tokens.push(TokenRecord {
                    id,
                    name: name.to_string(),
                    values_by_mode: Default::default(),
                });
                tokens.len() - 1
            }
        };

        self.collections[index].tokens[token_index]
            .values_by_mode
            .insert(mode_id, value);
        Ok(())
    }

    fn add_mode(&mut self, collection: &str, name: &str) -> Result<CollectionMode> {
        let index = self.position(collection)?;
        if let Some(mode) = self.collections[index].mode_by_name(name) {
            return Ok(mode.clone());
        }

        let mode = CollectionMode {
            id: self.next_id("mode"),
            name: name.to_string(),
        };
        info!(
            collection = %self.collections[index].collection_name,
            mode = name,
            "Adding mode"
        );
        self.collections[index].modes.push(mode.clone());
        Ok(mode)
    }
}

/// Apply a write set to `collection`: add missing modes, write every value,
/// then report the counts.
pub fn apply_write_set<S: TokenStore + ?Sized>(
    store: &mut S,
    collection: &str,
    write_set: &TokenWriteSet,
) -> Result<WriteSummary> {
    for mode in &write_set.new_modes {
        store.add_mode(collection, mode)?;
    }
    for write in &write_set.writes {
        store.put_token(
            collection,
            &write.name,
            &write.mode,
            TokenValue::Direct(write.value),
        )?;
    }

    let summary = write_set.summary();
    info!(
        collection,
        new = summary.new,
        updated = summary.updated,
        skipped = summary.skipped,
        "Applied token writes"
    );
    Ok(summary)
}
