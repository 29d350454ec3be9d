// ABOUTME: Token collection data types exchanged with the host token store
// ABOUTME: Snapshots of existing tokens in, ordered write sets and summaries out

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::color::Rgba;

/// The two halves of a ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Mode {
    Light,
    Dark,
}

impl Mode {
    /// Mode implied by a bare scale position: up to 500 is Light.
    pub fn for_position(position: i32) -> Self {
        if position <= 500 { Mode::Light } else { Mode::Dark }
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Light => "Light",
            Mode::Dark => "Dark",
        }
    }

    pub fn is_light(self) -> bool {
        self == Mode::Light
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value stored for one mode of a token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum TokenValue {
    Direct(Rgba),
    /// Reference to another token by id.
    Alias(String),
}

impl TokenValue {
    pub fn as_direct(&self) -> Option<Rgba> {
        match self {
            TokenValue::Direct(rgba) => Some(*rgba),
            TokenValue::Alias(_) => None,
        }
    }
}

/// A mode of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionMode {
    pub id: String,
    pub name: String,
}

/// `{id, name}` pair used when listing collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionInfo {
    pub id: String,
    pub name: String,
}

/// An existing token and its per-mode values, keyed by mode id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub values_by_mode: BTreeMap<String, TokenValue>,
}

/// Everything the engine needs to know about one target collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExistingTokenSnapshot {
    pub collection_id: String,
    pub collection_name: String,
    pub modes: Vec<CollectionMode>,
    pub tokens: Vec<TokenRecord>,
}

impl ExistingTokenSnapshot {
    /// Look up a mode by name (exact match).
    pub fn mode_by_name(&self, name: &str) -> Option<&CollectionMode> {
        self.modes.iter().find(|m| m.name == name)
    }

    /// The first mode of the collection, used when a write names no mode.
    pub fn default_mode(&self) -> Option<&CollectionMode> {
        self.modes.first()
    }

    /// Look up a token by exact, case-sensitive name.
    pub fn token_by_name(&self, name: &str) -> Option<&TokenRecord> {
        self.tokens.iter().find(|t| t.name == name)
    }
}

/// One value to write to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenWrite {
    pub name: String,
    /// Mode name; resolved to an id by the store when written.
    pub mode: String,
    pub value: Rgba,
    pub is_new: bool,
}

/// Ordered writes for one collection plus bookkeeping for the summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenWriteSet {
    pub writes: Vec<TokenWrite>,
    /// Entries computed but deliberately not written.
    pub skipped: usize,
    /// Modes referenced by writes but missing from the collection.
    pub new_modes: Vec<String>,
}

impl TokenWriteSet {
    pub fn summary(&self) -> WriteSummary {
        let new = self.writes.iter().filter(|w| w.is_new).count();
        WriteSummary {
            new,
            updated: self.writes.len() - new,
            skipped: self.skipped,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// Find the write for `name` in `mode`.
    pub fn get(&self, name: &str, mode: &str) -> Option<&TokenWrite> {
        self.writes
            .iter()
            .find(|w| w.name == name && w.mode == mode)
    }
}

/// Counts reported back to the user after a pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteSummary {
    pub new: usize,
    pub updated: usize,
    pub skipped: usize,
}

impl fmt::Display for WriteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Created {} new variables, updated {} existing variables",
            self.new, self.updated
        )?;
        if self.skipped > 0 {
            write!(f, ", skipped {}", self.skipped)?;
        }
        Ok(())
    }
}
