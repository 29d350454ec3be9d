// ABOUTME: Decides whether each computed token updates an existing one or creates a new one
// ABOUTME: Pure reconciliation against a snapshot; knows nothing about persistence

use std::collections::{BTreeSet, HashSet};

use swatchsmith_logging::debug;
use swatchsmith_types::{ExistingTokenSnapshot, Rgba, TokenWrite, TokenWriteSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeDecision {
    /// The name exists in the collection already.
    Update { token_id: Option<String> },
    Create,
}

impl MergeDecision {
    pub fn is_new(&self) -> bool {
        matches!(self, MergeDecision::Create)
    }
}

/// Reconciles computed values against one collection.
///
/// Names created earlier in the same batch are remembered so a second value
/// for the same token (another mode) counts as an update.
#[derive(Debug)]
pub struct TokenMerger<'a> {
    snapshot: &'a ExistingTokenSnapshot,
    created: HashSet<String>,
}

impl<'a> TokenMerger<'a> {
    pub fn new(snapshot: &'a ExistingTokenSnapshot) -> Self {
        Self {
            snapshot,
            created: HashSet::new(),
        }
    }

    /// Classify `name` without recording anything. Matching is exact and
    /// case-sensitive.
    pub fn decide(&self, name: &str) -> MergeDecision {
        if let Some(existing) = self.snapshot.token_by_name(name) {
            MergeDecision::Update {
                token_id: Some(existing.id.clone()),
            }
        } else if self.created.contains(name) {
            MergeDecision::Update { token_id: None }
        } else {
            MergeDecision::Create
        }
    }

    /// Classify and record one value.
    pub fn merge(&mut self, name: &str, mode: &str, value: Rgba) -> TokenWrite {
        let decision = self.decide(name);
        if decision.is_new() {
            self.created.insert(name.to_string());
        }
        TokenWrite {
            name: name.to_string(),
            mode: mode.to_string(),
            value,
            is_new: decision.is_new(),
        }
    }

    /// Merge a batch in order. Modes not present in the collection are listed
    /// in `new_modes`, first occurrence first.
    pub fn merge_batch<I, N, M>(&mut self, entries: I) -> TokenWriteSet
    where
        I: IntoIterator<Item = (N, M, Rgba)>,
        N: AsRef<str>,
        M: AsRef<str>,
    {
        let mut write_set = TokenWriteSet::default();
        let mut seen_modes = BTreeSet::new();

        for (name, mode, value) in entries {
            let mode = mode.as_ref();
            if self.snapshot.mode_by_name(mode).is_none() && seen_modes.insert(mode.to_string()) {
                write_set.new_modes.push(mode.to_string());
            }
            write_set.writes.push(self.merge(name.as_ref(), mode, value));
        }

        let summary = write_set.summary();
        debug!(
            collection = %self.snapshot.collection_name,
            new = summary.new,
            updated = summary.updated,
            new_modes = write_set.new_modes.len(),
            "Merged token batch"
        );
        write_set
    }
}
