// ABOUTME: Data types for matching on-canvas colors back to existing tokens
// ABOUTME: Reference palette entries, per-query results, and the aggregated report

use serde::{Deserialize, Serialize};

use crate::color::Rgb;

/// Identity of a token inside its collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenRef {
    pub id: String,
    pub name: String,
}

/// One (token, mode) pair with a direct color value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceColor {
    pub token: TokenRef,
    /// Mode name.
    pub mode: String,
    pub color: Rgb,
}

/// How confidently a query matched its closest reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchTier {
    /// Numerically equivalent; safe to bind without review.
    Auto,
    /// Plausible; needs confirmation.
    Suggest,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Name of the layer the query color came from.
    pub query: String,
    pub query_color: Rgb,
    pub best_token: TokenRef,
    pub best_mode: String,
    pub delta_e: f32,
    pub tier: MatchTier,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub auto_connected: usize,
    /// The Auto-tier matches, for the shell to bind.
    pub auto_matches: Vec<MatchResult>,
    /// Suggest-tier matches, closest first.
    pub suggestions: Vec<MatchResult>,
    /// Layers skipped because they were already bound to a token.
    pub already_bound: usize,
}
