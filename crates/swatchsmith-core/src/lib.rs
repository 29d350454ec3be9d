// ABOUTME: Color engine that derives token ramps from key colors and matches colors to tokens
// ABOUTME: Pure computation over plain data; the token store is reached through a trait

pub mod capture;
pub mod color_space;
pub mod compositor;
pub mod config;
pub mod error;
pub mod key_parse;
pub mod matcher;
pub mod merger;
pub mod pipeline;
pub mod ramp;
pub mod store;

// Engine exports
pub use color_space::{ColorSpace, Hsl, Lab};
pub use key_parse::{
    DiscardReason, DiscardedLayer, KeyGroups, ParsedKeyName, collect_key_colors, parse_key_name,
};
pub use matcher::{AUTO_CONNECT_THRESHOLD, PerceptualMatcher, SUGGEST_THRESHOLD, classify};
pub use merger::{MergeDecision, TokenMerger};
pub use ramp::{OpacityPolicy, Ramp, RampEntry, RampGenerator, RampWarning, Variant};

// Pass exports
pub use capture::{CaptureEntry, CapturePlan, split_variable_name};
pub use pipeline::{CaptureOutcome, DeriveOutcome, capture_variables, derive_tokens, scan_selection};

// Configuration, errors and the host boundary
pub use config::{CollectionConfig, RampConfig, SwatchConfig};
pub use error::{Result, SwatchError};
pub use store::{InMemoryTokenStore, TokenStore, apply_write_set};
