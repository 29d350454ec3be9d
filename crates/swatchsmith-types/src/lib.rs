// ABOUTME: Pure data types with no cross-crate dependencies
// ABOUTME: Foundation layer shared by the color engine and the command line shell

pub mod color;
pub mod matching;
pub mod selection;
pub mod token;

// Re-export commonly used types
pub use color::{Rgb, Rgba};
pub use matching::{MatchReport, MatchResult, MatchTier, ReferenceColor, TokenRef};
pub use selection::{Fill, KeyColor, SelectedLayer};
pub use token::{
    CollectionInfo, CollectionMode, ExistingTokenSnapshot, Mode, TokenRecord, TokenValue,
    TokenWrite, TokenWriteSet, WriteSummary,
};
