// ABOUTME: Error types for token derivation, matching, and store operations
// ABOUTME: Expected conditions are explicit variants; nothing here is fatal to the process

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SwatchError>;

#[derive(Debug, Error)]
pub enum SwatchError {
    #[error("Please select at least one layer")]
    EmptySelection,

    #[error("Collection '{name}' not found")]
    MissingCollection { name: String },

    #[error("Mode '{mode}' not found in collection '{collection}'")]
    MissingMode { collection: String, mode: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse config file at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config file not found: {path}")]
    ConfigNotFound { path: PathBuf },
}

impl SwatchError {
    /// Create a missing collection error
    pub fn missing_collection<S: Into<String>>(name: S) -> Self {
        Self::MissingCollection { name: name.into() }
    }

    /// Create a missing mode error
    pub fn missing_mode<C: Into<String>, M: Into<String>>(collection: C, mode: M) -> Self {
        Self::MissingMode {
            collection: collection.into(),
            mode: mode.into(),
        }
    }

    /// Check if this error is a precondition the user can fix before retrying
    /// (as opposed to an environment failure).
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::EmptySelection | Self::MissingCollection { .. } | Self::MissingMode { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            SwatchError::EmptySelection.to_string(),
            "Please select at least one layer"
        );
        assert_eq!(
            SwatchError::missing_collection("Brand Colors").to_string(),
            "Collection 'Brand Colors' not found"
        );
        assert_eq!(
            SwatchError::missing_mode("Colors", "Dim").to_string(),
            "Mode 'Dim' not found in collection 'Colors'"
        );
    }

    #[test]
    fn test_error_properties() {
        assert!(SwatchError::EmptySelection.is_precondition());
        assert!(SwatchError::missing_collection("x").is_precondition());
        assert!(SwatchError::missing_mode("x", "Dim").is_precondition());
        let not_found = SwatchError::ConfigNotFound {
            path: "swatch.toml".into(),
        };
        assert!(!not_found.is_precondition());

        let io = SwatchError::from(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "Access denied",
        ));
        assert!(matches!(io, SwatchError::Io(_)));
        assert!(!io.is_precondition());
    }
}
