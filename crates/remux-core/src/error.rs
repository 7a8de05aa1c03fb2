//! Error types for Remux Core

use serde::ser::{Serialize, SerializeStruct, Serializer};
use thiserror::Error;

/// Result type alias for player and layout operations
pub type Result<T> = std::result::Result<T, Error>;

/// Player error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Bootstrap errors
    #[error("Video element not found: {id}")]
    ElementNotFound { id: String },

    #[error("Media engine not supported on this platform")]
    UnsupportedPlatform,

    #[error("Player not initialized")]
    NotInitialized,

    // Engine errors
    #[error("Failed to attach media element: {0}")]
    Attach(String),

    #[error("Failed to detach media element: {0}")]
    Detach(String),

    #[error("Failed to load {url}: {reason}")]
    Load { url: String, reason: String },

    #[error("Failed to add text track {url}: {reason}")]
    TextTrack { url: String, reason: String },

    #[error("Playback start superseded by a newer request")]
    Superseded,

    #[error("Media engine error: {0}")]
    Engine(String),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Create a load error for `url`
    pub fn load(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Load {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if the error prevents the player from being created at all.
    ///
    /// Fatal errors are the ones bootstrap hands back to its caller; everything
    /// else happens after an engine exists and is reported per playback.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::ElementNotFound { .. }
                | Error::UnsupportedPlatform
                | Error::InvalidConfig(_)
        )
    }

    /// Returns the error code exposed to the page
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::ElementNotFound { .. } => "ELEMENT_NOT_FOUND",
            Error::UnsupportedPlatform => "UNSUPPORTED_PLATFORM",
            Error::NotInitialized => "NOT_INITIALIZED",
            Error::Attach(_) => "ATTACH",
            Error::Detach(_) => "DETACH",
            Error::Load { .. } => "LOAD",
            Error::TextTrack { .. } => "TEXT_TRACK",
            Error::Superseded => "SUPERSEDED",
            Error::Engine(_) => "ENGINE",
            Error::InvalidConfig(_) => "INVALID_CONFIG",
            Error::Serialization(_) => "SERIALIZATION",
        }
    }
}

/// Errors reach the page as `{ code, message }`
impl Serialize for Error {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Error", 2)?;
        state.serialize_field("code", self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
