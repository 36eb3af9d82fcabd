//! Error Types
//!
//! This module defines the error type used throughout the stage.
//!
//! # Overview
//!
//! [`StageError`] covers every failure that can surface through the public API:
//! - Asset reading (file system, HTTP) and decoding (glTF)
//! - Animation clip extraction from a loaded character
//! - Settings parsing and debug-panel tweaks
//!
//! Interaction that arrives before an asset is ready and overlapping switch requests are
//! *not* errors; those paths are silently absorbed by the hand-off policy.
//!
//! # Usage
//!
//! ```rust,ignore
//! use mutant_stage::errors::Result;
//!
//! fn load_settings(json: &str) -> Result<StageSettings> {
//!     StageSettings::from_json_str(json)
//! }
//! ```

use thiserror::Error;

/// The main error type for the stage.
#[derive(Error, Debug)]
pub enum StageError {
    // ========================================================================
    // Asset Loading Errors
    // ========================================================================
    /// The requested asset was not found.
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// HTTP transport error (connection, TLS, ...).
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// HTTP response error with status code.
    #[error("HTTP response error: status {status} for {url}")]
    HttpResponseError {
        /// The requested URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// Malformed asset URL.
    #[cfg(feature = "http")]
    #[error("Invalid URL: {0}")]
    UrlParseError(#[from] url::ParseError),

    /// The source requires a feature that was compiled out.
    #[error("Feature not enabled: {0}")]
    FeatureNotEnabled(String),

    /// glTF parsing or loading error.
    #[cfg(feature = "gltf")]
    #[error("glTF error: {0}")]
    GltfError(String),

    // ========================================================================
    // Animation Errors
    // ========================================================================
    /// A required clip is missing from the loaded asset.
    #[error("Animation clip '{0}' not found")]
    MissingClip(String),

    /// A clip that must be unique appears more than once.
    #[error("Animation clip '{name}' appears {count} times")]
    DuplicateClip {
        /// Clip name
        name: String,
        /// Number of occurrences
        count: usize,
    },

    // ========================================================================
    // Settings & Debug Panel Errors
    // ========================================================================
    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The tweak path does not name a registered control.
    #[error("Unknown tweak: {0}")]
    UnknownTweak(String),

    /// The value kind does not match the control kind.
    #[error("Tweak '{path}' expects a {expected} value")]
    TweakTypeMismatch {
        /// Folder-qualified control path
        path: String,
        /// Expected value kind
        expected: &'static str,
    },
}

#[cfg(feature = "gltf")]
impl From<gltf::Error> for StageError {
    fn from(err: gltf::Error) -> Self {
        StageError::GltfError(err.to_string())
    }
}

/// Alias for `Result<T, StageError>`.
pub type Result<T> = std::result::Result<T, StageError>;
