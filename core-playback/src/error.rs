//! # Playback Error Types
//!
//! Errors surfaced by the playback model.

use bridge_traits::BridgeError;
use thiserror::Error;

/// Errors that can occur during playback model operations.
#[derive(Error, Debug)]
pub enum PlaybackError {
    // ========================================================================
    // Provider Errors
    // ========================================================================
    /// No provider can play the current item's primary source.
    #[error("No suitable provider for source: {file}")]
    NoSuitableProvider { file: String },

    /// The registry chose a provider kind but could not construct it.
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(#[source] BridgeError),

    // ========================================================================
    // Configuration & Persistence Errors
    // ========================================================================
    /// Invalid configuration passed at construction.
    #[error("Configuration error: {0}")]
    Config(#[from] core_runtime::Error),

    /// Settings store operation failed.
    #[error("Settings store error: {0}")]
    Settings(#[source] BridgeError),
}

impl PlaybackError {
    /// Returns `true` for errors caused by a player setup that cannot play
    /// the requested media. These stop the current operation.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            PlaybackError::NoSuitableProvider { .. }
                | PlaybackError::ProviderUnavailable(_)
                | PlaybackError::Config(_)
        )
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;
