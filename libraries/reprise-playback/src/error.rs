//! Error types for playback sessions

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Requested speed is not a finite number
    #[error("Invalid playback speed: {0}")]
    InvalidSpeed(f64),

    /// Video settings the session cannot run with
    #[error("Invalid video settings: {0}")]
    InvalidSettings(String),

    /// Store rejected a preference write
    #[error(transparent)]
    Store(#[from] reprise_core::RepriseError),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
