//! # Error Types
//!
//! This module defines the error type used throughout the cardpress library.

use thiserror::Error;

/// Main error type for cardpress operations
#[derive(Debug, Error)]
pub enum CardError {
    /// A color component outside 0..=255
    #[error("Invalid color: ({r}, {g}, {b}) components must be between 0 and 255")]
    InvalidColor { r: i64, g: i64, b: i64 },

    /// Negative padding or spacing
    #[error("Invalid spacing: {0}")]
    InvalidSpacing(String),

    /// Font loading error
    #[error("Font error: {0}")]
    Font(String),

    /// Image processing error
    #[error("Image error: {0}")]
    Image(String),

    /// Preset resolution or validation error
    #[error("Preset error: {0}")]
    Preset(String),

    /// Remote image download error
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error wrapper
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
