//! errors.rs - Custom error types for the formsieve-core library.
//!
//! Detection and sanitization are total over their input domain and return
//! plain values; these errors cover the fallible edges only, which is
//! settings loading and validation.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// This enum represents all possible error types in the `formsieve-core`
/// library.
///
/// `#[non_exhaustive]` signals to consumers that new variants may be added
/// in future versions without a breaking change.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum FormsieveError {
    #[error("Failed to parse settings: {0}")]
    ConfigParse(String),

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    #[error("An unexpected I/O error occurred: {0}")]
    IoError(#[from] std::io::Error),
}
