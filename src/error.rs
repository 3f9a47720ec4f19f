//! Error types for the svg_palette library

use thiserror::Error;

/// Result type alias for svg_palette operations
pub type Result<T> = std::result::Result<T, PaletteError>;

/// Errors raised while parsing colors or reducing a color set to a palette.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PaletteError {
    /// A hex color string was not `#` followed by exactly 6 hex digits
    #[error("Invalid hex color: {input:?}")]
    InvalidHex { input: String },

    /// An `rgb()` literal matched but its integers could not be parsed.
    ///
    /// Extraction recovers from this locally by dropping the literal.
    #[error("Malformed rgb() literal: {literal:?}")]
    MalformedLiteral { literal: String },

    /// A reduction parameter was rejected before any processing started
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter {
        parameter: &'static str,
        value: String,
    },
}
