//! Error types for score generation and notation reading.
//!
//! The matching engine and the session accounting have no error channel:
//! malformed MIDI input is dropped by the input decoder before it reaches
//! them.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeneratorError {
    /// Bad note name, non-positive note count or inverted range.
    ///
    /// ```
    /// # use sightread_rs::error::GeneratorError;
    /// let err = GeneratorError::InvalidParameter("noteCount must be a positive integer".to_string());
    /// assert_eq!(err.to_string(), "Invalid parameter: noteCount must be a positive integer");
    /// ```
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// No natural pitch lies between the two bounds.
    #[error("No natural pitches available between {min} and {max}")]
    EmptyRange { min: String, max: String },

    #[error("Failed to write notation: {0}")]
    Notation(#[from] quick_xml::Error),

    #[error("Notation is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

#[derive(Error, Debug)]
pub enum NotationError {
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Note in measure {measure} is missing its pitch {field}")]
    MissingPitch { measure: u32, field: &'static str },
}
