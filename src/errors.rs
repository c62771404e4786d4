/*!
 * Error types for the subspine application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when decoding time representations
#[derive(Error, Debug)]
pub enum ParseError {
    /// A timeline time value did not match `<int>s` or `<int>/<int>s`
    #[error("invalid timeline time value '{0}'")]
    TimelineValue(String),

    /// A frame duration could not be read as a tick fraction
    #[error("invalid frame duration '{0}'")]
    FrameDuration(String),

    /// A tick fraction had a zero or negative component
    #[error("invalid frame rate {numerator}/{denominator}: components must be positive")]
    FrameRate {
        /// Seconds-per-tick numerator
        numerator: i64,
        /// Seconds-per-tick denominator
        denominator: i64,
    },
}

/// Errors that can occur when input does not match the expected grammar
#[derive(Error, Debug)]
pub enum FormatError {
    /// A cue block's time-range line did not match `HH:MM:SS,mmm --> HH:MM:SS,mmm`
    #[error("malformed time range at line {line}: '{content}'")]
    BadTimeRange {
        /// 1-based line number of the offending line
        line: usize,
        /// The offending line text
        content: String,
    },

    /// A cue block ended before its time-range or text line
    #[error("truncated cue block at line {line}")]
    TruncatedBlock {
        /// 1-based line number where the block starts
        line: usize,
    },

    /// Timeline input was not well-formed XML
    #[error("input is not well-formed XML: {0}")]
    MalformedXml(String),
}

/// Errors that can occur when an expected tree node is absent
#[derive(Error, Debug)]
pub enum StructureError {
    /// The template file was not well-formed XML
    #[error("template is not well-formed XML: {0}")]
    MalformedTemplate(String),

    /// A fixed-path element was not found
    #[error("missing <{0}> element")]
    MissingElement(&'static str),

    /// An element was found but lacked a required attribute
    #[error("missing '{attribute}' attribute on <{element}>")]
    MissingAttribute {
        /// Tag name of the element
        element: &'static str,
        /// Name of the absent attribute
        attribute: &'static str,
    },
}

/// Errors that can occur when the request and configuration disagree
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The template's frame rate does not match the requested sanity value
    #[error(
        "template framerate {template_fps:.2}fps is inconsistent with specified framerate \
         {requested_fps:.2}fps. Please set the correct framerate using --framerate"
    )]
    FrameRateMismatch {
        /// Frame rate implied by the template's tick duration
        template_fps: f64,
        /// Frame rate the caller asked to sanity-check against
        requested_fps: f64,
    },

    /// No text transform is registered under the requested name
    #[error("unknown text transform '{0}': no converter is registered under that name")]
    UnknownTransform(String),

    /// A configuration value failed validation
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Input or output path has a suffix this tool does not handle
    #[error("unsupported file type: {0}")]
    UnsupportedFormat(String),

    /// Error decoding a time representation
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Input did not match the expected grammar
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    /// An expected tree node was absent
    #[error("Structure error: {0}")]
    Structure(#[from] StructureError),

    /// Request and configuration disagree
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
