//! Error surface of the extraction engine.
//!
//! All parse failures funnel into [`ParseError`]. There are no retries and
//! no partial results: a text blob is static, so every error is surfaced to
//! the immediate caller unchanged.

use thiserror::Error;

use netshow_core::SchemaError;

use crate::device::DeviceError;

/// Errors a parse invocation can return.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The full line scan produced zero top-level entries. The device
    /// returned no matching records; distinct from malformed input.
    #[error("no parsable records in command output")]
    EmptyResult,

    /// The built structure does not conform to the command's declared
    /// schema. Indicates a rule/schema mismatch bug.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A field-attaching rule matched before the rule that establishes its
    /// context ever did — e.g. a peer detail line with no preceding
    /// interface header. Well-ordered device output never does this, so it
    /// is an internal-consistency failure of the input, reported rather
    /// than attached to an undefined target.
    #[error("'{rule}' line matched before any '{context}' was established")]
    MissingContext {
        rule: &'static str,
        context: &'static str,
    },

    /// A numeric capture did not fit the integer field it targets.
    #[error("field '{field}' has invalid integer '{text}'")]
    InvalidInteger { field: &'static str, text: String },

    /// The device-communication collaborator failed to execute a command.
    #[error(transparent)]
    Device(#[from] DeviceError),
}
