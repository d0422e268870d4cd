//! Device-communication collaborator boundary.
//!
//! The extraction engine never talks to network equipment itself. Callers
//! either hand a parser pre-captured output (the primary, testable path) or
//! an implementation of [`Device`] that can execute one formatted command
//! string and return its raw text.

use thiserror::Error;

/// Executes CLI commands on a network device and returns their raw output.
///
/// Implementations own transport, authentication, prompt handling, and
/// timeouts; parsers only ever call [`execute`](Device::execute) with the
/// exact command string (parameters already substituted) and consume the
/// returned text.
pub trait Device {
    /// Runs `command` on the device and returns its textual output.
    fn execute(&mut self, command: &str) -> Result<String, DeviceError>;
}

/// Failure reported by a [`Device`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("device execution failed for '{command}': {message}")]
pub struct DeviceError {
    /// The command string that was being executed.
    pub command: String,
    /// Transport-specific description of the failure.
    pub message: String,
}

impl DeviceError {
    /// Creates a device error for `command`.
    pub fn new(command: &str, message: impl Into<String>) -> Self {
        Self {
            command: command.to_string(),
            message: message.into(),
        }
    }
}
