//! Error types for the RobStride protocol client

use std::time::Duration;

use thiserror::Error;

use crate::core::FaultFlags;

/// Result type for protocol client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the parameter table, frame codec, sessions and client
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Motor or host identifier outside [1, 254]
    #[error("Invalid identifier: {0} is outside [1, 254]")]
    InvalidIdentifier(i64),

    /// No parameter with this name in the table
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    /// Parameter is read-only
    #[error("Parameter not writable: {0}")]
    ParameterNotWritable(String),

    /// Parameter is write-only
    #[error("Parameter not readable: {0}")]
    ParameterNotReadable(String),

    /// Physical value does not fit the parameter's wire type
    #[error("Value out of range: {0}")]
    ValueOutOfRange(String),

    /// Encoded value does not fit the frame payload
    #[error("Payload too large: {len} value bytes, at most {max} fit")]
    PayloadTooLarge { len: usize, max: usize },

    /// Inbound frame does not match any known layout
    #[error("Unrecognized frame: {0}")]
    UnrecognizedFrame(String),

    /// No matching response arrived before the deadline
    #[error("No response from motor {id} within {timeout:?}")]
    ResponseTimeout { id: u8, timeout: Duration },

    /// Motor reported fault bits in its feedback
    #[error("Device fault: {0}")]
    DeviceFault(FaultFlags),

    /// A request to this motor is already awaiting its response
    #[error("Request pending: motor {0} is still awaiting a response")]
    RequestPending(u8),

    /// Parameter table has duplicate names or addresses
    #[error("Invalid parameter table: {0}")]
    InvalidParameterTable(String),

    /// Transport failed to send or receive
    #[error("Transport error: {0}")]
    TransportError(String),

    /// Transport receive timed out outside of a request
    #[error("Transport timeout")]
    TransportTimeout,
}

impl Error {
    /// Create a new UnknownParameter error
    pub fn unknown_parameter(name: impl Into<String>) -> Self {
        Error::UnknownParameter(name.into())
    }

    /// Create a new ParameterNotWritable error
    pub fn not_writable(name: impl Into<String>) -> Self {
        Error::ParameterNotWritable(name.into())
    }

    /// Create a new ParameterNotReadable error
    pub fn not_readable(name: impl Into<String>) -> Self {
        Error::ParameterNotReadable(name.into())
    }

    /// Create a new ValueOutOfRange error
    pub fn out_of_range(msg: impl Into<String>) -> Self {
        Error::ValueOutOfRange(msg.into())
    }

    /// Create a new UnrecognizedFrame error
    pub fn unrecognized(msg: impl Into<String>) -> Self {
        Error::UnrecognizedFrame(msg.into())
    }

    /// Create a new InvalidParameterTable error
    pub fn invalid_table(msg: impl Into<String>) -> Self {
        Error::InvalidParameterTable(msg.into())
    }

    /// Create a new TransportError
    pub fn transport(msg: impl Into<String>) -> Self {
        Error::TransportError(msg.into())
    }

    /// Stable short name of the error kind, as printed by the CLI
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidIdentifier(_) => "invalid-identifier",
            Error::UnknownParameter(_) => "unknown-parameter",
            Error::ParameterNotWritable(_) => "parameter-not-writable",
            Error::ParameterNotReadable(_) => "parameter-not-readable",
            Error::ValueOutOfRange(_) => "value-out-of-range",
            Error::PayloadTooLarge { .. } => "payload-too-large",
            Error::UnrecognizedFrame(_) => "unrecognized-frame",
            Error::ResponseTimeout { .. } => "response-timeout",
            Error::DeviceFault(_) => "device-fault",
            Error::RequestPending(_) => "request-pending",
            Error::InvalidParameterTable(_) => "invalid-parameter-table",
            Error::TransportError(_) => "transport-error",
            Error::TransportTimeout => "transport-timeout",
        }
    }
}
