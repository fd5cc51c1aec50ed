//! Error handling for the BMS HV utility
//!
//! Provides error types for all layers of the telemetry pipeline:
//! - Connection errors (opening the port, faults during a session)
//! - Decode errors (malformed or mis-shaped telemetry lines)
//! - Queue errors (bounded queue overflow)
//! - Aggregation errors (shape and emptiness preconditions)
//! - Configuration and protocol errors
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Connection error type
///
/// Represents errors related to the serial link with the BMS.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    /// The port could not be opened. Retried with back-off by the link worker.
    #[error("Failed to open port {port}: {reason}")]
    OpenFailed {
        /// The port identifier.
        port: String,
        /// The reason the port failed to open.
        reason: String,
    },

    /// A read or write failed while the link was open.
    #[error("I/O fault on port {port}: {reason}")]
    Transient {
        /// The port identifier.
        port: String,
        /// The reason for the fault.
        reason: String,
    },

    /// The stop signal was raised while waiting for the port.
    #[error("Connection attempt cancelled")]
    Cancelled,
}

/// Telemetry decode error type
///
/// Both variants are recoverable: the offending line is skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The line is not valid JSON.
    #[error("Malformed telemetry at line {line}, column {column}: {reason}")]
    MalformedSyntax {
        /// Line number reported by the parser.
        line: usize,
        /// Column number reported by the parser.
        column: usize,
        /// Parser message.
        reason: String,
    },

    /// The line is valid JSON but does not match the telemetry schema.
    #[error("Telemetry schema mismatch: {reason}")]
    SchemaMismatch {
        /// What did not match.
        reason: String,
    },
}

impl DecodeError {
    /// Create a schema mismatch from a message
    pub fn schema(reason: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        use serde_json::error::Category;

        match err.classify() {
            Category::Data => Self::SchemaMismatch {
                reason: err.to_string(),
            },
            Category::Syntax | Category::Eof | Category::Io => Self::MalformedSyntax {
                line: err.line(),
                column: err.column(),
                reason: err.to_string(),
            },
        }
    }
}

/// Which item a full queue discarded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discarded {
    /// The item being pushed was dropped; the queue is unchanged.
    Incoming,
    /// The oldest queued item was dropped to make room for the new one.
    Stale,
}

impl std::fmt::Display for Discarded {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Incoming => write!(f, "new item dropped"),
            Self::Stale => write!(f, "oldest item dropped"),
        }
    }
}

/// Bounded queue error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// The queue was full when an item was pushed.
    #[error("The {queue} queue is full (capacity {capacity}), {discarded}")]
    Overflow {
        /// Queue name used in log messages.
        queue: String,
        /// Queue capacity.
        capacity: usize,
        /// Which item was lost.
        discarded: Discarded,
    },
}

/// Aggregation error type
///
/// Raised when syntactically valid telemetry violates a layout or statistics
/// precondition. These point at a firmware or configuration mismatch rather
/// than line noise, so they are reported separately from decode errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AggregationError {
    /// The sequence cannot be split evenly into rows (or columns).
    #[error("Cannot reshape {len} values into groups of {group}")]
    Shape {
        /// Number of values.
        len: usize,
        /// Requested row width, or column height for column-major fills.
        group: usize,
    },

    /// A telemetry array does not match the configured pack geometry.
    #[error("Geometry mismatch for {field}: expected {expected} values, got {actual}")]
    GeometryMismatch {
        /// Telemetry field name.
        field: &'static str,
        /// Expected number of values.
        expected: usize,
        /// Received number of values.
        actual: usize,
    },

    /// Statistics requested over an empty sequence.
    #[error("Cannot aggregate an empty sequence")]
    EmptyInput,

    /// Statistics requested over a sequence holding NaN or infinity.
    #[error("Cannot aggregate a non-finite value")]
    NonFinite,

    /// The value searched for is not in the matrix.
    #[error("Value {target} not found")]
    NotFound {
        /// The value searched for.
        target: f64,
    },
}

/// Configuration error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A table geometry has a zero dimension.
    #[error("Invalid geometry for {table}: {rows}x{columns}")]
    InvalidGeometry {
        /// Table name.
        table: &'static str,
        /// Configured rows.
        rows: usize,
        /// Configured columns.
        columns: usize,
    },

    /// A timing value is out of range.
    #[error("Invalid timing '{key}': {reason}")]
    InvalidTiming {
        /// Setting name.
        key: &'static str,
        /// Why it is invalid.
        reason: String,
    },

    /// A queue capacity is zero.
    #[error("Invalid capacity for the {queue} queue: {capacity}")]
    InvalidCapacity {
        /// Queue name.
        queue: &'static str,
        /// Configured capacity.
        capacity: usize,
    },

    /// A command token is malformed.
    #[error("Invalid command token for '{action}': {source}")]
    InvalidCommandToken {
        /// The action the token is bound to.
        action: String,
        /// The underlying protocol error.
        source: ProtocolError,
    },

    /// The TOML text could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Wire protocol error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// A command token does not have the `!<CAT>-<ACTION>@` form.
    #[error("Malformed command token '{token}': {reason}")]
    InvalidToken {
        /// The offending token.
        token: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// Text does not name a known user action.
    #[error("Unknown action '{input}'")]
    UnknownAction {
        /// The text that was parsed.
        input: String,
    },
}

/// Main error type for the BMS HV utility
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Connection error
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Decode error
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Queue error
    #[error(transparent)]
    Queue(#[from] QueueError),

    /// Aggregation error
    #[error(transparent)]
    Aggregation(#[from] AggregationError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Protocol error
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a queue overflow
    pub fn is_queue_overflow(&self) -> bool {
        matches!(self, Error::Queue(QueueError::Overflow { .. }))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
