//! Centralized error types for the router
//!
//! All router errors are represented by the `LogError` enum.
//! Use `Result<T>` as shorthand for `std::result::Result<T, LogError>`.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// All router errors
#[derive(Debug)]
pub enum LogError {
    // === Config ===
    /// Failed to read the config file
    ConfigRead { path: PathBuf, source: io::Error },
    /// Config buffer could not be parsed
    ConfigParse { reason: String },

    // === Transport ===
    /// Failed to open the log file
    FileOpen { path: PathBuf, source: io::Error },
    /// Failed to open the datagram socket
    SocketOpen { source: io::Error },
    /// Underlying write/send failed outright
    Transmit {
        transport: &'static str,
        source: io::Error,
    },
    /// Fewer bytes were written/sent than requested
    PartialWrite {
        transport: &'static str,
        written: usize,
        expected: usize,
    },
    /// Transport was initialized twice without an intervening terminate
    AlreadyInitialized { transport: &'static str },
    /// Terminate called on something already terminated
    AlreadyTerminated { what: &'static str },
    /// Transmit attempted before the transport reached the Ready state
    NotReady,

    // === Records ===
    /// Record could not be formatted or is empty
    InvalidMessage,
    /// Invalid configuration value
    InvalidParameter { field: &'static str, reason: String },
}

impl std::error::Error for LogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ConfigRead { source, .. }
            | Self::FileOpen { source, .. }
            | Self::SocketOpen { source }
            | Self::Transmit { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigRead { path, .. } => {
                write!(f, "Cannot read config file: {}", path.display())
            }
            Self::ConfigParse { reason } => write!(f, "Config parse error: {}", reason),
            Self::FileOpen { path, .. } => write!(f, "Cannot open log file: {}", path.display()),
            Self::SocketOpen { .. } => write!(f, "Cannot open datagram socket"),
            Self::Transmit { transport, source } => {
                write!(f, "Transmit failed on {}: {}", transport, source)
            }
            Self::PartialWrite {
                transport,
                written,
                expected,
            } => write!(
                f,
                "Partial write on {}: {}/{} bytes",
                transport, written, expected
            ),
            Self::AlreadyInitialized { transport } => {
                write!(f, "Transport already initialized: {}", transport)
            }
            Self::AlreadyTerminated { what } => write!(f, "Already terminated: {}", what),
            Self::NotReady => write!(f, "No transport is ready"),
            Self::InvalidMessage => write!(f, "Invalid message"),
            Self::InvalidParameter { field, reason } => {
                write!(f, "Invalid {}: {}", field, reason)
            }
        }
    }
}

/// Alias for Result with LogError
pub type Result<T> = std::result::Result<T, LogError>;
