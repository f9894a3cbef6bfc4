// Author: Dustin Pilgrim
// License: MIT

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The timer could not reach a scheduler to run countdowns on.
    ///
    /// Examples:
    /// - `IdleTimer::new` called from a plain thread with no tokio runtime
    Runtime(RuntimeError),

    /// A configuration value is out of range.
    ///
    /// Examples:
    /// - zero-length idle timeout
    InvalidConfig(ConfigError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    NoRuntime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The idle timeout must be longer than zero.
    ZeroTimeout,
}

// ---------------- Display ----------------

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Runtime(e) => write!(f, "{e}"),
            Error::InvalidConfig(e) => write!(f, "{e}"),
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::NoRuntime =>
                write!(f, "no tokio runtime available to schedule countdowns"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroTimeout =>
                write!(f, "idle timeout must be greater than zero"),
        }
    }
}

impl std::error::Error for Error {}

impl From<RuntimeError> for Error {
    fn from(e: RuntimeError) -> Self {
        Error::Runtime(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::InvalidConfig(e)
    }
}
