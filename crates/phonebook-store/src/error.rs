//! Error types for the phonebook store layer.

use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while talking to the key-value store.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The store could not be reached: connection refused, I/O failure,
    /// dropped connection, timeout, or a handle that was already closed.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store answered, but with an error or an unexpected reply.
    #[error("store command failed: {0}")]
    Command(String),
}

impl StoreError {
    /// Whether this error means the store is unreachable.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}

impl From<::redis::RedisError> for StoreError {
    fn from(e: ::redis::RedisError) -> Self {
        if e.is_io_error() || e.is_connection_refusal() || e.is_connection_dropped() || e.is_timeout()
        {
            StoreError::Unavailable(e.to_string())
        } else {
            StoreError::Command(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_are_unavailable() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err: StoreError = ::redis::RedisError::from(io).into();
        assert!(err.is_unavailable());
    }

    #[test]
    fn server_errors_are_command_failures() {
        let redis_err = ::redis::RedisError::from((
            ::redis::ErrorKind::TypeError,
            "WRONGTYPE",
            "Operation against a key holding the wrong kind of value".to_string(),
        ));
        let err: StoreError = redis_err.into();
        assert!(!err.is_unavailable());
        assert!(err.to_string().contains("WRONGTYPE"));
    }
}
