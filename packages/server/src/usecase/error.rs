//! UseCase error types.
//!
//! Only connection setup can fail visibly. Every other use case drops
//! invalid or stale requests silently and reports that as `None`.

use thiserror::Error;

/// Errors that reject a new connection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("connection limit of {0} reached")]
    CapacityExceeded(usize),

    #[error("connection id '{0}' is already registered")]
    DuplicateConnectionId(String),

    #[error("failed to register connection: {0}")]
    RegistrationFailed(String),
}
