//! Domain-level error types.

use thiserror::Error;

/// Value object validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("connection id must not be empty")]
    EmptyConnectionId,

    #[error("session id must not be empty")]
    EmptySessionId,

    #[error("unsupported chat kind: '{0}'")]
    UnsupportedChatKind(String),

    #[error("message text must not be empty")]
    EmptyMessage,

    #[error("signal payload must not be null")]
    EmptySignal,
}

/// Entity invariant errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A pair must consist of two distinct connections
    #[error("connection '{0}' cannot be paired with itself")]
    SelfPairing(String),
}

/// Errors raised while pushing events to connected clients
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("client '{0}' is not registered")]
    ClientNotFound(String),

    #[error("client '{0}' is already registered")]
    DuplicateClient(String),

    #[error("connection limit of {0} reached")]
    CapacityExceeded(usize),

    #[error("failed to push message: {0}")]
    PushFailed(String),

    #[error("failed to encode event: {0}")]
    EncodeFailed(String),
}
