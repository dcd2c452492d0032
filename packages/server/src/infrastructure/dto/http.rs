//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Response of `GET /api/stats`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsDto {
    pub connected_clients: usize,
    pub waiting: WaitingDto,
    pub active_sessions: usize,
    /// RFC 3339, UTC
    pub generated_at: String,
}

/// Number of connections waiting, per chat kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitingDto {
    pub text: usize,
    pub video: usize,
}
