//! Server configuration.

use crate::domain::DEFAULT_MAX_MESSAGE_CHARS;

/// Default cap on simultaneously connected clients
pub const DEFAULT_MAX_CONNECTIONS: usize = 1000;

/// Runtime settings of the matchmaking server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host address to bind to (e.g., "127.0.0.1")
    pub host: String,
    /// Port number to bind to. `0` lets the OS pick one.
    pub port: u16,
    /// Connections beyond this many are refused with 503
    pub max_connections: usize,
    /// Chat messages are truncated to this many characters before escaping
    pub max_message_chars: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            max_message_chars: DEFAULT_MAX_MESSAGE_CHARS,
        }
    }
}

impl ServerConfig {
    /// `host:port` string passed to the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
