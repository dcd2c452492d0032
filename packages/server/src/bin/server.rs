//! Anonymous one-to-one chat matchmaking server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin pairchat-server
//! cargo run --bin pairchat-server -- --host 0.0.0.0 --port 3000 --max-connections 500
//! ```

use clap::Parser;
use pairchat_server::{
    config::{DEFAULT_MAX_CONNECTIONS, ServerConfig},
    domain::DEFAULT_MAX_MESSAGE_CHARS,
    ui::Server,
};
use pairchat_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "pairchat-server")]
#[command(about = "Anonymous one-to-one text/video chat matchmaking server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "PAIRCHAT_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PAIRCHAT_PORT", default_value = "8080")]
    port: u16,

    /// Maximum number of simultaneous WebSocket connections
    #[arg(long, env = "PAIRCHAT_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    max_connections: usize,

    /// Chat messages longer than this are truncated
    #[arg(long, env = "PAIRCHAT_MAX_MESSAGE_CHARS", default_value_t = DEFAULT_MAX_MESSAGE_CHARS)]
    max_message_chars: usize,

    /// Default log level when RUST_LOG is not set
    #[arg(long, env = "PAIRCHAT_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            max_connections: args.max_connections,
            max_message_chars: args.max_message_chars,
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let config = ServerConfig::from(args);
    tracing::info!(
        "Starting with max {} connections, messages capped at {} characters",
        config.max_connections,
        config.max_message_chars
    );

    let server = Server::from_config(&config);
    if let Err(e) = server.run(&config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
