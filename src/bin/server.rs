//! TCP chat relay server with broadcast functionality.
//!
//! Accepts client connections, takes the first line of each as the display
//! name, and fans every later line out to all connected clients with an
//! ANSI color per user.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin server
//! cargo run --bin server -- --host 0.0.0.0 --port 3000
//! ```

use clap::Parser;

use tcp_chat_rs::common::logger::setup_logger;
use tcp_chat_rs::server::run_server;

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "TCP chat relay server with broadcast support", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    if let Err(e) = run_server(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
