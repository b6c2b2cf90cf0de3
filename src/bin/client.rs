//! TCP chat client.
//!
//! Connects to the relay, sends the display name as the first line, then
//! sends stdin lines as chat messages and prints everything the relay
//! delivers. Automatically reconnects on disconnection (max 5 attempts
//! with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin client -- --name Alice
//! cargo run --bin client -- -n Bob --host 127.0.0.1 --port 3000
//! ```

use clap::Parser;

use tcp_chat_rs::client::run_client;
use tcp_chat_rs::common::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "client")]
#[command(about = "TCP chat client", long_about = None)]
struct Args {
    /// Display name shown to other participants
    #[arg(short = 'n', long)]
    name: String,

    /// Server host address
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Server port number
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    let addr = format!("{}:{}", args.host, args.port);
    if let Err(e) = run_client(addr, args.name).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
