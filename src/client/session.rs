//! Chat client session management.

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::mpsc;

use super::error::ClientError;
use super::ui::redisplay_prompt;

/// Run one client session against the relay.
///
/// Connects, sends the display name as the handshake line, then runs a
/// print loop for inbound rendered lines and an input loop feeding outbound
/// lines, until either side of the connection fails.
pub async fn run_client_session(addr: &str, name: &str) -> Result<(), ClientError> {
    let stream = TcpStream::connect(addr)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;
    let (read_half, mut write_half) = stream.into_split();

    // Handshake: the first line identifies us to the relay.
    write_half
        .write_all(format!("{}\n", name).as_bytes())
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    tracing::info!("Connected to chat server at {}", addr);
    println!(
        "\nYou are '{}'. Type messages and press Enter to send. Press Ctrl+C to exit.\n",
        name
    );

    // Spawn a task to print messages arriving from the relay. The lines are
    // already rendered (color codes included), so they go out verbatim.
    let name_for_read = name.to_string();
    let mut read_task = tokio::spawn(async move {
        let mut lines = BufReader::new(read_half).lines();
        let mut connection_error = false;

        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    println!("\n{}", line);
                    redisplay_prompt(&name_for_read);
                }
                Ok(None) => {
                    tracing::info!("Server closed the connection");
                    connection_error = true;
                    break;
                }
                Err(e) => {
                    tracing::warn!("Read error: {}", e);
                    connection_error = true;
                    break;
                }
            }
        }

        connection_error
    });

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

    // Spawn a blocking thread for rustyline (synchronous readline)
    let name_for_prompt = name.to_string();
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        let prompt = format!("{}> ", name_for_prompt);

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            // Channel closed, exit thread
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // Spawn a task to forward typed lines to the relay.
    let mut write_task = tokio::spawn(async move {
        let mut write_error = false;

        while let Some(line) = input_rx.recv().await {
            if let Err(e) = write_half.write_all(format!("{}\n", line).as_bytes()).await {
                tracing::warn!("Failed to send message: {}", e);
                write_error = true;
                break;
            }
        }

        write_error
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        read_result = &mut read_task => {
            write_task.abort();
            let connection_error = read_result.unwrap_or(false);
            if connection_error {
                return Err(ClientError::ConnectionError(
                    "Connection lost".to_string(),
                ));
            }
        }
        write_result = &mut write_task => {
            read_task.abort();
            let write_error = write_result.unwrap_or(false);
            if write_error {
                return Err(ClientError::ConnectionError(
                    "Connection lost".to_string(),
                ));
            }
        }
    }

    Ok(())
}
