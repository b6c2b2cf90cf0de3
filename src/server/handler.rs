//! Per-connection handling: handshake, paired read/write loops, teardown.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};

use crate::server::domain::{
    format_chat_line, format_join_notice, format_leave_notice, normalize_inbound_line,
};
use crate::server::log::{Broadcaster, Message};
use crate::server::registry::ConnectionRecord;
use crate::server::state::AppState;

/// Drive one client connection from accept to close.
///
/// The connection moves through handshaking (first line = display name),
/// an active phase with one task reading inbound lines into the log and one
/// task draining the log to the socket, and a closing phase that appends the
/// departure notice and unregisters the connection. Any read or write error
/// is an unconditional disconnect; other connections are unaffected.
pub async fn handle_connection(stream: TcpStream, addr: SocketAddr, state: Arc<AppState>) {
    let (read_half, write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();

    // Handshaking: the first inbound line is the display name. A connection
    // that closes, errors or sends a blank line before naming itself is
    // dropped without registering and without consuming a color.
    let name = match lines.next_line().await {
        Ok(Some(line)) => match normalize_inbound_line(&line) {
            Some(name) => name.trim().to_string(),
            None => {
                tracing::warn!("Empty handshake from {}, closing", addr);
                return;
            }
        },
        Ok(None) => {
            tracing::info!("{} closed before sending a name", addr);
            return;
        }
        Err(e) => {
            tracing::warn!("Handshake read error from {}: {}", addr, e);
            return;
        }
    };

    let color = state.colors.assign(&name).await;

    // The cursor starts at the current log length, so this client receives
    // its own join notice and everything after it, but no earlier history.
    let cursor = state.log.len().await;
    let broadcaster = state.log.subscribe();

    let record = ConnectionRecord::new(name.clone(), color, addr);
    let conn_id = record.id;
    state.registry.register(record).await;
    tracing::info!(
        "'{}' joined from {} ({} connected)",
        name,
        addr,
        state.registry.len().await
    );

    state
        .log
        .append(Message::new(format_join_notice(&name, color)))
        .await;

    // Active: one task per direction. The read task feeds the shared log,
    // the write task drains it to this socket.
    let read_state = state.clone();
    let read_name = name.clone();
    let mut recv_task =
        tokio::spawn(async move { read_loop(lines, read_name, color, read_state).await });

    let write_state = state.clone();
    let mut send_task =
        tokio::spawn(async move { write_loop(write_half, broadcaster, cursor, write_state).await });

    // If either side of the connection finishes, stop the other. The abort
    // happens before the departure notice is appended, so no write loop ever
    // touches this socket after the connection is considered closed.
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Closing: announce the departure, then drop the bookkeeping entry.
    state
        .log
        .append(Message::new(format_leave_notice(&name, color)))
        .await;
    state.registry.unregister(&conn_id).await;
    tracing::info!(
        "'{}' left ({} still connected)",
        name,
        state.registry.len().await
    );
}

/// Ingest inbound lines from one client into the shared log.
///
/// Runs until the client closes the connection or a read fails.
async fn read_loop(
    mut lines: Lines<BufReader<OwnedReadHalf>>,
    name: String,
    color: &'static str,
    state: Arc<AppState>,
) {
    loop {
        match lines.next_line().await {
            Ok(Some(raw)) => {
                // Blank lines are dropped, not relayed.
                let Some(body) = normalize_inbound_line(&raw) else {
                    continue;
                };
                let rendered = format_chat_line(&name, color, body);
                tracing::info!("{}", rendered);
                state.log.append(Message::new(rendered)).await;
            }
            Ok(None) => {
                tracing::info!("'{}' closed the connection", name);
                break;
            }
            Err(e) => {
                tracing::warn!("Read error from '{}': {}", name, e);
                break;
            }
        }
    }
}

/// Stream the unseen suffix of the log to one client, in log order.
///
/// Blocks on the broadcaster until the log grows past the cursor, then
/// writes every new entry as one `\n`-terminated line and advances the
/// cursor past the batch. Runs until a write fails or the task is aborted
/// by its peer read loop finishing.
async fn write_loop(
    mut writer: OwnedWriteHalf,
    mut broadcaster: Broadcaster,
    mut cursor: usize,
    state: Arc<AppState>,
) {
    while broadcaster.wait_past(cursor).await.is_some() {
        let batch = state.log.read_from(cursor).await;
        for message in &batch {
            let line = format!("{}\n", message.rendered());
            if let Err(e) = writer.write_all(line.as_bytes()).await {
                tracing::warn!("Send failed, dropping connection: {}", e);
                return;
            }
        }
        cursor += batch.len();
    }
}
