//! Bookkeeping for active connections.

use std::collections::HashMap;
use std::net::SocketAddr;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

/// One accepted connection that completed its handshake.
///
/// Name and color are set once during the handshake and never change.
/// A connection is live exactly as long as its record is in the registry.
#[derive(Debug, Clone)]
pub struct ConnectionRecord {
    /// Unique id for this connection (names may repeat).
    pub id: Uuid,
    /// Display name sent as the first line of the handshake.
    pub name: String,
    /// ANSI color assigned at join time.
    pub color: &'static str,
    /// Peer address, for logs.
    pub addr: SocketAddr,
    /// When the handshake completed.
    pub connected_at: DateTime<Utc>,
}

impl ConnectionRecord {
    /// Create a record for a connection that just completed its handshake.
    pub fn new(name: String, color: &'static str, addr: SocketAddr) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            color,
            addr,
            connected_at: Utc::now(),
        }
    }
}

/// Registry of live connections.
///
/// Guarded by its own lock, independent of the message log's lock; the two
/// are never held at the same time, so there is no ordering between them.
pub struct ConnectionRegistry {
    connections: Mutex<HashMap<Uuid, ConnectionRecord>>,
}

impl ConnectionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(HashMap::new()),
        }
    }

    /// Add a record for a connection entering the chat.
    pub async fn register(&self, record: ConnectionRecord) {
        let mut connections = self.connections.lock().await;
        connections.insert(record.id, record);
    }

    /// Remove the record for a closed connection.
    ///
    /// Returns the removed record, or `None` if the id was not registered.
    pub async fn unregister(&self, id: &Uuid) -> Option<ConnectionRecord> {
        let mut connections = self.connections.lock().await;
        connections.remove(id)
    }

    /// Number of live connections.
    pub async fn len(&self) -> usize {
        self.connections.lock().await.len()
    }

    /// Whether no connection is live.
    pub async fn is_empty(&self) -> bool {
        self.connections.lock().await.is_empty()
    }

    /// Snapshot of the display names of live connections, sorted for
    /// consistent ordering.
    pub async fn names(&self) -> Vec<String> {
        let connections = self.connections.lock().await;
        let mut names: Vec<String> = connections.values().map(|r| r.name.clone()).collect();
        names.sort();
        names
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::palette::PALETTE;

    fn test_record(name: &str) -> ConnectionRecord {
        ConnectionRecord::new(
            name.to_string(),
            PALETTE[0],
            "127.0.0.1:40000".parse().unwrap(),
        )
    }

    #[tokio::test]
    async fn test_register_adds_a_live_connection() {
        // テスト項目: register 後にレコードが登録されている
        // given (前提条件):
        let registry = ConnectionRegistry::new();
        let record = test_record("alice");

        // when (操作):
        registry.register(record).await;

        // then (期待する結果):
        assert_eq!(registry.len().await, 1);
        assert_eq!(registry.names().await, vec!["alice".to_string()]);
    }

    #[tokio::test]
    async fn test_unregister_removes_the_connection() {
        // テスト項目: unregister によってレコードが削除され、返却される
        // given (前提条件):
        let registry = ConnectionRegistry::new();
        let record = test_record("alice");
        let id = record.id;
        registry.register(record).await;

        // when (操作):
        let removed = registry.unregister(&id).await;

        // then (期待する結果):
        assert_eq!(removed.map(|r| r.name), Some("alice".to_string()));
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_unregister_unknown_id_returns_none() {
        // テスト項目: 未登録の id に対して unregister が None を返す
        // given (前提条件):
        let registry = ConnectionRegistry::new();

        // when (操作):
        let removed = registry.unregister(&Uuid::new_v4()).await;

        // then (期待する結果):
        assert!(removed.is_none());
    }

    #[tokio::test]
    async fn test_same_name_can_be_registered_twice() {
        // テスト項目: 同じ表示名の接続が別 id として共存できる
        // given (前提条件):
        let registry = ConnectionRegistry::new();

        // when (操作):
        registry.register(test_record("alice")).await;
        registry.register(test_record("alice")).await;

        // then (期待する結果):
        assert_eq!(registry.len().await, 2);
        assert_eq!(
            registry.names().await,
            vec!["alice".to_string(), "alice".to_string()]
        );
    }

    #[tokio::test]
    async fn test_names_are_sorted() {
        // テスト項目: names が表示名のソート済みスナップショットを返す
        // given (前提条件):
        let registry = ConnectionRegistry::new();
        registry.register(test_record("carol")).await;
        registry.register(test_record("alice")).await;
        registry.register(test_record("bob")).await;

        // when (操作):
        let names = registry.names().await;

        // then (期待する結果):
        assert_eq!(
            names,
            vec!["alice".to_string(), "bob".to_string(), "carol".to_string()]
        );
    }
}
