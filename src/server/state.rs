//! Server state shared by all connection handlers.

use crate::server::log::MessageLog;
use crate::server::palette::ColorAssigner;
use crate::server::registry::ConnectionRegistry;

/// Shared application state.
///
/// Each field guards itself; handlers never hold two of these locks at
/// once, so no lock ordering exists between the log, the registry and the
/// color table.
pub struct AppState {
    /// Append-only history of everything said in the chat.
    pub log: MessageLog,
    /// Live connections, for bookkeeping and logs.
    pub registry: ConnectionRegistry,
    /// Round-robin color assignment for joining users.
    pub colors: ColorAssigner,
}

impl AppState {
    /// Create fresh state for a new server.
    pub fn new() -> Self {
        Self {
            log: MessageLog::new(),
            registry: ConnectionRegistry::new(),
            colors: ColorAssigner::new(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
