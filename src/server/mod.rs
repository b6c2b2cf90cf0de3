//! TCP chat relay server implementation.

mod domain;
mod handler;
mod log;
mod palette;
mod registry;
mod runner;
mod signal;
mod state;

pub use log::{Broadcaster, Message, MessageLog};
pub use palette::{ColorAssigner, PALETTE, RESET_COLOR};
pub use registry::{ConnectionRecord, ConnectionRegistry};
pub use runner::{Server, run_server};
pub use state::AppState;
