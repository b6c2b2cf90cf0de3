//! Terminal chat application over TCP.
//!
//! This library provides a broadcast relay server and a CLI client for a
//! line-oriented chat protocol: the first line a client sends is its display
//! name, every later line is one chat message, and the server fans every
//! message out to all connected clients with an ANSI color per user.

pub mod client;
pub mod common;
pub mod server;
