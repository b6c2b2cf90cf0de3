//! Utilities shared by the server and the client.

pub mod logger;
