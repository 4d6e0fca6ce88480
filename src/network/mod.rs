//! Network Module
//!
//! TCP server and client handling.
//!
//! ## Architecture
//! - Single acceptor thread polling a non-blocking listener
//! - One handler thread per connection, bounded by `max_connections`
//! - Commands routed through Engine

mod client;
mod connection;
mod server;

pub use client::{Client, KEY_NOT_FOUND_MESSAGE};
pub use connection::Connection;
pub use server::{Server, ShutdownHandle};
