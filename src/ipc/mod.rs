//! IPC module for presentation-daemon communication

mod protocol;
mod server;

pub use server::Server;
