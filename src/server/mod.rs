//! Socket-facing side of the server.

pub mod listener;
pub mod state;
