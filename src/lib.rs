//! rawhttpd - a minimal HTTP/1.1 server on raw TCP sockets
//!
//! Frames requests out of the byte stream by hand, answers from a small
//! route table or from a static directory, and supports keep-alive with
//! pipelining.

pub mod config;
pub mod http;
pub mod server;
