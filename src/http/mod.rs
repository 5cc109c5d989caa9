//! HTTP/1.1 over a raw byte stream.
//!
//! No HTTP library is involved: requests are framed straight out of the
//! connection's byte buffer and responses are serialized by hand.
//!
//! # Architecture
//!
//! - **`connection`**: Per-connection state machine driving the pieces below
//! - **`parser`**: Frames one request out of the front of a byte buffer
//! - **`request`**: Parsed request representation
//! - **`router`**: Exact `(method, path)` route table of async handlers
//! - **`handlers`**: Built-in API handlers
//! - **`static_files`**: Resolves paths to files inside the static root
//! - **`mime`**: MIME type detection based on file extensions
//! - **`response`**: HTTP response representation with builder pattern
//! - **`writer`**: Serializes and writes HTTP responses to the client
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Append bytes until a request frames
//!        └──────┬──────┘
//!               │ Request framed (malformed → 400, close)
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Route, else static file
//!        └──────┬───────────┘
//!               │ Response ready (handler error → drop, no response)
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response to client
//!        └──────┬───────────┘
//!               │ Response sent
//!               ├─ Keep-Alive → Reading (leftover bytes parsed first)
//!               └─ Close → Closed
//! ```

pub mod connection;
pub mod handlers;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod router;
pub mod static_files;
pub mod writer;
