use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::Response;

const HTTP_VERSION: &str = "HTTP/1.1";

/// Value of the `Server` header on every response.
pub const SERVER_NAME: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// RFC 1123 date as used by the `Date` header.
pub fn http_date(now: chrono::DateTime<chrono::Utc>) -> String {
    now.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Serializes a response into its wire form.
///
/// The fixed headers always come first and in this order: Content-Type,
/// Content-Length, Connection, Server, Date. Extra headers follow as given,
/// even when they repeat a fixed name.
pub fn serialize_response(resp: &Response, keep_alive: bool) -> Vec<u8> {
    let mut buf = Vec::with_capacity(256 + resp.body.len());

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());

    let content_type = if resp.content_type.starts_with("text/") {
        format!("{}; charset=utf-8", resp.content_type)
    } else {
        resp.content_type.clone()
    };
    let connection = if keep_alive { "keep-alive" } else { "close" };
    let content_length = resp.body.len().to_string();
    let date = http_date(chrono::Utc::now());

    let fixed = [
        ("Content-Type", content_type.as_str()),
        ("Content-Length", content_length.as_str()),
        ("Connection", connection),
        ("Server", SERVER_NAME),
        ("Date", date.as_str()),
    ];

    // Headers
    let extra = resp.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()));
    for (k, v) in fixed.into_iter().chain(extra) {
        buf.extend_from_slice(k.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(v.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    // Header/body separator
    buf.extend_from_slice(b"\r\n");

    // Body
    buf.extend_from_slice(&resp.body);

    buf
}

pub struct ResponseWriter {
    buffer: Vec<u8>,
    written: usize,
}

impl ResponseWriter {
    pub fn new(response: &Response, keep_alive: bool) -> Self {
        Self {
            buffer: serialize_response(response, keep_alive),
            written: 0,
        }
    }

    pub async fn write_to_stream<S>(&mut self, stream: &mut S) -> anyhow::Result<()>
    where
        S: AsyncWrite + Unpin,
    {
        while self.written < self.buffer.len() {
            let n = stream
                .write(&self.buffer[self.written..])
                .await?;

            if n == 0 {
                return Err(anyhow::anyhow!("connection closed while writing"));
            }

            self.written += n;
        }

        stream.flush().await?;
        Ok(())
    }
}
