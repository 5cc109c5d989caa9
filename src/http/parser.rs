use crate::http::request::{Method, RawRequest, Request};
use std::collections::HashMap;

const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// No complete request buffered yet; nothing may be discarded.
    #[error("incomplete request")]
    Incomplete,
    #[error("request line needs method, target and version")]
    InvalidRequestLine,
    #[error("invalid Content-Length header")]
    InvalidContentLength,
}

/// Extracts at most one request from the front of `buf`.
///
/// On success returns the request and the number of bytes it occupied:
/// header block, terminator and a body of exactly `Content-Length` bytes.
/// Anything after that belongs to the next pipelined request.
pub fn parse_http_request(buf: &[u8]) -> Result<(Request, usize), ParseError> {
    // Look for header/body separator
    let headers_end = find_headers_end(buf).ok_or(ParseError::Incomplete)?;
    let header_bytes = &buf[..headers_end];
    let body_bytes = &buf[headers_end + HEADER_TERMINATOR.len()..];

    let header_block = String::from_utf8_lossy(header_bytes).into_owned();

    let mut lines = header_block.split("\r\n");

    // Request line, split on single spaces
    let request_line = lines.next().unwrap_or_default();
    let parts: Vec<&str> = request_line.split(' ').collect();
    if parts.len() < 3 {
        return Err(ParseError::InvalidRequestLine);
    }

    let method = Method::from_str(parts[0]);
    let path = parts[1];
    let version = parts[2];

    // Headers
    let header_lines: Vec<String> = lines.map(str::to_string).collect();
    let mut headers = HashMap::new();

    for line in &header_lines {
        // Lines without a colon are ignored
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };

        headers.insert(
            key.trim().to_ascii_lowercase(),
            value.trim().to_string(),
        );
    }

    // Body
    let content_length = headers
        .get("content-length")
        .map(|v| parse_content_length(v))
        .transpose()?
        .unwrap_or(0);

    if body_bytes.len() < content_length {
        return Err(ParseError::Incomplete);
    }

    let body = body_bytes[..content_length].to_vec();

    let request = Request {
        method,
        path: path.to_string(),
        version: version.to_string(),
        headers,
        body,
        raw: RawRequest {
            request_line: request_line.to_string(),
            header_lines,
            header_block: header_block.clone(),
        },
    };

    let total_consumed = headers_end + HEADER_TERMINATOR.len() + content_length;
    Ok((request, total_consumed))
}

// Digits only: `usize::from_str` would also take a leading `+`.
fn parse_content_length(value: &str) -> Result<usize, ParseError> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::InvalidContentLength);
    }
    value.parse().map_err(|_| ParseError::InvalidContentLength)
}

fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(HEADER_TERMINATOR.len())
        .position(|w| w == HEADER_TERMINATOR)
}
