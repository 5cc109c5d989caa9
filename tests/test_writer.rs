use rawhttpd::http::response::{Response, StatusCode};
use rawhttpd::http::writer::{SERVER_NAME, serialize_response};

fn split(bytes: &[u8]) -> (Vec<String>, Vec<u8>) {
    let end = bytes
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("header terminator");
    let head = String::from_utf8(bytes[..end].to_vec()).unwrap();
    let lines = head.split("\r\n").map(str::to_string).collect();
    (lines, bytes[end + 4..].to_vec())
}

#[test]
fn test_fixed_header_order() {
    let response = Response::ok("hi", "text/plain");
    let (lines, body) = split(&serialize_response(&response, false));

    assert_eq!(lines[0], "HTTP/1.1 200 OK");
    assert_eq!(lines[1], "Content-Type: text/plain; charset=utf-8");
    assert_eq!(lines[2], "Content-Length: 2");
    assert_eq!(lines[3], "Connection: close");
    assert_eq!(lines[4], format!("Server: {}", SERVER_NAME));
    assert!(lines[5].starts_with("Date: "));
    assert!(lines[5].ends_with(" GMT"));
    assert_eq!(lines.len(), 6);
    assert_eq!(body, b"hi");
}

#[test]
fn test_keep_alive_header() {
    let response = Response::ok("", "text/plain");
    let (lines, _) = split(&serialize_response(&response, true));

    assert_eq!(lines[3], "Connection: keep-alive");
}

#[test]
fn test_charset_only_for_text_types() {
    let response = Response::ok(vec![0u8, 1, 2], "image/png");
    let (lines, _) = split(&serialize_response(&response, false));

    assert_eq!(lines[1], "Content-Type: image/png");
}

#[test]
fn test_content_length_counts_utf8_bytes() {
    let text = "héllo wörld ✓";
    let response = Response::ok(text, "text/plain");
    let (lines, body) = split(&serialize_response(&response, false));

    assert_eq!(lines[2], format!("Content-Length: {}", text.len()));
    assert_ne!(text.len(), text.chars().count());
    assert_eq!(body, text.as_bytes());
}

#[test]
fn test_extra_headers_follow_fixed_ones_with_duplicates() {
    let response = Response::new(StatusCode::Ok)
        .content_type("text/plain")
        .header("X-One", "1")
        .header("Server", "override")
        .body("x")
        .build();
    let (lines, _) = split(&serialize_response(&response, false));

    assert_eq!(lines[6], "X-One: 1");
    assert_eq!(lines[7], "Server: override");
    assert_eq!(lines.iter().filter(|l| l.starts_with("Server: ")).count(), 2);
}

#[test]
fn test_status_line_uses_reason_phrase() {
    let (lines, _) = split(&serialize_response(&Response::forbidden(), false));

    assert_eq!(lines[0], "HTTP/1.1 403 Forbidden");
    assert_eq!(lines[1], "Content-Type: text/html; charset=utf-8");
}
