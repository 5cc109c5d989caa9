use serde::Serialize;

/// Content type used when nothing more specific is known.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// HTTP status codes supported by the server.
///
/// Common HTTP status codes used in responses:
/// - `Ok` (200): Request successful
/// - `BadRequest` (400): Malformed request
/// - `Forbidden` (403): Path escapes the static root
/// - `NotFound` (404): Resource not found
/// - `InternalServerError` (500): Server error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 403 Forbidden
    Forbidden,
    /// 404 Not Found
    NotFound,
    /// 500 Internal Server Error
    InternalServerError,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use rawhttpd::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::Forbidden.as_u16(), 403);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
            StatusCode::InternalServerError => 500,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use rawhttpd::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

/// A logical HTTP response, not yet bound to a connection.
///
/// Content-Type, Content-Length, Connection, Server and Date are produced by
/// the writer; `headers` holds extra headers emitted after them in order.
#[derive(Debug, Clone)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// Media type of the body, without charset for `text/*` types
    pub content_type: String,
    /// Extra headers, written in insertion order, duplicates allowed
    pub headers: Vec<(String, String)>,
    /// Response body as bytes
    pub body: Vec<u8>,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .content_type("text/plain")
///     .header("Cache-Control", "no-cache")
///     .body(b"hi".to_vec())
///     .build();
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    content_type: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            content_type: OCTET_STREAM.to_string(),
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Appends an extra header. Existing entries with the same name are kept.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Sets the response body.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn build(self) -> Response {
        Response {
            status: self.status,
            content_type: self.content_type,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Response {
    pub fn new(status: StatusCode) -> ResponseBuilder {
        ResponseBuilder::new(status)
    }

    /// Creates a 200 OK response with the given body and content type.
    pub fn ok(body: impl Into<Vec<u8>>, content_type: impl Into<String>) -> Self {
        ResponseBuilder::new(StatusCode::Ok)
            .content_type(content_type)
            .body(body)
            .build()
    }

    pub fn html(status: StatusCode, html: impl Into<String>) -> Self {
        ResponseBuilder::new(status)
            .content_type("text/html")
            .body(html.into())
            .build()
    }

    /// Serializes `value` as a compact JSON 200 response.
    pub fn json<T: Serialize>(value: &T) -> serde_json::Result<Self> {
        let body = serde_json::to_vec(value)?;
        Ok(ResponseBuilder::new(StatusCode::Ok)
            .content_type("application/json; charset=utf-8")
            .body(body)
            .build())
    }

    /// An HTML error page: `<h1>{code} {reason}</h1><p>{message}</p>`.
    pub fn error(status: StatusCode, message: &str) -> Self {
        let mut html = format!("<h1>{} {}</h1>", status.as_u16(), status.reason_phrase());
        if !message.is_empty() {
            html.push_str(&format!("<p>{}</p>", message));
        }
        Self::html(status, html)
    }

    pub fn bad_request() -> Self {
        Self::error(StatusCode::BadRequest, "The server could not understand the request.")
    }

    pub fn forbidden() -> Self {
        Self::error(StatusCode::Forbidden, "Access to the requested resource is forbidden.")
    }

    /// Creates a 404 Not Found response.
    pub fn not_found() -> Self {
        Self::error(StatusCode::NotFound, "The requested URL was not found on this server.")
    }

    /// Creates a 500 Internal Server Error response.
    pub fn internal_error() -> Self {
        Self::error(StatusCode::InternalServerError, "Something went wrong on the server.")
    }
}
