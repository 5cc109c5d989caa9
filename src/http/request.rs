use std::collections::HashMap;

/// HTTP request methods.
///
/// Methods outside the standard set are kept verbatim in `Extension`, so a
/// route registered for `"get"` never matches a `GET` request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// POST - Create or submit data
    POST,
    /// PUT - Replace a resource
    PUT,
    /// DELETE - Delete a resource
    DELETE,
    /// HEAD - Like GET but without the response body
    HEAD,
    /// OPTIONS - Describe communication options
    OPTIONS,
    /// PATCH - Partial modification of a resource
    PATCH,
    /// Any other token, case preserved
    Extension(String),
}

/// The request line and header block exactly as received.
///
/// Only kept for logging; nothing downstream interprets these.
#[derive(Debug, Clone, Default)]
pub struct RawRequest {
    pub request_line: String,
    pub header_lines: Vec<String>,
    pub header_block: String,
}

/// Represents a parsed HTTP request from a client.
///
/// Header names are lower-cased and values trimmed; when a name repeats the
/// last occurrence wins. `path` is the raw request target, not URL-decoded.
#[derive(Debug, Clone)]
pub struct Request {
    /// The HTTP method (GET, POST, etc.)
    pub method: Method,
    /// The request target as sent (e.g., "/index.html")
    pub path: String,
    /// HTTP version token (typically "HTTP/1.1")
    pub version: String,
    /// Request headers keyed by lower-cased name
    pub headers: HashMap<String, String>,
    /// Request body, bounded by Content-Length
    pub body: Vec<u8>,
    pub raw: RawRequest,
}

/// Builder for constructing Request objects.
pub struct RequestBuilder {
    method: Option<Method>,
    path: Option<String>,
    version: Option<String>,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

impl Method {
    /// Parses an HTTP method token. Matching is case-sensitive.
    ///
    /// # Example
    ///
    /// ```
    /// # use rawhttpd::http::request::Method;
    /// assert_eq!(Method::from_str("GET"), Method::GET);
    /// assert_eq!(Method::from_str("get"), Method::Extension("get".to_string()));
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Self {
        match s {
            "GET" => Method::GET,
            "POST" => Method::POST,
            "PUT" => Method::PUT,
            "DELETE" => Method::DELETE,
            "HEAD" => Method::HEAD,
            "OPTIONS" => Method::OPTIONS,
            "PATCH" => Method::PATCH,
            other => Method::Extension(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::HEAD => "HEAD",
            Method::OPTIONS => "OPTIONS",
            Method::PATCH => "PATCH",
            Method::Extension(token) => token,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: None,
            path: None,
            version: None,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Adds a header; the name is lower-cased like the parser does.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(key.into().to_ascii_lowercase(), value.into());
        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    pub fn build(self) -> Result<Request, &'static str> {
        let method = self.method.ok_or("method missing")?;
        let path = self.path.ok_or("path missing")?;
        let version = self.version.unwrap_or_else(|| "HTTP/1.1".to_string());

        let request_line = format!("{} {} {}", method, path, version);
        let header_lines: Vec<String> = self
            .headers
            .iter()
            .map(|(k, v)| format!("{}: {}", k, v))
            .collect();
        let mut header_block = request_line.clone();
        for line in &header_lines {
            header_block.push_str("\r\n");
            header_block.push_str(line);
        }

        Ok(Request {
            method,
            path,
            version,
            headers: self.headers,
            body: self.body,
            raw: RawRequest {
                request_line,
                header_lines,
                header_block,
            },
        })
    }
}

impl Request {
    /// Retrieves a header value by name, ignoring ASCII case.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .get(&key.to_ascii_lowercase())
            .map(|v| v.as_str())
    }

    /// Determines whether the connection should remain open after the response.
    ///
    /// Keep-alive is opt-in: the version must be exactly `HTTP/1.1` and the
    /// Connection header must say `keep-alive`. An absent header means close.
    pub fn keep_alive(&self) -> bool {
        self.version == "HTTP/1.1"
            && self
                .header("connection")
                .map(|v| v.eq_ignore_ascii_case("keep-alive"))
                .unwrap_or(false)
    }
}
