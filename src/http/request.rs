use bytes::Bytes;

use crate::http::headers::Headers;

/// HTTP request methods.
///
/// The methods this crate knows about get their own variant; any other
/// token is kept verbatim in [`Method::Extension`].
#[derive(Debug, Clone, PartialEq, Eq)]
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
    /// Any other method token
    Extension(String),
}

impl Method {
    /// Parses an HTTP method token (case-sensitive).
    ///
    /// ```
    /// # use spool::http::request::Method;
    /// assert_eq!(Method::from_token("GET"), Method::GET);
    /// assert_eq!(Method::from_token("PURGE"), Method::Extension("PURGE".into()));
    /// ```
    pub fn from_token(s: &str) -> Self {
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

/// Method and raw path of a request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub method: Method,
    /// Path exactly as sent, not percent-decoded.
    pub path: String,
}

/// A decoded HTTP request head, plus whatever body bytes followed it in the
/// decoded buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    /// `None` when the first line was not a recognizable request line.
    pub line: Option<RequestLine>,
    /// Request headers, keyed by lower-cased name
    pub headers: Headers,
    /// Length of the head including the blank line; `None` if the blank
    /// line was never seen.
    pub head_len: Option<usize>,
    /// Bytes after the blank line; `None` if there were none.
    pub body: Option<Bytes>,
}

impl Request {
    pub fn method(&self) -> Option<&Method> {
        self.line.as_ref().map(|l| &l.method)
    }

    pub fn path(&self) -> Option<&str> {
        self.line.as_ref().map(|l| l.path.as_str())
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key)
    }

    /// Declared `Content-Length`, if present and numeric.
    pub fn content_length(&self) -> Option<u64> {
        self.header("content-length")
            .and_then(|v| v.trim().parse().ok())
    }

    /// Whether the client asked to wait for a `100 Continue` before sending
    /// the body.
    pub fn expects_continue(&self) -> bool {
        self.header("expect")
            .map(|v| v.trim().eq_ignore_ascii_case("100-continue"))
            .unwrap_or(false)
    }

    /// True once the blank line separating head and body has been seen.
    pub fn is_head_complete(&self) -> bool {
        self.head_len.is_some()
    }
}
