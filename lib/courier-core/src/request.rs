//! The request message built by request transformers.
//!
//! An [`HttpRequest`] starts empty for every call and is passed by value
//! through the request transformer chain. Header, query, file and extra
//! entries are ordered association lists: keys may repeat and insertion order
//! is kept.
//!
//! # Example
//!
//! ```
//! use courier_core::{HttpRequest, Method};
//! use serde_json::json;
//!
//! let request = HttpRequest::new()
//!     .with_method(Method::Post)
//!     .with_url("/users")
//!     .with_query("page", json!(1))
//!     .with_extra("trace", json!("abc"));
//!
//! assert_eq!(request.get_extra("trace"), Some(&json!("abc")));
//! ```

use bytes::Bytes;
use serde_json::Value;

use crate::Method;

/// A file attached to a multipart request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileData {
    /// File contents; `None` entries are skipped by transports.
    pub contents: Option<Bytes>,
    /// Filename sent in the part disposition.
    pub filename: Option<String>,
    /// MIME type of the part.
    pub content_type: Option<String>,
}

/// Request under construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: Method,
    /// Relative or absolute URL.
    pub url: String,
    /// Body value, serialized by the transport unless a dump stage already
    /// turned it into text.
    pub body: Option<Value>,
    /// Headers in insertion order.
    pub headers: Vec<(String, String)>,
    /// Query parameters in insertion order.
    pub query_params: Vec<(String, Value)>,
    /// Multipart files in insertion order.
    pub files: Vec<(String, FileData)>,
    /// Side-channel entries, never sent on the wire.
    pub extras: Vec<(String, Value)>,
}

impl HttpRequest {
    /// An empty GET request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the method.
    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Appends a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn with_query(mut self, name: impl Into<String>, value: Value) -> Self {
        self.query_params.push((name.into(), value));
        self
    }

    /// Appends a file.
    #[must_use]
    pub fn with_file(mut self, name: impl Into<String>, file: FileData) -> Self {
        self.files.push((name.into(), file));
        self
    }

    /// Appends an extra entry.
    #[must_use]
    pub fn with_extra(mut self, name: impl Into<String>, value: Value) -> Self {
        self.extras.push((name.into(), value));
        self
    }

    /// First extra entry named `name`.
    #[must_use]
    pub fn get_extra(&self, name: &str) -> Option<&Value> {
        self.extras
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// First header named `name`, compared case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}
