//! The response message read by response transformers.
//!
//! An [`HttpResponse`] arrives from the transport with its body
//! [`ResponseBody::NotLoaded`]; the executor loads it only when a response
//! transformer asks for it. Transformers then replace the body step by step
//! (raw bytes, JSON value, decoded model), and the final body is the result of
//! the call.
//!
//! # Example
//!
//! ```
//! use courier_core::ResponseBody;
//! use serde_json::json;
//!
//! let body = ResponseBody::Value(json!({"name": "Alice"}));
//! let name: serde_json::Map<String, serde_json::Value> = body.into_typed().expect("object");
//! assert_eq!(name["name"], "Alice");
//! ```

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{Error, Result, from_json};

/// Body of a response, as far as it has been processed.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ResponseBody {
    /// Not fetched from the transport.
    #[default]
    NotLoaded,
    /// Raw bytes as received.
    Raw(Bytes),
    /// Parsed or decoded value.
    Value(Value),
    /// The whole response, kept as the result.
    Response(Box<HttpResponse>),
}

impl ResponseBody {
    /// Returns `true` until the body is fetched.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        !matches!(self, Self::NotLoaded)
    }

    /// The body as a JSON value.
    ///
    /// Raw bytes are parsed (an empty payload is `null`), a missing body is
    /// `null`.
    pub fn to_value(&self) -> Result<Value> {
        match self {
            Self::NotLoaded => Ok(Value::Null),
            Self::Raw(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Value::Null),
            Self::Raw(bytes) => from_json(bytes),
            Self::Value(value) => Ok(value.clone()),
            Self::Response(_) => Err(Error::codec("a kept response is not a JSON value")),
        }
    }

    /// Decode the body into `T`, reporting the failing path.
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<T> {
        match self {
            Self::Raw(bytes) if !bytes.iter().all(u8::is_ascii_whitespace) => from_json(&bytes),
            Self::Response(_) => Err(Error::codec(
                "a kept response cannot be decoded, use `into_response`",
            )),
            other => from_value(other.to_value()?),
        }
    }

    /// The kept response, produced by `KeepResponse`.
    pub fn into_response(self) -> Result<HttpResponse> {
        match self {
            Self::Response(response) => Ok(*response),
            _ => Err(Error::codec("the response was not kept")),
        }
    }
}

/// Deserialize a JSON value with path-aware error messages.
pub fn from_value<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_path_to_error::deserialize(value)
        .map_err(|e| Error::json_deserialization(e.path().to_string(), e.inner().to_string()))
}

/// Response returned by a transport.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status_code: u16,
    /// Reason phrase.
    pub status_text: String,
    /// Final URL of the response.
    pub url: String,
    /// Headers in received order.
    pub headers: Vec<(String, String)>,
    /// Body, see [`ResponseBody`].
    pub body: ResponseBody,
}

impl HttpResponse {
    /// Create a response with an unloaded body.
    #[must_use]
    pub fn new(status_code: u16, status_text: impl Into<String>) -> Self {
        Self {
            status_code,
            status_text: status_text.into(),
            ..Self::default()
        }
    }

    /// Sets the URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Appends a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: ResponseBody) -> Self {
        self.body = body;
        self
    }

    /// First header named `name`, compared case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status_code >= 200 && self.status_code < 300
    }
}
