//! Error types for courier.

use derive_more::{Display, Error, From};
use serde_json::Value;

use crate::ResponseBody;

// ============================================================================
// Error Type
// ============================================================================

/// Main error type for courier operations.
///
/// Definition-time failures ([`Error::MultipleBody`]) surface when a method is
/// declared, every other variant surfaces while a call is executed.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// Two sources were routed to the request body.
    #[display("cannot have multiple body fields, found `{existing}` and `{new}`")]
    #[from(skip)]
    MultipleBody {
        /// Transformer that already produced the body slot.
        #[error(not(source))]
        existing: String,
        /// Transformer that attempted to add another body slot.
        #[error(not(source))]
        new: String,
    },

    /// Call arguments do not match the declared parameters.
    #[display("invalid arguments: {_0}")]
    #[from(skip)]
    InvalidArguments(#[error(not(source))] String),

    /// A template could not be rendered with the call arguments.
    #[display("cannot render template `{template}`: {message}")]
    #[from(skip)]
    Template {
        /// Template source.
        template: String,
        /// Error message.
        message: String,
    },

    /// 4xx (or policy-selected) status.
    #[display("client error {status}: {status_text}")]
    #[from(skip)]
    ClientError {
        /// HTTP status code.
        status: u16,
        /// Reason phrase.
        status_text: String,
        /// Response body as loaded when the error was raised.
        #[error(not(source))]
        body: ResponseBody,
    },

    /// 5xx status.
    #[display("server error {status}: {status_text}")]
    #[from(skip)]
    ServerError {
        /// HTTP status code.
        status: u16,
        /// Reason phrase.
        status_text: String,
        /// Response body as loaded when the error was raised.
        #[error(not(source))]
        body: ResponseBody,
    },

    /// The JSON-RPC response carried an `error` member.
    #[display("JSON-RPC error {code}: {message}")]
    #[from(skip)]
    JsonRpc {
        /// Error code.
        code: i64,
        /// Error message.
        message: String,
        /// Optional structured data.
        #[error(not(source))]
        data: Option<Value>,
    },

    /// The JSON-RPC response id differs from the request id.
    #[display("JSON-RPC id mismatch: expected {expected}, got {actual}")]
    #[from(skip)]
    JsonRpcIdMismatch {
        /// Id sent with the request (`null` when none was sent).
        #[error(not(source))]
        expected: Value,
        /// Id found in the response (`null` when absent).
        #[error(not(source))]
        actual: Value,
    },

    /// Network/connection errors.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// Request timeout.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,

    /// Invalid request configuration.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// A dumper or loader rejected a value.
    #[display("codec error: {_0}")]
    #[from(skip)]
    Codec(#[error(not(source))] String),

    /// JSON serialization error.
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// JSON deserialization error with path context.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    JsonDeserialization {
        /// JSON path to the error (e.g., "user.address.city").
        path: String,
        /// Error message.
        message: String,
    },

    /// Form URL-encoded serialization error.
    #[display("form serialization error: {_0}")]
    #[from]
    FormSerialization(serde_urlencoded::ser::Error),

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create the status error matching `status`: server error for 5xx,
    /// client error otherwise.
    #[must_use]
    pub fn http_status(status: u16, status_text: impl Into<String>, body: ResponseBody) -> Self {
        let status_text = status_text.into();
        if status >= 500 {
            Self::ServerError {
                status,
                status_text,
                body,
            }
        } else {
            Self::ClientError {
                status,
                status_text,
                body,
            }
        }
    }

    /// Create a multiple body error.
    #[must_use]
    pub fn multiple_body(existing: impl Into<String>, new: impl Into<String>) -> Self {
        Self::MultipleBody {
            existing: existing.into(),
            new: new.into(),
        }
    }

    /// Create an invalid arguments error.
    #[must_use]
    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::InvalidArguments(message.into())
    }

    /// Create a template rendering error.
    #[must_use]
    pub fn template(template: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Template {
            template: template.into(),
            message: message.into(),
        }
    }

    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a codec error.
    #[must_use]
    pub fn codec(message: impl Into<String>) -> Self {
        Self::Codec(message.into())
    }

    /// Create a JSON deserialization error with path context.
    #[must_use]
    pub fn json_deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::JsonDeserialization {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns `true` if this error was raised for a JSON-RPC level failure.
    #[must_use]
    pub const fn is_json_rpc(&self) -> bool {
        matches!(self, Self::JsonRpc { .. } | Self::JsonRpcIdMismatch { .. })
    }

    /// Returns the HTTP status code if this is a status error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::ClientError { status, .. } | Self::ServerError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if this is a [`Error::ClientError`].
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::ClientError { .. })
    }

    /// Returns `true` if this is a [`Error::ServerError`].
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self, Self::ServerError { .. })
    }

    /// Returns the response body if this is a status error.
    #[must_use]
    pub const fn body(&self) -> Option<&ResponseBody> {
        match self {
            Self::ClientError { body, .. } | Self::ServerError { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Try to decode the status error body.
    ///
    /// Returns `None` if this is not a status error or the body was never
    /// loaded.
    ///
    /// # Example
    ///
    /// ```ignore
    /// #[derive(Debug, Deserialize)]
    /// struct ApiError {
    ///     message: String,
    /// }
    ///
    /// match get_user.bind(&client).call(args!(id = 42)).await {
    ///     Ok(body) => println!("{body:?}"),
    ///     Err(e) => {
    ///         if let Some(Ok(api_error)) = e.decode_body::<ApiError>() {
    ///             println!("API error: {}", api_error.message);
    ///         }
    ///     }
    /// }
    /// ```
    pub fn decode_body<T: serde::de::DeserializeOwned>(&self) -> Option<Result<T>> {
        match self.body()? {
            ResponseBody::NotLoaded => None,
            body => Some(body.clone().into_typed()),
        }
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use serde_json::json;

    use super::*;

    #[test]
    fn error_display() {
        let err = Error::http_status(404, "Not Found", ResponseBody::NotLoaded);
        assert_eq!(err.to_string(), "client error 404: Not Found");

        let err = Error::Timeout;
        assert_eq!(err.to_string(), "request timeout");

        let err = Error::multiple_body("Body(a)", "Body(b)");
        assert_eq!(
            err.to_string(),
            "cannot have multiple body fields, found `Body(a)` and `Body(b)`"
        );

        let err = Error::JsonRpc {
            code: -32601,
            message: "Method not found".to_string(),
            data: None,
        };
        assert_eq!(err.to_string(), "JSON-RPC error -32601: Method not found");

        let err = Error::json_deserialization("user.address.city", "missing field `city`");
        assert_eq!(
            err.to_string(),
            "JSON deserialization error at 'user.address.city': missing field `city`"
        );
    }

    #[test]
    fn error_status() {
        let err = Error::http_status(404, "Not Found", ResponseBody::NotLoaded);
        assert_eq!(err.status(), Some(404));
        assert!(err.is_client_error());
        assert!(!err.is_server_error());

        let err = Error::http_status(502, "Bad Gateway", ResponseBody::NotLoaded);
        assert_eq!(err.status(), Some(502));
        assert!(!err.is_client_error());
        assert!(err.is_server_error());

        let err = Error::Timeout;
        assert_eq!(err.status(), None);
        assert!(!err.is_client_error());
        assert!(!err.is_server_error());
    }

    #[test]
    fn policy_selected_success_code_is_client_error() {
        let err = Error::http_status(201, "Created", ResponseBody::NotLoaded);
        assert!(err.is_client_error());
    }

    #[test]
    fn error_predicates() {
        assert!(Error::Timeout.is_timeout());
        assert!(Error::connection("failed").is_connection());
        assert!(!Error::Timeout.is_connection());
        let mismatch = Error::JsonRpcIdMismatch {
            expected: json!("1"),
            actual: json!("2"),
        };
        assert!(mismatch.is_json_rpc());
        assert_eq!(
            mismatch.to_string(),
            r#"JSON-RPC id mismatch: expected "1", got "2""#
        );
    }

    #[test]
    fn error_decode_body() {
        #[derive(Debug, PartialEq, serde::Deserialize)]
        struct ApiError {
            error: String,
        }

        let body = ResponseBody::Raw(Bytes::from(r#"{"error": "not found"}"#));
        let err = Error::http_status(404, "Not Found", body);
        let decoded = err
            .decode_body::<ApiError>()
            .expect("should have body")
            .expect("should decode");
        assert_eq!(
            decoded,
            ApiError {
                error: "not found".to_string()
            }
        );

        let err = Error::http_status(404, "Not Found", ResponseBody::Value(json!({"error": "x"})));
        assert!(matches!(err.decode_body::<ApiError>(), Some(Ok(_))));

        let err = Error::http_status(404, "Not Found", ResponseBody::NotLoaded);
        assert!(err.decode_body::<ApiError>().is_none());

        assert!(Error::Timeout.decode_body::<ApiError>().is_none());
    }
}
