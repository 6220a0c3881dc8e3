//! Codecs and serialization utilities.
//!
//! A [`Dumper`] shapes an outgoing value (body or query parameter) according
//! to its declared [`TypeHint`]; a [`Loader`] shapes an incoming body into the
//! declared result type. Both work on `serde_json::Value` so any serde model
//! can flow through the pipeline.

use std::fmt;

use bytes::Bytes;
use serde_json::{Map, Value};

use crate::{Result, TypeHint};

/// Content type for request bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// JSON content type (`application/json`).
    Json,
    /// Form URL-encoded content type (`application/x-www-form-urlencoded`).
    FormUrlEncoded,
}

impl ContentType {
    /// Get the MIME type string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::FormUrlEncoded => "application/x-www-form-urlencoded",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Codec traits
// ============================================================================

/// Converts an outgoing value before it is written to the request.
pub trait Dumper: fmt::Debug + Send + Sync {
    /// Dump `value` declared as `type_hint`.
    fn dump(&self, value: Value, type_hint: &TypeHint) -> Result<Value>;
}

/// Converts an incoming body into the declared result shape.
pub trait Loader: fmt::Debug + Send + Sync {
    /// Load `value` as `type_hint`.
    fn load(&self, value: Value, type_hint: &TypeHint) -> Result<Value>;
}

/// Codec that leaves values unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl Dumper for PassThrough {
    fn dump(&self, value: Value, _type_hint: &TypeHint) -> Result<Value> {
        Ok(value)
    }
}

impl Loader for PassThrough {
    fn load(&self, value: Value, _type_hint: &TypeHint) -> Result<Value> {
        Ok(value)
    }
}

/// Codec mapping Rust `snake_case` keys to `camelCase` wire keys.
///
/// Dumping renames object keys recursively to `camelCase`, loading renames
/// them back, so plain `#[derive(Serialize, Deserialize)]` models can talk to
/// camel-cased APIs.
///
/// ```
/// use courier_core::{CamelCaseCodec, Dumper, TypeHint};
/// use serde_json::json;
///
/// let dumped = CamelCaseCodec
///     .dump(json!({"first_name": "Ada", "tags": [{"is_admin": true}]}), &TypeHint::Any)
///     .expect("dump");
/// assert_eq!(dumped, json!({"firstName": "Ada", "tags": [{"isAdmin": true}]}));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CamelCaseCodec;

impl Dumper for CamelCaseCodec {
    fn dump(&self, value: Value, _type_hint: &TypeHint) -> Result<Value> {
        Ok(rename_keys(value, &to_camel_case))
    }
}

impl Loader for CamelCaseCodec {
    fn load(&self, value: Value, _type_hint: &TypeHint) -> Result<Value> {
        Ok(rename_keys(value, &to_snake_case))
    }
}

fn rename_keys(value: Value, rename: &dyn Fn(&str) -> String) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (rename(&key), rename_keys(value, rename)))
                .collect::<Map<_, _>>(),
        ),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| rename_keys(item, rename))
                .collect(),
        ),
        other => other,
    }
}

fn to_camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for (i, c) in key.chars().enumerate() {
        if c == '_' && i > 0 {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn to_snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_uppercase() {
            if !out.is_empty() {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

// ============================================================================
// Value rendering
// ============================================================================

/// Render a value as text for headers, query strings and templates.
///
/// Strings are written verbatim, `null` is empty, everything else uses its
/// JSON form.
#[must_use]
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Flatten an object body into form pairs, skipping `null` members.
#[must_use]
pub fn form_pairs(map: &Map<String, Value>) -> Vec<(String, String)> {
    map.iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (key.clone(), render_value(value)))
        .collect()
}

// ============================================================================
// Serialization helpers
// ============================================================================

/// Serialize a value to JSON bytes.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
///
/// # Example
///
/// ```
/// use courier_core::to_json;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct User { name: String }
///
/// let user = User { name: "Alice".to_string() };
/// let bytes = to_json(&user).expect("serialize");
/// assert_eq!(bytes.as_ref(), br#"{"name":"Alice"}"#);
/// ```
pub fn to_json<T: serde::Serialize>(value: &T) -> Result<Bytes> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(Into::into)
}

/// Serialize a value to form URL-encoded bytes.
///
/// # Errors
///
/// Returns an error if form serialization fails.
///
/// # Example
///
/// ```
/// use courier_core::to_form;
///
/// let pairs = vec![("username", "alice"), ("password", "secret")];
/// let bytes = to_form(&pairs).expect("serialize");
/// assert_eq!(bytes.as_ref(), b"username=alice&password=secret");
/// ```
pub fn to_form<T: serde::Serialize>(value: &T) -> Result<Bytes> {
    serde_urlencoded::to_string(value)
        .map(|s| Bytes::from(s.into_bytes()))
        .map_err(Into::into)
}

/// Deserialize JSON bytes to a value with path-aware error messages.
///
/// Uses `serde_path_to_error` to provide detailed error messages that include
/// the exact path to the field that failed to deserialize.
///
/// # Errors
///
/// Returns an error if JSON deserialization fails, with the error message
/// including the path to the problematic field (e.g., "user.address.city").
///
/// # Example
///
/// ```
/// use courier_core::from_json;
/// use serde::Deserialize;
///
/// #[derive(Debug, PartialEq, Deserialize)]
/// struct User { name: String }
///
/// let bytes = br#"{"name":"Alice"}"#;
/// let user: User = from_json(bytes).expect("deserialize");
/// assert_eq!(user, User { name: "Alice".to_string() });
/// ```
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        crate::Error::json_deserialization(e.path().to_string(), e.inner().to_string())
    })
}
