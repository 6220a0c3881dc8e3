//! Call arguments.
//!
//! [`Args`] is what a caller passes to a bound method: positional and keyword
//! values, in the order given. Binding resolves them against the declared
//! parameters into [`CallArgs`], the name-to-value mapping transformers read.
//!
//! ```
//! use courier_core::{Args, args};
//! use serde_json::json;
//!
//! let positional = args!(42, "draft");
//! let keyword = args!(id = 42, state = "draft");
//! let mixed = Args::new().arg(42).kwarg("state", "draft");
//! assert_eq!(keyword.keyword()[0], ("id".to_string(), json!(42)));
//! # let _ = (positional, mixed);
//! ```

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::Client;

/// Arguments of one call, before binding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    positional: Vec<Value>,
    keyword: Vec<(String, Value)>,
    errors: Vec<String>,
}

impl Args {
    /// No arguments.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument.
    ///
    /// A value that fails to serialize is reported when the call is bound.
    #[must_use]
    pub fn arg(mut self, value: impl Serialize) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => self.positional.push(value),
            Err(e) => self
                .errors
                .push(format!("positional argument {}: {e}", self.positional.len())),
        }
        self
    }

    /// Append a keyword argument.
    ///
    /// A value that fails to serialize is reported when the call is bound.
    #[must_use]
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Serialize) -> Self {
        let name = name.into();
        match serde_json::to_value(value) {
            Ok(value) => self.keyword.push((name, value)),
            Err(e) => self.errors.push(format!("argument `{name}`: {e}")),
        }
        self
    }

    /// Positional values.
    #[must_use]
    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    /// Keyword values.
    #[must_use]
    pub fn keyword(&self) -> &[(String, Value)] {
        &self.keyword
    }

    /// Serialization failures collected while building.
    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

/// Build [`Args`] from positional values or from `name = value` pairs.
///
/// Values are taken by reference and serialized with serde.
#[macro_export]
macro_rules! args {
    () => {
        $crate::Args::new()
    };
    ($($name:ident = $value:expr),+ $(,)?) => {
        $crate::Args::new()$(.kwarg(stringify!($name), &$value))+
    };
    ($($value:expr),+ $(,)?) => {
        $crate::Args::new()$(.arg(&$value))+
    };
}

/// Bound call arguments plus the receiving client.
#[derive(Clone)]
pub struct CallArgs<'a> {
    client: Option<&'a dyn Client>,
    values: Vec<(String, Value)>,
}

impl<'a> CallArgs<'a> {
    /// Arguments bound for a call on `client`.
    #[must_use]
    pub fn new(client: &'a dyn Client, values: Vec<(String, Value)>) -> Self {
        Self {
            client: Some(client),
            values,
        }
    }

    /// Arguments with no receiving client.
    pub fn detached<I, K>(values: I) -> CallArgs<'static>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        CallArgs {
            client: None,
            values: values
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }

    /// Value bound to `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Returns `true` if `name` is bound.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// The receiving client.
    #[must_use]
    pub fn client(&self) -> Option<&'a dyn Client> {
        self.client
    }

    /// Bound values in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl fmt::Debug for CallArgs<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallArgs")
            .field("client", &self.client.is_some())
            .field("values", &self.values)
            .finish()
    }
}
