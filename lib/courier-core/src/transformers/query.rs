//! Query flattening strategies.
//!
//! Each strategy rewrites list and mapping query values into scalar entries;
//! scalar entries are left as they are, so applying a strategy twice is the
//! same as applying it once. Null members of lists and mappings are dropped.
//!
//! | value of `x`   | Deep object       | Form        | Delimiter (`,`) | PHP style       |
//! |----------------|-------------------|-------------|-----------------|-----------------|
//! | `[1, 2]`       | `x[]=1&x[]=2`     | `x=1&x=2`   | `x=1,2`         | `x[0]=1&x[1]=2` |
//! | `{a: 1, b: 2}` | `x[a]=1&x[b]=2`   | `a=1&b=2`   | `x=a,1,b,2`     | `x[a]=1&x[b]=2` |

use std::fmt;

use serde_json::Value;

use crate::transformer::request_transformers;
use crate::{CallArgs, FieldIn, FieldOut, HttpRequest, RequestTransformer, Result, render_value};

fn text(value: &Value) -> Value {
    Value::String(render_value(value))
}

fn present(value: &&Value) -> bool {
    !value.is_null()
}

fn rewrite(
    mut request: HttpRequest,
    flatten: impl Fn(String, Value, &mut Vec<(String, Value)>),
) -> HttpRequest {
    let params = std::mem::take(&mut request.query_params);
    for (name, value) in params {
        flatten(name, value, &mut request.query_params);
    }
    request
}

macro_rules! flattening_transformer {
    ($name:ident, $flatten:path) => {
        impl RequestTransformer for $name {
            fn transform_request(
                &self,
                request: HttpRequest,
                _fields_in: &[FieldIn],
                _fields_out: &[FieldOut],
                _args: &CallArgs<'_>,
            ) -> Result<HttpRequest> {
                Ok(rewrite(request, |name, value, out| $flatten(self, name, value, out)))
            }
        }
    };
}

/// `x[]=1&x[]=2`, `x[a]=1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeepObjectQuery;

impl DeepObjectQuery {
    #[allow(clippy::unused_self)]
    fn flatten(&self, name: String, value: Value, out: &mut Vec<(String, Value)>) {
        match value {
            Value::Array(items) => {
                out.extend(items.iter().filter(present).map(|item| (format!("{name}[]"), text(item))));
            }
            Value::Object(map) => out.extend(
                map.iter()
                    .filter(|(_, value)| !value.is_null())
                    .map(|(key, value)| (format!("{name}[{key}]"), text(value))),
            ),
            scalar => out.push((name, scalar)),
        }
    }
}

flattening_transformer!(DeepObjectQuery, DeepObjectQuery::flatten);

impl fmt::Display for DeepObjectQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DeepObjectQuery")
    }
}

/// `x=1&x=2`; mapping keys become parameter names. Null values are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormQuery;

impl FormQuery {
    #[allow(clippy::unused_self)]
    fn flatten(&self, name: String, value: Value, out: &mut Vec<(String, Value)>) {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                out.extend(items.iter().filter(present).map(|item| (name.clone(), text(item))));
            }
            Value::Object(map) => out.extend(
                map.iter()
                    .filter(|(_, value)| !value.is_null())
                    .map(|(key, value)| (key.clone(), text(value))),
            ),
            scalar => out.push((name, scalar)),
        }
    }
}

flattening_transformer!(FormQuery, FormQuery::flatten);

impl fmt::Display for FormQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FormQuery")
    }
}

/// `x=1,2`, `x=a,1,b,2` with a configurable separator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimiterQuery {
    separator: String,
}

impl DelimiterQuery {
    /// Join with `separator`.
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }

    fn flatten(&self, name: String, value: Value, out: &mut Vec<(String, Value)>) {
        let parts: Vec<String> = match value {
            Value::Array(items) => items.iter().filter(present).map(render_value).collect(),
            Value::Object(map) => map
                .iter()
                .filter(|(_, value)| !value.is_null())
                .flat_map(|(key, value)| [key.clone(), render_value(value)])
                .collect(),
            scalar => {
                out.push((name, scalar));
                return;
            }
        };
        out.push((name, Value::String(parts.join(&self.separator))));
    }
}

impl Default for DelimiterQuery {
    fn default() -> Self {
        Self::new(",")
    }
}

flattening_transformer!(DelimiterQuery, DelimiterQuery::flatten);

impl fmt::Display for DelimiterQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DelimiterQuery({})", self.separator)
    }
}

/// `x[0]=1`, `x[b][0][a]=2`, recursively.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhpStyleQuery;

impl PhpStyleQuery {
    #[allow(clippy::unused_self)]
    fn flatten(&self, name: String, value: Value, out: &mut Vec<(String, Value)>) {
        match value {
            container @ (Value::Array(_) | Value::Object(_)) => nested(&name, &container, out),
            scalar => out.push((name, scalar)),
        }
    }
}

fn nested(prefix: &str, value: &Value, out: &mut Vec<(String, Value)>) {
    match value {
        Value::Null => {}
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                nested(&format!("{prefix}[{i}]"), item, out);
            }
        }
        Value::Object(map) => {
            for (key, item) in map {
                nested(&format!("{prefix}[{key}]"), item, out);
            }
        }
        leaf => out.push((prefix.to_string(), text(leaf))),
    }
}

flattening_transformer!(PhpStyleQuery, PhpStyleQuery::flatten);

impl fmt::Display for PhpStyleQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PhpStyleQuery")
    }
}

request_transformers!(DeepObjectQuery, FormQuery, DelimiterQuery, PhpStyleQuery);
