//! URL, header, query and extra transformers.

use std::fmt;

use serde_json::Value;

use crate::transformer::request_transformers;
use crate::{
    CallArgs, Error, FieldDestination, FieldIn, FieldOut, HttpRequest, RequestTransformer, Result,
    Template, TransformerId, TypeHint, consume_fields, find_field,
};

/// Sets the request URL from a template.
///
/// ```
/// use courier_core::{CallArgs, HttpRequest, RequestTransformer, Url};
/// use serde_json::json;
///
/// let url = Url::new("/users/{id}");
/// let args = CallArgs::detached([("id", json!(42))]);
/// let request = url
///     .transform_request(HttpRequest::new(), &[], &[], &args)
///     .expect("render");
/// assert_eq!(request.url, "/users/42");
/// ```
#[derive(Debug, Clone)]
pub struct Url {
    id: TransformerId,
    template: Template,
}

impl Url {
    /// Url rendered from `template`.
    pub fn new(template: impl Into<Template>) -> Self {
        Self {
            id: TransformerId::next(),
            template: template.into(),
        }
    }

    /// Identity used to claim fields.
    #[must_use]
    pub const fn id(&self) -> TransformerId {
        self.id
    }
}

impl RequestTransformer for Url {
    fn transform_fields(&self, fields_in: &mut [FieldIn]) -> Vec<FieldOut> {
        consume_fields(fields_in, self.template.names(), self.id);
        vec![FieldOut::new(
            None,
            FieldDestination::Url,
            TypeHint::string(),
        )]
    }

    fn transform_request(
        &self,
        mut request: HttpRequest,
        _fields_in: &[FieldIn],
        _fields_out: &[FieldOut],
        args: &CallArgs<'_>,
    ) -> Result<HttpRequest> {
        request.url = self.template.render_text(args)?;
        Ok(request)
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Url({})", self.template)
    }
}

// ============================================================================
// Keyed destinations
// ============================================================================

/// Shared behavior of [`Header`], [`Query`] and [`Extra`].
#[derive(Debug, Clone)]
struct Keyed {
    id: TransformerId,
    key: String,
    template: Option<Template>,
}

impl Keyed {
    fn new(key: String, template: Option<Template>) -> Self {
        Self {
            id: TransformerId::next(),
            key,
            template,
        }
    }

    fn fields(&self, fields_in: &mut [FieldIn], dest: FieldDestination) -> Vec<FieldOut> {
        let type_hint = match &self.template {
            None => {
                let hint = find_field(fields_in, &self.key).map_or(TypeHint::Any, FieldIn::type_hint);
                consume_fields(fields_in, [self.key.as_str()], self.id);
                hint
            }
            Some(template) => {
                consume_fields(fields_in, template.names(), self.id);
                template.return_hint()
            }
        };
        vec![FieldOut::named(&self.key, dest, type_hint)]
    }

    fn value(&self, args: &CallArgs<'_>) -> Result<Value> {
        match &self.template {
            None => args.get(&self.key).cloned().ok_or_else(|| {
                Error::template(
                    format!("{{{}}}", self.key),
                    format!("missing argument `{}`", self.key),
                )
            }),
            Some(template) => template.render(args),
        }
    }

    fn describe(&self, name: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.template {
            None => write!(f, "{name}({})", self.key),
            Some(template) => write!(f, "{name}({}, {template})", self.key),
        }
    }
}

macro_rules! keyed_transformer {
    ($(#[$meta:meta])* $name:ident, $dest:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name(Keyed);

        impl $name {
            /// Entry `key` taking the raw value of the parameter named `key`.
            pub fn new(key: impl Into<String>) -> Self {
                Self(Keyed::new(key.into(), None))
            }

            /// Entry `key` taking the rendered `template`.
            pub fn with_template(key: impl Into<String>, template: impl Into<Template>) -> Self {
                Self(Keyed::new(key.into(), Some(template.into())))
            }

            /// Identity used to claim fields.
            #[must_use]
            pub const fn id(&self) -> TransformerId {
                self.0.id
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.describe(stringify!($name), f)
            }
        }

        impl RequestTransformer for $name {
            fn transform_fields(&self, fields_in: &mut [FieldIn]) -> Vec<FieldOut> {
                self.0.fields(fields_in, $dest)
            }

            fn transform_request(
                &self,
                request: HttpRequest,
                _fields_in: &[FieldIn],
                _fields_out: &[FieldOut],
                args: &CallArgs<'_>,
            ) -> Result<HttpRequest> {
                let value = self.0.value(args)?;
                Ok(Self::write(request, self.0.key.clone(), value))
            }
        }
    };
}

keyed_transformer!(
    /// Appends a header; the value is rendered to text.
    Header,
    FieldDestination::Header
);

keyed_transformer!(
    /// Appends a query parameter.
    ///
    /// ```
    /// use courier_core::{CallArgs, HttpRequest, Query, RequestTransformer, Template};
    /// use serde_json::json;
    ///
    /// let next = Query::with_template("y", Template::map("i", |i: i64| i + 1));
    /// let args = CallArgs::detached([("i", json!(1))]);
    /// let request = next
    ///     .transform_request(HttpRequest::new(), &[], &[], &args)
    ///     .expect("render");
    /// assert_eq!(request.query_params, vec![("y".to_string(), json!(2))]);
    /// ```
    Query,
    FieldDestination::Query
);

keyed_transformer!(
    /// Appends a side-channel entry, readable by later transformers.
    Extra,
    FieldDestination::Extra
);

impl Header {
    fn write(mut request: HttpRequest, key: String, value: Value) -> HttpRequest {
        let value = match value {
            Value::String(s) => s,
            other => crate::render_value(&other),
        };
        request.headers.push((key, value));
        request
    }
}

impl Query {
    fn write(mut request: HttpRequest, key: String, value: Value) -> HttpRequest {
        request.query_params.push((key, value));
        request
    }
}

impl Extra {
    fn write(mut request: HttpRequest, key: String, value: Value) -> HttpRequest {
        request.extras.push((key, value));
        request
    }
}

request_transformers!(Url, Header, Query, Extra);
