//! HTTP Basic authentication.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::transformer::request_transformers;
use crate::{
    CallArgs, FieldDestination, FieldIn, FieldOut, HttpRequest, RequestTransformer, Result,
    Template, TransformerId, TypeHint, consume_fields,
};

/// Sets `Authorization: Basic base64(login:password)`.
///
/// Login and password are templates, so they can be literal strings or read
/// from parameters:
///
/// ```
/// use courier_core::{BasicAuth, CallArgs, HttpRequest, RequestTransformer};
/// use serde_json::json;
///
/// let auth = BasicAuth::new("{user}", "{password}");
/// let args = CallArgs::detached([("user", json!("alice")), ("password", json!("secret"))]);
/// let request = auth
///     .transform_request(HttpRequest::new(), &[], &[], &args)
///     .expect("auth");
/// assert_eq!(request.header("Authorization"), Some("Basic YWxpY2U6c2VjcmV0"));
/// ```
///
/// Credentials containing braces go through [`BasicAuth::from_credentials`].
#[derive(Debug, Clone)]
pub struct BasicAuth {
    id: TransformerId,
    login: Template,
    password: Template,
}

impl BasicAuth {
    /// Authentication from login and password templates.
    pub fn new(login: impl Into<Template>, password: impl Into<Template>) -> Self {
        Self {
            id: TransformerId::next(),
            login: login.into(),
            password: password.into(),
        }
    }

    /// Authentication from literal credentials; braces are not placeholders.
    pub fn from_credentials(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self::new(Template::literal(login), Template::literal(password))
    }

    /// Identity used to claim fields.
    #[must_use]
    pub const fn id(&self) -> TransformerId {
        self.id
    }
}

impl RequestTransformer for BasicAuth {
    fn transform_fields(&self, fields_in: &mut [FieldIn]) -> Vec<FieldOut> {
        let names = self
            .login
            .names()
            .into_iter()
            .chain(self.password.names());
        consume_fields(fields_in, names, self.id);
        vec![FieldOut::named(
            "Authorization",
            FieldDestination::Header,
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
        let login = self.login.render_text(args)?;
        let password = self.password.render_text(args)?;
        let token = STANDARD.encode(format!("{login}:{password}"));
        request
            .headers
            .push(("Authorization".to_string(), format!("Basic {token}")));
        Ok(request)
    }
}

impl fmt::Display for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BasicAuth({}, ***)", self.login)
    }
}

request_transformers!(BasicAuth);
