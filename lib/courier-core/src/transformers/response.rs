//! Response transformers: status policy, JSON loading, model loading.

use std::fmt;
use std::sync::Arc;

use crate::transformer::response_transformers;
use crate::{Error, HttpRequest, HttpResponse, Loader, ResponseBody, ResponseTransformer, Result, TypeHint};

const DEFAULT_CODES: [u16; 1] = [200];

fn describe_codes(codes: &[u16]) -> String {
    codes
        .iter()
        .map(u16::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

// ============================================================================
// ErrorRaiser
// ============================================================================

/// Fails the call when the status code is an error under its policy.
///
/// - neither list set: `status >= 400` is an error;
/// - `except_codes` set: anything outside it is an error, and so is any code
///   also listed in `codes`;
/// - only `codes` set: exactly those codes are errors.
///
/// Empty lists count as unset. Errors are [`Error::ServerError`] from 500 up
/// and [`Error::ClientError`] below.
///
/// ```
/// use courier_core::{ErrorRaiser, HttpRequest, HttpResponse, ResponseTransformer};
///
/// let raiser = ErrorRaiser::new().except_codes([200, 201, 202, 204]).codes([202, 204]);
/// let request = HttpRequest::new();
/// assert!(raiser.transform_response(&request, HttpResponse::new(201, "Created")).is_ok());
/// assert!(raiser.transform_response(&request, HttpResponse::new(202, "Accepted")).is_err());
/// assert!(raiser.transform_response(&request, HttpResponse::new(302, "Found")).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorRaiser {
    codes: Vec<u16>,
    except_codes: Vec<u16>,
    need_body: bool,
}

impl ErrorRaiser {
    /// Default policy: `status >= 400`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Codes that are always errors.
    #[must_use]
    pub fn codes(mut self, codes: impl IntoIterator<Item = u16>) -> Self {
        self.codes = codes.into_iter().collect();
        self
    }

    /// Codes that are not errors.
    #[must_use]
    pub fn except_codes(mut self, codes: impl IntoIterator<Item = u16>) -> Self {
        self.except_codes = codes.into_iter().collect();
        self
    }

    /// Load the body so it is carried by the error.
    #[must_use]
    pub const fn need_body(mut self, need_body: bool) -> Self {
        self.need_body = need_body;
        self
    }

    /// Returns `true` if `status` is an error under this policy.
    #[must_use]
    pub fn is_error(&self, status: u16) -> bool {
        match (self.codes.is_empty(), self.except_codes.is_empty()) {
            (true, true) => status >= 400,
            (_, false) => !self.except_codes.contains(&status) || self.codes.contains(&status),
            (false, true) => self.codes.contains(&status),
        }
    }
}

impl ResponseTransformer for ErrorRaiser {
    fn need_response_body(&self, _response: &HttpResponse) -> bool {
        self.need_body
    }

    fn transform_response(
        &self,
        _request: &HttpRequest,
        response: HttpResponse,
    ) -> Result<HttpResponse> {
        if self.is_error(response.status_code) {
            return Err(Error::http_status(
                response.status_code,
                response.status_text,
                response.body,
            ));
        }
        Ok(response)
    }
}

impl fmt::Display for ErrorRaiser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ErrorRaiser")?;
        if !self.codes.is_empty() || !self.except_codes.is_empty() {
            write!(
                f,
                "(codes=[{}], except_codes=[{}])",
                describe_codes(&self.codes),
                describe_codes(&self.except_codes)
            )?;
        }
        Ok(())
    }
}

// ============================================================================
// JsonLoad
// ============================================================================

/// Parses the body as JSON for the configured status codes (200 by default).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonLoad {
    codes: Vec<u16>,
}

impl JsonLoad {
    /// Parse for `codes` only.
    pub fn new(codes: impl IntoIterator<Item = u16>) -> Self {
        Self {
            codes: codes.into_iter().collect(),
        }
    }
}

impl Default for JsonLoad {
    fn default() -> Self {
        Self::new(DEFAULT_CODES)
    }
}

impl ResponseTransformer for JsonLoad {
    fn need_response_body(&self, response: &HttpResponse) -> bool {
        self.codes.contains(&response.status_code)
    }

    fn transform_response(
        &self,
        _request: &HttpRequest,
        mut response: HttpResponse,
    ) -> Result<HttpResponse> {
        if self.codes.contains(&response.status_code) {
            response.body = ResponseBody::Value(response.body.to_value()?);
        }
        Ok(response)
    }
}

impl fmt::Display for JsonLoad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.codes == DEFAULT_CODES {
            f.write_str("JsonLoad")
        } else {
            write!(f, "JsonLoad([{}])", describe_codes(&self.codes))
        }
    }
}

// ============================================================================
// BodyModelLoad
// ============================================================================

/// Runs a [`Loader`] over the body for the configured status codes.
#[derive(Debug, Clone)]
pub struct BodyModelLoad {
    type_hint: TypeHint,
    loader: Arc<dyn Loader>,
    codes: Vec<u16>,
}

impl BodyModelLoad {
    /// Load as `type_hint` for status 200.
    pub fn new(type_hint: TypeHint, loader: Arc<dyn Loader>) -> Self {
        Self {
            type_hint,
            loader,
            codes: DEFAULT_CODES.to_vec(),
        }
    }

    /// Load for `codes` only.
    #[must_use]
    pub fn codes(mut self, codes: impl IntoIterator<Item = u16>) -> Self {
        self.codes = codes.into_iter().collect();
        self
    }

    /// Declared result type.
    #[must_use]
    pub const fn type_hint(&self) -> TypeHint {
        self.type_hint
    }
}

impl ResponseTransformer for BodyModelLoad {
    fn need_response_body(&self, response: &HttpResponse) -> bool {
        self.codes.contains(&response.status_code)
    }

    fn transform_response(
        &self,
        _request: &HttpRequest,
        mut response: HttpResponse,
    ) -> Result<HttpResponse> {
        if self.codes.contains(&response.status_code) {
            let value = response.body.to_value()?;
            response.body = ResponseBody::Value(self.loader.load(value, &self.type_hint)?);
        }
        Ok(response)
    }
}

impl fmt::Display for BodyModelLoad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BodyModelLoad({}, {:?})", self.type_hint, self.loader)
    }
}

// ============================================================================
// KeepResponse
// ============================================================================

/// Makes the whole response the result of the call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeepResponse {
    need_body: bool,
}

impl KeepResponse {
    /// Keep the response, loading its body first when `need_body` is set.
    #[must_use]
    pub const fn new(need_body: bool) -> Self {
        Self { need_body }
    }
}

impl ResponseTransformer for KeepResponse {
    fn need_response_body(&self, _response: &HttpResponse) -> bool {
        self.need_body
    }

    fn transform_response(
        &self,
        _request: &HttpRequest,
        response: HttpResponse,
    ) -> Result<HttpResponse> {
        let head = HttpResponse {
            status_code: response.status_code,
            status_text: response.status_text.clone(),
            url: response.url.clone(),
            headers: response.headers.clone(),
            body: ResponseBody::NotLoaded,
        };
        Ok(head.with_body(ResponseBody::Response(Box::new(response))))
    }
}

impl fmt::Display for KeepResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeepResponse(need_body={})", self.need_body)
    }
}

response_transformers!(ErrorRaiser, JsonLoad, BodyModelLoad, KeepResponse);
