//! Transformer traits and composition.
//!
//! A [`RequestTransformer`] runs twice: once at definition time through
//! [`RequestTransformer::transform_fields`], where it claims parameters and
//! declares the request slots it writes, and once per call through
//! [`RequestTransformer::transform_request`]. A [`ResponseTransformer`] runs
//! per call only. Every method has a no-op default.
//!
//! Request transformers compose with `|` into a [`Pipe`], which behaves
//! exactly like listing the stages one after the other.

use std::fmt;
use std::ops::BitOr;
use std::sync::Arc;

use crate::{CallArgs, FieldIn, FieldOut, HttpRequest, HttpResponse, Result};

/// Stage of the request pipeline.
pub trait RequestTransformer: fmt::Debug + fmt::Display + Send + Sync {
    /// Claim fields and declare the slots this stage writes.
    fn transform_fields(&self, _fields_in: &mut [FieldIn]) -> Vec<FieldOut> {
        Vec::new()
    }

    /// Apply the stage to the request under construction.
    fn transform_request(
        &self,
        request: HttpRequest,
        _fields_in: &[FieldIn],
        _fields_out: &[FieldOut],
        _args: &CallArgs<'_>,
    ) -> Result<HttpRequest> {
        Ok(request)
    }
}

/// Stage of the response pipeline.
pub trait ResponseTransformer: fmt::Debug + fmt::Display + Send + Sync {
    /// Returns `true` if this stage reads the body of `response`.
    fn need_response_body(&self, _response: &HttpResponse) -> bool {
        false
    }

    /// Apply the stage to the response.
    fn transform_response(
        &self,
        _request: &HttpRequest,
        response: HttpResponse,
    ) -> Result<HttpResponse> {
        Ok(response)
    }
}

impl<T: RequestTransformer + ?Sized> RequestTransformer for Arc<T> {
    fn transform_fields(&self, fields_in: &mut [FieldIn]) -> Vec<FieldOut> {
        (**self).transform_fields(fields_in)
    }

    fn transform_request(
        &self,
        request: HttpRequest,
        fields_in: &[FieldIn],
        fields_out: &[FieldOut],
        args: &CallArgs<'_>,
    ) -> Result<HttpRequest> {
        (**self).transform_request(request, fields_in, fields_out, args)
    }
}

impl<T: ResponseTransformer + ?Sized> ResponseTransformer for Arc<T> {
    fn need_response_body(&self, response: &HttpResponse) -> bool {
        (**self).need_response_body(response)
    }

    fn transform_response(
        &self,
        request: &HttpRequest,
        response: HttpResponse,
    ) -> Result<HttpResponse> {
        (**self).transform_response(request, response)
    }
}

// ============================================================================
// Pipe
// ============================================================================

/// Sequential composition of request transformers.
///
/// # Example
///
/// ```
/// use courier_core::{Body, FieldIn, Query, RequestTransformer, TypeHint};
///
/// let pipe = Query::new("i") | Query::new("s") | Body::new("b");
/// let mut fields = vec![
///     FieldIn::new("i", TypeHint::of::<i64>()),
///     FieldIn::new("s", TypeHint::of::<String>()),
///     FieldIn::new("b", TypeHint::of::<i64>()),
/// ];
/// assert_eq!(pipe.transform_fields(&mut fields).len(), 3);
/// assert_eq!(pipe.to_string(), "Query(i) | Query(s) | Body(b)");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pipe {
    stages: Vec<Arc<dyn RequestTransformer>>,
}

impl Pipe {
    /// Empty pipe.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage.
    #[must_use]
    pub fn then(mut self, stage: impl RequestTransformer + 'static) -> Self {
        self.stages.push(Arc::new(stage));
        self
    }

    /// Append every stage of `other`.
    #[must_use]
    pub fn chain(mut self, other: Self) -> Self {
        self.stages.extend(other.stages);
        self
    }

    /// Stages in application order.
    #[must_use]
    pub fn stages(&self) -> &[Arc<dyn RequestTransformer>] {
        &self.stages
    }
}

impl RequestTransformer for Pipe {
    fn transform_fields(&self, fields_in: &mut [FieldIn]) -> Vec<FieldOut> {
        self.stages
            .iter()
            .flat_map(|stage| stage.transform_fields(fields_in))
            .collect()
    }

    fn transform_request(
        &self,
        request: HttpRequest,
        fields_in: &[FieldIn],
        fields_out: &[FieldOut],
        args: &CallArgs<'_>,
    ) -> Result<HttpRequest> {
        self.stages.iter().try_fold(request, |request, stage| {
            stage.transform_request(request, fields_in, fields_out, args)
        })
    }
}

impl fmt::Display for Pipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stage) in self.stages.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{stage}")?;
        }
        Ok(())
    }
}

impl<R: RequestTransformer + 'static> BitOr<R> for Pipe {
    type Output = Self;

    fn bitor(self, rhs: R) -> Self {
        self.then(rhs)
    }
}

// ============================================================================
// Transformer
// ============================================================================

/// A request or response stage, as accepted by the builders.
#[derive(Debug, Clone)]
pub enum Transformer {
    /// Request stage.
    Request(Arc<dyn RequestTransformer>),
    /// Response stage.
    Response(Arc<dyn ResponseTransformer>),
}

impl Transformer {
    /// Wrap a request stage.
    pub fn request(stage: impl RequestTransformer + 'static) -> Self {
        Self::Request(Arc::new(stage))
    }

    /// Wrap a response stage.
    pub fn response(stage: impl ResponseTransformer + 'static) -> Self {
        Self::Response(Arc::new(stage))
    }
}

impl fmt::Display for Transformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request(stage) => write!(f, "{stage}"),
            Self::Response(stage) => write!(f, "{stage}"),
        }
    }
}

impl From<Pipe> for Transformer {
    fn from(pipe: Pipe) -> Self {
        Self::request(pipe)
    }
}

/// Implements `|` and `Into<Transformer>` for request stages.
macro_rules! request_transformers {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl<R: $crate::RequestTransformer + 'static> ::std::ops::BitOr<R> for $ty {
                type Output = $crate::Pipe;

                fn bitor(self, rhs: R) -> $crate::Pipe {
                    $crate::Pipe::new().then(self).then(rhs)
                }
            }

            impl From<$ty> for $crate::Transformer {
                fn from(stage: $ty) -> Self {
                    Self::request(stage)
                }
            }
        )+
    };
}

/// Implements `Into<Transformer>` for response stages.
macro_rules! response_transformers {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for $crate::Transformer {
                fn from(stage: $ty) -> Self {
                    Self::response(stage)
                }
            }
        )+
    };
}

pub(crate) use {request_transformers, response_transformers};
