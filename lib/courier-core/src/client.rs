//! Client and transport traits.
//!
//! - [`Client`] - per-client codecs and client-level transformers
//! - [`AsyncClient`] - suspend-capable transport
//! - [`BlockingClient`] - blocking transport
//!
//! A client type implements [`Client`] plus exactly the transport trait
//! matching how it executes requests. `MethodBinder::bind` and
//! `MethodBinder::bind_blocking` only accept the matching kind, so the
//! execution strategy is fixed by the client type at compile time.
//!
//! The `courier` crate provides hyper-based implementations; implement these
//! traits directly for custom transports or test doubles.

use std::future::Future;
use std::sync::Arc;

use crate::{Dumper, HttpRequest, HttpResponse, RequestTransformer, ResponseTransformer, Result};

/// Per-client configuration reachable from transformers.
///
/// Every method has a default, so a bare `impl Client for MyClient {}` is a
/// client with no codecs and no client-level transformers.
pub trait Client: Send + Sync {
    /// Dumper used by `BodyModelDump` stages without their own dumper.
    fn request_body_dumper(&self) -> Option<&dyn Dumper> {
        None
    }

    /// Dumper used by `QueryModelDump` stages without their own dumper.
    fn query_param_dumper(&self) -> Option<&dyn Dumper> {
        None
    }

    /// Transformers applied to every request after the method's own.
    fn request_transformers(&self) -> &[Arc<dyn RequestTransformer>] {
        &[]
    }

    /// Transformers applied to every response after the method's own.
    fn response_transformers(&self) -> &[Arc<dyn ResponseTransformer>] {
        &[]
    }
}

/// Suspend-capable transport.
pub trait AsyncClient: Client {
    /// Open response, owning the underlying connection.
    type Handle: AsyncResponseHandle;

    /// Send `request` and return once the response head is available.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails for any reason:
    /// - Network errors
    /// - TLS errors
    /// - Timeouts
    /// - Invalid request
    fn send(&self, request: &HttpRequest) -> impl Future<Output = Result<Self::Handle>> + Send;
}

/// Response head with a body that can be fetched once.
///
/// Dropping the handle releases the connection, whether the body was read or
/// not.
pub trait AsyncResponseHandle: Send {
    /// Status, headers and URL; the body is not loaded yet.
    fn head(&self) -> &HttpResponse;

    /// Fetch the body into the head. Calling it again is a no-op.
    fn load_body(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Consume the handle into the response, releasing the connection.
    fn into_response(self) -> HttpResponse;
}

/// Blocking transport.
pub trait BlockingClient: Client {
    /// Open response, owning the underlying connection.
    type Handle: ResponseHandle;

    /// Send `request` and return once the response head is available.
    fn send(&self, request: &HttpRequest) -> Result<Self::Handle>;
}

/// Blocking counterpart of [`AsyncResponseHandle`].
pub trait ResponseHandle {
    /// Status, headers and URL; the body is not loaded yet.
    fn head(&self) -> &HttpResponse;

    /// Fetch the body into the head. Calling it again is a no-op.
    fn load_body(&mut self) -> Result<()>;

    /// Consume the handle into the response, releasing the connection.
    fn into_response(self) -> HttpResponse;
}
