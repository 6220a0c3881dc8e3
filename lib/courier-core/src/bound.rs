//! Binding method specs to clients, and executing calls.
//!
//! A [`MethodBinder`] wraps a shared [`MethodSpec`]. Binding it to a client
//! picks the execution strategy from the client's transport trait:
//! [`MethodBinder::bind`] for an [`AsyncClient`], [`MethodBinder::bind_blocking`]
//! for a [`BlockingClient`]. Both run the same steps per call:
//!
//! 1. bind the arguments against the signature;
//! 2. run the method's request transformers, then the client's;
//! 3. send the request without its extras;
//! 4. load the body once if any response transformer needs it;
//! 5. run the method's response transformers, then the client's;
//! 6. return the final body.

use std::mem;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{Instrument, debug, debug_span};

use crate::{
    Args, AsyncClient, AsyncResponseHandle, BlockingClient, CallArgs, Client, HttpRequest,
    HttpResponse, MethodSpec, ResponseBody, ResponseHandle, ResponseTransformer, Result,
};

/// A method spec ready to be bound to clients.
#[derive(Debug, Clone)]
pub struct MethodBinder {
    spec: Arc<MethodSpec>,
}

impl MethodBinder {
    /// Wrap a resolved spec.
    #[must_use]
    pub fn new(spec: MethodSpec) -> Self {
        Self {
            spec: Arc::new(spec),
        }
    }

    /// The shared spec.
    #[must_use]
    pub fn spec(&self) -> &MethodSpec {
        &self.spec
    }

    /// Bind to a suspend-capable client.
    #[must_use]
    pub fn bind<'c, C: AsyncClient>(&self, client: &'c C) -> BoundAsyncMethod<'c, C> {
        BoundAsyncMethod {
            spec: Arc::clone(&self.spec),
            client,
        }
    }

    /// Bind to a blocking client.
    #[must_use]
    pub fn bind_blocking<'c, C: BlockingClient>(&self, client: &'c C) -> BoundBlockingMethod<'c, C> {
        BoundBlockingMethod {
            spec: Arc::clone(&self.spec),
            client,
        }
    }
}

// ============================================================================
// Shared steps
// ============================================================================

/// Bind `args` and run every request stage over an empty request.
fn prepare_request(spec: &MethodSpec, client: &dyn Client, args: &Args) -> Result<HttpRequest> {
    let values = spec.signature().bind(args)?;
    let call_args = CallArgs::new(client, values);
    spec.request_transformers()
        .iter()
        .chain(client.request_transformers())
        .try_fold(HttpRequest::new(), |request, stage| {
            stage.transform_request(request, spec.fields_in(), spec.fields_out(), &call_args)
        })
}

fn response_stages<'a>(
    spec: &'a MethodSpec,
    client: &'a dyn Client,
) -> Vec<&'a Arc<dyn ResponseTransformer>> {
    spec.response_transformers()
        .iter()
        .chain(client.response_transformers())
        .collect()
}

fn needs_body(stages: &[&Arc<dyn ResponseTransformer>], head: &HttpResponse) -> bool {
    stages.iter().any(|stage| stage.need_response_body(head))
}

fn finish_response(
    stages: &[&Arc<dyn ResponseTransformer>],
    request: &HttpRequest,
    response: HttpResponse,
) -> Result<ResponseBody> {
    debug!(status = response.status_code, "processing response");
    let response = stages
        .iter()
        .try_fold(response, |response, stage| stage.transform_response(request, response))?;
    Ok(response.body)
}

// ============================================================================
// Async
// ============================================================================

/// A method bound to a suspend-capable client.
#[derive(Debug)]
pub struct BoundAsyncMethod<'c, C> {
    spec: Arc<MethodSpec>,
    client: &'c C,
}

impl<C: AsyncClient> BoundAsyncMethod<'_, C> {
    /// Execute the call and return the final body.
    ///
    /// Dropping the returned future releases the connection and runs no
    /// further transformer.
    ///
    /// # Errors
    ///
    /// Returns any error raised while binding the arguments, by a
    /// transformer, or by the transport.
    pub async fn call(&self, args: &Args) -> Result<ResponseBody> {
        let spec = self.spec.as_ref();
        let client: &dyn Client = self.client;
        let span = debug_span!("courier.call", method = spec.name());
        async move {
            let mut request = prepare_request(spec, client, args)?;
            let extras = mem::take(&mut request.extras);
            let mut handle = self.client.send(&request).await?;
            request.extras = extras;

            let stages = response_stages(spec, client);
            if needs_body(&stages, handle.head()) {
                handle.load_body().await?;
            }
            finish_response(&stages, &request, handle.into_response())
        }
        .instrument(span)
        .await
    }

    /// Execute the call and decode the body into `T`.
    ///
    /// # Errors
    ///
    /// See [`BoundAsyncMethod::call`]; decoding failures are reported with
    /// their JSON path.
    pub async fn call_as<T: DeserializeOwned>(&self, args: &Args) -> Result<T> {
        self.call(args).await?.into_typed()
    }

    /// The bound spec.
    #[must_use]
    pub fn spec(&self) -> &MethodSpec {
        &self.spec
    }
}

// ============================================================================
// Blocking
// ============================================================================

/// A method bound to a blocking client.
#[derive(Debug)]
pub struct BoundBlockingMethod<'c, C> {
    spec: Arc<MethodSpec>,
    client: &'c C,
}

impl<C: BlockingClient> BoundBlockingMethod<'_, C> {
    /// Execute the call and return the final body.
    ///
    /// # Errors
    ///
    /// Returns any error raised while binding the arguments, by a
    /// transformer, or by the transport.
    pub fn call(&self, args: &Args) -> Result<ResponseBody> {
        let spec = self.spec.as_ref();
        let client: &dyn Client = self.client;
        debug_span!("courier.call", method = spec.name()).in_scope(|| {
            let mut request = prepare_request(spec, client, args)?;
            let extras = mem::take(&mut request.extras);
            let mut handle = self.client.send(&request)?;
            request.extras = extras;

            let stages = response_stages(spec, client);
            if needs_body(&stages, handle.head()) {
                handle.load_body()?;
            }
            finish_response(&stages, &request, handle.into_response())
        })
    }

    /// Execute the call and decode the body into `T`.
    ///
    /// # Errors
    ///
    /// See [`BoundBlockingMethod::call`].
    pub fn call_as<T: DeserializeOwned>(&self, args: &Args) -> Result<T> {
        self.call(args)?.into_typed()
    }

    /// The bound spec.
    #[must_use]
    pub fn spec(&self) -> &MethodSpec {
        &self.spec
    }
}
