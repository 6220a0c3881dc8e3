//! Blocking client driving a [`HyperClient`] on a private runtime.

use std::fmt;
use std::sync::Arc;

use courier_core::{
    AsyncResponseHandle, BlockingClient, Client, Dumper, Error, HttpRequest, HttpResponse,
    RequestTransformer, ResponseHandle, ResponseTransformer, Result,
};
use tokio::runtime::{Builder, Runtime};
use url::Url;

use crate::client::{HyperClient, HyperResponse};
use crate::config::ClientConfig;

/// Blocking client.
///
/// Each call runs on the calling thread, driving a single-threaded tokio
/// runtime owned by the client. It must not be used from inside another
/// tokio runtime.
///
/// # Example
///
/// ```no_run
/// use courier::{HyperClient, RestBuilder, Signature, args};
///
/// # fn run() -> courier::Result<()> {
/// let client = HyperClient::builder("https://api.example.com").build_blocking()?;
/// let get_user = RestBuilder::new()
///     .get("/users/{id}", vec![])
///     .decorate(Signature::new("get_user").param::<u64>("id"))?;
/// let user: serde_json::Value = get_user.bind_blocking(&client).call_as(&args!(id = 42))?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct BlockingHyperClient {
    client: HyperClient,
    runtime: Arc<Runtime>,
}

impl fmt::Debug for BlockingHyperClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockingHyperClient")
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

impl BlockingHyperClient {
    /// Wrap `client` with a new runtime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] if the runtime cannot start.
    pub fn new(client: HyperClient) -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::connection(format!("cannot start runtime: {e}")))?;
        Ok(Self {
            client,
            runtime: Arc::new(runtime),
        })
    }

    /// Base URL, always ending with a slash.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        self.client.base_url()
    }

    /// Get the client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        self.client.config()
    }
}

impl Client for BlockingHyperClient {
    fn request_body_dumper(&self) -> Option<&dyn Dumper> {
        self.client.request_body_dumper()
    }

    fn query_param_dumper(&self) -> Option<&dyn Dumper> {
        self.client.query_param_dumper()
    }

    fn request_transformers(&self) -> &[Arc<dyn RequestTransformer>] {
        self.client.request_transformers()
    }

    fn response_transformers(&self) -> &[Arc<dyn ResponseTransformer>] {
        self.client.response_transformers()
    }
}

impl BlockingClient for BlockingHyperClient {
    type Handle = BlockingResponse;

    fn send(&self, request: &HttpRequest) -> Result<BlockingResponse> {
        let handle = self.runtime.block_on(self.client.execute(request))?;
        Ok(BlockingResponse {
            handle,
            runtime: Arc::clone(&self.runtime),
        })
    }
}

/// Open response of a [`BlockingHyperClient`].
#[derive(Debug)]
pub struct BlockingResponse {
    handle: HyperResponse,
    runtime: Arc<Runtime>,
}

impl ResponseHandle for BlockingResponse {
    fn head(&self) -> &HttpResponse {
        self.handle.head()
    }

    fn load_body(&mut self) -> Result<()> {
        self.runtime.block_on(self.handle.load_body())
    }

    fn into_response(self) -> HttpResponse {
        self.handle.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_client_settings() {
        let client = HyperClient::builder("http://localhost:9")
            .user_agent("blocking/1")
            .build_blocking()
            .expect("client");
        assert_eq!(client.base_url().as_str(), "http://localhost:9/");
        assert_eq!(client.config().user_agent, "blocking/1");
        assert!(client.request_transformers().is_empty());
    }
}
