//! HTTP client implementation using hyper-util.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use courier_core::{
    AsyncClient, AsyncResponseHandle, Client, Dumper, Error, HttpRequest, HttpResponse,
    RequestTransformer, ResponseBody, ResponseTransformer, Result, Transformer,
};
use http_body_util::{BodyExt, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::Client as LegacyClient;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::{TokioExecutor, TokioTimer};
use url::Url;

use crate::blocking::BlockingHyperClient;
use crate::config::{ClientConfig, ClientConfigBuilder};
use crate::connector::https_connector;
use crate::logging::{RequestLog, body_loaded};
use crate::wire;

type HttpsClient = LegacyClient<HttpsConnector<HttpConnector>, Full<Bytes>>;

/// Future collecting a response body.
pub type BodyFuture = Pin<Box<dyn Future<Output = Result<Bytes>> + Send + 'static>>;

// ============================================================================
// Shared state
// ============================================================================

/// Settings shared by every clone of a client.
struct Shared {
    base_url: Url,
    config: ClientConfig,
    request_body_dumper: Option<Arc<dyn Dumper>>,
    query_param_dumper: Option<Arc<dyn Dumper>>,
    request_transformers: Vec<Arc<dyn RequestTransformer>>,
    response_transformers: Vec<Arc<dyn ResponseTransformer>>,
}

// ============================================================================
// Public Client
// ============================================================================

/// Suspend-capable client using hyper-util with connection pooling and TLS.
///
/// Cloning is cheap: clones share the connection pool and the settings.
///
/// # Example
///
/// ```no_run
/// use courier::{HyperClient, JsonRpcBuilder, Signature, args};
///
/// # async fn run() -> courier::Result<()> {
/// let client = HyperClient::builder("https://rpc.example.com").build()?;
/// let block_number = JsonRpcBuilder::new()
///     .method("eth_blockNumber", vec![])
///     .decorate(Signature::new("block_number").returns::<String>())?;
/// let number: String = block_number.bind(&client).call_as(&args!()).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct HyperClient {
    inner: HttpsClient,
    shared: Arc<Shared>,
}

impl fmt::Debug for HyperClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HyperClient")
            .field("base_url", &self.shared.base_url.as_str())
            .field("config", &self.shared.config)
            .finish_non_exhaustive()
    }
}

impl HyperClient {
    /// Client for `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if `base_url` is not an absolute URL.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::builder(base_url).build()
    }

    /// Create a new client builder.
    #[must_use]
    pub fn builder(base_url: impl Into<String>) -> HyperClientBuilder {
        HyperClientBuilder::new(base_url)
    }

    /// Base URL, always ending with a slash.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.shared.base_url
    }

    /// Get the client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.shared.config
    }

    pub(crate) async fn execute(&self, request: &HttpRequest) -> Result<HyperResponse> {
        let config = &self.shared.config;
        let wire = wire::build_request(request, &self.shared.base_url, &config.user_agent)?;
        let url = wire.uri().to_string();
        let log = RequestLog::start(request.method, url.as_str());

        let result = match tokio::time::timeout(config.timeout, self.inner.request(wire)).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(err)) => Err(map_hyper_error(&err)),
            Err(_) => Err(Error::Timeout),
        };
        let response = match result {
            Ok(response) => response,
            Err(err) => {
                log.failed(&err);
                return Err(err);
            }
        };

        let (parts, body) = response.into_parts();
        let head = wire::response_head(&parts, url);
        log.completed(head.status_code);

        let pending: BodyFuture = Box::pin(async move {
            body.collect()
                .await
                .map(http_body_util::Collected::to_bytes)
                .map_err(|e| Error::connection(e.to_string()))
        });
        Ok(HyperResponse {
            head,
            pending: Some(pending),
            timeout: config.timeout,
        })
    }
}

fn map_hyper_error(err: &hyper_util::client::legacy::Error) -> Error {
    let msg = err.to_string();

    if err.is_connect() {
        return Error::connection(msg);
    }

    if msg.contains("ssl") || msg.contains("tls") || msg.contains("certificate") {
        return Error::tls(msg);
    }

    Error::connection(msg)
}

impl Client for HyperClient {
    fn request_body_dumper(&self) -> Option<&dyn Dumper> {
        self.shared.request_body_dumper.as_deref()
    }

    fn query_param_dumper(&self) -> Option<&dyn Dumper> {
        self.shared.query_param_dumper.as_deref()
    }

    fn request_transformers(&self) -> &[Arc<dyn RequestTransformer>] {
        &self.shared.request_transformers
    }

    fn response_transformers(&self) -> &[Arc<dyn ResponseTransformer>] {
        &self.shared.response_transformers
    }
}

impl AsyncClient for HyperClient {
    type Handle = HyperResponse;

    async fn send(&self, request: &HttpRequest) -> Result<HyperResponse> {
        self.execute(request).await
    }
}

// ============================================================================
// Response handle
// ============================================================================

/// Open response of a [`HyperClient`].
///
/// The body stays on the connection until [`AsyncResponseHandle::load_body`]
/// is called; dropping the handle drops the body and frees the connection.
pub struct HyperResponse {
    head: HttpResponse,
    pending: Option<BodyFuture>,
    timeout: Duration,
}

impl fmt::Debug for HyperResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HyperResponse")
            .field("head", &self.head)
            .field("pending", &self.pending.is_some())
            .finish_non_exhaustive()
    }
}

impl AsyncResponseHandle for HyperResponse {
    fn head(&self) -> &HttpResponse {
        &self.head
    }

    async fn load_body(&mut self) -> Result<()> {
        let Some(pending) = self.pending.take() else {
            return Ok(());
        };
        let bytes = tokio::time::timeout(self.timeout, pending)
            .await
            .map_err(|_| Error::Timeout)??;
        body_loaded(&self.head.url, bytes.len());
        self.head.body = ResponseBody::Raw(bytes);
        Ok(())
    }

    fn into_response(self) -> HttpResponse {
        self.head
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`HyperClient`] and [`BlockingHyperClient`].
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use courier::{BasicAuth, CamelCaseCodec, HyperClient};
///
/// let client = HyperClient::builder("https://api.example.com/v2")
///     .timeout(Duration::from_secs(5))
///     .user_agent("inventory-sync/1.0")
///     .request_body_dumper(CamelCaseCodec)
///     .transformer(BasicAuth::new("svc", "secret"))
///     .build()
///     .expect("valid base URL");
/// assert_eq!(client.base_url().as_str(), "https://api.example.com/v2/");
/// ```
#[derive(Default)]
pub struct HyperClientBuilder {
    base_url: String,
    config: ClientConfigBuilder,
    request_body_dumper: Option<Arc<dyn Dumper>>,
    query_param_dumper: Option<Arc<dyn Dumper>>,
    request_transformers: Vec<Arc<dyn RequestTransformer>>,
    response_transformers: Vec<Arc<dyn ResponseTransformer>>,
}

impl fmt::Debug for HyperClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HyperClientBuilder")
            .field("base_url", &self.base_url)
            .field("config", &self.config)
            .field("request_body_dumper", &self.request_body_dumper)
            .field("query_param_dumper", &self.query_param_dumper)
            .field("request_transformers", &self.request_transformers.len())
            .field("response_transformers", &self.response_transformers.len())
            .finish()
    }
}

impl HyperClientBuilder {
    /// Builder for a client sending to `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    // ========================================================================
    // Core Configuration
    // ========================================================================

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.timeout(timeout);
        self
    }

    /// Set the connection timeout.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.connect_timeout(timeout);
        self
    }

    /// Set the maximum idle connections per host.
    #[must_use]
    pub fn pool_idle_per_host(mut self, count: usize) -> Self {
        self.config = self.config.pool_idle_per_host(count);
        self
    }

    /// Set the idle connection timeout.
    #[must_use]
    pub fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.pool_idle_timeout(timeout);
        self
    }

    /// Set the default `User-Agent`.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config = self.config.user_agent(user_agent);
        self
    }

    // ========================================================================
    // Codecs and client-level stages
    // ========================================================================

    /// Dumper used by [`BodyModelDump::from_client`](crate::BodyModelDump::from_client) stages.
    #[must_use]
    pub fn request_body_dumper(mut self, dumper: impl Dumper + 'static) -> Self {
        self.request_body_dumper = Some(Arc::new(dumper));
        self
    }

    /// Dumper used by [`QueryModelDump::from_client`](crate::QueryModelDump::from_client) stages.
    #[must_use]
    pub fn query_param_dumper(mut self, dumper: impl Dumper + 'static) -> Self {
        self.query_param_dumper = Some(Arc::new(dumper));
        self
    }

    /// Run `transformer` on every call, after the method's own stages.
    ///
    /// Client-level stages run at call time only: fields they would claim
    /// are not taken away from the method's defaults.
    #[must_use]
    pub fn transformer(mut self, transformer: impl Into<Transformer>) -> Self {
        match transformer.into() {
            Transformer::Request(stage) => self.request_transformers.push(stage),
            Transformer::Response(stage) => self.response_transformers.push(stage),
        }
        self
    }

    // ========================================================================
    // Build
    // ========================================================================

    fn into_shared(self) -> Result<(Shared, ClientConfig)> {
        let config = self.config.build();
        let shared = Shared {
            base_url: wire::base_url(&self.base_url)?,
            config: config.clone(),
            request_body_dumper: self.request_body_dumper,
            query_param_dumper: self.query_param_dumper,
            request_transformers: self.request_transformers,
            response_transformers: self.response_transformers,
        };
        Ok((shared, config))
    }

    /// Build a suspend-capable client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the base URL is not absolute.
    pub fn build(self) -> Result<HyperClient> {
        let (shared, config) = self.into_shared()?;
        let inner = LegacyClient::builder(TokioExecutor::new())
            .pool_timer(TokioTimer::new())
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_idle_per_host)
            .build(https_connector(config.connect_timeout));

        Ok(HyperClient {
            inner,
            shared: Arc::new(shared),
        })
    }

    /// Build a blocking client driving its own single-threaded runtime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the base URL is not absolute, or
    /// [`Error::Connection`] if the runtime cannot start.
    pub fn build_blocking(self) -> Result<BlockingHyperClient> {
        BlockingHyperClient::new(self.build()?)
    }
}
