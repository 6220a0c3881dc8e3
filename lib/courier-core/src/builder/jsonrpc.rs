//! JSON-RPC method builder.

use std::sync::Arc;

use super::{CommonParams, Override, common_setters};
use crate::{
    Body, JsonRpcErrorRaiser, JsonRpcIdGenerator, JsonRpcMethod, Method, MethodBinder, MethodSpec,
    PackJsonRpc, RequestTransformer, Resolution, ResponseTransformer, Result, SetMethod, Signature,
    Template, Transformer, UnpackJsonRpc, Url,
};

/// Parameters of a [`JsonRpcBuilder`].
#[derive(Debug, Clone, Default)]
pub struct JsonRpcParams {
    /// HTTP method of every call; unset is `POST`.
    pub http_method: Override<Method>,
    /// Endpoint, relative to the client base URL; unset is the base itself.
    pub url: Override<Template>,
    /// Request id stage; unset is a UUID [`JsonRpcIdGenerator`].
    pub id_generator: Override<Arc<dyn RequestTransformer>>,
    /// Envelope check; unset is [`JsonRpcErrorRaiser`].
    pub json_rpc_error_raiser: Override<Arc<dyn ResponseTransformer>>,
    /// Keys shared with REST.
    pub common: CommonParams,
}

impl JsonRpcParams {
    /// Keys of `newer` override keys of `self`.
    #[must_use]
    pub fn merge(self, newer: Self) -> Self {
        Self {
            http_method: self.http_method.merge(newer.http_method),
            url: self.url.merge(newer.url),
            id_generator: self.id_generator.merge(newer.id_generator),
            json_rpc_error_raiser: self
                .json_rpc_error_raiser
                .merge(newer.json_rpc_error_raiser),
            common: self.common.merge(newer.common),
        }
    }
}

/// Builds JSON-RPC 2.0 methods.
///
/// Every parameter no stage claims becomes the `params` of the envelope, so a
/// method has at most one such parameter. Usually that is a struct or a list
/// holding the remote arguments.
///
/// # Example
///
/// ```
/// use courier_core::{JsonRpcBuilder, Signature};
///
/// let rpc = JsonRpcBuilder::new().url("/rpc");
/// let spec = rpc
///     .method("subtract", vec![])
///     .build(Signature::new("subtract").param::<[i64; 2]>("params").returns::<i64>())
///     .expect("valid method");
/// assert_eq!(spec.request_chain(), vec![
///     "JsonRpcMethod(subtract)",
///     "Body(params)",
///     "JsonRpcIdGenerator",
///     "Url(/rpc)",
///     "PackJsonRpc",
///     "JsonDump",
///     "Method(POST)",
/// ]);
/// assert_eq!(spec.response_chain(), vec![
///     "ErrorRaiser",
///     "JsonLoad",
///     "JsonRpcErrorRaiser",
///     "UnpackJsonRpc",
/// ]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonRpcBuilder {
    transformers: Vec<Transformer>,
    params: JsonRpcParams,
}

impl JsonRpcBuilder {
    /// Builder with no transformers and default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// New builder running `transformers` before the current ones, with
    /// `params` overriding the current parameters.
    #[must_use]
    pub fn with_params(
        &self,
        transformers: impl IntoIterator<Item = Transformer>,
        params: JsonRpcParams,
    ) -> Self {
        Self {
            transformers: transformers
                .into_iter()
                .chain(self.transformers.iter().cloned())
                .collect(),
            params: self.params.clone().merge(params),
        }
    }

    /// Configured transformers.
    #[must_use]
    pub fn transformers(&self) -> &[Transformer] {
        &self.transformers
    }

    /// Configured parameters.
    #[must_use]
    pub const fn params(&self) -> &JsonRpcParams {
        &self.params
    }

    /// Call the remote method `name`.
    #[must_use]
    pub fn method(
        &self,
        name: impl Into<String>,
        transformers: impl IntoIterator<Item = Transformer>,
    ) -> Self {
        let head = [Transformer::from(JsonRpcMethod::new(name))];
        self.with_params(head.into_iter().chain(transformers), JsonRpcParams::default())
    }

    fn with_rpc(&self, update: impl FnOnce(&mut JsonRpcParams)) -> Self {
        let mut params = JsonRpcParams::default();
        update(&mut params);
        self.with_params([], params)
    }

    fn with_common(&self, update: impl FnOnce(&mut CommonParams)) -> Self {
        self.with_rpc(|params| update(&mut params.common))
    }

    /// Send calls to `url`.
    #[must_use]
    pub fn url(&self, url: impl Into<Template>) -> Self {
        let url = url.into();
        self.with_rpc(|p| p.url = Override::Set(url))
    }

    /// Send calls with `method` instead of `POST`.
    #[must_use]
    pub fn http_method(&self, method: Method) -> Self {
        self.with_rpc(|p| p.http_method = Override::Set(method))
    }

    /// Generate request ids with `stage`.
    #[must_use]
    pub fn id_generator(&self, stage: impl RequestTransformer + 'static) -> Self {
        self.with_rpc(|p| p.id_generator = Override::Set(Arc::new(stage)))
    }

    /// Send no request id.
    #[must_use]
    pub fn no_id_generator(&self) -> Self {
        self.with_rpc(|p| p.id_generator = Override::Disabled)
    }

    /// Check envelopes with `stage`.
    #[must_use]
    pub fn json_rpc_error_raiser(&self, stage: impl ResponseTransformer + 'static) -> Self {
        self.with_rpc(|p| p.json_rpc_error_raiser = Override::Set(Arc::new(stage)))
    }

    /// Do not check envelopes.
    #[must_use]
    pub fn no_json_rpc_error_raiser(&self) -> Self {
        self.with_rpc(|p| p.json_rpc_error_raiser = Override::Disabled)
    }

    common_setters!();

    /// Resolve `signature` into a method spec.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::MultipleBody`] if more than one parameter ends
    /// up in the envelope `params`, or [`crate::Error::InvalidArguments`] for
    /// an invalid signature.
    pub fn build(&self, signature: Signature) -> Result<MethodSpec> {
        let params = &self.params;
        let mut resolution = Resolution::new(signature)?;
        for transformer in &self.transformers {
            resolution.add(transformer.clone())?;
        }

        for name in resolution.unclaimed() {
            resolution.add_request(Arc::new(Body::new(name)))?;
        }
        if resolution.has_body()
            && let Some(dump) = params.common.body_dump_stage()
        {
            resolution.add_request(dump)?;
        }
        if let Some(id_generator) = params
            .id_generator
            .resolve(|| Arc::new(JsonRpcIdGenerator::new()))
        {
            resolution.add_request(id_generator)?;
        }
        let url = match &params.url {
            Override::Set(url) => url.clone(),
            Override::Unset | Override::Disabled => Template::from(""),
        };
        resolution.add_request(Arc::new(Url::new(url)))?;
        resolution.add_request(Arc::new(PackJsonRpc))?;
        if let Some(post_dump) = params.common.body_post_dump_stage() {
            resolution.add_request(post_dump)?;
        }
        if let Some(method) = params.http_method.resolve(|| Method::Post) {
            resolution.add_request(Arc::new(SetMethod(method)))?;
        }

        params.common.add_status_stages(&mut resolution);
        if let Some(raiser) = params
            .json_rpc_error_raiser
            .resolve(|| Arc::new(JsonRpcErrorRaiser))
        {
            resolution.add_response(raiser);
        }
        resolution.add_response(Arc::new(UnpackJsonRpc));
        params.common.add_result_stage(&mut resolution);
        Ok(resolution.finish())
    }

    /// Resolve `signature` and wrap it for binding to clients.
    ///
    /// # Errors
    ///
    /// See [`JsonRpcBuilder::build`].
    pub fn decorate(&self, signature: Signature) -> Result<MethodBinder> {
        self.build(signature).map(MethodBinder::new)
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};
    use serde_json::Value;

    use super::*;
    use crate::{CamelCaseCodec, Error, Header, HttpResponse};

    #[test]
    fn method_without_params() {
        let spec = JsonRpcBuilder::new()
            .method("eth_blockNumber", vec![])
            .build(Signature::new("block_number").returns::<String>())
            .expect("build");
        check!(
            spec.request_chain()
                == vec!["JsonRpcMethod(eth_blockNumber)", "JsonRpcIdGenerator", "Url()", "PackJsonRpc", "JsonDump", "Method(POST)"]
        );
        check!(spec.response_chain() == vec!["ErrorRaiser", "JsonLoad", "JsonRpcErrorRaiser", "UnpackJsonRpc"]);
    }

    #[test]
    fn default_chain_with_params() {
        let spec = JsonRpcBuilder::new()
            .method("sum", vec![])
            .build(Signature::new("sum").param::<Vec<i64>>("params").returns::<i64>())
            .expect("build");
        check!(
            spec.request_chain()
                == vec![
                    "JsonRpcMethod(sum)",
                    "Body(params)",
                    "JsonRpcIdGenerator",
                    "Url()",
                    "PackJsonRpc",
                    "JsonDump",
                    "Method(POST)",
                ]
        );
    }

    #[test]
    fn second_param_is_multiple_body() {
        let result = JsonRpcBuilder::new()
            .method("sum", vec![])
            .build(Signature::new("sum").param::<i64>("a").param::<i64>("b"));
        let_assert!(Err(Error::MultipleBody { existing, new }) = result);
        check!(existing == "Body(a)");
        check!(new == "Body(b)");
    }

    #[test]
    fn explicit_stages_claim_params() {
        let spec = JsonRpcBuilder::new()
            .method("sum", vec![Header::with_template("X-Trace", "{trace}").into()])
            .build(Signature::new("sum").param::<String>("trace").param::<Vec<i64>>("numbers"))
            .expect("build");
        check!(spec.request_chain().get(1).map(String::as_str) == Some("Header(X-Trace, {trace})"));
        check!(spec.request_chain().get(2).map(String::as_str) == Some("Body(numbers)"));
    }

    #[test]
    fn overrides() {
        let spec = JsonRpcBuilder::new()
            .url("/v1/rpc")
            .http_method(Method::Put)
            .no_id_generator()
            .request_body_dumper(CamelCaseCodec)
            .no_request_body_post_dump()
            .no_error_raiser()
            .no_json_rpc_error_raiser()
            .response_body_loader(CamelCaseCodec)
            .method("get_user", vec![])
            .build(Signature::new("get_user").param::<Value>("query").returns::<Vec<u8>>())
            .expect("build");
        check!(
            spec.request_chain()
                == vec![
                    "JsonRpcMethod(get_user)",
                    "Body(query)",
                    "BodyModelDump(CamelCaseCodec)",
                    "Url(/v1/rpc)",
                    "PackJsonRpc",
                    "Method(PUT)",
                ]
        );
        check!(
            spec.response_chain()
                == vec![
                    "JsonLoad".to_string(),
                    "UnpackJsonRpc".to_string(),
                    format!("BodyModelLoad({}, CamelCaseCodec)", std::any::type_name::<Vec<u8>>()),
                ]
        );
    }

    #[test]
    fn raw_response_result() {
        let spec = JsonRpcBuilder::new()
            .method("ping", vec![])
            .build(Signature::new("ping").returns::<HttpResponse>())
            .expect("build");
        check!(spec.response_chain().last().map(String::as_str) == Some("KeepResponse(need_body=false)"));
    }

    #[test]
    fn methods_share_a_base() {
        let rpc = JsonRpcBuilder::new().url("/rpc");
        let first = rpc.method("a", vec![]);
        let second = rpc.method("b", vec![]);
        check!(first.transformers().len() == 1);
        check!(second.transformers().first().map(ToString::to_string) == Some("JsonRpcMethod(b)".to_string()));
        check!(rpc.transformers().is_empty());
    }
}
