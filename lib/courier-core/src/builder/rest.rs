//! REST method builder.

use std::sync::Arc;

use super::{CommonParams, DEFAULT_BODY_NAME, Override, common_setters};
use crate::{
    Body, Dumper, FormQuery, Method, MethodBinder, MethodSpec, Query, QueryModelDump,
    RequestTransformer, Resolution, Result, SetMethod, Signature, Template, Transformer, Url,
};

/// Parameters of a [`RestBuilder`].
#[derive(Debug, Clone, Default)]
pub struct RestParams {
    /// Parameter routed to the body when no stage claims one (`"body"`).
    pub body_name: Override<String>,
    /// Dumper of query values; the dump stage is only added when set.
    pub query_param_dumper: Override<Arc<dyn Dumper>>,
    /// Flattening stage for query values; unset is [`FormQuery`].
    pub query_param_post_dump: Override<Arc<dyn RequestTransformer>>,
    /// Keys shared with JSON-RPC.
    pub common: CommonParams,
}

impl RestParams {
    /// Keys of `newer` override keys of `self`.
    #[must_use]
    pub fn merge(self, newer: Self) -> Self {
        Self {
            body_name: self.body_name.merge(newer.body_name),
            query_param_dumper: self.query_param_dumper.merge(newer.query_param_dumper),
            query_param_post_dump: self
                .query_param_post_dump
                .merge(newer.query_param_post_dump),
            common: self.common.merge(newer.common),
        }
    }
}

/// Builds REST methods.
///
/// Request stages, in order:
/// 1. the configured transformers;
/// 2. `Body(body_name)` when no body slot exists and that parameter is free;
/// 3. with a body: the body dump, then the post-dump (`JsonDump`);
/// 4. `Query(name)` for every parameter still unclaimed;
/// 5. the query dump, then the query post-dump (`FormQuery`).
///
/// Response stages: the configured transformers, the error raiser, the
/// pre-load (`JsonLoad`), then `KeepResponse` for an [`HttpResponse`] result
/// or the model load when a loader is set.
///
/// [`HttpResponse`]: crate::HttpResponse
///
/// # Example
///
/// ```
/// use courier_core::{RestBuilder, Signature};
///
/// let spec = RestBuilder::new()
///     .post("/posts", vec![])
///     .build(Signature::new("create_post").param::<serde_json::Value>("body"))
///     .expect("valid method");
/// assert_eq!(spec.request_chain(), vec![
///     "Url(/posts)",
///     "Method(POST)",
///     "Body(body)",
///     "JsonDump",
///     "FormQuery",
/// ]);
/// assert_eq!(spec.response_chain(), vec!["ErrorRaiser", "JsonLoad"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RestBuilder {
    transformers: Vec<Transformer>,
    params: RestParams,
}

impl RestBuilder {
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
        params: RestParams,
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
    pub const fn params(&self) -> &RestParams {
        &self.params
    }

    fn route(
        &self,
        method: Method,
        url: impl Into<Template>,
        transformers: impl IntoIterator<Item = Transformer>,
    ) -> Self {
        let head = [Url::new(url).into(), SetMethod(method).into()];
        self.with_params(head.into_iter().chain(transformers), RestParams::default())
    }

    /// `GET url`.
    #[must_use]
    pub fn get(
        &self,
        url: impl Into<Template>,
        transformers: impl IntoIterator<Item = Transformer>,
    ) -> Self {
        self.route(Method::Get, url, transformers)
    }

    /// `POST url`.
    #[must_use]
    pub fn post(
        &self,
        url: impl Into<Template>,
        transformers: impl IntoIterator<Item = Transformer>,
    ) -> Self {
        self.route(Method::Post, url, transformers)
    }

    /// `PUT url`.
    #[must_use]
    pub fn put(
        &self,
        url: impl Into<Template>,
        transformers: impl IntoIterator<Item = Transformer>,
    ) -> Self {
        self.route(Method::Put, url, transformers)
    }

    /// `PATCH url`.
    #[must_use]
    pub fn patch(
        &self,
        url: impl Into<Template>,
        transformers: impl IntoIterator<Item = Transformer>,
    ) -> Self {
        self.route(Method::Patch, url, transformers)
    }

    /// `DELETE url`.
    #[must_use]
    pub fn delete(
        &self,
        url: impl Into<Template>,
        transformers: impl IntoIterator<Item = Transformer>,
    ) -> Self {
        self.route(Method::Delete, url, transformers)
    }

    fn with_rest(&self, update: impl FnOnce(&mut RestParams)) -> Self {
        let mut params = RestParams::default();
        update(&mut params);
        self.with_params([], params)
    }

    fn with_common(&self, update: impl FnOnce(&mut CommonParams)) -> Self {
        self.with_rest(|params| update(&mut params.common))
    }

    /// Route the parameter `name` to the body by default.
    #[must_use]
    pub fn body_name(&self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.with_rest(|p| p.body_name = Override::Set(name))
    }

    /// Never route a parameter to the body by default.
    #[must_use]
    pub fn no_body_name(&self) -> Self {
        self.with_rest(|p| p.body_name = Override::Disabled)
    }

    /// Dump query values with `dumper` instead of the client's dumper.
    #[must_use]
    pub fn query_param_dumper(&self, dumper: impl Dumper + 'static) -> Self {
        self.with_rest(|p| p.query_param_dumper = Override::Set(Arc::new(dumper)))
    }

    /// Do not dump query values.
    #[must_use]
    pub fn no_query_param_dumper(&self) -> Self {
        self.with_rest(|p| p.query_param_dumper = Override::Disabled)
    }

    /// Flatten query values with `stage` instead of `FormQuery`.
    #[must_use]
    pub fn query_param_post_dump(&self, stage: impl RequestTransformer + 'static) -> Self {
        self.with_rest(|p| p.query_param_post_dump = Override::Set(Arc::new(stage)))
    }

    /// Leave query values unflattened.
    #[must_use]
    pub fn no_query_param_post_dump(&self) -> Self {
        self.with_rest(|p| p.query_param_post_dump = Override::Disabled)
    }

    common_setters!();

    /// Resolve `signature` into a method spec.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::MultipleBody`] if two stages route to the body,
    /// or [`crate::Error::InvalidArguments`] for an invalid signature.
    pub fn build(&self, signature: Signature) -> Result<MethodSpec> {
        let params = &self.params;
        let mut resolution = Resolution::new(signature)?;
        for transformer in &self.transformers {
            resolution.add(transformer.clone())?;
        }

        if !resolution.has_body()
            && let Some(name) = params.body_name.resolve(|| DEFAULT_BODY_NAME.to_string())
            && resolution.unclaimed().contains(&name)
        {
            resolution.add_request(Arc::new(Body::new(name)))?;
        }
        if resolution.has_body() {
            let stages = [params.common.body_dump_stage(), params.common.body_post_dump_stage()];
            for stage in stages.into_iter().flatten() {
                resolution.add_request(stage)?;
            }
        }

        for name in resolution.unclaimed() {
            resolution.add_request(Arc::new(Query::new(name)))?;
        }
        if let Override::Set(dumper) = &params.query_param_dumper {
            resolution.add_request(Arc::new(QueryModelDump::new(Arc::clone(dumper))))?;
        }
        if let Some(post_dump) = params.query_param_post_dump.resolve(|| Arc::new(FormQuery)) {
            resolution.add_request(post_dump)?;
        }

        params.common.add_status_stages(&mut resolution);
        params.common.add_result_stage(&mut resolution);
        Ok(resolution.finish())
    }

    /// Resolve `signature` and wrap it for binding to clients.
    ///
    /// # Errors
    ///
    /// See [`RestBuilder::build`].
    pub fn decorate(&self, signature: Signature) -> Result<MethodBinder> {
        self.build(signature).map(MethodBinder::new)
    }
}
