//! Method builders.
//!
//! A builder holds a list of transformers and a set of parameters and turns a
//! [`Signature`](crate::Signature) into a [`MethodBinder`](crate::MethodBinder)
//! by adding the protocol's default stages around the explicit ones.
//!
//! Builders are immutable: every setter returns a new builder, so a shared
//! base can be specialized per method.
//!
//! ```
//! use courier_core::{ErrorRaiser, Query, RestBuilder, Signature};
//!
//! let api = RestBuilder::new().error_raiser(ErrorRaiser::new().except_codes([200, 404]));
//! let spec = api
//!     .get("/search", vec![Query::with_template("q", "{term}").into()])
//!     .build(Signature::new("search").param::<String>("term"))
//!     .expect("valid method");
//! assert_eq!(spec.request_chain(), vec![
//!     "Url(/search)",
//!     "Method(GET)",
//!     "Query(q, {term})",
//!     "FormQuery",
//! ]);
//! ```

mod jsonrpc;
mod rest;

use std::fmt;
use std::sync::Arc;

pub use self::jsonrpc::{JsonRpcBuilder, JsonRpcParams};
pub use self::rest::{RestBuilder, RestParams};
use crate::{
    BodyModelDump, BodyModelLoad, Dumper, ErrorRaiser, HttpResponse, JsonDump, JsonLoad,
    KeepResponse, Loader, RequestTransformer, Resolution, ResponseTransformer,
};

/// Name of the parameter routed to the body when nothing else claims one.
pub const DEFAULT_BODY_NAME: &str = "body";

/// A builder parameter: not configured, explicitly turned off, or set.
///
/// Merging keeps the earlier value only where the newer one is unset, so a
/// more specific builder can both replace and disable a stage.
#[derive(Clone, PartialEq, Eq)]
pub enum Override<T> {
    /// Use the default.
    Unset,
    /// Omit the stage.
    Disabled,
    /// Use this value.
    Set(T),
}

impl<T> Override<T> {
    /// `newer` where it is configured, `self` otherwise.
    #[must_use]
    pub fn merge(self, newer: Self) -> Self {
        match newer {
            Self::Unset => self,
            configured => configured,
        }
    }

    /// Returns `true` if not configured.
    #[must_use]
    pub const fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    /// The configured value, `default()` when unset, `None` when disabled.
    pub fn resolve(&self, default: impl FnOnce() -> T) -> Option<T>
    where
        T: Clone,
    {
        match self {
            Self::Unset => Some(default()),
            Self::Disabled => None,
            Self::Set(value) => Some(value.clone()),
        }
    }
}

impl<T> Default for Override<T> {
    fn default() -> Self {
        Self::Unset
    }
}

impl<T: fmt::Debug> fmt::Debug for Override<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => f.write_str("Unset"),
            Self::Disabled => f.write_str("Disabled"),
            Self::Set(value) => f.debug_tuple("Set").field(value).finish(),
        }
    }
}

impl<T> From<T> for Override<T> {
    fn from(value: T) -> Self {
        Self::Set(value)
    }
}

// ============================================================================
// Shared parameters
// ============================================================================

/// Parameters common to REST and JSON-RPC builders.
#[derive(Debug, Clone, Default)]
pub struct CommonParams {
    /// Dumper of the body; the dump stage is only added when set.
    pub request_body_dumper: Override<Arc<dyn Dumper>>,
    /// Encoding stage after the body dump; unset is [`JsonDump`].
    pub request_body_post_dump: Override<Arc<dyn RequestTransformer>>,
    /// Loader of the result; only used when set.
    pub response_body_loader: Override<Arc<dyn Loader>>,
    /// Parsing stage before the model load; unset is [`JsonLoad`].
    pub response_body_pre_load: Override<Arc<dyn ResponseTransformer>>,
    /// Status policy; unset is [`ErrorRaiser::default`].
    pub error_raiser: Override<Arc<dyn ResponseTransformer>>,
}

impl CommonParams {
    /// Keys of `newer` override keys of `self`.
    #[must_use]
    pub fn merge(self, newer: Self) -> Self {
        Self {
            request_body_dumper: self.request_body_dumper.merge(newer.request_body_dumper),
            request_body_post_dump: self
                .request_body_post_dump
                .merge(newer.request_body_post_dump),
            response_body_loader: self.response_body_loader.merge(newer.response_body_loader),
            response_body_pre_load: self
                .response_body_pre_load
                .merge(newer.response_body_pre_load),
            error_raiser: self.error_raiser.merge(newer.error_raiser),
        }
    }

    /// Body dump stage, only with a configured dumper.
    pub(crate) fn body_dump_stage(&self) -> Option<Arc<dyn RequestTransformer>> {
        match &self.request_body_dumper {
            Override::Set(dumper) => Some(Arc::new(BodyModelDump::new(Arc::clone(dumper)))),
            Override::Unset | Override::Disabled => None,
        }
    }

    /// Body post-dump stage, [`JsonDump`] when unset.
    pub(crate) fn body_post_dump_stage(&self) -> Option<Arc<dyn RequestTransformer>> {
        self.request_body_post_dump.resolve(|| Arc::new(JsonDump))
    }

    /// Error raiser and pre-load stages.
    pub(crate) fn add_status_stages(&self, resolution: &mut Resolution) {
        if let Some(raiser) = self.error_raiser.resolve(|| Arc::new(ErrorRaiser::default())) {
            resolution.add_response(raiser);
        }
        if let Some(pre_load) = self
            .response_body_pre_load
            .resolve(|| Arc::new(JsonLoad::default()))
        {
            resolution.add_response(pre_load);
        }
    }

    /// `KeepResponse` for a raw-response result, otherwise the model load.
    pub(crate) fn add_result_stage(&self, resolution: &mut Resolution) {
        let result = resolution.result_type();
        if result.is::<HttpResponse>() {
            resolution.add_response(Arc::new(KeepResponse::new(false)));
        } else if let Override::Set(loader) = &self.response_body_loader
            && !result.is_any()
        {
            resolution.add_response(Arc::new(BodyModelLoad::new(result, Arc::clone(loader))));
        }
    }
}

/// Setters for [`CommonParams`], shared by both builders.
macro_rules! common_setters {
    () => {
        /// Dump the body with `dumper` instead of the client's dumper.
        #[must_use]
        pub fn request_body_dumper(&self, dumper: impl $crate::Dumper + 'static) -> Self {
            self.with_common(|p| p.request_body_dumper = Override::Set(Arc::new(dumper)))
        }

        /// Do not dump the body.
        #[must_use]
        pub fn no_request_body_dumper(&self) -> Self {
            self.with_common(|p| p.request_body_dumper = Override::Disabled)
        }

        /// Encode the dumped body with `stage` instead of `JsonDump`.
        #[must_use]
        pub fn request_body_post_dump(
            &self,
            stage: impl $crate::RequestTransformer + 'static,
        ) -> Self {
            self.with_common(|p| p.request_body_post_dump = Override::Set(Arc::new(stage)))
        }

        /// Leave the dumped body unencoded.
        #[must_use]
        pub fn no_request_body_post_dump(&self) -> Self {
            self.with_common(|p| p.request_body_post_dump = Override::Disabled)
        }

        /// Load typed results with `loader`.
        #[must_use]
        pub fn response_body_loader(&self, loader: impl $crate::Loader + 'static) -> Self {
            self.with_common(|p| p.response_body_loader = Override::Set(Arc::new(loader)))
        }

        /// Parse the body with `stage` instead of `JsonLoad`.
        #[must_use]
        pub fn response_body_pre_load(
            &self,
            stage: impl $crate::ResponseTransformer + 'static,
        ) -> Self {
            self.with_common(|p| p.response_body_pre_load = Override::Set(Arc::new(stage)))
        }

        /// Do not parse the body before loading.
        #[must_use]
        pub fn no_response_body_pre_load(&self) -> Self {
            self.with_common(|p| p.response_body_pre_load = Override::Disabled)
        }

        /// Check statuses with `stage` instead of the default `ErrorRaiser`.
        #[must_use]
        pub fn error_raiser(&self, stage: impl $crate::ResponseTransformer + 'static) -> Self {
            self.with_common(|p| p.error_raiser = Override::Set(Arc::new(stage)))
        }

        /// Accept every status.
        #[must_use]
        pub fn no_error_raiser(&self) -> Self {
            self.with_common(|p| p.error_raiser = Override::Disabled)
        }
    };
}

pub(crate) use common_setters;
