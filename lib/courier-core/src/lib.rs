//! Core of the courier declarative HTTP client.
//!
//! A client method is declared as a [`Signature`] plus a list of transformers.
//! Request transformers claim parameters ([`FieldIn`]) and route them to
//! request slots ([`FieldOut`]); response transformers check and decode the
//! response. Builders ([`RestBuilder`], [`JsonRpcBuilder`]) add the protocol's
//! default stages and freeze everything into a [`MethodSpec`], which a
//! [`MethodBinder`] runs against any client implementing [`AsyncClient`] or
//! [`BlockingClient`].
//!
//! - [`transformers`] - concrete request and response stages
//! - [`Template`] - URL, header and query value templates
//! - [`Dumper`] / [`Loader`] - pluggable codecs
//! - [`Error`] and [`Result`] - error handling
//!
//! # Example
//!
//! ```
//! use courier_core::{Query, RestBuilder, Signature};
//!
//! let api = RestBuilder::new();
//! let list_posts = api
//!     .get("/users/{user_id}/posts", vec![Query::new("page").into()])
//!     .decorate(
//!         Signature::new("list_posts")
//!             .param::<u64>("user_id")
//!             .param_with_default::<u32>("page", 1),
//!     )
//!     .expect("valid method");
//! assert_eq!(list_posts.spec().request_chain()[..3], [
//!     "Url(/users/{user_id}/posts)",
//!     "Method(GET)",
//!     "Query(page)",
//! ]);
//! ```

mod args;
mod bound;
pub mod builder;
mod client;
mod codec;
mod error;
mod field;
mod method;
pub mod prelude;
mod request;
mod response;
mod signature;
mod spec;
mod template;
mod transformer;
pub mod transformers;
mod type_hint;

pub use args::{Args, CallArgs};
pub use bound::{BoundAsyncMethod, BoundBlockingMethod, MethodBinder};
pub use builder::{
    CommonParams, DEFAULT_BODY_NAME, JsonRpcBuilder, JsonRpcParams, Override, RestBuilder,
    RestParams,
};
pub use client::{AsyncClient, AsyncResponseHandle, BlockingClient, Client, ResponseHandle};
pub use codec::{
    CamelCaseCodec, ContentType, Dumper, Loader, PassThrough, form_pairs, from_json,
    render_value, to_form, to_json,
};
pub use error::{Error, Result};
pub use field::{
    FieldDestination, FieldIn, FieldOut, TransformerId, consume_fields, consumed_fields,
    find_field,
};
pub use method::Method;
pub use request::{FileData, HttpRequest};
pub use response::{HttpResponse, ResponseBody, from_value};
pub use signature::{Parameter, Signature};
pub use spec::{MethodSpec, Resolution};
pub use template::{FormatTemplate, FuncTemplate, Template};
pub use transformer::{Pipe, RequestTransformer, ResponseTransformer, Transformer};
pub use transformers::jsonrpc::{JSON_RPC_VERSION, METHOD_EXTRA, REQUEST_ID_EXTRA};
pub use transformers::{
    BasicAuth, Body, BodyModelDump, BodyModelLoad, DeepObjectQuery, DelimiterQuery, ErrorRaiser,
    Extra, File, FormQuery, Header, JsonDump, JsonLoad, JsonRpcErrorRaiser, JsonRpcIdGenerator,
    JsonRpcMethod, KeepResponse, PackJsonRpc, PhpStyleQuery, Query, QueryModelDump, SetMethod,
    Skip, UnpackJsonRpc, Url,
};
pub use type_hint::TypeHint;

// Re-export http crate types for status codes and headers
pub use http::{StatusCode, header};
