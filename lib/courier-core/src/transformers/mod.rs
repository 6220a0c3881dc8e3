//! Concrete transformers.
//!
//! - [`dest`] - URL, header, query and extra slots
//! - [`body`] - body, files, method and model dumps
//! - [`query`] - query flattening strategies
//! - [`auth`] - basic authentication
//! - [`response`] - status policy and body loading
//! - [`jsonrpc`] - JSON-RPC envelope

pub mod auth;
pub mod body;
pub mod dest;
pub mod jsonrpc;
pub mod query;
pub mod response;

pub use self::auth::BasicAuth;
pub use self::body::{Body, BodyModelDump, File, JsonDump, QueryModelDump, SetMethod, Skip};
pub use self::dest::{Extra, Header, Query, Url};
pub use self::jsonrpc::{
    JsonRpcErrorRaiser, JsonRpcIdGenerator, JsonRpcMethod, PackJsonRpc, UnpackJsonRpc,
};
pub use self::query::{DeepObjectQuery, DelimiterQuery, FormQuery, PhpStyleQuery};
pub use self::response::{BodyModelLoad, ErrorRaiser, JsonLoad, KeepResponse};
