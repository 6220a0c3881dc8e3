//! Prelude module for convenient imports.
//!
//! ```ignore
//! use courier_core::prelude::*;
//! ```

pub use crate::{
    Args, AsyncClient, BlockingClient, Client, Dumper, Error, HttpRequest, HttpResponse,
    JsonRpcBuilder, Loader, Method, MethodBinder, RequestTransformer, ResponseBody,
    ResponseTransformer, Result, RestBuilder, Signature, Template, Transformer, TypeHint, args,
};
pub use crate::transformers::*;
