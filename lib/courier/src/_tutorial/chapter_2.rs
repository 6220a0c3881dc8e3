//! # Chapter 2: Responses and JSON-RPC
//!
//! ## What You'll Learn
//!
//! - Status policies with [`ErrorRaiser`](crate::ErrorRaiser)
//! - Typed results and raw responses
//! - Declaring JSON-RPC methods
//!
//! ## Status Policies
//!
//! By default any status from 400 up is an error. Narrow or widen it per
//! builder or per method:
//!
//! ```ignore
//! // 404 is a regular answer here
//! let api = RestBuilder::new().error_raiser(ErrorRaiser::new().except_codes([200, 404]));
//!
//! match get_user.bind(&client).call(&args!(id = 1)).await {
//!     Err(err) if err.status() == Some(503) => retry_later(),
//!     Err(err) => return Err(err),
//!     Ok(body) => handle(body),
//! }
//! ```
//!
//! Status errors carry the loaded body; decode it with
//! [`Error::decode_body`](crate::Error::decode_body).
//!
//! ## Results
//!
//! `call` returns the final [`ResponseBody`](crate::ResponseBody), `call_as`
//! decodes it. Declare [`HttpResponse`](crate::HttpResponse) as the result to
//! get the status and headers instead; the body is then never read:
//!
//! ```ignore
//! let ping = RestBuilder::new()
//!     .get("health", vec![])
//!     .decorate(Signature::new("ping").returns::<HttpResponse>())?;
//! let response = ping.bind(&client).call(&args!()).await?.into_response()?;
//! ```
//!
//! ## Codecs
//!
//! Body and query values go through a [`Dumper`](crate::Dumper), results
//! through a [`Loader`](crate::Loader). The builder only adds the dump and
//! load stages for the codecs it is given:
//!
//! ```ignore
//! let api = RestBuilder::new()
//!     .request_body_dumper(CamelCaseCodec)
//!     .response_body_loader(CamelCaseCodec);
//! ```
//!
//! A [`BodyModelDump::from_client`](crate::BodyModelDump::from_client) stage
//! uses the dumper of the client the method is bound to instead:
//!
//! ```ignore
//! let create = api.post("items", vec![Body::new("item").into(), BodyModelDump::from_client().into()]);
//! let client = HyperClient::builder(url).request_body_dumper(CamelCaseCodec).build()?;
//! ```
//!
//! ## JSON-RPC
//!
//! A JSON-RPC method sends its only unclaimed parameter as `params`:
//!
//! ```ignore
//! let rpc = JsonRpcBuilder::new().url("rpc");
//! let subtract = rpc
//!     .method("subtract", vec![])
//!     .decorate(Signature::new("subtract").param::<[i64; 2]>("params").returns::<i64>())?;
//!
//! let diff: i64 = subtract.bind(&client).call_as(&args!([42, 23])).await?;
//! ```
//!
//! Each call gets a fresh id. A response with an `error` member becomes
//! [`Error::JsonRpc`](crate::Error::JsonRpc), and a response answering another
//! id becomes [`Error::JsonRpcIdMismatch`](crate::Error::JsonRpcIdMismatch).
