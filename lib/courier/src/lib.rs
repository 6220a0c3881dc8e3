//! Declarative REST and JSON-RPC clients for Rust.
//!
//! Methods are declared once with [`RestBuilder`] or [`JsonRpcBuilder`] from a
//! [`Signature`] and a list of transformers, then bound to a client. This
//! crate provides the hyper transports: [`HyperClient`] for async code and
//! [`BlockingHyperClient`] for blocking code. Everything from `courier-core`
//! is re-exported.
//!
//! # Example
//!
//! ```no_run
//! use courier::prelude::*;
//!
//! #[derive(Debug, Deserialize)]
//! pub struct Post {
//!     pub id: u64,
//!     pub title: String,
//! }
//!
//! # async fn run() -> courier::Result<()> {
//! let api = RestBuilder::new();
//! let list_posts = api
//!     .get("users/{user_id}/posts", vec![])
//!     .decorate(
//!         Signature::new("list_posts")
//!             .param::<u64>("user_id")
//!             .param_with_default::<u32>("page", 1)
//!             .returns::<Vec<Post>>(),
//!     )?;
//!
//! let client = HyperClient::builder("https://jsonplaceholder.typicode.com").build()?;
//! let posts: Vec<Post> = list_posts.bind(&client).call_as(&args!(user_id = 1)).await?;
//! # Ok(())
//! # }
//! ```
//!
//! See the [tutorial][_tutorial] for a complete guide.

pub mod _tutorial;
mod blocking;
mod client;
mod config;
mod connector;
mod logging;
pub mod multipart;
pub mod prelude;
mod wire;

pub use blocking::{BlockingHyperClient, BlockingResponse};
pub use client::{BodyFuture, HyperClient, HyperClientBuilder, HyperResponse};
pub use config::{ClientConfig, ClientConfigBuilder, DEFAULT_USER_AGENT};
pub use wire::{base_url, build_request, join_url};

// Re-export the whole core
pub use courier_core::*;
