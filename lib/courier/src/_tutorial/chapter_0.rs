//! # Chapter 0: Getting Started
//!
//! Your first courier method in 5 minutes.
//!
//! ## What You'll Learn
//!
//! - Declare a method with [`RestBuilder`](crate::RestBuilder) and a
//!   [`Signature`](crate::Signature)
//! - Create a [`HyperClient`](crate::HyperClient)
//! - Call the method with [`args!`](crate::args)
//!
//! ## Prerequisites
//!
//! Add to `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! courier = "0.1"
//! serde = { version = "1.0", features = ["derive"] }
//! tokio = { version = "1", features = ["full"] }
//! ```
//!
//! ## Your First Method
//!
//! ```ignore
//! use courier::prelude::*;
//!
//! #[derive(Debug, Deserialize)]
//! pub struct User {
//!     pub id: u64,
//!     pub name: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> courier::Result<()> {
//!     // Declared once, usually at startup
//!     let get_user = RestBuilder::new()
//!         .get("users/{id}", vec![])
//!         .decorate(Signature::new("get_user").param::<u64>("id").returns::<User>())?;
//!
//!     // Bound to a client per call
//!     let client = HyperClient::builder("https://api.example.com").build()?;
//!     let user: User = get_user.bind(&client).call_as(&args!(id = 42)).await?;
//!     println!("User: {user:?}");
//!     Ok(())
//! }
//! ```
//!
//! ## What Gets Built
//!
//! `decorate` resolves the signature into a chain of transformers. The URL
//! template claims `id`, and the REST defaults fill in the rest:
//!
//! ```text
//! request:  Url(users/{id}) → Method(GET) → FormQuery
//! response: ErrorRaiser → JsonLoad
//! ```
//!
//! Print them with `get_user.spec().request_chain()` when in doubt.
//!
//! ## Base URLs
//!
//! The method URL is resolved against the client base URL like a link:
//! `users/42` extends `https://api.example.com/v2/`, while `/users/42`
//! replaces its path.
//!
//! ## Blocking Code
//!
//! The same method binds to a blocking client:
//!
//! ```ignore
//! let client = HyperClient::builder("https://api.example.com").build_blocking()?;
//! let user: User = get_user.bind_blocking(&client).call_as(&args!(id = 42))?;
//! ```
//!
//! ## Next Steps
//!
//! Continue to [Chapter 1: Routing Parameters](super::chapter_1).
