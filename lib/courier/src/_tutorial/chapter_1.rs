//! # Chapter 1: Routing Parameters
//!
//! Every parameter of a signature ends up in exactly one place.
//!
//! ## What You'll Learn
//!
//! - Which parameters the defaults claim
//! - Routing parameters explicitly with transformers
//! - Query string formats
//!
//! ## The Defaults
//!
//! For a REST method, in order:
//!
//! 1. parameters named in the URL template go to the path;
//! 2. a parameter named `body` goes to the body;
//! 3. everything else goes to the query string.
//!
//! ```ignore
//! let search = RestBuilder::new()
//!     .get("users/{org}/members", vec![])
//!     .decorate(
//!         Signature::new("members")
//!             .param::<String>("org")
//!             .param_with_default::<u32>("page", 1)
//!             .param::<Option<String>>("role"),
//!     )?;
//! // GET users/acme/members?page=1&role=admin
//! search.bind(&client).call(&args!(org = "acme", role = "admin")).await?;
//! ```
//!
//! `null` query values are skipped on the wire.
//!
//! ## Explicit Routing
//!
//! Transformers listed with the method run first and claim what they use:
//!
//! ```ignore
//! let create = RestBuilder::new()
//!     .post("users", vec![
//!         Header::with_template("X-Request-Id", "{trace}").into(),
//!         Body::new("user").into(),
//!     ])
//!     .decorate(
//!         Signature::new("create_user")
//!             .param::<String>("trace")
//!             .param::<NewUser>("user")
//!             .returns::<User>(),
//!     )?;
//! ```
//!
//! Only one parameter may reach the body; a second one is reported when the
//! method is declared, not when it is called:
//!
//! ```ignore
//! let err = RestBuilder::new()
//!     .post("pairs", vec![Body::new("a").into(), Body::new("b").into()])
//!     .decorate(Signature::new("pair").param::<u8>("a").param::<u8>("b"))
//!     .unwrap_err();
//! assert!(matches!(err, courier::Error::MultipleBody { .. }));
//! ```
//!
//! Use [`Skip`](crate::Skip) for parameters that must not be sent at all, and
//! [`Extra`](crate::Extra) to pass values to later stages without sending
//! them.
//!
//! ## Computed Values
//!
//! Templates can be functions of the arguments:
//!
//! ```ignore
//! Query::with_template("offset", Template::map2(("page", "size"), |p: u32, s: u32| p * s))
//! ```
//!
//! ## Files
//!
//! ```ignore
//! let upload = RestBuilder::new()
//!     .post("reports", vec![File::new("data").filename("report.csv").into()])
//!     .decorate(Signature::new("upload").param::<String>("data").param::<String>("title"))?;
//! ```
//!
//! A request with files is sent as `multipart/form-data`.
//!
//! ## Query Formats
//!
//! Lists and objects are flattened by the query post-dump stage:
//!
//! | Stage                | `x = [1, 2]`     | `x = {a: 1}` |
//! |----------------------|------------------|--------------|
//! | `FormQuery` (default)| `x=1&x=2`        | `a=1`        |
//! | `DeepObjectQuery`    | `x[]=1&x[]=2`    | `x[a]=1`     |
//! | `DelimiterQuery(",")`| `x=1,2`          | `x=a,1`      |
//! | `PhpStyleQuery`      | `x[0]=1&x[1]=2`  | `x[a]=1`     |
//!
//! ```ignore
//! let api = RestBuilder::new().query_param_post_dump(DeepObjectQuery);
//! ```
//!
//! ## Next Steps
//!
//! Continue to [Chapter 2: Responses and JSON-RPC](super::chapter_2).
