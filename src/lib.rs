//! Path-segment trie router.
//!
//! Routes are `(method, pattern, handler)` triples. Literal segments take
//! precedence over `:param` segments, and parameters may carry a constraint
//! after `!` (`int`, `float` or any regex) that must match the whole segment.
//!
//! # Example usage
//!
//! ```
//! use http::Method;
//! use pathtrie::{Resolved, Router};
//!
//! let router = Router::builder()
//!     .get("/users/:user", "show user")
//!     .get("/users/topusers", "top users")
//!     .get("/regex/integer/:n!int", "number")
//!     .build()
//!     .unwrap();
//!
//! match router.resolve(&Method::GET, "/users/dave") {
//!     Resolved::Found { handler, variables } => {
//!         assert_eq!(*handler, "show user");
//!         assert_eq!(variables.get("user"), "dave");
//!     }
//!     _ => unreachable!(),
//! }
//! assert!(matches!(
//!     router.resolve(&Method::GET, "/regex/integer/x"),
//!     Resolved::NotFound
//! ));
//! ```
//!
//! [`builder`] wires a router to a small HTTP/1.1 server:
//!
//! ```no_run
//! use pathtrie::{http::Response, Env};
//!
//! # async fn run() -> anyhow::Result<()> {
//! pathtrie::builder("/api")
//!     .get("/users/:user", |env: Env| async move {
//!         Response::ok().with_text(env.path.get("user").to_string())
//!     })
//!     .with_app_port(7878)
//!     .build()
//!     .await?
//!     .run()
//!     .await
//! # }
//! ```
pub mod http;
pub(crate) mod io;
pub mod server;
pub mod trie;

pub use server::app::{builder, Server, ServerBuilder};
pub use server::{Endpoint, Env};
pub use trie::{
    BuildError, Match, PathVariables, Resolved, RouteError, RouteMethod, Router, RouterBuilder,
};
