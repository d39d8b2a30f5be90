//! Segment trie mapping `(method, path)` to a handler.
//!
//! Routes are registered on a [`RouterBuilder`] and frozen into a [`Router`].
//! A path pattern is split on `/`; a segment starting with `:` captures the
//! request segment into a named variable, and `!` after the name adds a
//! constraint the captured value must fully match (`int`, `float` or a regex).
//!
//! ```text
//! /users/:user            -> {user}
//! /regex/integer/:n!int   -> {n}, digits only
//! /words/:w![a-z]+        -> {w}, lowercase only
//! ```
mod builder;
mod constraint;
mod error;
mod node;
mod path;
mod router;
mod tree;

pub use builder::RouterBuilder;
pub use constraint::RegexCache;
pub use error::{BuildError, RouteError};
pub use node::{Handlers, Node, RouteMethod, Segment};
pub use path::PathVariables;
pub use router::{Match, Resolved, Router};
pub use tree::Tree;
