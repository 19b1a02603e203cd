//! Segment-trie path router.
//!
//! Matches request paths such as `/user/alice/image/7` against registered
//! patterns such as `/user/{name}/image/{id}`, returning the route identity
//! and the captured parameters.

pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::RouterConfig;
pub use lifecycle::{Shutdown, ShutdownReason};
pub use routing::{MatchResult, Params, RouteTree, Router};
