//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Build phase (once per route table):
//!     pattern string
//!     → pattern.rs (parse into Literal / Placeholder segments)
//!     → tree.rs (insert into the segment trie, bind route identity)
//!     → frozen RouteTree
//!     → router.rs (publish via ArcSwap)
//!
//! Serving phase (per request):
//!     request path
//!     → pattern.rs (split into segments)
//!     → matcher.rs (DFS: literal first, placeholder on backtrack)
//!     → MatchResult { route, pattern, params } or no match
//! ```
//!
//! # Design Decisions
//! - Trees are immutable once published; reload builds and swaps a new tree
//! - Deterministic: same tree and path always give the same result
//! - Literal edges win ties; placeholder edges are the fallback
//! - No regex, no decoding, case-sensitive

pub mod error;
pub mod matcher;
pub mod params;
pub mod pattern;
pub mod router;
pub mod tree;

pub use error::{PatternError, RegistrationError, RegistrationResult};
pub use params::{MatchResult, Params, PathResolution};
pub use pattern::{parse_pattern, split_path, Segment};
pub use router::{build_tree, Router};
pub use tree::{DuplicatePolicy, RouteTree};
