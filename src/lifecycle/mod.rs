//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Logging → Metrics → Build route tree
//!
//! Running:
//!     watcher update → apply_updates → Router::reload (swap)
//!
//! Shutdown (shutdown.rs, signals.rs):
//!     SIGTERM/SIGINT or stdin EOF → broadcast → tasks exit
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then observability, then routes
//! - Every long-running task subscribes to the same shutdown broadcast

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{Shutdown, ShutdownReason};
