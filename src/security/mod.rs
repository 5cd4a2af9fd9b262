//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Validated submission:
//!     → rate_limit.rs (check per-client sliding window)
//!     → Allowed  → pass to mail dispatch
//!     → Limited  → 429 with retry guidance
//! ```
//!
//! # Design Decisions
//! - One mutex guards the whole window map: two concurrent requests from
//!   the same client cannot both take the last slot
//! - A rejecting check records nothing
//! - State is process-local; restart clears it (best-effort anti-spam,
//!   not a durability guarantee)

pub mod rate_limit;

pub use rate_limit::{Clock, Decision, RateLimiter, SystemClock};
