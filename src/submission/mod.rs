//! Submission parsing and validation.
//!
//! # Data Flow
//! ```text
//! Request body (JSON or form-encoded)
//!     → types.rs (RawSubmission, as sent by the form)
//!     → validate.rs (presence + shape checks)
//!     → Submission (trimmed, immutable)
//! ```
//!
//! # Design Decisions
//! - Validation is pure; no side effects, no clock, no I/O
//! - The email check parses with the same address type the mail
//!   transport uses, so nothing valid here fails later at compose time
//! - The phone check is deliberately permissive: international prefixes,
//!   grouping characters, and spacing all pass

pub mod types;
pub mod validate;

pub use types::{RawSubmission, Submission};
pub use validate::{validate, Field, ValidationError};
