//! Outbound mail subsystem.
//!
//! # Data Flow
//! ```text
//! Validated submission
//!     → mailer.rs (credential checks, one-time SMTP verification)
//!     → message.rs (plain-text compose)
//!     → lettre AsyncSmtpTransport → relay → business inbox
//! ```
//!
//! # Design Decisions
//! - Dispatch sits behind the [`MailTransport`] trait so tests substitute
//!   a recording fake; only `SmtpMailer` touches the network
//! - Transport readiness is verified once per process and cached; a
//!   failed verification stays failed until restart
//! - Credential problems are the operator's fault, never the caller's:
//!   they map to a distinct error class and the credential value itself
//!   is never logged or echoed
//! - No retries: a failed send surfaces to the caller once

pub mod mailer;
pub mod message;

use async_trait::async_trait;
use thiserror::Error;

use crate::submission::Submission;

pub use mailer::SmtpMailer;

/// Mail configuration problems, detected before any connection is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MailConfigError {
    #[error("mail account or credential is not configured")]
    MissingCredentials,

    /// Carries only the observed length, never the credential itself.
    #[error("mail credential has length {0}, expected a 16-character app password")]
    BadCredentialLength(usize),

    #[error("mail sender account is not a valid address")]
    BadSender,

    #[error("mail recipient is not a valid address")]
    BadRecipient,
}

/// Errors surfaced by a dispatch attempt.
#[derive(Debug, Clone, Error)]
pub enum MailError {
    #[error(transparent)]
    Config(#[from] MailConfigError),

    /// The one-time transport verification failed, now or earlier in the
    /// process lifetime. Carries the cached diagnostic text.
    #[error("smtp transport unavailable: {0}")]
    Unavailable(String),

    #[error("failed to compose message: {0}")]
    Compose(String),

    #[error("failed to send message: {0}")]
    Send(String),
}

/// Outbound transport for accepted submissions.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Relay one submission to the business inbox.
    async fn send(&self, submission: &Submission) -> Result<(), MailError>;
}
