//! SMTP dispatch with cached transport readiness.

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use tokio::sync::OnceCell;

use crate::config::MailConfig;
use crate::mail::{message, MailConfigError, MailError, MailTransport};
use crate::submission::Submission;

/// App passwords are issued as exactly 16 characters; anything else is
/// almost certainly an account password pasted by mistake.
const APP_PASSWORD_LEN: usize = 16;

/// One-shot verification outcome, cached for the process lifetime.
enum Readiness {
    Verified(AsyncSmtpTransport<Tokio1Executor>),
    Failed(String),
}

/// Production mail dispatcher over an SMTP relay.
///
/// The first dispatch builds the transport and runs a connectivity/auth
/// check; the result (either way) is cached until the process restarts.
/// Concurrent first dispatches await the same verification.
pub struct SmtpMailer {
    config: MailConfig,
    readiness: OnceCell<Readiness>,
}

impl SmtpMailer {
    pub fn new(config: MailConfig) -> Self {
        Self {
            config,
            readiness: OnceCell::new(),
        }
    }

    /// Check presence and shape of the mail secrets.
    fn credentials(&self) -> Result<(&str, &str), MailConfigError> {
        let username = self.config.username.as_deref().unwrap_or("");
        let password = self.config.password.as_deref().unwrap_or("");
        if username.is_empty() || password.is_empty() {
            return Err(MailConfigError::MissingCredentials);
        }
        let len = password.chars().count();
        if len != APP_PASSWORD_LEN {
            return Err(MailConfigError::BadCredentialLength(len));
        }
        Ok((username, password))
    }

    fn sender(&self, account: &str) -> Result<Mailbox, MailConfigError> {
        let address: Address = account.parse().map_err(|_| MailConfigError::BadSender)?;
        Ok(Mailbox::new(Some(self.config.sender_name.clone()), address))
    }

    fn recipient(&self) -> Result<Mailbox, MailConfigError> {
        let address: Address = self
            .config
            .recipient
            .trim()
            .parse()
            .map_err(|_| MailConfigError::BadRecipient)?;
        Ok(Mailbox::new(None, address))
    }

    /// Build the transport and verify connectivity, once per process.
    async fn transport(
        &self,
        credentials: Credentials,
    ) -> Result<&AsyncSmtpTransport<Tokio1Executor>, MailError> {
        let readiness = self
            .readiness
            .get_or_init(|| async move {
                match self.connect(credentials).await {
                    Ok(transport) => {
                        tracing::info!("SMTP connection verified");
                        Readiness::Verified(transport)
                    }
                    Err(detail) => {
                        tracing::error!(error = %detail, "SMTP verification failed; dispatch disabled until restart");
                        Readiness::Failed(detail)
                    }
                }
            })
            .await;

        match readiness {
            Readiness::Verified(transport) => Ok(transport),
            Readiness::Failed(detail) => Err(MailError::Unavailable(detail.clone())),
        }
    }

    async fn connect(
        &self,
        credentials: Credentials,
    ) -> Result<AsyncSmtpTransport<Tokio1Executor>, String> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.smtp_host)
            .map_err(|e| e.to_string())?
            .port(self.config.smtp_port)
            .credentials(credentials)
            .timeout(Some(Duration::from_secs(self.config.timeout_secs)))
            .build();

        match transport.test_connection().await {
            Ok(true) => Ok(transport),
            Ok(false) => Err("relay rejected the connection test".to_string()),
            Err(e) => Err(e.to_string()),
        }
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, submission: &Submission) -> Result<(), MailError> {
        let (account, password) = self.credentials()?;
        let sender = self.sender(account)?;
        let recipient = self.recipient()?;

        let credentials = Credentials::new(account.to_string(), password.to_string());
        let transport = self.transport(credentials).await?;

        let message = message::build(sender, recipient, submission)
            .map_err(|e| MailError::Compose(e.to_string()))?;

        transport
            .send(message)
            .await
            .map_err(|e| MailError::Send(e.to_string()))?;

        Ok(())
    }
}
