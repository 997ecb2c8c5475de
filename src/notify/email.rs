use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::info;

use super::Notifier;
use crate::config::{EmailConfig, SmtpCredentials};
use crate::digest::Digest;
use crate::error::NotifyError;

/// Sends digests through an authenticated SMTP relay, from the account to
/// the configured recipient.
pub struct SmtpNotifier {
    transport: SmtpTransport,
    from: String,
    to: String,
}

impl SmtpNotifier {
    pub fn new(
        email: &EmailConfig,
        credentials: &SmtpCredentials,
        recipient: &str,
    ) -> Result<Self, NotifyError> {
        let transport = SmtpTransport::relay(&email.smtp_host)?
            .port(email.smtp_port)
            .credentials(Credentials::new(
                credentials.user.clone(),
                credentials.pass.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            from: credentials.user.clone(),
            to: recipient.to_string(),
        })
    }

    fn build_message(&self, digest: &Digest) -> Result<Message, NotifyError> {
        let message = Message::builder()
            .from(parse_mailbox(&self.from)?)
            .to(parse_mailbox(&self.to)?)
            .subject(digest.subject.clone())
            .multipart(MultiPart::alternative_plain_html(
                digest.text.clone(),
                digest.html.clone(),
            ))?;

        Ok(message)
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address.parse().map_err(|source| NotifyError::Address {
        address: address.to_string(),
        source,
    })
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, digest: &Digest) -> Result<String, NotifyError> {
        let message = self.build_message(digest)?;

        // lettre's SMTP transport is blocking
        let response = tokio::task::spawn_blocking({
            let transport = self.transport.clone();
            move || transport.send(&message)
        })
        .await??;

        let summary = format!(
            "{} {}",
            response.code(),
            response
                .message()
                .map(|line| line.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        );
        info!("Email accepted by {}: {}", self.to, summary);
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn notifier(user: &str) -> SmtpNotifier {
        let config = Config::default();
        let credentials = SmtpCredentials {
            user: user.to_string(),
            pass: "secret".to_string(),
        };
        SmtpNotifier::new(&config.email, &credentials, user).unwrap()
    }

    fn digest() -> Digest {
        Digest::build("PhD Research Openings in Europe", "Openings", &[])
    }

    #[test]
    fn builds_multipart_alternative_message() {
        let message = notifier("me@example.com").build_message(&digest()).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("From: me@example.com"));
        assert!(raw.contains("To: me@example.com"));
        assert!(raw.contains("Subject: PhD Research Openings in Europe"));
        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("text/plain"));
        assert!(raw.contains("text/html"));
    }

    #[tokio::test]
    async fn missing_account_fails_at_send_time() {
        let err = notifier("").send(&digest()).await.unwrap_err();
        assert!(matches!(err, NotifyError::Address { .. }));
    }
}
