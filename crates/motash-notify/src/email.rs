//! E-mail notifier — plain-text report over SMTP (STARTTLS, async lettre).

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use motash_core::config::EmailNotifyConfig;
use motash_core::{Failure, MotashError, Notifier, Result};

use crate::message::ReportContext;

pub struct EmailNotifier {
    config: EmailNotifyConfig,
    context: ReportContext,
}

impl EmailNotifier {
    pub fn new(config: &EmailNotifyConfig, context: ReportContext) -> Self {
        Self {
            config: config.clone(),
            context,
        }
    }

    fn build_message(&self, failures: &[Failure]) -> Result<Message> {
        let from: Mailbox = self
            .config
            .from
            .parse()
            .map_err(|e| MotashError::notifier(format!("Invalid from: {e}")))?;

        let mut builder = Message::builder()
            .from(from)
            .subject(self.context.title(failures))
            .header(ContentType::TEXT_PLAIN);

        if self.config.to.is_empty() {
            return Err(MotashError::notifier("No e-mail recipients configured"));
        }
        for to in &self.config.to {
            let mailbox: Mailbox = to
                .parse()
                .map_err(|e| MotashError::notifier(format!("Invalid to '{to}': {e}")))?;
            builder = builder.to(mailbox);
        }

        builder
            .body(self.context.body(failures))
            .map_err(|e| MotashError::notifier(format!("Build email: {e}")))
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    fn name(&self) -> &str {
        "email"
    }

    async fn send(&self, failures: &[Failure]) -> Result<()> {
        let email = self.build_message(failures)?;

        let mut transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)
            .map_err(|e| MotashError::notifier(format!("SMTP relay: {e}")))?
            .port(self.config.smtp_port);
        if !self.config.username.is_empty() {
            transport = transport.credentials(Credentials::new(
                self.config.username.clone(),
                self.config.password.clone(),
            ));
        }

        transport
            .build()
            .send(email)
            .await
            .map_err(|e| MotashError::notifier(format!("SMTP send: {e}")))?;

        tracing::info!("📤 Email sent to: {}", self.config.to.join(", "));
        Ok(())
    }
}
