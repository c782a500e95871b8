//! Outgoing email: the `Mailer` seam, its SMTP and log-only implementations,
//! and the verification-code email itself.

use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpConfig;
use crate::error::{AppError, AppResult};
use crate::models::User;

/// Minutes a verification code is advertised as valid.
pub const CODE_VALIDITY_MINUTES: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    /// HTML body
    pub body: String,
}

/// Delivers rendered emails.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: EmailMessage) -> AppResult<()>;
}

/// Sends through an SMTP relay using lettre's tokio transport.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// `secure` selects implicit TLS; otherwise the session is upgraded with
    /// STARTTLS before authenticating.
    pub fn new(config: &SmtpConfig) -> AppResult<Self> {
        let builder = if config.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
        }
        .map_err(|e| AppError::Configuration {
            key: "smtp.host".to_string(),
            source: anyhow::Error::new(e),
        })?;

        let mut builder = builder.port(config.port);
        if !config.user.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.user.clone(),
                config.password.clone(),
            ));
        }

        let from = config
            .from
            .parse::<Mailbox>()
            .map_err(|e| AppError::Configuration {
                key: "smtp.from".to_string(),
                source: anyhow::Error::new(e),
            })?;

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: EmailMessage) -> AppResult<()> {
        let to = message
            .to
            .parse::<Mailbox>()
            .map_err(|e| AppError::bad_request(format!("invalid recipient address: {e}")))?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(message.subject)
            .header(ContentType::TEXT_HTML)
            .body(message.body)
            .map_err(|e| AppError::internal("Failed to build email", anyhow::Error::new(e)))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| AppError::internal("Failed to send email", anyhow::Error::new(e)))?;
        Ok(())
    }
}

/// Writes emails to the log instead of sending them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: EmailMessage) -> AppResult<()> {
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            "Email delivery disabled, logging message instead"
        );
        tracing::debug!(to = %message.to, body = %message.body, "Undelivered email body");
        Ok(())
    }
}

/// Picks the mailer for the configuration: SMTP when enabled, log-only otherwise.
pub fn mailer_from_config(config: &SmtpConfig) -> AppResult<Arc<dyn Mailer>> {
    if config.enabled {
        tracing::info!(host = %config.host, port = config.port, secure = config.secure, "SMTP delivery enabled");
        Ok(Arc::new(SmtpMailer::new(config)?))
    } else {
        tracing::info!("SMTP disabled, emails will be logged");
        Ok(Arc::new(LogMailer))
    }
}

#[derive(Clone)]
pub struct EmailService {
    mailer: Arc<dyn Mailer>,
    support_email: String,
}

impl EmailService {
    pub fn new(mailer: Arc<dyn Mailer>, support_email: impl Into<String>) -> Self {
        Self {
            mailer,
            support_email: support_email.into(),
        }
    }

    /// Sends the user's current verification code.
    ///
    /// Delivery failures are logged and never reach the caller. Users without a
    /// pending code are skipped.
    pub async fn send_code(&self, user: &User) {
        let Some(code) = user.code.as_deref() else {
            tracing::warn!(user_id = %user.id, "No verification code to send");
            return;
        };

        let message = EmailMessage {
            to: user.email.clone(),
            subject: "Verification code".to_string(),
            body: self.render_code_email(user, code),
        };

        match self.mailer.send(message).await {
            Ok(()) => tracing::info!(user_id = %user.id, "Verification code sent"),
            Err(e) => tracing::error!(user_id = %user.id, error = ?e, "Failed to send verification code"),
        }
    }

    fn render_code_email(&self, user: &User, code: &str) -> String {
        let year = jiff::Zoned::now().year();
        format!(
            "<p>Hello {name} {last_name},</p>\
             <p>Your verification code is: <strong>{code}</strong></p>\
             <p>The code is valid for {CODE_VALIDITY_MINUTES} minutes.</p>\
             <p>If you did not request this code, contact us at {support}.</p>\
             <p>&copy; {year} Splitpay</p>",
            name = user.name,
            last_name = user.last_name,
            support = self.support_email,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{RecordingMailer, capture_logs, sample_user};

    #[tokio::test]
    async fn send_code_renders_the_email() {
        let mailer = Arc::new(RecordingMailer::default());
        let service = EmailService::new(mailer.clone(), "help@example.com");
        let mut user = sample_user("ana@example.com", "ana");
        user.code = Some("AB12CD".to_string());

        service.send_code(&user).await;

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "ana@example.com");
        assert_eq!(sent[0].subject, "Verification code");
        assert!(sent[0].body.contains("Ana Lopez"));
        assert!(sent[0].body.contains("AB12CD"));
        assert!(sent[0].body.contains("30 minutes"));
        assert!(sent[0].body.contains("help@example.com"));
        assert!(sent[0].body.contains(&jiff::Zoned::now().year().to_string()));
    }

    #[tokio::test]
    async fn delivery_failures_are_swallowed() {
        let mailer = Arc::new(RecordingMailer::failing());
        let service = EmailService::new(mailer.clone(), "help@example.com");
        let mut user = sample_user("ana@example.com", "ana");
        user.code = Some("AB12CD".to_string());

        service.send_code(&user).await;
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn log_mailer_accepts_everything() {
        let message = EmailMessage {
            to: "someone@example.com".to_string(),
            subject: "s".to_string(),
            body: "b".to_string(),
        };
        assert!(LogMailer.send(message).await.is_ok());
    }

    #[tokio::test]
    async fn log_mailer_keeps_the_body_out_of_info_logs() {
        let (logs, _guard) = capture_logs(tracing::Level::INFO);
        let message = EmailMessage {
            to: "ana@example.com".to_string(),
            subject: "Your verification code".to_string(),
            body: "<p>Your code is ZX81QL</p>".to_string(),
        };
        LogMailer.send(message).await.unwrap();

        let output = logs.contents();
        assert!(output.contains("Your verification code"));
        assert!(!output.contains("ZX81QL"));
    }

    #[test]
    fn disabled_smtp_uses_log_mailer() {
        assert!(mailer_from_config(&SmtpConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn both_tls_modes_build_a_transport() {
        for secure in [false, true] {
            let config = SmtpConfig {
                enabled: true,
                host: "smtp.example.com".to_string(),
                secure,
                user: "mailer".to_string(),
                password: "secret".to_string(),
                from: "Splitpay <no-reply@example.com>".to_string(),
                ..SmtpConfig::default()
            };
            assert!(SmtpMailer::new(&config).is_ok(), "secure = {secure}");
        }
    }

    #[test]
    fn invalid_sender_is_a_configuration_error() {
        let config = SmtpConfig {
            enabled: true,
            from: "nobody".to_string(),
            ..SmtpConfig::default()
        };
        assert!(matches!(
            SmtpMailer::new(&config),
            Err(AppError::Configuration { .. })
        ));
    }
}
