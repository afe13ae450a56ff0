use crate::error::MailError;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Body, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{Message, SmtpTransport, Transport};
use std::env;

/// SMTP settings for the mailer
///
/// Credentials are passed in explicitly at construction instead of being
/// read from process-wide globals.
#[derive(Clone, Debug)]
pub struct MailerConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    /// Sender address, e.g. `Reports <reports@example.com>`
    pub from: String,
}

impl MailerConfig {
    /// Build the configuration from environment variables
    ///
    /// Reads `SMTP_HOST`, `SMTP_USERNAME`, `SMTP_PASSWORD` and `MAIL_FROM`;
    /// `SMTP_PORT` is optional and defaults to 465.
    pub fn from_env() -> Result<Self, MailError> {
        let smtp_host = require_var("SMTP_HOST")?;
        let username = require_var("SMTP_USERNAME")?;
        let password = require_var("SMTP_PASSWORD")?;
        let from = require_var("MAIL_FROM")?;

        let smtp_port = match env::var("SMTP_PORT") {
            Ok(port) => port
                .parse()
                .map_err(|_| MailError::Config(format!("SMTP_PORT is not a port: {}", port)))?,
            Err(_) => 465,
        };

        Ok(Self {
            smtp_host,
            smtp_port,
            username,
            password,
            from,
        })
    }
}

fn require_var(name: &str) -> Result<String, MailError> {
    env::var(name).map_err(|_| MailError::Config(format!("{} is not set", name)))
}

/// Synchronous SMTP mailer used to deliver the rendered image
pub struct Mailer {
    smtp: SmtpTransport,
    from: Mailbox,
}

impl Mailer {
    /// Build the TLS-wrapped transport once at startup
    pub fn new(config: &MailerConfig) -> Result<Self, MailError> {
        let creds = Credentials::new(config.username.clone(), config.password.clone());

        let tls_parameters = TlsParameters::new(config.smtp_host.clone())?;

        let smtp = SmtpTransport::relay(&config.smtp_host)?
            .credentials(creds)
            .port(config.smtp_port)
            .tls(Tls::Wrapper(tls_parameters))
            .build();

        Ok(Mailer {
            smtp,
            from: config.from.parse()?,
        })
    }

    /// Send a plain-text message with one image attachment
    ///
    /// Delivery is synchronous and is not retried; the caller gets the
    /// transport's result directly.
    ///
    /// # Arguments
    /// * `to` - Recipient address
    /// * `subject` - Message subject line
    /// * `body` - Plain-text message body
    /// * `attachment` - Encoded image bytes
    /// * `filename` - Attachment filename shown to the recipient
    /// * `mime` - Attachment MIME type, e.g. `image/jpeg`
    pub fn send_image(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        attachment: Vec<u8>,
        filename: &str,
        mime: &str,
    ) -> Result<(), MailError> {
        let content_type = ContentType::parse(mime)?;
        let attachment =
            Attachment::new(filename.to_string()).body(Body::new(attachment), content_type);

        let email = Message::builder()
            .from(self.from.clone())
            .to(to.parse()?)
            .subject(subject)
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(body.to_string()))
                    .singlepart(attachment),
            )?;

        self.smtp.send(&email)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MailerConfig {
        MailerConfig {
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: 465,
            username: "reports".to_string(),
            password: "secret".to_string(),
            from: "Reports <reports@example.com>".to_string(),
        }
    }

    #[test]
    fn mailer_builds_from_explicit_config() {
        assert!(Mailer::new(&config()).is_ok());
    }

    #[test]
    fn bad_from_address_is_rejected() {
        let mut bad = config();
        bad.from = "not an address".to_string();
        assert!(matches!(Mailer::new(&bad), Err(MailError::Address(_))));
    }
}
