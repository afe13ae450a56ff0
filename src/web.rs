use excel2image::app;
use excel2image::mailer::{Mailer, MailerConfig};

/// Main entry point for the web application
///
/// Initializes logging, builds the mailer from environment configuration
/// and starts the upload server.
///
/// # Environment
/// * `SMTP_HOST`, `SMTP_USERNAME`, `SMTP_PASSWORD`, `MAIL_FROM` - required
///   mailer settings (`SMTP_PORT` optional, default 465)
/// * `BIND_ADDR` - listen address, default `127.0.0.1:3000`
///
/// # Returns
/// * `Result<(), Box<dyn std::error::Error>>` - Success or error object
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = MailerConfig::from_env()?;
    let mailer = Mailer::new(&config)?;

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());

    app::run(&addr, mailer).await
}
