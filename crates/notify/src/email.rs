use async_trait::async_trait;
use lettre::message::{Message, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use momentum_core::alert::entity::Alert;
use momentum_core::config::SmtpConfig;
use momentum_core::notify::error::NotifyError;
use momentum_core::notify::port::AlertNotifier;
use tracing::info;

/// Subject line of every alert email.
pub const SUBJECT: &str = "Price Alert Triggered";

/// # Summary
/// Renders the HTML body of an alert email.
///
/// Target and current values are printed with two decimals.
pub fn render_body(alert: &Alert, current_value: f64) -> String {
    format!(
        "<h1>Price Alert Triggered</h1>\n\
         <p>Your alert has been triggered:</p>\n\
         <ul>\n\
         <li>Indicator: {}</li>\n\
         <li>Direction: {}</li>\n\
         <li>Target Value: {:.2}</li>\n\
         <li>Current Value: {:.2}</li>\n\
         </ul>\n",
        alert.indicator, alert.direction, alert.value, current_value
    )
}

/// # Summary
/// A notifier that emails the alert owner via SMTP.
///
/// # Invariants
/// - The connection is upgraded with STARTTLS; plaintext fallback is never used.
/// - The `AsyncSmtpTransport` is reused for every notification.
/// - The recipient is always `alert.email`.
pub struct EmailNotifier {
    /// The asynchronous SMTP transport.
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    /// The sender's email address.
    from: String,
}

impl EmailNotifier {
    /// # Summary
    /// Creates a new `EmailNotifier` from SMTP settings.
    ///
    /// # Logic
    /// 1. Sets up the SMTP credentials.
    /// 2. Configures a STARTTLS relay on the configured port.
    ///
    /// No connection is opened until the first send.
    ///
    /// # Returns
    /// * A new `EmailNotifier`, or `NotifyError::Config` for an unusable host.
    pub fn new(config: &SmtpConfig) -> Result<Self, NotifyError> {
        let creds = Credentials::new(config.username.clone(), config.password.clone());

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| NotifyError::Config(format!("Invalid SMTP host: {}", e)))?
            .port(config.port)
            .credentials(creds)
            .build();

        Ok(Self {
            mailer,
            from: config.from.clone(),
        })
    }

    /// # Summary
    /// Builds the email for a triggered alert without sending it.
    ///
    /// # Returns
    /// * `NotifyError::Config` for malformed addresses, `NotifyError::Platform`
    ///   if the message cannot be assembled.
    pub fn build_message(&self, alert: &Alert, current_value: f64) -> Result<Message, NotifyError> {
        Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|e| NotifyError::Config(format!("Invalid from address: {}", e)))?,
            )
            .to(alert
                .email
                .parse()
                .map_err(|e| NotifyError::Config(format!("Invalid to address: {}", e)))?)
            .subject(SUBJECT)
            .header(ContentType::TEXT_HTML)
            .body(render_body(alert, current_value))
            .map_err(|e| NotifyError::Platform(format!("Failed to build email: {}", e)))
    }
}

#[async_trait]
impl AlertNotifier for EmailNotifier {
    async fn send(&self, alert: &Alert, current_value: f64) -> Result<(), NotifyError> {
        let email = self.build_message(alert, current_value)?;

        self.mailer
            .send(email)
            .await
            .map_err(|e| NotifyError::Network(format!("SMTP error: {}", e)))?;

        info!(alert_id = alert.id, to = %alert.email, "Alert email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use momentum_core::alert::entity::{AlertStatus, Direction, IndicatorKind};

    fn alert(email: &str) -> Alert {
        Alert {
            id: 1,
            user_id: 7,
            email: email.to_string(),
            value: 65.0,
            direction: Direction::Up,
            indicator: IndicatorKind::Rsi,
            status: AlertStatus::Triggered,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn notifier(from: &str) -> EmailNotifier {
        EmailNotifier::new(&SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            username: "user".to_string(),
            password: "secret".to_string(),
            from: from.to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_body_lists_fields_with_two_decimals() {
        let body = render_body(&alert("a@example.com"), 70.456);
        assert!(body.contains("<li>Indicator: RSI</li>"));
        assert!(body.contains("<li>Direction: UP</li>"));
        assert!(body.contains("<li>Target Value: 65.00</li>"));
        assert!(body.contains("<li>Current Value: 70.46</li>"));
    }

    #[tokio::test]
    async fn test_message_is_addressed_to_alert_owner() {
        let message = notifier("alerts@example.com")
            .build_message(&alert("owner@example.com"), 70.0)
            .unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("To: owner@example.com"));
        assert!(raw.contains("Subject: Price Alert Triggered"));
        assert!(raw.contains("text/html"));
    }

    #[tokio::test]
    async fn test_bad_addresses_are_config_errors() {
        let result = notifier("not-an-address").build_message(&alert("owner@example.com"), 1.0);
        assert!(matches!(result, Err(NotifyError::Config(_))));

        let result = notifier("alerts@example.com").build_message(&alert("nobody"), 1.0);
        assert!(matches!(result, Err(NotifyError::Config(_))));
    }
}
