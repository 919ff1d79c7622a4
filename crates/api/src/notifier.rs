//! Best-effort booking notification emails via SMTP.
//!
//! [`Notifier`] wraps the `lettre` async SMTP transport. Configuration
//! is loaded from environment variables; if `SMTP_HOST` is not set,
//! [`EmailConfig::from_env`] returns `None` and sends become logged
//! no-ops. Delivery failures are never allowed to affect the operation
//! that triggered them: the booking handler fires these from a spawned
//! task and the reservation stands regardless.

use invigil_db::models::booking::Booking;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@invigil.local";

/// Configuration for the SMTP email delivery service.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 587).
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    /// Optional SMTP username.
    pub smtp_user: Option<String>,
    /// Optional SMTP password.
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set, signalling that email
    /// delivery is not configured and should be skipped.
    ///
    /// | Variable        | Required | Default                  |
    /// |-----------------|----------|--------------------------|
    /// | `SMTP_HOST`     | yes      | (none)                   |
    /// | `SMTP_PORT`     | no       | `587`                    |
    /// | `SMTP_FROM`     | no       | `noreply@invigil.local`  |
    /// | `SMTP_USER`     | no       | (none)                   |
    /// | `SMTP_PASSWORD` | no       | (none)                   |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

/// Sends booking notification emails.
pub struct Notifier {
    config: Option<EmailConfig>,
    staff_email: Option<String>,
}

impl Notifier {
    /// Create a notifier. With `config = None`, sends are logged no-ops.
    pub fn new(config: Option<EmailConfig>, staff_email: Option<String>) -> Self {
        Self {
            config,
            staff_email,
        }
    }

    /// Dispatch both booking notifications, logging failures.
    ///
    /// Intended to be called from a spawned task after the reservation
    /// has committed; nothing here can fail the booking.
    pub async fn notify_booking(&self, booking: &Booking) {
        if let Err(e) = self.booking_confirmation(booking).await {
            tracing::warn!(
                booking_id = booking.id,
                to = %booking.candidate_email,
                error = %e,
                "Candidate confirmation email failed"
            );
        }
        if let Err(e) = self.staff_booking_alert(booking).await {
            tracing::warn!(booking_id = booking.id, error = %e, "Staff alert email failed");
        }
    }

    /// Confirmation email to the candidate with the booked date/time.
    pub async fn booking_confirmation(&self, booking: &Booking) -> Result<(), EmailError> {
        let subject = "Interview slot confirmed".to_string();
        let body = format!(
            "Hi {},\n\nYour interview slot is confirmed.\n\nDate: {}\nTime: {}\n\nSee you there!",
            booking.candidate_name, booking.slot_date, booking.time_slot
        );
        self.send(&booking.candidate_email, subject, body).await
    }

    /// Alert email to staff with the candidate's contact details.
    pub async fn staff_booking_alert(&self, booking: &Booking) -> Result<(), EmailError> {
        let Some(staff) = &self.staff_email else {
            tracing::debug!("No staff email configured; skipping booking alert");
            return Ok(());
        };
        let subject = format!("New interview booking: {}", booking.candidate_name);
        let body = format!(
            "A new interview slot was booked.\n\nName: {}\nEmail: {}\nPhone: {}\nDate: {}\nTime: {}",
            booking.candidate_name,
            booking.candidate_email,
            booking.candidate_phone.as_deref().unwrap_or("-"),
            booking.slot_date,
            booking.time_slot
        );
        self.send(staff, subject, body).await
    }

    /// Send one plain-text email via SMTP.
    async fn send(&self, to_email: &str, subject: String, body: String) -> Result<(), EmailError> {
        use lettre::{
            message::header::ContentType, transport::smtp::authentication::Credentials,
            AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
        };

        let Some(config) = &self.config else {
            tracing::debug!(to = to_email, "Email not configured; skipping send");
            return Ok(());
        };

        let email = Message::builder()
            .from(config.from_address.parse()?)
            .to(to_email.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| EmailError::Build(e.to_string()))?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
                .port(config.smtp_port);

        if let (Some(user), Some(pass)) = (&config.smtp_user, &config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let mailer = transport_builder.build();
        mailer.send(email).await?;

        tracing::info!(to = to_email, "Notification email sent");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_returns_none_without_smtp_host() {
        // Ensure SMTP_HOST is not set in the test environment.
        std::env::remove_var("SMTP_HOST");
        assert!(EmailConfig::from_env().is_none());
    }

    #[test]
    fn email_error_display_build() {
        let err = EmailError::Build("missing body".to_string());
        assert_eq!(err.to_string(), "Email build error: missing body");
    }

    #[tokio::test]
    async fn unconfigured_notifier_sends_are_noops() {
        let notifier = Notifier::new(None, Some("staff@example.com".into()));
        let booking = Booking {
            id: 1,
            candidate_id: "c-1".into(),
            candidate_name: "Jane".into(),
            candidate_email: "jane@example.com".into(),
            candidate_phone: None,
            slot_date: chrono::NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            time_slot: "10:00 AM - 10:30 AM".into(),
            created_at: chrono::Utc::now(),
        };
        assert!(notifier.booking_confirmation(&booking).await.is_ok());
        assert!(notifier.staff_booking_alert(&booking).await.is_ok());
    }
}
