//! Alert delivery.
//!
//! The check cycle hands an [`Alert`] to a [`Notifier`] at most once.  How
//! the alert travels is the notifier's business: [`SmtpNotifier`] mails it
//! (and, through a carrier gateway address, texts it), [`LogNotifier`] only
//! writes it to the log for dry runs.

use std::time::Duration;

use chrono::{DateTime, Local};
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::info;

use crate::error::NotificationError;

pub const SUBJECT: &str = "\u{1F6A8} Middle Fork Salmon Permit AVAILABLE!";

const SMTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Everything a recipient needs to act on an opening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    /// Human-readable dates, ascending.
    pub dates: Vec<String>,
    pub booking_url: String,
    pub checked_at: DateTime<Local>,
}

impl Alert {
    pub fn new(dates: Vec<String>, booking_url: impl Into<String>, checked_at: DateTime<Local>) -> Self {
        Self {
            dates,
            booking_url: booking_url.into(),
            checked_at,
        }
    }

    pub fn subject(&self) -> &'static str {
        SUBJECT
    }

    /// Plain-text message body.
    pub fn body(&self) -> String {
        format!(
            "\u{1F389} Available Dates:\n{}\n\nBook here: {}\nChecked: {}",
            self.dates.join("\n"),
            self.booking_url,
            self.checked_at.format("%Y-%m-%d %H:%M:%S"),
        )
    }
}

/// Delivers alerts somewhere a human will see them.
pub trait Notifier {
    fn name(&self) -> &str;

    fn notify(&self, alert: &Alert) -> Result<(), NotificationError>;
}

// ---------------------------------------------------------------------------
// SMTP
// ---------------------------------------------------------------------------

/// Connection and addressing details for [`SmtpNotifier`].
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    /// Sender address, also used as the SMTP login.
    pub username: String,
    pub password: String,
    /// Primary recipient followed by any extra addresses (e.g. SMS gateway).
    pub recipients: Vec<String>,
}

/// Sends alerts as plain-text mail over STARTTLS.
pub struct SmtpNotifier {
    settings: SmtpSettings,
}

impl SmtpNotifier {
    pub fn new(settings: SmtpSettings) -> Self {
        Self { settings }
    }

    /// Build the message without sending it.
    pub fn build_message(&self, alert: &Alert) -> Result<Message, NotificationError> {
        let from: Mailbox = self.settings.username.parse()?;
        let mut builder = Message::builder().from(from).subject(alert.subject());
        for recipient in &self.settings.recipients {
            builder = builder.to(recipient.parse()?);
        }
        Ok(builder.header(ContentType::TEXT_PLAIN).body(alert.body())?)
    }
}

impl Notifier for SmtpNotifier {
    fn name(&self) -> &str {
        "smtp"
    }

    fn notify(&self, alert: &Alert) -> Result<(), NotificationError> {
        let message = self.build_message(alert)?;

        let transport = SmtpTransport::starttls_relay(&self.settings.host)?
            .port(self.settings.port)
            .credentials(Credentials::new(
                self.settings.username.clone(),
                self.settings.password.clone(),
            ))
            .timeout(Some(SMTP_TIMEOUT))
            .build();

        transport.send(&message)?;
        info!(recipients = self.settings.recipients.len(), "notification sent");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Log only
// ---------------------------------------------------------------------------

/// Writes the alert to the log instead of delivering it.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn name(&self) -> &str {
        "log"
    }

    fn notify(&self, alert: &Alert) -> Result<(), NotificationError> {
        info!(subject = alert.subject(), "alert (not delivered):\n{}", alert.body());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
