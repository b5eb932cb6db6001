// ABOUTME: Outbound email notifications for contact-form submissions
// ABOUTME: Best-effort SMTP delivery; failures are logged and never fail the request
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! # Notifications
//!
//! SMTP notifications sent when a contact form is submitted: one to the
//! configured admin address, and optionally an auto-reply to the submitter.
//! Mail is disabled entirely when no SMTP configuration is present, and a
//! delivery failure never fails the originating request.

use crate::config::SmtpConfig;
use crate::models::ContactMessage;
use lettre::{
    message::header::ContentType,
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

/// Contact-form mail sender
#[derive(Clone)]
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    config: SmtpConfig,
}

impl Mailer {
    /// Build a mailer from SMTP configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the relay address is invalid.
    pub fn new(config: SmtpConfig) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self { transport, config })
    }

    /// Notify the admin address about a new submission, then auto-reply to
    /// the submitter when enabled. Both sends are best-effort.
    pub async fn notify_contact_submission(&self, message: &ContactMessage) -> bool {
        let notified = self.send_admin_notification(message).await;

        if self.config.auto_reply_enabled {
            self.send_auto_reply(message).await;
        }

        notified
    }

    async fn send_admin_notification(&self, message: &ContactMessage) -> bool {
        let body = format!(
            "New contact form submission\n\n\
             From: {}\n\
             Subject: {}\n\
             Phone: {}\n\
             Company: {}\n\
             Project type: {}\n\
             Budget: {}\n\
             Timeline: {}\n\n\
             Message:\n{}\n\n\
             Contact ID: {}\n\
             Submitted: {}\n",
            message.full_contact(),
            message.subject,
            message.phone.as_deref().unwrap_or("Not provided"),
            message.company.as_deref().unwrap_or("Not provided"),
            message.project_type.as_deref().unwrap_or("Not specified"),
            message.budget.as_deref().unwrap_or("Not specified"),
            message.timeline.as_deref().unwrap_or("Not specified"),
            message.message,
            message.id,
            message.created_at.to_rfc3339(),
        );

        let subject = format!("New Contact Form Submission: {}", message.subject);
        self.send(&self.config.admin_email, &subject, body).await
    }

    async fn send_auto_reply(&self, message: &ContactMessage) -> bool {
        let body = format!(
            "Hi {},\n\n\
             Thank you for your message. I've received your inquiry and will \
             get back to you within 24 hours.\n\n\
             Your message:\n\
             Subject: {}\n\
             {}\n\n\
             This is an automated response. Please do not reply to this email.\n",
            message.name, message.subject, message.message,
        );

        self.send(&message.email, "Thank you for your message!", body)
            .await
    }

    async fn send(&self, to: &str, subject: &str, body: String) -> bool {
        let email = match Message::builder()
            .from(match self.config.username.parse() {
                Ok(mailbox) => mailbox,
                Err(e) => {
                    tracing::warn!("invalid sender address {}: {e}", self.config.username);
                    return false;
                }
            })
            .to(match to.parse() {
                Ok(mailbox) => mailbox,
                Err(e) => {
                    tracing::warn!("invalid recipient address {to}: {e}");
                    return false;
                }
            })
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
        {
            Ok(email) => email,
            Err(e) => {
                tracing::warn!("failed to build notification email: {e}");
                return false;
            }
        };

        match self.transport.send(email).await {
            Ok(_) => {
                tracing::info!("notification email sent to {to}");
                true
            }
            Err(e) => {
                tracing::warn!("notification email to {to} failed: {e}");
                false
            }
        }
    }
}
