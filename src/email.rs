//!
//! # Notification Sink
//!
//! Best-effort outbound email. The provider sits behind the [`Mailer`] trait;
//! the default [`LogMailer`] just logs. Sends are spawned fire-and-forget from
//! the handlers: a slow or failing mailer can neither block nor fail the
//! request that triggered it.

use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()>;
}

/// Default sink: writes the message to the log instead of the wire.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        log::info!("email to {} [{}]: {}", to, subject, body);
        Ok(())
    }
}

fn welcome_message(name: &str) -> (&'static str, String) {
    (
        "Thanks for joining in",
        format!(
            "Welcome to the app {}!. Let me know how you get along with the app.",
            name
        ),
    )
}

fn cancellation_message(name: &str) -> (&'static str, String) {
    (
        "Thanks for using our app",
        format!(
            "Goodbye {}. We are sorry to see you leave, is there anything we could've done better? Let us know in the feedback",
            name
        ),
    )
}

pub fn spawn_welcome_email(mailer: Arc<dyn Mailer>, email: String, name: String) {
    actix_web::rt::spawn(async move {
        let (subject, body) = welcome_message(&name);
        if let Err(e) = mailer.send(&email, subject, &body).await {
            log::warn!("failed to send welcome email to {}: {}", email, e);
        }
    });
}

pub fn spawn_cancellation_email(mailer: Arc<dyn Mailer>, email: String, name: String) {
    actix_web::rt::spawn(async move {
        let (subject, body) = cancellation_message(&name);
        if let Err(e) = mailer.send(&email, subject, &body).await {
            log::warn!("failed to send cancellation email to {}: {}", email, e);
        }
    });
}
