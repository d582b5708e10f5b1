//! Customer notifications over email and SMS.
//!
//! Only mock providers exist; they log and succeed. The composite notifier
//! skips any channel switched off in the feature flags.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use bikeshop_core::config::business::FeaturesConfig;
use bikeshop_core::result::AppResult;
use bikeshop_entity::ticket::Ticket;
use bikeshop_entity::user::User;

#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct SmsMessage {
    pub phone: String,
    pub body: String,
}

#[async_trait]
pub trait EmailProvider: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> AppResult<()>;
}

#[async_trait]
pub trait SmsProvider: Send + Sync {
    async fn send(&self, message: &SmsMessage) -> AppResult<()>;
}

#[derive(Debug, Clone, Default)]
pub struct MockEmailProvider;

#[async_trait]
impl EmailProvider for MockEmailProvider {
    async fn send(&self, message: &EmailMessage) -> AppResult<()> {
        info!(to = %message.to, subject = %message.subject, "Email skipped (mock provider)");
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockSmsProvider;

#[async_trait]
impl SmsProvider for MockSmsProvider {
    async fn send(&self, message: &SmsMessage) -> AppResult<()> {
        info!(phone = %message.phone, "SMS skipped (mock provider)");
        Ok(())
    }
}

/// Fans a notification out to every enabled channel.
#[derive(Clone)]
pub struct Notifier {
    email: Arc<dyn EmailProvider>,
    sms: Arc<dyn SmsProvider>,
    email_enabled: bool,
    sms_enabled: bool,
}

impl Notifier {
    pub fn new(
        email: Arc<dyn EmailProvider>,
        sms: Arc<dyn SmsProvider>,
        features: &FeaturesConfig,
    ) -> Self {
        Self {
            email,
            sms,
            email_enabled: features.email_notifications,
            sms_enabled: features.sms,
        }
    }

    /// Notifier backed by the mock providers.
    pub fn mock(features: &FeaturesConfig) -> Self {
        Self::new(Arc::new(MockEmailProvider), Arc::new(MockSmsProvider), features)
    }

    /// Tell the customer their bicycle can be picked up.
    ///
    /// Delivery failures are logged; they never fail the status change.
    pub async fn ticket_ready(&self, customer: &User, ticket: &Ticket, tracking_url: &str) {
        if self.email_enabled && !customer.email.is_empty() {
            let message = EmailMessage {
                to: customer.email.clone(),
                subject: format!("Your bicycle is ready ({})", ticket.tracking_code),
                body: format!(
                    "Hello {}, your bicycle is ready for pickup. Track it at {tracking_url}",
                    customer.name
                ),
            };
            if let Err(e) = self.email.send(&message).await {
                warn!(ticket_id = ticket.id, error = %e, "Ready email failed");
            }
        }

        if self.sms_enabled && !customer.phone.is_empty() {
            let message = SmsMessage {
                phone: customer.phone.clone(),
                body: format!("Your bicycle is ready: {tracking_url}"),
            };
            if let Err(e) = self.sms.send(&message).await {
                warn!(ticket_id = ticket.id, error = %e, "Ready SMS failed");
            }
        }
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("email_enabled", &self.email_enabled)
            .field("sms_enabled", &self.sms_enabled)
            .finish()
    }
}
