//! Payment collection for approved quotes.
//!
//! No real provider is integrated. The mock provider accepts everything.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use bikeshop_core::result::AppResult;

#[derive(Debug, Clone)]
pub struct PaymentIntent {
    pub id: String,
    /// Amount in minor units.
    pub amount: i64,
    pub currency: String,
    pub description: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct PaymentResult {
    pub success: bool,
    pub payment_id: String,
    pub status: String,
}

#[derive(Debug, Clone)]
pub struct RefundResult {
    pub success: bool,
    pub refund_id: String,
    pub amount: i64,
}

#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn create_intent(
        &self,
        amount: i64,
        currency: &str,
        description: &str,
    ) -> AppResult<PaymentIntent>;

    async fn confirm(&self, intent_id: &str) -> AppResult<PaymentResult>;

    async fn refund(&self, payment_id: &str, amount: i64) -> AppResult<RefundResult>;

    async fn status(&self, payment_id: &str) -> AppResult<String>;
}

#[derive(Debug, Clone, Default)]
pub struct MockPaymentProvider;

fn mock_id(prefix: &str) -> String {
    format!("{prefix}_{}", Uuid::new_v4().simple())
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_intent(
        &self,
        amount: i64,
        currency: &str,
        description: &str,
    ) -> AppResult<PaymentIntent> {
        Ok(PaymentIntent {
            id: mock_id("mock_pi"),
            amount,
            currency: currency.to_string(),
            description: description.to_string(),
            status: "requires_payment".to_string(),
            created_at: Utc::now(),
        })
    }

    async fn confirm(&self, intent_id: &str) -> AppResult<PaymentResult> {
        Ok(PaymentResult {
            success: true,
            payment_id: intent_id.to_string(),
            status: "succeeded".to_string(),
        })
    }

    async fn refund(&self, _payment_id: &str, amount: i64) -> AppResult<RefundResult> {
        Ok(RefundResult {
            success: true,
            refund_id: mock_id("mock_re"),
            amount,
        })
    }

    async fn status(&self, _payment_id: &str) -> AppResult<String> {
        Ok("succeeded".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_intent_then_confirm() {
        let provider = MockPaymentProvider;
        let intent = provider.create_intent(21000, "CLP", "Quote #1").await.unwrap();
        assert!(intent.id.starts_with("mock_pi_"));
        let result = provider.confirm(&intent.id).await.unwrap();
        assert!(result.success);
        assert_eq!(result.payment_id, intent.id);
    }
}
