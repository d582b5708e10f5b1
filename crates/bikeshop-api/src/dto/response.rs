//! JSON response DTOs.

use chrono::{DateTime, Utc};
use serde::Serialize;

use bikeshop_entity::ticket::Ticket;

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy",
            timestamp: Utc::now(),
        }
    }
}

/// Body of `GET /health/detailed`.
#[derive(Debug, Clone, Serialize)]
pub struct DetailedHealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: &'static str,
}

/// Body of `GET /api/tickets/{id}/status`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketStatusResponse {
    pub id: i64,
    pub tracking_code: String,
    pub status: String,
    pub status_label: &'static str,
    pub updated_at: DateTime<Utc>,
}

impl From<&Ticket> for TicketStatusResponse {
    fn from(ticket: &Ticket) -> Self {
        Self {
            id: ticket.id,
            tracking_code: ticket.tracking_code.clone(),
            status: ticket.status.as_str().to_string(),
            status_label: ticket.status.label(),
            updated_at: ticket.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_status_is_camel_case() {
        let response = TicketStatusResponse {
            id: 3,
            tracking_code: "abcd1234".into(),
            status: "ready".into(),
            status_label: "Ready",
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["trackingCode"], "abcd1234");
        assert_eq!(json["statusLabel"], "Ready");
        assert!(json.get("updatedAt").is_some());
    }

    #[test]
    fn test_health_body() {
        let json = serde_json::to_value(HealthResponse::healthy()).unwrap();
        assert_eq!(json["status"], "healthy");
        assert!(json["timestamp"].is_string());
    }
}
