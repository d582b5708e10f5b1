//! Ticket, status history and parts repository.
//!
//! Status updates and history appends are deliberately separate calls:
//! the caller decides what to do when the second one fails.

use chrono::Utc;
use sqlx::SqlitePool;

use bikeshop_core::result::AppResult;
use bikeshop_core::types::{PageRequest, PageResponse};
use bikeshop_entity::ticket::{
    CreateTicket, NewHistoryEntry, PartStatus, Ticket, TicketPart, TicketStatus,
    TicketStatusHistory,
};

use super::{db_error, db_error_or_conflict};

/// A ticket joined with the names shown in workshop listings.
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct TicketSummary {
    pub id: i64,
    pub booking_id: i64,
    pub tracking_code: String,
    pub status: TicketStatus,
    pub technician_id: Option<i64>,
    pub technician_name: Option<String>,
    pub customer_name: String,
    pub updated_at: chrono::DateTime<Utc>,
}

/// Listing filter for the workshop ticket table.
#[derive(Debug, Clone, Copy, Default)]
pub struct TicketFilter {
    pub status: Option<TicketStatus>,
    pub technician_id: Option<i64>,
}

const SUMMARY_SELECT: &str = "SELECT t.id, t.booking_id, t.tracking_code, t.status, t.technician_id,
        tech.name AS technician_name, cust.name AS customer_name, t.updated_at
 FROM tickets t
 JOIN bookings b ON b.id = t.booking_id
 JOIN users cust ON cust.id = b.customer_id
 LEFT JOIN users tech ON tech.id = t.technician_id";

const FILTER_WHERE: &str =
    "WHERE (?1 IS NULL OR t.status = ?1) AND (?2 IS NULL OR t.technician_id = ?2)";

#[derive(Debug, Clone)]
pub struct TicketRepository {
    pool: SqlitePool,
}

impl TicketRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a ticket in `received`.
    pub async fn create(&self, data: &CreateTicket) -> AppResult<Ticket> {
        let now = Utc::now();
        sqlx::query_as::<_, Ticket>(
            "INSERT INTO tickets (booking_id, technician_id, tracking_code, qr_code, status, notes, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(data.booking_id)
        .bind(data.technician_id)
        .bind(&data.tracking_code)
        .bind(data.qr_code.as_deref())
        .bind(TicketStatus::Received)
        .bind(&data.notes)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error_or_conflict(
            "Failed to create ticket",
            "Tracking code already in use",
        ))
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Ticket>> {
        sqlx::query_as::<_, Ticket>("SELECT * FROM tickets WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find ticket"))
    }

    pub async fn find_by_tracking_code(&self, code: &str) -> AppResult<Option<Ticket>> {
        sqlx::query_as::<_, Ticket>("SELECT * FROM tickets WHERE tracking_code = ?")
            .bind(code.trim().to_lowercase())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find ticket by tracking code"))
    }

    pub async fn find_by_booking(&self, booking_id: i64) -> AppResult<Option<Ticket>> {
        sqlx::query_as::<_, Ticket>(
            "SELECT * FROM tickets WHERE booking_id = ? ORDER BY id DESC LIMIT 1",
        )
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find ticket by booking"))
    }

    /// Paginated listing, most recently touched first.
    pub async fn list(
        &self,
        filter: TicketFilter,
        page: PageRequest,
    ) -> AppResult<PageResponse<TicketSummary>> {
        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM tickets t {FILTER_WHERE}"
        ))
        .bind(filter.status)
        .bind(filter.technician_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to count tickets"))?;

        let items = sqlx::query_as::<_, TicketSummary>(&format!(
            "{SUMMARY_SELECT} {FILTER_WHERE} ORDER BY t.updated_at DESC, t.id DESC LIMIT ?3 OFFSET ?4"
        ))
        .bind(filter.status)
        .bind(filter.technician_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list tickets"))?;

        Ok(PageResponse::new(items, page, total))
    }

    /// Tickets for bookings owned by one customer.
    pub async fn list_by_customer(&self, customer_id: i64) -> AppResult<Vec<TicketSummary>> {
        sqlx::query_as::<_, TicketSummary>(&format!(
            "{SUMMARY_SELECT} WHERE b.customer_id = ? ORDER BY t.updated_at DESC"
        ))
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list customer tickets"))
    }

    pub async fn count_by_status(&self, status: TicketStatus) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM tickets WHERE status = ?")
            .bind(status)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count tickets by status"))
    }

    /// Set the status and bump `updated_at`. Returns whether a row changed.
    pub async fn update_status(&self, id: i64, status: TicketStatus) -> AppResult<bool> {
        let result = sqlx::query("UPDATE tickets SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to update ticket status"))?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn update_notes(&self, id: i64, notes: &str) -> AppResult<()> {
        sqlx::query("UPDATE tickets SET notes = ?, updated_at = ? WHERE id = ?")
            .bind(notes)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to update ticket notes"))?;
        Ok(())
    }

    pub async fn assign_technician(&self, id: i64, technician_id: i64) -> AppResult<()> {
        sqlx::query("UPDATE tickets SET technician_id = ?, updated_at = ? WHERE id = ?")
            .bind(technician_id)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to assign technician"))?;
        Ok(())
    }

    /// Append one history row.
    pub async fn append_history(&self, entry: &NewHistoryEntry) -> AppResult<TicketStatusHistory> {
        sqlx::query_as::<_, TicketStatusHistory>(
            "INSERT INTO ticket_status_history (ticket_id, status, changed_by, notes, created_at)
             VALUES (?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(entry.ticket_id)
        .bind(entry.status)
        .bind(entry.changed_by)
        .bind(&entry.notes)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to append ticket history"))
    }

    /// History rows for a ticket in insertion order.
    pub async fn list_history(&self, ticket_id: i64) -> AppResult<Vec<TicketStatusHistory>> {
        sqlx::query_as::<_, TicketStatusHistory>(
            "SELECT * FROM ticket_status_history WHERE ticket_id = ? ORDER BY id ASC",
        )
        .bind(ticket_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list ticket history"))
    }

    pub async fn add_part(&self, ticket_id: i64, name: &str) -> AppResult<TicketPart> {
        sqlx::query_as::<_, TicketPart>(
            "INSERT INTO ticket_parts (ticket_id, name, status, created_at)
             VALUES (?, ?, ?, ?) RETURNING *",
        )
        .bind(ticket_id)
        .bind(name)
        .bind(PartStatus::Pending)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to add ticket part"))
    }

    pub async fn find_part(&self, id: i64) -> AppResult<Option<TicketPart>> {
        sqlx::query_as::<_, TicketPart>("SELECT * FROM ticket_parts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find ticket part"))
    }

    pub async fn list_parts(&self, ticket_id: i64) -> AppResult<Vec<TicketPart>> {
        sqlx::query_as::<_, TicketPart>(
            "SELECT * FROM ticket_parts WHERE ticket_id = ? ORDER BY id ASC",
        )
        .bind(ticket_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list ticket parts"))
    }

    pub async fn set_part_status(&self, id: i64, status: PartStatus) -> AppResult<()> {
        sqlx::query("UPDATE ticket_parts SET status = ? WHERE id = ?")
            .bind(status)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to update ticket part"))?;
        Ok(())
    }

    pub async fn delete_part(&self, id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM ticket_parts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete ticket part"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_support::memory_pool;
    use crate::repositories::{BookingRepository, UserRepository};
    use bikeshop_entity::booking::{BookingStatus, CreateBooking};
    use bikeshop_entity::user::{CreateUser, Role};

    async fn seed_ticket(pool: &SqlitePool) -> Ticket {
        let customer = UserRepository::new(pool.clone())
            .create(&CreateUser {
                email: "c@example.com".to_string(),
                password_hash: "x".to_string(),
                name: "Carla".to_string(),
                phone: String::new(),
                role: Role::Customer,
            })
            .await
            .unwrap();
        let booking = BookingRepository::new(pool.clone())
            .create(&CreateBooking {
                customer_id: customer.id,
                service_id: None,
                bicycle_id: None,
                scheduled_at: Utc::now(),
                status: BookingStatus::Pending,
                notes: String::new(),
            })
            .await
            .unwrap();
        TicketRepository::new(pool.clone())
            .create(&CreateTicket {
                booking_id: booking.id,
                technician_id: None,
                tracking_code: "0a1b2c3d".to_string(),
                qr_code: Some(vec![1, 2, 3]),
                notes: String::new(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_and_lookup_by_code() {
        let pool = memory_pool().await;
        let ticket = seed_ticket(&pool).await;
        assert_eq!(ticket.status, TicketStatus::Received);

        let repo = TicketRepository::new(pool);
        let found = repo.find_by_tracking_code("0A1B2C3D").await.unwrap().unwrap();
        assert_eq!(found.id, ticket.id);
        assert_eq!(found.qr_code.as_deref(), Some(&[1u8, 2, 3][..]));
        assert!(repo.find_by_tracking_code("ffffffff").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_filters_by_status() {
        let pool = memory_pool().await;
        let ticket = seed_ticket(&pool).await;
        let repo = TicketRepository::new(pool);

        let received = TicketFilter {
            status: Some(TicketStatus::Received),
            technician_id: None,
        };
        let page = repo.list(received, PageRequest::default()).await.unwrap();
        assert_eq!(page.total_items, 1);
        assert_eq!(page.items[0].customer_name, "Carla");

        repo.update_status(ticket.id, TicketStatus::Diagnosing)
            .await
            .unwrap();
        let page = repo.list(received, PageRequest::default()).await.unwrap();
        assert_eq!(page.total_items, 0);
    }

    #[tokio::test]
    async fn test_history_in_insertion_order() {
        let pool = memory_pool().await;
        let ticket = seed_ticket(&pool).await;
        let repo = TicketRepository::new(pool);
        for status in [TicketStatus::Received, TicketStatus::Diagnosing] {
            repo.append_history(&NewHistoryEntry {
                ticket_id: ticket.id,
                status,
                changed_by: None,
                notes: String::new(),
            })
            .await
            .unwrap();
        }
        let history = repo.list_history(ticket.id).await.unwrap();
        let statuses: Vec<_> = history.iter().map(|h| h.status).collect();
        assert_eq!(statuses, vec![TicketStatus::Received, TicketStatus::Diagnosing]);
    }
}
