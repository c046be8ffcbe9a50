use chrono::{DateTime, Utc};
use database::entities::ticket;
use models::ticket_status::TicketStatus;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct TicketResponse {
    pub id: i64,
    pub course_id: i64,
    #[schema(value_type = String, example = "paid")]
    pub status: TicketStatus,
    /// Course price at the time of purchase
    pub price: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ticket::Model> for TicketResponse {
    fn from(ticket: ticket::Model) -> Self {
        Self {
            id: ticket.id,
            course_id: ticket.course_id,
            status: ticket.status,
            price: ticket.price,
            created_at: ticket.created_at,
            updated_at: ticket.updated_at,
        }
    }
}
