use crate::{
    entities::ticket,
    error::{RepositoryError, RepositoryResult},
    repositories::{CourseRepository, TicketRepository},
};
use chrono::Utc;
use log::info;
use models::ticket_status::TicketStatus;
use sea_orm::{
    ActiveValue::Set, DatabaseConnection, IntoActiveModel, SqlErr, TransactionTrait,
};

/// Ticket purchase and cancellation, each in its own transaction
pub struct EnrollmentService;

impl EnrollmentService {
    /// Pays for the user's ticket to the course at the current course price.
    ///
    /// The user's ticket row is locked for the duration of the transaction so
    /// concurrent purchases of the same course by the same user serialize.
    pub async fn purchase(
        db: &DatabaseConnection,
        course_id: i64,
        user_id: i64,
    ) -> RepositoryResult<ticket::Model> {
        let txn = db.begin().await?;

        let course = CourseRepository::new(&txn)
            .find_by_id(course_id, true)
            .await?
            .ok_or_else(|| {
                RepositoryError::NotFound(format!("Undefined course with id {course_id}"))
            })?;

        let tickets = TicketRepository::new(&txn);
        let existing = tickets.ticket_for_course_to_update(course_id, user_id).await?;

        let mut active = match existing {
            Some(ticket) if ticket.status.is_active() => {
                return Err(RepositoryError::Conflict(format!(
                    "Course {course_id} is already paid"
                )));
            }
            Some(ticket) => ticket.into_active_model(),
            None => ticket::ActiveModel {
                user_id: Set(user_id),
                course_id: Set(course_id),
                created_at: Set(Utc::now()),
                ..Default::default()
            },
        };
        active.status = Set(TicketStatus::Paid);
        active.price = Set(course.price);

        let ticket = tickets.store(active).await.map_err(|e| match e {
            // Another transaction inserted the ticket first
            RepositoryError::Db(err)
                if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) =>
            {
                RepositoryError::Conflict(format!("Course {course_id} is already being purchased"))
            }
            other => other,
        })?;

        txn.commit().await?;

        info!("User {user_id} paid ticket {} for course {course_id}", ticket.id);
        Ok(ticket)
    }

    /// Cancels a ticket owned by the user
    pub async fn cancel(
        db: &DatabaseConnection,
        ticket_id: i64,
        user_id: i64,
    ) -> RepositoryResult<ticket::Model> {
        let txn = db.begin().await?;

        let tickets = TicketRepository::new(&txn);
        let ticket = tickets
            .find_by_id_to_update(ticket_id, user_id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("Undefined ticket with id {ticket_id}")))?;

        if ticket.status == TicketStatus::Cancelled {
            return Err(RepositoryError::Conflict(format!(
                "Ticket {ticket_id} is already cancelled"
            )));
        }

        let mut active = ticket.into_active_model();
        active.status = Set(TicketStatus::Cancelled);
        let ticket = tickets.store(active).await?;

        txn.commit().await?;

        info!("User {user_id} cancelled ticket {ticket_id}");
        Ok(ticket)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::entities::course;
    use chrono::TimeZone;
    use models::complexity::Complexity;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn course() -> course::Model {
        let start = Utc.with_ymd_and_hms(2023, 3, 10, 17, 0, 0).unwrap();
        course::Model {
            id: 2,
            teacher_id: 9,
            name: "Ceramics".to_owned(),
            description: "Hand building".to_owned(),
            price: Some(3000.0),
            complexity: Complexity::Easy,
            start_datetime: start,
            duration: 7200,
            created_at: start,
            updated_at: start,
        }
    }

    fn ticket(status: TicketStatus, price: Option<f64>) -> ticket::Model {
        let created_at = Utc.with_ymd_and_hms(2023, 3, 1, 9, 0, 0).unwrap();
        ticket::Model {
            id: 11,
            user_id: 4,
            course_id: 2,
            status,
            price,
            created_at,
            updated_at: created_at,
        }
    }

    #[tokio::test]
    async fn test_purchase_creates_paid_ticket() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![course()]])
            .append_query_results([Vec::<ticket::Model>::new()])
            .append_query_results([vec![ticket(TicketStatus::Paid, Some(3000.0))]])
            .into_connection();

        let ticket = EnrollmentService::purchase(&db, 2, 4).await.unwrap();
        assert_eq!(ticket.status, TicketStatus::Paid);
        assert_eq!(ticket.price, Some(3000.0));
    }

    #[tokio::test]
    async fn test_purchase_paid_ticket_conflicts() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![course()]])
            .append_query_results([vec![ticket(TicketStatus::Paid, Some(3000.0))]])
            .into_connection();

        let result = EnrollmentService::purchase(&db, 2, 4).await;
        assert!(matches!(result, Err(RepositoryError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_purchase_missing_course() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<course::Model>::new()])
            .into_connection();

        match EnrollmentService::purchase(&db, 2, 4).await {
            Err(RepositoryError::NotFound(message)) => {
                assert_eq!(message, "Undefined course with id 2")
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_cancel_ticket() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![ticket(TicketStatus::Paid, Some(3000.0))]])
            .append_query_results([vec![ticket(TicketStatus::Cancelled, Some(3000.0))]])
            .into_connection();

        let ticket = EnrollmentService::cancel(&db, 11, 4).await.unwrap();
        assert_eq!(ticket.status, TicketStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_cancel_twice_conflicts() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![ticket(TicketStatus::Cancelled, None)]])
            .into_connection();

        let result = EnrollmentService::cancel(&db, 11, 4).await;
        assert!(matches!(result, Err(RepositoryError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_cancel_foreign_ticket() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<ticket::Model>::new()])
            .into_connection();

        let result = EnrollmentService::cancel(&db, 11, 5).await;
        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
    }
}
