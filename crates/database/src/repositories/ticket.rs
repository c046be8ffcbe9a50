use crate::{entities::ticket, error::RepositoryResult};
use models::validation::validate_price;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QuerySelect, Select, TryIntoModel, sea_query::LockType,
};

pub struct TicketRepository<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> TicketRepository<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn store(&self, ticket: ticket::ActiveModel) -> RepositoryResult<ticket::Model> {
        if let ActiveValue::Set(price) = &ticket.price {
            validate_price(*price)?;
        }

        Ok(ticket.save(self.conn).await?.try_into_model()?)
    }

    pub async fn ticket_for_course(
        &self,
        course_id: i64,
        user_id: i64,
    ) -> RepositoryResult<Option<ticket::Model>> {
        Ok(Self::course_ticket_query(course_id, user_id)
            .one(self.conn)
            .await?)
    }

    /// Locks the user's ticket for the course until the surrounding transaction ends
    pub async fn ticket_for_course_to_update(
        &self,
        course_id: i64,
        user_id: i64,
    ) -> RepositoryResult<Option<ticket::Model>> {
        Ok(Self::course_ticket_query(course_id, user_id)
            .lock(LockType::Update)
            .one(self.conn)
            .await?)
    }

    /// Locks the ticket if it belongs to the user
    pub async fn find_by_id_to_update(
        &self,
        id: i64,
        user_id: i64,
    ) -> RepositoryResult<Option<ticket::Model>> {
        Ok(Self::owned_ticket_query(id, user_id)
            .lock(LockType::Update)
            .one(self.conn)
            .await?)
    }

    fn course_ticket_query(course_id: i64, user_id: i64) -> Select<ticket::Entity> {
        ticket::Entity::find()
            .filter(ticket::Column::CourseId.eq(course_id))
            .filter(ticket::Column::UserId.eq(user_id))
    }

    fn owned_ticket_query(id: i64, user_id: i64) -> Select<ticket::Entity> {
        ticket::Entity::find_by_id(id).filter(ticket::Column::UserId.eq(user_id))
    }
}
