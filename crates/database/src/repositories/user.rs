use super::course::average_star_rating;
use crate::{
    entities::{course, review, user},
    error::{RepositoryError, RepositoryResult},
};
use log::info;
use models::validation::validate_register_confirm_token;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel,
    QueryFilter, QuerySelect, Select, prelude::Expr,
};
use uuid::Uuid;

pub struct UserRepository<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> UserRepository<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<user::Model>> {
        Ok(user::Entity::find_by_id(id).one(self.conn).await?)
    }

    pub async fn find_by_register_confirm_token(
        &self,
        token: &str,
    ) -> RepositoryResult<Option<user::Model>> {
        Ok(user::Entity::find()
            .filter(user::Column::RegisterConfirmToken.eq(token))
            .one(self.conn)
            .await?)
    }

    /// Replaces the user's confirmation token with a fresh random one
    pub async fn issue_register_confirm_token(&self, user_id: i64) -> RepositoryResult<String> {
        let user = self
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("Undefined user with id {user_id}")))?;

        let token = generate_register_confirm_token();
        validate_register_confirm_token(Some(&token))?;

        let mut user = user.into_active_model();
        user.register_confirm_token = ActiveValue::Set(Some(token.clone()));
        user.update(self.conn).await?;

        Ok(token)
    }

    /// Activates the account holding `token` and consumes the token
    pub async fn confirm_registration(&self, token: &str) -> RepositoryResult<user::Model> {
        let user = self
            .find_by_register_confirm_token(token)
            .await?
            .ok_or_else(|| RepositoryError::NotFound("Undefined register confirm token".to_owned()))?;

        let mut user = user.into_active_model();
        user.is_active = ActiveValue::Set(true);
        user.register_confirm_token = ActiveValue::Set(None);
        let user = user.update(self.conn).await?;

        info!("Confirmed registration of user {}", user.id);
        Ok(user)
    }

    /// Recomputes the user's rate from the reviews of the courses they teach
    pub async fn recalculate_rate(&self, user_id: i64) -> RepositoryResult<Option<f64>> {
        let rate: Option<Option<f64>> = Self::teacher_rate_query(user_id)
            .into_tuple()
            .one(self.conn)
            .await?;
        let rate = rate.flatten();

        user::Entity::update_many()
            .col_expr(user::Column::Rate, Expr::value(rate))
            .filter(user::Column::Id.eq(user_id))
            .exec(self.conn)
            .await?;

        Ok(rate)
    }

    fn teacher_rate_query(user_id: i64) -> Select<review::Entity> {
        review::Entity::find()
            .select_only()
            .column_as(average_star_rating(), "rate")
            .inner_join(course::Entity)
            .filter(course::Column::TeacherId.eq(user_id))
    }
}

fn generate_register_confirm_token() -> String {
    Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{TimeZone, Utc};
    use models::validation::REGISTER_CONFIRM_TOKEN_MAX_LEN;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, QueryTrait};

    type Repository<'a> = UserRepository<'a, DatabaseConnection>;

    fn user(is_active: bool, token: Option<&str>) -> user::Model {
        user::Model {
            id: 3,
            email: "student@example.com".to_owned(),
            first_name: "Ivan".to_owned(),
            last_name: "Sidorov".to_owned(),
            is_active,
            rate: None,
            register_confirm_token: token.map(str::to_owned),
            created_at: Utc.with_ymd_and_hms(2022, 12, 29, 10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_generated_token_fits_column() {
        let token = generate_register_confirm_token();
        assert!(!token.is_empty());
        assert!(token.len() <= REGISTER_CONFIRM_TOKEN_MAX_LEN);
        assert_ne!(token, generate_register_confirm_token());
    }

    #[test]
    fn test_teacher_rate_query() {
        let sql = Repository::teacher_rate_query(9)
            .build(DatabaseBackend::Postgres)
            .to_string();
        assert!(sql.contains(r#"AVG("reviews"."star_rating")"#));
        assert!(sql.contains(r#"INNER JOIN "courses""#));
        assert!(sql.contains(r#""courses"."teacher_id" = 9"#));
    }

    #[tokio::test]
    async fn test_confirm_registration() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user(false, Some("abc"))], vec![user(true, None)]])
            .into_connection();

        let confirmed = Repository::new(&db).confirm_registration("abc").await.unwrap();
        assert!(confirmed.is_active);
        assert_eq!(confirmed.register_confirm_token, None);
    }

    #[tokio::test]
    async fn test_issue_register_confirm_token() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user(false, None)], vec![user(false, Some("issued"))]])
            .into_connection();

        let token = Repository::new(&db)
            .issue_register_confirm_token(3)
            .await
            .unwrap();
        assert!(!token.is_empty());
        assert!(token.len() <= REGISTER_CONFIRM_TOKEN_MAX_LEN);

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("UPDATE"));
        assert!(log.contains(&token));
    }

    #[tokio::test]
    async fn test_issue_token_for_unknown_user() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();

        let result = Repository::new(&db).issue_register_confirm_token(3).await;
        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_confirm_unknown_token() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();

        let result = Repository::new(&db).confirm_registration("missing").await;
        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
    }
}
