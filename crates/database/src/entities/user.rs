use models::validation::validate_register_confirm_token;
use sea_orm::{ActiveValue, ConnectionTrait, entity::prelude::*};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    /// Average star rating over reviews of the courses this user teaches
    pub rate: Option<f64>,
    #[serde(skip_serializing)]
    pub register_confirm_token: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Courses taught by the user
    #[sea_orm(has_many = "super::course::Entity")]
    Courses,
    #[sea_orm(has_many = "super::questionnaire_teacher::Entity")]
    TeacherProfiles,
    #[sea_orm(has_many = "super::course_favorite::Entity")]
    CourseFavorites,
    #[sea_orm(has_many = "super::lesson_participant::Entity")]
    LessonParticipants,
    #[sea_orm(has_many = "super::ticket::Entity")]
    Tickets,
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Courses.def()
    }
}

impl Related<super::questionnaire_teacher::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeacherProfiles.def()
    }
}

impl Related<super::course_favorite::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CourseFavorites.def()
    }
}

impl Related<super::lesson_participant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LessonParticipants.def()
    }
}

impl Related<super::ticket::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tickets.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, _insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if let ActiveValue::Set(token) = &self.register_confirm_token {
            validate_register_confirm_token(token.as_deref())
                .map_err(|e| DbErr::Custom(e.to_string()))?;
        }

        Ok(self)
    }
}
