use models::questionnaire_status::QuestionnaireStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A teacher application submitted by a user
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "questionnaire_teachers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub surname: String,
    pub date_of_birth: Option<Date>,
    pub gender: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub about_me: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub work_experience: Option<String>,
    pub vk_link: Option<String>,
    pub telegram_link: Option<String>,
    pub status: QuestionnaireStatus,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
