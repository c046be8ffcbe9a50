use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "lessons")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub start_datetime: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id"
    )]
    Course,
    #[sea_orm(has_many = "super::lesson_participant::Entity")]
    LessonParticipants,
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::lesson_participant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LessonParticipants.def()
    }
}

// Many-to-many relationship with participating users
impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        super::lesson_participant::Relation::User.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::lesson_participant::Relation::Lesson.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
