use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string_len(254)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::FirstName).string_len(150).not_null())
                    .col(ColumnDef::new(Users::LastName).string_len(150).not_null())
                    .col(
                        ColumnDef::new(Users::IsActive)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    // Average star rating of the courses the user teaches
                    .col(ColumnDef::new(Users::Rate).double())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Teacher applications, one user may submit several
        manager
            .create_table(
                Table::create()
                    .table(QuestionnaireTeachers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(QuestionnaireTeachers::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(QuestionnaireTeachers::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(QuestionnaireTeachers::Name)
                            .string_len(150)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(QuestionnaireTeachers::Surname)
                            .string_len(150)
                            .not_null(),
                    )
                    .col(ColumnDef::new(QuestionnaireTeachers::DateOfBirth).date())
                    .col(ColumnDef::new(QuestionnaireTeachers::Gender).string_len(16))
                    .col(ColumnDef::new(QuestionnaireTeachers::AboutMe).text())
                    .col(ColumnDef::new(QuestionnaireTeachers::WorkExperience).text())
                    .col(ColumnDef::new(QuestionnaireTeachers::VkLink).string_len(300))
                    .col(ColumnDef::new(QuestionnaireTeachers::TelegramLink).string_len(300))
                    .col(
                        ColumnDef::new(QuestionnaireTeachers::Status)
                            .text()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(QuestionnaireTeachers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-questionnaire_teachers-user_id")
                            .from(QuestionnaireTeachers::Table, QuestionnaireTeachers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_questionnaire_teachers_user_status")
                    .table(QuestionnaireTeachers::Table)
                    .col(QuestionnaireTeachers::UserId)
                    .col(QuestionnaireTeachers::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(QuestionnaireTeachers::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).if_exists().to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Email,
    FirstName,
    LastName,
    IsActive,
    Rate,
    CreatedAt,
}

#[derive(Iden)]
enum QuestionnaireTeachers {
    Table,
    Id,
    UserId,
    Name,
    Surname,
    DateOfBirth,
    Gender,
    AboutMe,
    WorkExperience,
    VkLink,
    TelegramLink,
    Status,
    CreatedAt,
}
