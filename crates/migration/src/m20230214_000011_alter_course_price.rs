use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const PRICE_CHECK: &str = "courses_price_gte_0";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Prices may now carry fractional amounts
        manager
            .alter_table(
                Table::alter()
                    .table(Courses::Table)
                    .modify_column(ColumnDef::new(Courses::Price).double().null())
                    .to_owned(),
            )
            .await?;

        // NULL passes the check, so courses without a price stay valid
        manager
            .get_connection()
            .execute_unprepared(&format!(
                "ALTER TABLE courses ADD CONSTRAINT {PRICE_CHECK} CHECK (price >= 0);"
            ))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(&format!(
                "ALTER TABLE courses DROP CONSTRAINT IF EXISTS {PRICE_CHECK};"
            ))
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Courses::Table)
                    .modify_column(ColumnDef::new(Courses::Price).integer().null())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Courses {
    Table,
    Price,
}
