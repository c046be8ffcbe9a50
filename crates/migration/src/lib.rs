pub use sea_orm_migration::prelude::*;

mod m20221201_000001_create_users_table;
mod m20221201_000002_create_course_tables;
mod m20221229_000011_add_user_register_confirm_token;
mod m20230214_000011_alter_course_price;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20221201_000001_create_users_table::Migration),
            Box::new(m20221201_000002_create_course_tables::Migration),
            Box::new(m20221229_000011_add_user_register_confirm_token::Migration),
            Box::new(m20230214_000011_alter_course_price::Migration),
        ]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_migrations_are_ordered_by_name() {
        let names: Vec<String> = Migrator::migrations()
            .iter()
            .map(|migration| migration.name().to_owned())
            .collect();

        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert_eq!(
            names.last().map(String::as_str),
            Some("m20230214_000011_alter_course_price")
        );
    }
}
