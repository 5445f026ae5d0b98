use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(CreateCompositionTable)]
    }
}

pub struct CreateCompositionTable;

impl MigrationName for CreateCompositionTable {
    fn name(&self) -> &str {
        "m20240101_000001_create_compositions_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateCompositionTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(compositions_table()).await?;
        manager.create_index(type_index()).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Compositions::Table).to_owned())
            .await?;
        Ok(())
    }
}

fn compositions_table() -> TableCreateStatement {
    Table::create()
        .table(Compositions::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(Compositions::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(Compositions::Name).string().not_null())
        .col(ColumnDef::new(Compositions::Type).string_len(16).not_null())
        .col(
            ColumnDef::new(Compositions::Calories)
                .integer()
                .not_null()
                .default(0),
        )
        .col(
            ColumnDef::new(Compositions::Created)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .to_owned()
}

/// Random meal selection filters on type. The column is a bounded string so
/// MySQL can index it without a key prefix.
fn type_index() -> IndexCreateStatement {
    Index::create()
        .name("idx_compositions_type")
        .table(Compositions::Table)
        .col(Compositions::Type)
        .to_owned()
}

#[derive(DeriveIden)]
enum Compositions {
    Table,
    Id,
    Name,
    Type,
    Calories,
    Created,
}
