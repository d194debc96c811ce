use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum DevisRequests {
    Table,
    Id,
    LastName,
    FirstName,
    Phone,
    Email,
    ProjectType,
    Content,
    Status,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DevisRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DevisRequests::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DevisRequests::LastName)
                            .string_len(30)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DevisRequests::FirstName)
                            .string_len(30)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DevisRequests::Phone)
                            .string_len(30)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DevisRequests::Email)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DevisRequests::ProjectType)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(ColumnDef::new(DevisRequests::Content).text().not_null())
                    .col(
                        ColumnDef::new(DevisRequests::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(DevisRequests::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DevisRequests::Table).to_owned())
            .await
    }
}
