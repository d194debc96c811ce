use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum ChatRequests {
    Table,
    Id,
    UserId,
    AdminId,
    Content,
    RequestedDate,
    RequestedTime,
    Attachment,
    Status,
    AdminSlots,
    ConfirmedSlot,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Admins {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ChatRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ChatRequests::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ChatRequests::UserId).integer().not_null())
                    .col(ColumnDef::new(ChatRequests::AdminId).integer().not_null())
                    .col(ColumnDef::new(ChatRequests::Content).text().not_null())
                    .col(
                        ColumnDef::new(ChatRequests::RequestedDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ChatRequests::RequestedTime)
                            .time()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ChatRequests::Attachment)
                            .string_len(255)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ChatRequests::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(ChatRequests::AdminSlots).json().null())
                    .col(ColumnDef::new(ChatRequests::ConfirmedSlot).timestamp().null())
                    .col(
                        ColumnDef::new(ChatRequests::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_chat_requests_user_id")
                            .from(ChatRequests::Table, ChatRequests::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_chat_requests_admin_id")
                            .from(ChatRequests::Table, ChatRequests::AdminId)
                            .to(Admins::Table, Admins::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ChatRequests::Table).to_owned())
            .await
    }
}
