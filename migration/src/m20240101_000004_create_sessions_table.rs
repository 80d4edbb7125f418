use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Sessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sessions::SessionId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Sessions::CreateAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Sessions::UpdateAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Sessions::DeleteAt).timestamp())
                    .col(ColumnDef::new(Sessions::LlmId).integer())
                    .col(ColumnDef::new(Sessions::Uid).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sessions_llm_id")
                            .from(Sessions::Table, Sessions::LlmId)
                            .to(Llms::Table, Llms::LlmId)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sessions_uid")
                            .from(Sessions::Table, Sessions::Uid)
                            .to(Users::Table, Users::Uid)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sessions_uid")
                    .table(Sessions::Table)
                    .col(Sessions::Uid)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Sessions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Sessions {
    Table,
    SessionId,
    CreateAt,
    UpdateAt,
    DeleteAt,
    LlmId,
    Uid,
}

#[derive(DeriveIden)]
enum Llms {
    Table,
    LlmId,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Uid,
}
