use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ApiKeys::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ApiKeys::AkId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ApiKeys::Uid).integer().not_null())
                    .col(
                        ColumnDef::new(ApiKeys::ApiKeySecret)
                            .string_len(128)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(ApiKeys::CreateAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(ApiKeys::DeleteAt).timestamp())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_api_keys_uid")
                            .from(ApiKeys::Table, ApiKeys::Uid)
                            .to(Users::Table, Users::Uid)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建索引
        manager
            .create_index(
                Index::create()
                    .name("idx_api_keys_uid")
                    .table(ApiKeys::Table)
                    .col(ApiKeys::Uid)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_api_keys_delete_at")
                    .table(ApiKeys::Table)
                    .col(ApiKeys::DeleteAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ApiKeys::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ApiKeys {
    Table,
    AkId,
    Uid,
    ApiKeySecret,
    CreateAt,
    DeleteAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Uid,
}
