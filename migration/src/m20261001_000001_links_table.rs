use sea_orm::DatabaseBackend;
use sea_orm_migration::prelude::*;

/// 短码列：区分大小写
///
/// MySQL 默认排序规则不区分大小写，`abc` 与 `ABC` 会撞主键，需显式使用二进制排序。
pub(crate) fn code_column<T: IntoIden>(name: T, backend: DatabaseBackend) -> ColumnDef {
    let mut column = ColumnDef::new(name);
    column.string().not_null();
    if backend == DatabaseBackend::MySql {
        column.extra("COLLATE utf8mb4_bin");
    }
    column
}

fn links_table(backend: DatabaseBackend) -> TableCreateStatement {
    Table::create()
        .table(Link::Table)
        .if_not_exists()
        .col(code_column(Link::Code, backend).primary_key())
        .col(ColumnDef::new(Link::TargetUrl).text().not_null())
        .col(
            ColumnDef::new(Link::IsCustomAlias)
                .boolean()
                .not_null()
                .default(false),
        )
        .col(ColumnDef::new(Link::Topic).string().null())
        .col(ColumnDef::new(Link::Owner).string().not_null())
        .col(
            ColumnDef::new(Link::ClickCount)
                .big_integer()
                .not_null()
                .default(0),
        )
        .col(
            ColumnDef::new(Link::CreatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .to_owned()
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 links 表，code 作为主键即唯一约束
        manager
            .create_table(links_table(manager.get_database_backend()))
            .await?;

        // topic 分组查询索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_links_topic")
                    .table(Link::Table)
                    .col(Link::Topic)
                    .to_owned(),
            )
            .await?;

        // owner 查询索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_links_owner")
                    .table(Link::Table)
                    .col(Link::Owner)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_links_owner").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_links_topic").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Link::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Link {
    #[sea_orm(iden = "links")]
    Table,
    Code,
    TargetUrl,
    IsCustomAlias,
    Topic,
    Owner,
    ClickCount,
    CreatedAt,
}
