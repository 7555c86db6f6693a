use sea_orm_migration::prelude::*;

use crate::m20261001_000001_links_table::code_column;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ClickEvent::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClickEvent::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(&mut code_column(
                        ClickEvent::LinkCode,
                        manager.get_database_backend(),
                    ))
                    .col(
                        ColumnDef::new(ClickEvent::ClickedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ClickEvent::UserAgent).text().null())
                    .col(ColumnDef::new(ClickEvent::IpAddress).string().null())
                    .col(ColumnDef::new(ClickEvent::Country).string().null())
                    .col(ColumnDef::new(ClickEvent::City).string().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_click_events_link_code")
                            .from(ClickEvent::Table, ClickEvent::LinkCode)
                            .to(Link::Table, Link::Code),
                    )
                    .to_owned(),
            )
            .await?;

        // 按链接聚合事件时使用
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_click_events_link_code")
                    .table(ClickEvent::Table)
                    .col(ClickEvent::LinkCode)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_click_events_link_code").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ClickEvent::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ClickEvent {
    #[sea_orm(iden = "click_events")]
    Table,
    Id,
    LinkCode,
    ClickedAt,
    UserAgent,
    IpAddress,
    Country,
    City,
}

#[derive(DeriveIden)]
enum Link {
    #[sea_orm(iden = "links")]
    Table,
    Code,
}
