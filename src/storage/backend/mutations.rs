//! Write operations for SeaOrmStorage

use sea_orm::{
    ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, ExprTrait,
    QueryFilter, SqlErr, TransactionTrait, sea_query::Expr,
};
use tracing::{debug, info};

use super::SeaOrmStorage;
use super::converters::{click_event_to_active_model, link_to_active_model};
use super::retry;
use crate::errors::{LinktallyError, Result};
use crate::storage::{ClickEvent, Link};

use migration::entities::{click_event, short_link};

/// 唯一约束冲突（code 已被占用）
pub(super) fn is_unique_violation(err: &DbErr) -> bool {
    if let Some(SqlErr::UniqueConstraintViolation(_)) = err.sql_err() {
        return true;
    }
    // 部分驱动不会暴露结构化错误
    let lower = err.to_string().to_lowercase();
    lower.contains("unique constraint") || lower.contains("duplicate entry")
}

/// 写入链接及其已有事件，返回未提交的事务
async fn stage_insert(
    db: &DatabaseConnection,
    link: &Link,
) -> std::result::Result<DatabaseTransaction, DbErr> {
    let txn = db.begin().await?;

    short_link::Entity::insert(link_to_active_model(link))
        .exec_without_returning(&txn)
        .await?;

    if !link.events.is_empty() {
        let events = link
            .events
            .iter()
            .map(|event| click_event_to_active_model(&link.code, event));
        click_event::Entity::insert_many(events)
            .exec_without_returning(&txn)
            .await?;
    }

    Ok(txn)
}

/// 递增计数并写入事件，返回未提交的事务；code 不存在时回滚并返回 None
async fn stage_click(
    db: &DatabaseConnection,
    code: &str,
    event: &ClickEvent,
) -> std::result::Result<Option<DatabaseTransaction>, DbErr> {
    let txn = db.begin().await?;

    let updated = short_link::Entity::update_many()
        .col_expr(
            short_link::Column::ClickCount,
            Expr::col(short_link::Column::ClickCount).add(1i64),
        )
        .filter(short_link::Column::Code.eq(code))
        .exec(&txn)
        .await?;

    if updated.rows_affected == 0 {
        txn.rollback().await?;
        return Ok(None);
    }

    click_event::Entity::insert(click_event_to_active_model(code, event))
        .exec_without_returning(&txn)
        .await?;

    Ok(Some(txn))
}

impl SeaOrmStorage {
    /// 插入新链接，code 冲突由 links 主键保证
    pub async fn insert_link(&self, link: &Link) -> Result<()> {
        let db = &self.db;

        let result = retry::with_retry_before_commit(
            &format!("insert_link({})", link.code),
            self.retry_config,
            || async move { stage_insert(db, link).await },
            |txn| txn.commit(),
        )
        .await;

        match result {
            Ok(()) => {
                info!("Short link created: {} -> {}", link.code, link.target);
                Ok(())
            }
            Err(e) if is_unique_violation(&e) => Err(LinktallyError::alias_conflict(format!(
                "Code '{}' is already registered",
                link.code
            ))),
            Err(e) => Err(LinktallyError::store_unavailable(format!(
                "Failed to insert link '{}': {}",
                link.code, e
            ))),
        }
    }

    /// 在同一事务中递增 click_count 并写入点击事件
    pub async fn record_click(&self, code: &str, event: &ClickEvent) -> Result<()> {
        let db = &self.db;

        // 提交阶段不重试：提交后的连接错误若重试会重复计数
        let found = retry::with_retry_before_commit(
            &format!("record_click({})", code),
            self.retry_config,
            || async move { stage_click(db, code, event).await },
            |staged| async move {
                match staged {
                    Some(txn) => txn.commit().await.map(|_| true),
                    None => Ok(false),
                }
            },
        )
        .await
        .map_err(|e| {
            LinktallyError::store_unavailable(format!(
                "Failed to record click for '{}': {}",
                code, e
            ))
        })?;

        if !found {
            return Err(LinktallyError::not_found(format!(
                "Link '{}' not found",
                code
            )));
        }

        debug!("Click recorded for {}", code);
        Ok(())
    }
}
