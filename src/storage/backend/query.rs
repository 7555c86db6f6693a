//! Read operations for SeaOrmStorage
//!
//! 链接行与其事件分两条语句读取，必须在同一个快照里执行，
//! 否则并发写入可能让 `click_count` 与 `events.len()` 不一致。

use std::collections::HashMap;

use sea_orm::{
    AccessMode, ColumnTrait, ConnectionTrait, DatabaseBackend, DatabaseConnection,
    DatabaseTransaction, DbErr, EntityTrait, IsolationLevel, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait,
};
use tracing::{debug, error};

use super::SeaOrmStorage;
use super::converters::{model_to_click_event, model_to_link};
use super::retry;
use crate::errors::{LinktallyError, Result};
use crate::storage::{ClickEvent, Link};

use migration::entities::{click_event, short_link};

/// 开启只读快照事务
///
/// SQLite WAL 下延迟事务在第一条 SELECT 时固定快照；
/// MySQL/PostgreSQL 需要 REPEATABLE READ 才能跨语句保持同一快照。
async fn begin_snapshot(db: &DatabaseConnection) -> std::result::Result<DatabaseTransaction, DbErr> {
    match db.get_database_backend() {
        DatabaseBackend::Sqlite => db.begin().await,
        _ => {
            db.begin_with_config(
                Some(IsolationLevel::RepeatableRead),
                Some(AccessMode::ReadOnly),
            )
            .await
        }
    }
}

/// 一次 IN 查询取回所有链接的事件，按 id 升序分组
async fn load_events<C: ConnectionTrait>(
    db: &C,
    codes: &[String],
) -> std::result::Result<HashMap<String, Vec<ClickEvent>>, DbErr> {
    let mut grouped: HashMap<String, Vec<ClickEvent>> = HashMap::new();
    if codes.is_empty() {
        return Ok(grouped);
    }

    let models = click_event::Entity::find()
        .filter(click_event::Column::LinkCode.is_in(codes.iter().cloned()))
        .order_by_asc(click_event::Column::Id)
        .all(db)
        .await?;

    for model in models {
        let code = model.link_code.clone();
        grouped
            .entry(code)
            .or_default()
            .push(model_to_click_event(model));
    }
    Ok(grouped)
}

async fn load_links(
    db: &DatabaseConnection,
    filter: sea_orm::Condition,
) -> std::result::Result<Vec<Link>, DbErr> {
    let txn = begin_snapshot(db).await?;

    let models = short_link::Entity::find()
        .filter(filter)
        .order_by_asc(short_link::Column::CreatedAt)
        .order_by_asc(short_link::Column::Code)
        .all(&txn)
        .await?;

    let codes: Vec<String> = models.iter().map(|m| m.code.clone()).collect();
    let mut events = load_events(&txn, &codes).await?;
    txn.commit().await?;

    Ok(models
        .into_iter()
        .map(|model| {
            let link_events = events.remove(&model.code).unwrap_or_default();
            model_to_link(model, link_events)
        })
        .collect())
}

impl SeaOrmStorage {
    pub async fn get_link(&self, code: &str) -> Result<Option<Link>> {
        let db = &self.db;

        let result = retry::with_retry(&format!("get_link({})", code), self.retry_config, || async move {
            let txn = begin_snapshot(db).await?;
            let Some(model) = short_link::Entity::find_by_id(code).one(&txn).await? else {
                txn.commit().await?;
                return Ok(None);
            };
            let mut events = load_events(&txn, std::slice::from_ref(&model.code)).await?;
            txn.commit().await?;
            let link_events = events.remove(&model.code).unwrap_or_default();
            Ok(Some(model_to_link(model, link_events)))
        })
        .await;

        result.map_err(|e| {
            error!("Failed to load link {}: {}", code, e);
            LinktallyError::store_unavailable(format!("Failed to load link '{}': {}", code, e))
        })
    }

    /// 只查询 target_url 列
    pub async fn get_target(&self, code: &str) -> Result<Option<String>> {
        let db = &self.db;

        retry::with_retry(&format!("get_target({})", code), self.retry_config, || async move {
            short_link::Entity::find_by_id(code)
                .select_only()
                .column(short_link::Column::TargetUrl)
                .into_tuple::<String>()
                .one(db)
                .await
        })
        .await
        .map_err(|e| {
            LinktallyError::store_unavailable(format!("Failed to resolve '{}': {}", code, e))
        })
    }

    pub async fn list_by_topic(&self, topic: &str) -> Result<Vec<Link>> {
        let db = &self.db;
        let links = retry::with_retry(&format!("list_by_topic({})", topic), self.retry_config, || {
            let filter = sea_orm::Condition::all().add(short_link::Column::Topic.eq(topic));
            async move { load_links(db, filter).await }
        })
        .await
        .map_err(|e| {
            LinktallyError::store_unavailable(format!("Failed to list topic '{}': {}", topic, e))
        })?;

        debug!("Loaded {} links for topic {}", links.len(), topic);
        Ok(links)
    }

    pub async fn list_by_owner(&self, owner: &str) -> Result<Vec<Link>> {
        let db = &self.db;
        let links = retry::with_retry(&format!("list_by_owner({})", owner), self.retry_config, || {
            let filter = sea_orm::Condition::all().add(short_link::Column::Owner.eq(owner));
            async move { load_links(db, filter).await }
        })
        .await
        .map_err(|e| {
            LinktallyError::store_unavailable(format!("Failed to list owner '{}': {}", owner, e))
        })?;

        debug!("Loaded {} links for owner {}", links.len(), owner);
        Ok(links)
    }
}
