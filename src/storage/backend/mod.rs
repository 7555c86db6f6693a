//! SeaORM storage backend
//!
//! This module provides database storage using SeaORM,
//! supporting SQLite, MySQL/MariaDB, and PostgreSQL.

mod connection;
mod converters;
mod mutations;
mod query;
pub mod retry;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use tracing::warn;

use super::{ClickEvent, Link, LinkStore};
use crate::config::DatabaseConfig;
use crate::errors::{LinktallyError, Result};

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use converters::{
    click_event_to_active_model, link_to_active_model, model_to_click_event, model_to_link,
};

/// 是否选择内存存储
pub fn is_memory_url(database_url: &str) -> bool {
    database_url == ":memory:" || database_url.starts_with("memory://")
}

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite:")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(LinktallyError::database_config(format!(
            "Cannot infer database type from URL: {}. Supported: sqlite://, mysql://, mariadb://, postgres://, memory://",
            database_url
        )))
    }
}

/// 规范化 SQLite 路径：裸文件名补全为 sqlite:// URL
fn normalize_sqlite_url(database_url: &str) -> String {
    if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite://{}?mode=rwc", database_url)
    }
}

/// SeaORM-based storage backend
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
    /// 重试配置
    retry_config: retry::RetryConfig,
}

impl SeaOrmStorage {
    pub async fn new(
        database_url: &str,
        backend_name: &str,
        config: &DatabaseConfig,
    ) -> Result<Self> {
        if database_url.is_empty() {
            return Err(LinktallyError::database_config("database_url is empty"));
        }

        let retry_config = retry::RetryConfig::from(config);

        // 根据不同数据库类型配置连接选项
        let db = if backend_name == "sqlite" {
            connect_sqlite(&normalize_sqlite_url(database_url)).await?
        } else {
            connect_generic(database_url, backend_name, config.pool_size).await?
        };

        let storage = SeaOrmStorage {
            db,
            backend_name: backend_name.to_string(),
            retry_config,
        };

        // 运行迁移
        run_migrations(&storage.db).await?;

        warn!(
            "{} Storage initialized.",
            storage.backend_name.to_uppercase()
        );
        Ok(storage)
    }
}

#[async_trait]
impl LinkStore for SeaOrmStorage {
    async fn insert(&self, link: Link) -> Result<()> {
        self.insert_link(&link).await
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>> {
        self.get_link(code).await
    }

    async fn find_target(&self, code: &str) -> Result<Option<String>> {
        self.get_target(code).await
    }

    async fn find_by_topic(&self, topic: &str) -> Result<Vec<Link>> {
        self.list_by_topic(topic).await
    }

    async fn find_by_owner(&self, owner: &str) -> Result<Vec<Link>> {
        self.list_by_owner(owner).await
    }

    async fn append_event_and_increment(&self, code: &str, event: ClickEvent) -> Result<()> {
        self.record_click(code, &event).await
    }

    fn backend_name(&self) -> &str {
        &self.backend_name
    }
}
