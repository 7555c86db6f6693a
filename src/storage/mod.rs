//! Link storage
//!
//! `LinkStore` is the contract the alias allocator, redirect resolver and
//! analytics service are written against. Two implementations ship:
//! - `MemoryLinkStore`: DashMap based, for tests and ephemeral deployments
//! - `SeaOrmStorage`: SQLite / MySQL / PostgreSQL via SeaORM

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::DatabaseConfig;
use crate::errors::Result;

pub mod backend;
pub mod memory;
pub mod models;

pub use backend::SeaOrmStorage;
pub use memory::MemoryLinkStore;
pub use models::{ClickEvent, GeoLocation, Link};

#[async_trait]
pub trait LinkStore: Send + Sync {
    /// 插入新链接；code 已存在时返回 `AliasConflict`
    ///
    /// 唯一性必须由存储层保证，而不是依赖调用方的预先检查。
    async fn insert(&self, link: Link) -> Result<()>;

    /// 按 code 查找链接（包含全部点击事件，按写入顺序）
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>>;

    /// 按 code 只查目标地址（重定向热路径）
    async fn find_target(&self, code: &str) -> Result<Option<String>> {
        Ok(self.find_by_code(code).await?.map(|link| link.target))
    }

    async fn find_by_topic(&self, topic: &str) -> Result<Vec<Link>>;

    async fn find_by_owner(&self, owner: &str) -> Result<Vec<Link>>;

    /// 原子地追加点击事件并将 click_count 加一；code 不存在时返回 `NotFound`
    async fn append_event_and_increment(&self, code: &str, event: ClickEvent) -> Result<()>;

    fn backend_name(&self) -> &str;
}

pub struct StorageFactory;

impl StorageFactory {
    pub async fn create(config: &DatabaseConfig) -> Result<Arc<dyn LinkStore>> {
        let database_url = config.database_url.as_str();

        if backend::is_memory_url(database_url) {
            return Ok(Arc::new(MemoryLinkStore::new()));
        }

        // 从 URL 自动推断数据库类型
        let backend_type = backend::infer_backend_from_url(database_url)?;
        let storage = SeaOrmStorage::new(database_url, &backend_type, config).await?;
        Ok(Arc::new(storage))
    }
}
