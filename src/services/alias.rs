//! Short code allocation
//!
//! Custom aliases are checked up front, but the store's uniqueness
//! constraint decides: a losing racer still gets `AliasConflict`.
//! Random codes are regenerated on collision up to a fixed number of attempts.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::LinkConfig;
use crate::errors::{LinktallyError, Result};
use crate::storage::{Link, LinkStore};
use crate::utils::{generate_random_code, is_valid_short_code};

pub const MAX_ALIAS_LENGTH: usize = 64;

/// 与 HTTP 路由段同名的别名不可用
pub const RESERVED_ALIASES: &[&str] = &["api", "analytics", "shorten", "overall", "topic"];

pub fn validate_alias(alias: &str) -> Result<()> {
    if alias.len() > MAX_ALIAS_LENGTH {
        return Err(LinktallyError::validation(format!(
            "Alias is longer than {} characters",
            MAX_ALIAS_LENGTH
        )));
    }
    if !is_valid_short_code(alias) {
        return Err(LinktallyError::validation(format!(
            "Invalid alias '{}': only letters, digits, '-' and '_' are allowed",
            alias
        )));
    }
    if RESERVED_ALIASES.iter().any(|r| r.eq_ignore_ascii_case(alias)) {
        return Err(LinktallyError::validation(format!(
            "Alias '{}' is reserved",
            alias
        )));
    }
    Ok(())
}

/// 待分配短码的链接内容
#[derive(Debug, Clone)]
pub struct LinkDraft {
    pub target: String,
    pub owner: String,
    pub topic: Option<String>,
}

impl LinkDraft {
    fn into_link(self, code: String, is_custom_alias: bool) -> Link {
        Link::new(code, self.target, self.owner, self.topic, is_custom_alias)
    }
}

#[derive(Clone)]
pub struct AliasAllocator {
    store: Arc<dyn LinkStore>,
    code_length: usize,
    max_attempts: u32,
}

impl AliasAllocator {
    pub fn new(store: Arc<dyn LinkStore>, config: &LinkConfig) -> Self {
        Self {
            store,
            code_length: config.code_length.max(1),
            max_attempts: config.max_allocation_attempts.max(1),
        }
    }

    /// 分配短码并写入存储，返回已持久化的链接
    ///
    /// 空字符串别名等同于未指定。
    pub async fn allocate(&self, requested_alias: Option<&str>, draft: LinkDraft) -> Result<Link> {
        match requested_alias.filter(|a| !a.is_empty()) {
            Some(alias) => self.reserve_alias(alias, draft).await,
            None => self.allocate_random(draft).await,
        }
    }

    async fn reserve_alias(&self, alias: &str, draft: LinkDraft) -> Result<Link> {
        validate_alias(alias)?;

        if self.store.find_target(alias).await?.is_some() {
            return Err(LinktallyError::alias_conflict(format!(
                "Alias '{}' is already in use",
                alias
            )));
        }

        let link = draft.into_link(alias.to_string(), true);
        // 并发情况下预检查可能都通过，以存储层的冲突结果为准，不重试
        self.store.insert(link.clone()).await?;
        Ok(link)
    }

    async fn allocate_random(&self, draft: LinkDraft) -> Result<Link> {
        for attempt in 1..=self.max_attempts {
            let code = generate_random_code(self.code_length);
            let link = draft.clone().into_link(code, false);

            match self.store.insert(link.clone()).await {
                Ok(()) => {
                    debug!("Allocated code '{}' on attempt {}", link.code, attempt);
                    return Ok(link);
                }
                Err(LinktallyError::AliasConflict(_)) => {
                    warn!(
                        "Random code '{}' collided (attempt {}/{})",
                        link.code, attempt, self.max_attempts
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Err(LinktallyError::allocation_exhausted(format!(
            "No free code found after {} attempts",
            self.max_attempts
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryLinkStore;

    fn draft() -> LinkDraft {
        LinkDraft {
            target: "https://example.com".to_string(),
            owner: "me@example.com".to_string(),
            topic: None,
        }
    }

    fn allocator(store: Arc<dyn LinkStore>, code_length: usize, attempts: u32) -> AliasAllocator {
        let config = LinkConfig {
            code_length,
            max_allocation_attempts: attempts,
            ..Default::default()
        };
        AliasAllocator::new(store, &config)
    }

    #[test]
    fn test_validate_alias() {
        assert!(validate_alias("spring-sale_2026").is_ok());
        assert!(validate_alias(&"a".repeat(MAX_ALIAS_LENGTH)).is_ok());
        assert!(validate_alias(&"a".repeat(MAX_ALIAS_LENGTH + 1)).is_err());
        assert!(validate_alias("with space").is_err());
        assert!(validate_alias("Analytics").is_err());
        assert!(validate_alias("api").is_err());
    }

    #[tokio::test]
    async fn test_random_code_uses_configured_length() {
        let store: Arc<dyn LinkStore> = Arc::new(MemoryLinkStore::new());
        let link = allocator(store, 8, 5).allocate(None, draft()).await.unwrap();
        assert_eq!(link.code.len(), 8);
        assert!(!link.is_custom_alias);
    }

    #[tokio::test]
    async fn test_empty_alias_means_random() {
        let store: Arc<dyn LinkStore> = Arc::new(MemoryLinkStore::new());
        let link = allocator(store, 6, 5)
            .allocate(Some(""), draft())
            .await
            .unwrap();
        assert_eq!(link.code.len(), 6);
        assert!(!link.is_custom_alias);
    }

    #[tokio::test]
    async fn test_custom_alias_conflict() {
        let store: Arc<dyn LinkStore> = Arc::new(MemoryLinkStore::new());
        let alloc = allocator(store, 8, 5);

        let link = alloc.allocate(Some("promo"), draft()).await.unwrap();
        assert!(link.is_custom_alias);

        let err = alloc.allocate(Some("promo"), draft()).await.unwrap_err();
        assert!(matches!(err, LinktallyError::AliasConflict(_)));
    }

    #[tokio::test]
    async fn test_exhausted_when_code_space_is_full() {
        let store = Arc::new(MemoryLinkStore::new());
        for c in "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789".chars() {
            store
                .insert(Link::new(c.to_string(), "https://x.io", "o@x.io", None, false))
                .await
                .unwrap();
        }

        let err = allocator(store, 1, 3)
            .allocate(None, draft())
            .await
            .unwrap_err();
        assert!(matches!(err, LinktallyError::AllocationExhausted(_)));
    }
}
