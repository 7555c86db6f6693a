//! Link creation service

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use super::alias::{AliasAllocator, LinkDraft};
use crate::config::LinkConfig;
use crate::errors::{LinktallyError, Result};
use crate::storage::LinkStore;
use crate::utils::validate_target_url;

/// Request to create a new link
#[derive(Debug, Clone)]
pub struct CreateLinkRequest {
    /// Destination URL
    pub target: String,
    /// Caller identity, normalized before storing
    pub owner: String,
    /// Requested alias; `None` or empty means a random code
    pub custom_alias: Option<String>,
    pub topic: Option<String>,
}

/// Result of link creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkCreateResult {
    pub code: String,
    pub created_at: DateTime<Utc>,
    /// Only present when `links.base_url` is configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_url: Option<String>,
}

/// 去除首尾空白并转小写，空值拒绝
pub fn normalize_owner(owner: &str) -> Result<String> {
    let normalized = owner.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(LinktallyError::validation("Owner cannot be empty"));
    }
    Ok(normalized)
}

fn normalize_topic(topic: Option<String>) -> Option<String> {
    topic
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

#[derive(Clone)]
pub struct LinkService {
    allocator: AliasAllocator,
    base_url: Option<String>,
}

impl LinkService {
    pub fn new(store: Arc<dyn LinkStore>, config: &LinkConfig) -> Self {
        Self {
            allocator: AliasAllocator::new(store, config),
            base_url: config
                .base_url
                .as_ref()
                .map(|url| url.trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty()),
        }
    }

    pub fn short_url_for(&self, code: &str) -> Option<String> {
        self.base_url.as_ref().map(|base| format!("{}/{}", base, code))
    }

    pub async fn create_link(&self, req: CreateLinkRequest) -> Result<LinkCreateResult> {
        let target = validate_target_url(&req.target)?;
        let owner = normalize_owner(&req.owner)?;
        let alias = req.custom_alias.as_deref().map(str::trim);

        let draft = LinkDraft {
            target,
            owner,
            topic: normalize_topic(req.topic),
        };
        let link = self.allocator.allocate(alias, draft).await?;

        info!(
            "LinkService: created link '{}' -> '{}' for {}",
            link.code, link.target, link.owner
        );

        Ok(LinkCreateResult {
            short_url: self.short_url_for(&link.code),
            code: link.code,
            created_at: link.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_owner() {
        assert_eq!(
            normalize_owner("  Alice@Example.COM ").unwrap(),
            "alice@example.com"
        );
        assert!(matches!(
            normalize_owner("   "),
            Err(LinktallyError::Validation(_))
        ));
    }

    #[test]
    fn test_normalize_topic() {
        assert_eq!(normalize_topic(Some(" launch ".into())), Some("launch".into()));
        assert_eq!(normalize_topic(Some("  ".into())), None);
        assert_eq!(normalize_topic(None), None);
    }

    #[test]
    fn test_short_url_for_trims_trailing_slash() {
        let store: Arc<dyn LinkStore> = Arc::new(crate::storage::MemoryLinkStore::new());
        let config = LinkConfig {
            base_url: Some("https://s.example.com/".into()),
            ..Default::default()
        };
        let service = LinkService::new(store.clone(), &config);
        assert_eq!(
            service.short_url_for("abc").as_deref(),
            Some("https://s.example.com/abc")
        );

        let service = LinkService::new(store, &LinkConfig::default());
        assert_eq!(service.short_url_for("abc"), None);
    }
}
