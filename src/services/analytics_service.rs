//! Analytics queries at link, topic and owner scope
//!
//! Links are fetched from the store, then folded in one pass by
//! [`crate::analytics::ClickAccumulator`]. The `*_at` variants take the
//! reference day explicitly; the others use the local calendar.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use super::link_service::normalize_owner;
use crate::analytics::{ClickSummary, LinkClickStats, local_today, summarize_events, summarize_links};
use crate::errors::{LinktallyError, Result};
use crate::storage::LinkStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkAnalytics {
    pub code: String,
    #[serde(flatten)]
    pub summary: ClickSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicAnalytics {
    pub topic: String,
    #[serde(flatten)]
    pub summary: ClickSummary,
    pub links: Vec<LinkClickStats>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerAnalytics {
    pub total_links: u64,
    #[serde(flatten)]
    pub summary: ClickSummary,
    pub links: Vec<LinkClickStats>,
}

#[derive(Clone)]
pub struct AnalyticsService {
    store: Arc<dyn LinkStore>,
}

impl AnalyticsService {
    pub fn new(store: Arc<dyn LinkStore>) -> Self {
        Self { store }
    }

    pub async fn get_link_analytics(&self, code: &str) -> Result<LinkAnalytics> {
        self.get_link_analytics_at(code, local_today()).await
    }

    pub async fn get_link_analytics_at(&self, code: &str, today: NaiveDate) -> Result<LinkAnalytics> {
        let link = self
            .store
            .find_by_code(code)
            .await?
            .ok_or_else(|| LinktallyError::not_found(format!("Link '{}' not found", code)))?;

        let summary = summarize_events(&link.events, today);
        debug!(
            "AnalyticsService: link {} -> {} clicks",
            code, summary.total_clicks
        );
        Ok(LinkAnalytics {
            code: link.code,
            summary,
        })
    }

    pub async fn get_topic_analytics(&self, topic: &str) -> Result<TopicAnalytics> {
        self.get_topic_analytics_at(topic, local_today()).await
    }

    pub async fn get_topic_analytics_at(
        &self,
        topic: &str,
        today: NaiveDate,
    ) -> Result<TopicAnalytics> {
        let links = self.store.find_by_topic(topic).await?;
        if links.is_empty() {
            return Err(LinktallyError::no_records_found(format!(
                "No links found for topic '{}'",
                topic
            )));
        }

        let (summary, per_link) = summarize_links(&links, today);
        debug!(
            "AnalyticsService: topic {} -> {} links, {} clicks",
            topic,
            links.len(),
            summary.total_clicks
        );
        Ok(TopicAnalytics {
            topic: topic.to_string(),
            summary,
            links: per_link,
        })
    }

    pub async fn get_owner_analytics(&self, owner: &str) -> Result<OwnerAnalytics> {
        self.get_owner_analytics_at(owner, local_today()).await
    }

    pub async fn get_owner_analytics_at(
        &self,
        owner: &str,
        today: NaiveDate,
    ) -> Result<OwnerAnalytics> {
        let owner = normalize_owner(owner)?;
        let links = self.store.find_by_owner(&owner).await?;
        if links.is_empty() {
            return Err(LinktallyError::no_records_found(format!(
                "No links found for owner '{}'",
                owner
            )));
        }

        let (summary, per_link) = summarize_links(&links, today);
        debug!(
            "AnalyticsService: owner {} -> {} links, {} clicks",
            owner,
            links.len(),
            summary.total_clicks
        );
        Ok(OwnerAnalytics {
            total_links: links.len() as u64,
            summary,
            links: per_link,
        })
    }
}
