//! In-memory link store
//!
//! Entries live in a `DashMap`; uniqueness comes from the map's entry API and
//! click recording mutates a link while holding its shard write guard, so an
//! event append and the counter increment are never observed apart.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::trace;

use super::{ClickEvent, Link, LinkStore};
use crate::errors::{LinktallyError, Result};

#[derive(Default)]
pub struct MemoryLinkStore {
    links: DashMap<String, Link>,
}

impl MemoryLinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    fn collect_where<F>(&self, predicate: F) -> Vec<Link>
    where
        F: Fn(&Link) -> bool,
    {
        let mut links: Vec<Link> = self
            .links
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        // DashMap 迭代顺序不稳定，按创建时间排序保证输出确定
        links.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.code.cmp(&b.code)));
        links
    }
}

#[async_trait]
impl LinkStore for MemoryLinkStore {
    async fn insert(&self, link: Link) -> Result<()> {
        match self.links.entry(link.code.clone()) {
            Entry::Occupied(_) => Err(LinktallyError::alias_conflict(format!(
                "Code '{}' is already registered",
                link.code
            ))),
            Entry::Vacant(slot) => {
                trace!("MemoryLinkStore: inserted '{}'", link.code);
                slot.insert(link);
                Ok(())
            }
        }
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>> {
        Ok(self.links.get(code).map(|entry| entry.value().clone()))
    }

    async fn find_target(&self, code: &str) -> Result<Option<String>> {
        Ok(self.links.get(code).map(|entry| entry.target.clone()))
    }

    async fn find_by_topic(&self, topic: &str) -> Result<Vec<Link>> {
        Ok(self.collect_where(|link| link.topic.as_deref() == Some(topic)))
    }

    async fn find_by_owner(&self, owner: &str) -> Result<Vec<Link>> {
        Ok(self.collect_where(|link| link.owner == owner))
    }

    async fn append_event_and_increment(&self, code: &str, event: ClickEvent) -> Result<()> {
        let mut link = self
            .links
            .get_mut(code)
            .ok_or_else(|| LinktallyError::not_found(format!("Link '{}' not found", code)))?;
        link.events.push(event);
        link.click_count += 1;
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(code: &str, owner: &str, topic: Option<&str>) -> Link {
        Link::new(
            code,
            "https://example.com",
            owner,
            topic.map(String::from),
            false,
        )
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_code() {
        let store = MemoryLinkStore::new();
        store.insert(link("abc", "a@x.io", None)).await.unwrap();

        let err = store.insert(link("abc", "b@x.io", None)).await.unwrap_err();
        assert!(matches!(err, LinktallyError::AliasConflict(_)));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_codes_are_case_sensitive() {
        let store = MemoryLinkStore::new();
        store.insert(link("abc", "a@x.io", None)).await.unwrap();
        store.insert(link("ABC", "a@x.io", None)).await.unwrap();
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_append_event_keeps_count_in_step() {
        let store = MemoryLinkStore::new();
        store.insert(link("abc", "a@x.io", None)).await.unwrap();

        for _ in 0..3 {
            store
                .append_event_and_increment("abc", ClickEvent::new(None, Some("1.1.1.1".into())))
                .await
                .unwrap();
        }

        let stored = store.find_by_code("abc").await.unwrap().unwrap();
        assert_eq!(stored.click_count, 3);
        assert_eq!(stored.events.len(), 3);
    }

    #[tokio::test]
    async fn test_append_event_unknown_code() {
        let store = MemoryLinkStore::new();
        let err = store
            .append_event_and_increment("missing", ClickEvent::new(None, None))
            .await
            .unwrap_err();
        assert!(matches!(err, LinktallyError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_find_by_topic_and_owner() {
        let store = MemoryLinkStore::new();
        store.insert(link("a", "one@x.io", Some("launch"))).await.unwrap();
        store.insert(link("b", "one@x.io", Some("other"))).await.unwrap();
        store.insert(link("c", "two@x.io", Some("launch"))).await.unwrap();

        let launch = store.find_by_topic("launch").await.unwrap();
        let mut codes: Vec<_> = launch.iter().map(|l| l.code.as_str()).collect();
        codes.sort();
        assert_eq!(codes, vec!["a", "c"]);

        assert_eq!(store.find_by_owner("one@x.io").await.unwrap().len(), 2);
        assert!(store.find_by_owner("nobody@x.io").await.unwrap().is_empty());
        assert!(store.find_by_topic("missing").await.unwrap().is_empty());
    }
}
