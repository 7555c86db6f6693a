//! LinkService integration tests (in-memory store)

use std::collections::HashSet;
use std::sync::Arc;

use linktally::config::LinkConfig;
use linktally::errors::LinktallyError;
use linktally::services::{CreateLinkRequest, LinkService};
use linktally::storage::{LinkStore, MemoryLinkStore};

fn service() -> (LinkService, Arc<MemoryLinkStore>) {
    let store = Arc::new(MemoryLinkStore::new());
    let service = LinkService::new(store.clone(), &LinkConfig::default());
    (service, store)
}

fn request(target: &str, alias: Option<&str>) -> CreateLinkRequest {
    CreateLinkRequest {
        target: target.to_string(),
        owner: "owner@example.com".to_string(),
        custom_alias: alias.map(String::from),
        topic: None,
    }
}

#[tokio::test]
async fn test_create_without_alias_yields_eight_char_code() {
    let (service, store) = service();

    let created = service
        .create_link(request("https://example.com", None))
        .await
        .unwrap();

    assert_eq!(created.code.len(), 8);
    assert!(created.code.chars().all(|c| c.is_ascii_alphanumeric()));
    assert!(created.short_url.is_none());

    let stored = store.find_by_code(&created.code).await.unwrap().unwrap();
    assert_eq!(stored.target, "https://example.com");
    assert!(!stored.is_custom_alias);
    assert_eq!(stored.created_at, created.created_at);
}

#[tokio::test]
async fn test_short_url_uses_base_url() {
    let store = Arc::new(MemoryLinkStore::new());
    let config = LinkConfig {
        base_url: Some("https://sho.rt".to_string()),
        ..Default::default()
    };
    let service = LinkService::new(store, &config);

    let created = service
        .create_link(request("https://example.com", Some("docs")))
        .await
        .unwrap();
    assert_eq!(created.short_url.as_deref(), Some("https://sho.rt/docs"));
}

#[tokio::test]
async fn test_distinct_creations_yield_distinct_codes() {
    let (service, store) = service();

    let mut codes = HashSet::new();
    for i in 0..50 {
        let created = service
            .create_link(request(&format!("https://example.com/{}", i), None))
            .await
            .unwrap();
        codes.insert(created.code);
    }
    assert_eq!(codes.len(), 50);
    assert_eq!(store.len(), 50);
}

#[tokio::test]
async fn test_custom_alias_conflict() {
    let (service, store) = service();

    let first = service
        .create_link(request("https://example.com/a", Some("launch")))
        .await
        .unwrap();
    assert_eq!(first.code, "launch");

    let err = service
        .create_link(request("https://example.com/b", Some("launch")))
        .await
        .unwrap_err();
    assert!(matches!(err, LinktallyError::AliasConflict(_)));

    // 冲突不覆盖原目标
    let stored = store.find_by_code("launch").await.unwrap().unwrap();
    assert_eq!(stored.target, "https://example.com/a");
    assert!(stored.is_custom_alias);
}

#[tokio::test]
async fn test_empty_alias_is_treated_as_absent() {
    let (service, _store) = service();
    let created = service
        .create_link(request("https://example.com", Some("")))
        .await
        .unwrap();
    assert_eq!(created.code.len(), 8);
}

#[tokio::test]
async fn test_validation_errors() {
    let (service, store) = service();

    let bad_url = service
        .create_link(request("ftp://example.com", None))
        .await
        .unwrap_err();
    assert!(matches!(bad_url, LinktallyError::Validation(_)));

    let bad_alias = service
        .create_link(request("https://example.com", Some("no spaces")))
        .await
        .unwrap_err();
    assert!(matches!(bad_alias, LinktallyError::Validation(_)));

    let reserved = service
        .create_link(request("https://example.com", Some("analytics")))
        .await
        .unwrap_err();
    assert!(matches!(reserved, LinktallyError::Validation(_)));

    let mut no_owner = request("https://example.com", None);
    no_owner.owner = "  ".to_string();
    let err = service.create_link(no_owner).await.unwrap_err();
    assert!(matches!(err, LinktallyError::Validation(_)));

    assert!(store.is_empty());
}

#[tokio::test]
async fn test_owner_and_topic_are_normalized() {
    let (service, store) = service();

    let created = service
        .create_link(CreateLinkRequest {
            target: "https://example.com".to_string(),
            owner: "  Alice@Example.COM ".to_string(),
            custom_alias: None,
            topic: Some(" launch ".to_string()),
        })
        .await
        .unwrap();

    let stored = store.find_by_code(&created.code).await.unwrap().unwrap();
    assert_eq!(stored.owner, "alice@example.com");
    assert_eq!(stored.topic.as_deref(), Some("launch"));
    assert_eq!(store.find_by_owner("alice@example.com").await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_alias_race_in_memory() {
    let (service, store) = service();
    let service = Arc::new(service);

    let tasks: Vec<_> = (0..16)
        .map(|i| {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .create_link(request(&format!("https://example.com/{}", i), Some("race")))
                    .await
            })
        })
        .collect();

    let mut winners = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => winners += 1,
            Err(e) => assert!(matches!(e, LinktallyError::AliasConflict(_)), "{:?}", e),
        }
    }
    assert_eq!(winners, 1);
    assert_eq!(store.len(), 1);
}
