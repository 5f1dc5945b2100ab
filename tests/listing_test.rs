//! Bot listings: filters, search, ordering and paging end to end.

mod common;

use std::sync::Arc;

use crud_api_skeleton::domain::{BotPatch, NewBot};
use crud_api_skeleton::errors::AppError;
use crud_api_skeleton::infra::Persistence;
use crud_api_skeleton::query::ListQuery;
use crud_api_skeleton::services::{BotService, ServiceContainer};

use common::services;

fn bot(name: &str, description: &str, active: bool) -> NewBot {
    NewBot {
        name: name.to_string(),
        description: Some(description.to_string()),
        is_active: Some(active),
    }
}

async fn seeded() -> Arc<dyn BotService> {
    let bots = services(Persistence::memory()).bots();
    bots.bulk_create(vec![
        bot("Atlas", "Support assistant", true),
        bot("Borealis", "Sales helper", false),
        bot("Cygnus", "support triage", true),
        bot("Draco", "Billing reminders", true),
        bot("Eridanus", "Internal tooling", false),
    ])
    .await
    .unwrap();
    bots
}

fn names(items: &[crud_api_skeleton::domain::Bot]) -> Vec<&str> {
    items.iter().map(|bot| bot.name.as_str()).collect()
}

#[tokio::test]
async fn test_equality_filter_and_sort() {
    let bots = seeded().await;

    let page = bots
        .list(&ListQuery::from([
            ("isActive", "true"),
            ("sort", "name"),
            ("order", "desc"),
        ]))
        .await
        .unwrap();

    assert_eq!(page.total_docs, 3);
    assert_eq!(names(&page.payload), vec!["Draco", "Cygnus", "Atlas"]);
}

#[tokio::test]
async fn test_text_search_is_case_insensitive() {
    let bots = seeded().await;

    let page = bots
        .list(&ListQuery::from([
            ("filter", "SUPPORT"),
            ("fields", "name,description"),
            ("sort", "name"),
        ]))
        .await
        .unwrap();

    assert_eq!(names(&page.payload), vec!["Atlas", "Cygnus"]);
}

#[tokio::test]
async fn test_unknown_filters_are_ignored() {
    let bots = seeded().await;

    let page = bots
        .list(&ListQuery::from([("colour", "blue"), ("isActive", "maybe")]))
        .await
        .unwrap();

    assert_eq!(page.total_docs, 5);
}

#[tokio::test]
async fn test_pagination_metadata() {
    let bots = seeded().await;

    let page = bots
        .list(&ListQuery::from([("sort", "name"), ("page", "2"), ("limit", "2")]))
        .await
        .unwrap();

    assert_eq!(names(&page.payload), vec!["Cygnus", "Draco"]);
    assert_eq!(page.total_docs, 5);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.page, 2);
    assert_eq!(page.paging_counter, 3);
    assert!(page.has_prev_page);
    assert!(page.has_next_page);
    assert_eq!(page.prev_page, Some(1));
    assert_eq!(page.next_page, Some(3));
}

#[tokio::test]
async fn test_page_past_the_end_is_empty() {
    let bots = seeded().await;

    let page = bots
        .list(&ListQuery::from([("page", "9"), ("limit", "2")]))
        .await
        .unwrap();

    assert!(page.payload.is_empty());
    assert_eq!(page.total_docs, 5);
    assert!(!page.has_next_page);
}

#[tokio::test]
async fn test_huge_page_number_is_empty_not_an_error() {
    let bots = seeded().await;

    let page = bots
        .list(&ListQuery::from([("page", "100000000000000000"), ("limit", "100")]))
        .await
        .unwrap();

    assert!(page.payload.is_empty());
    assert_eq!(page.total_docs, 5);
    assert_eq!(page.total_pages, 1);
    assert!(!page.has_next_page);
}

#[tokio::test]
async fn test_list_all_ignores_requested_limit() {
    let bots = seeded().await;

    let page = bots
        .list_all(&ListQuery::from([("limit", "2")]))
        .await
        .unwrap();

    assert_eq!(page.payload.len(), 5);
    assert_eq!(page.total_pages, 1);
}

#[tokio::test]
async fn test_bulk_update_is_all_or_nothing() {
    let bots = seeded().await;
    let atlas = bots
        .list(&ListQuery::from([("name", "Atlas")]))
        .await
        .unwrap()
        .payload
        .remove(0);

    let err = bots
        .bulk_update(vec![
            (
                atlas.id,
                BotPatch {
                    description: Some("Renamed".to_string()),
                    ..Default::default()
                },
            ),
            (9999, BotPatch::default()),
        ])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    let unchanged = bots.get(atlas.id).await.unwrap();
    assert_eq!(unchanged.description.as_deref(), Some("Support assistant"));
}
