//! Generic read and guard operations shared by the entity services.

use crate::domain::Record;
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::Store;
use crate::query::{
    build_filter_predicate, parse_list_options, FieldSource, ListLimits, ListOptions, ListQuery,
    Predicate, Value, ID_FIELD,
};
use crate::types::{to_paginated_result, PaginatedResult};

use super::parallel;

/// One page of records matching the predicate.
///
/// The page and the total count are fetched concurrently.
pub async fn fetch_page<T, S>(
    store: &S,
    predicate: Option<&Predicate>,
    options: &ListOptions,
) -> AppResult<PaginatedResult<T>>
where
    T: Record,
    S: Store<T> + ?Sized,
{
    let (items, total) = parallel::join2(
        store.find_many(predicate, options.sort, options.offset(), options.limit),
        store.count(predicate),
    )
    .await?;

    Ok(to_paginated_result(items, total, options.page, options.limit))
}

/// Filtered, sorted and paginated listing driven by query string parameters.
pub async fn list_items<T, S>(
    store: &S,
    query: &ListQuery,
    limits: ListLimits,
) -> AppResult<PaginatedResult<T>>
where
    T: Record,
    S: Store<T> + ?Sized,
{
    let schema = T::schema();
    let options = parse_list_options(query, schema, limits);
    let predicate = build_filter_predicate(query, schema);
    tracing::debug!(entity = T::NAME, ?options, ?predicate, "Listing records");

    fetch_page(store, predicate.as_ref(), &options).await
}

/// Every matching record in a single export-sized page.
///
/// Filters and ordering apply; `page` and `limit` are ignored.
pub async fn list_all_items<T, S>(store: &S, query: &ListQuery) -> AppResult<PaginatedResult<T>>
where
    T: Record,
    S: Store<T> + ?Sized,
{
    let query = ListQuery {
        page: None,
        limit: None,
        ..query.clone()
    };
    list_items(store, &query, ListLimits::EXPORT).await
}

/// Record by id, `NotFound` when absent.
pub async fn get_item<T, S>(store: &S, id: i32) -> AppResult<T>
where
    T: Record,
    S: Store<T> + ?Sized,
{
    store.find_by_id(id).await?.ok_or_not_found()
}

/// Reject a write that would duplicate any of the unique fields.
///
/// Only fields the candidate actually carries are checked; with
/// `exclude_id` the record being updated does not count as a duplicate.
pub async fn assert_unique<T, S, C>(
    store: &S,
    candidate: &C,
    unique_fields: &[&'static str],
    exclude_id: Option<i32>,
) -> AppResult<()>
where
    T: Record,
    S: Store<T> + ?Sized,
    C: FieldSource + ?Sized,
{
    let present: Vec<(&'static str, Value)> = unique_fields
        .iter()
        .filter_map(|field| candidate.field(field).map(|value| (*field, value)))
        .collect();

    let Some(duplicate) =
        Predicate::any(present.iter().map(|(f, v)| Predicate::Eq(*f, v.clone())).collect())
    else {
        return Ok(());
    };

    let predicate = match exclude_id {
        Some(id) => Predicate::And(vec![duplicate, Predicate::Ne(ID_FIELD, id.into())]),
        None => duplicate,
    };

    let Some(existing) = store.find_one(&predicate).await? else {
        return Ok(());
    };

    let field = present
        .iter()
        .find(|(field, value)| existing.field(field).as_ref() == Some(value))
        .map_or(unique_fields[0], |(field, _)| *field);

    Err(AppError::conflict(format!("{} with this {}", T::NAME, field)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Bot, BotPatch, NewBot, BOT_UNIQUE_FIELDS};
    use crate::infra::MemoryStore;

    fn new_bot(name: &str) -> NewBot {
        NewBot {
            name: name.to_string(),
            description: None,
            is_active: None,
        }
    }

    async fn seeded(names: &[&str]) -> MemoryStore<Bot> {
        let store = MemoryStore::new();
        for name in names {
            store.insert(new_bot(name)).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_assert_unique_rejects_duplicate() {
        let store = seeded(&["alpha"]).await;

        let err = assert_unique(&store, &new_bot("alpha"), BOT_UNIQUE_FIELDS, None)
            .await
            .unwrap_err();
        match err {
            AppError::Conflict(msg) => assert_eq!(msg, "Bot with this name"),
            other => panic!("unexpected error: {:?}", other),
        }

        assert!(assert_unique(&store, &new_bot("beta"), BOT_UNIQUE_FIELDS, None)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_assert_unique_excludes_self() {
        let store = seeded(&["alpha", "beta"]).await;
        let patch = BotPatch {
            name: Some("alpha".to_string()),
            ..Default::default()
        };

        assert!(assert_unique(&store, &patch, BOT_UNIQUE_FIELDS, Some(1))
            .await
            .is_ok());
        assert!(assert_unique(&store, &patch, BOT_UNIQUE_FIELDS, Some(2))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_assert_unique_without_fields_passes() {
        let store = seeded(&["alpha"]).await;

        assert!(assert_unique(&store, &BotPatch::default(), BOT_UNIQUE_FIELDS, None)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_get_item_missing_is_not_found() {
        let store = seeded(&[]).await;
        let result: AppResult<Bot> = get_item(&store, 42).await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_list_items_pages_and_counts() {
        let store = seeded(&["a", "b", "c", "d", "e"]).await;
        let query = ListQuery::from([("limit", "2"), ("page", "3"), ("sort", "name")]);

        let page = list_items(&store, &query, ListLimits::LISTING).await.unwrap();

        assert_eq!(page.total_docs, 5);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.payload.len(), 1);
        assert_eq!(page.payload[0].name, "e");
        assert!(!page.has_next_page);
    }

    #[tokio::test]
    async fn test_list_all_items_ignores_paging() {
        let store = seeded(&["a", "b", "c", "d", "e"]).await;
        let query = ListQuery::from([("limit", "2"), ("page", "2"), ("sort", "name"), ("order", "desc")]);

        let page = list_all_items(&store, &query).await.unwrap();

        assert_eq!(page.payload.len(), 5);
        assert_eq!(page.payload[0].name, "e");
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, 99_999);
        assert_eq!(page.total_pages, 1);
    }
}
