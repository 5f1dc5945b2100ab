//! Bot management - single and bulk CRUD over bots.

use std::collections::BTreeSet;

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use super::crud::{assert_unique, get_item, list_all_items, list_items};
use super::parallel;
use crate::domain::{Bot, BotPatch, NewBot, BOT_UNIQUE_FIELDS};
use crate::errors::{AppError, AppResult};
use crate::infra::Persistence;
use crate::query::{ListLimits, ListQuery, Predicate, ID_FIELD};
use crate::types::PaginatedResult;

#[derive(Debug, Serialize, ToSchema)]
pub struct BulkCreated {
    pub created: usize,
    pub items: Vec<Bot>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BulkModified {
    pub modified: usize,
    pub items: Vec<Bot>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BulkDeleted {
    pub deleted: usize,
    pub items: Vec<Bot>,
}

#[async_trait]
pub trait BotService: Send + Sync {
    /// Filtered, paginated bot listing
    async fn list(&self, query: &ListQuery) -> AppResult<PaginatedResult<Bot>>;

    /// Every matching bot on one page; paging parameters are ignored
    async fn list_all(&self, query: &ListQuery) -> AppResult<PaginatedResult<Bot>>;

    async fn get(&self, id: i32) -> AppResult<Bot>;

    async fn create(&self, new: NewBot) -> AppResult<Bot>;

    async fn update(&self, id: i32, patch: BotPatch) -> AppResult<Bot>;

    /// Delete a bot and return it
    async fn delete(&self, id: i32) -> AppResult<Bot>;

    /// Create every bot or none of them
    async fn bulk_create(&self, bots: Vec<NewBot>) -> AppResult<BulkCreated>;

    /// Apply every update or none of them.
    ///
    /// New names are checked against the names stored before the batch
    /// runs, so two bots cannot swap names in one request.
    async fn bulk_update(&self, updates: Vec<(i32, BotPatch)>) -> AppResult<BulkModified>;

    /// Delete the bots with these ids, ignoring unknown ids
    async fn bulk_delete(&self, ids: Vec<i32>) -> AppResult<BulkDeleted>;
}

pub struct BotManager {
    persistence: Persistence,
}

impl BotManager {
    pub fn new(persistence: Persistence) -> Self {
        Self { persistence }
    }
}

/// Names that appear more than once, in first-seen order.
fn duplicate_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = BTreeSet::new();
    let mut duplicates = Vec::new();
    for name in names {
        if !seen.insert(name) && !duplicates.contains(&name) {
            duplicates.push(name);
        }
    }
    duplicates
}

fn reject_duplicates<'a>(names: impl IntoIterator<Item = &'a str>) -> AppResult<()> {
    let duplicates = duplicate_names(names);
    if duplicates.is_empty() {
        return Ok(());
    }
    Err(AppError::validation(format!(
        "Duplicate names found in request: {}",
        duplicates.join(", ")
    )))
}

#[async_trait]
impl BotService for BotManager {
    async fn list(&self, query: &ListQuery) -> AppResult<PaginatedResult<Bot>> {
        list_items::<Bot, _>(&*self.persistence.bots, query, ListLimits::LISTING).await
    }

    async fn list_all(&self, query: &ListQuery) -> AppResult<PaginatedResult<Bot>> {
        list_all_items::<Bot, _>(&*self.persistence.bots, query).await
    }

    async fn get(&self, id: i32) -> AppResult<Bot> {
        get_item::<Bot, _>(&*self.persistence.bots, id).await
    }

    async fn create(&self, new: NewBot) -> AppResult<Bot> {
        assert_unique::<Bot, _, _>(&*self.persistence.bots, &new, BOT_UNIQUE_FIELDS, None).await?;
        let bot = self.persistence.bots.insert(new).await?;
        tracing::info!(bot_id = bot.id, name = %bot.name, "Bot created");
        Ok(bot)
    }

    async fn update(&self, id: i32, patch: BotPatch) -> AppResult<Bot> {
        assert_unique::<Bot, _, _>(&*self.persistence.bots, &patch, BOT_UNIQUE_FIELDS, Some(id))
            .await?;
        self.persistence.bots.update(id, patch).await
    }

    async fn delete(&self, id: i32) -> AppResult<Bot> {
        let bot = self.get(id).await?;
        self.persistence.bots.delete(id).await?;
        tracing::info!(bot_id = id, "Bot deleted");
        Ok(bot)
    }

    async fn bulk_create(&self, bots: Vec<NewBot>) -> AppResult<BulkCreated> {
        reject_duplicates(bots.iter().map(|bot| bot.name.as_str()))?;

        let store = &*self.persistence.bots;
        parallel::join_all(
            bots.iter()
                .map(|bot| assert_unique::<Bot, _, _>(store, bot, BOT_UNIQUE_FIELDS, None))
                .collect(),
        )
        .await?;

        let items = store.insert_many(bots).await?;
        tracing::info!(count = items.len(), "Bots created in bulk");
        Ok(BulkCreated {
            created: items.len(),
            items,
        })
    }

    async fn bulk_update(&self, updates: Vec<(i32, BotPatch)>) -> AppResult<BulkModified> {
        reject_duplicates(updates.iter().filter_map(|(_, patch)| patch.name.as_deref()))?;

        let store = &*self.persistence.bots;
        parallel::join_all(
            updates
                .iter()
                .map(|(id, patch)| {
                    assert_unique::<Bot, _, _>(store, patch, BOT_UNIQUE_FIELDS, Some(*id))
                })
                .collect(),
        )
        .await?;

        let items = store.update_many(updates).await?;
        Ok(BulkModified {
            modified: items.len(),
            items,
        })
    }

    async fn bulk_delete(&self, ids: Vec<i32>) -> AppResult<BulkDeleted> {
        let Some(predicate) =
            Predicate::any(ids.into_iter().map(|id| Predicate::Eq(ID_FIELD, id.into())).collect())
        else {
            return Ok(BulkDeleted {
                deleted: 0,
                items: Vec::new(),
            });
        };

        let items = self.persistence.bots.delete_where(&predicate).await?;
        tracing::info!(count = items.len(), "Bots deleted in bulk");
        Ok(BulkDeleted {
            deleted: items.len(),
            items,
        })
    }
}
