//! In-process store used by `memory://` deployments and tests.

use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::store::{AccountStore, Store};
use crate::domain::{Account, Record};
use crate::errors::{AppError, AppResult};
use crate::query::{Predicate, SortOrder};

/// Store keeping records in a vector behind an async lock.
///
/// Every write holds the write lock for its whole duration, so each
/// operation is atomic with respect to the others.
pub struct MemoryStore<T> {
    records: RwLock<Vec<T>>,
    next_id: AtomicI32,
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            next_id: AtomicI32::new(1),
        }
    }

    fn allocate_id(&self) -> i32 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }
}

fn matching<T: Record>(records: &[T], predicate: Option<&Predicate>) -> Vec<T> {
    records
        .iter()
        .filter(|record| predicate.map_or(true, |p| p.matches(*record)))
        .cloned()
        .collect()
}

#[async_trait]
impl<T: Record> Store<T> for MemoryStore<T> {
    async fn find_one(&self, predicate: &Predicate) -> AppResult<Option<T>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|record| predicate.matches(*record)).cloned())
    }

    async fn find_many(
        &self,
        predicate: Option<&Predicate>,
        order: SortOrder,
        offset: u64,
        limit: u64,
    ) -> AppResult<Vec<T>> {
        let mut found = matching(&self.records.read().await, predicate);
        found.sort_by(|a, b| order.compare(a, b));

        Ok(found
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .collect())
    }

    async fn count(&self, predicate: Option<&Predicate>) -> AppResult<u64> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|record| predicate.map_or(true, |p| p.matches(*record)))
            .count() as u64)
    }

    async fn insert(&self, new: T::New) -> AppResult<T> {
        let mut records = self.records.write().await;
        let record = T::from_new(self.allocate_id(), new, Utc::now());
        records.push(record.clone());
        Ok(record)
    }

    async fn insert_many(&self, news: Vec<T::New>) -> AppResult<Vec<T>> {
        let mut records = self.records.write().await;
        let now = Utc::now();
        let created: Vec<T> = news
            .into_iter()
            .map(|new| T::from_new(self.allocate_id(), new, now))
            .collect();
        records.extend(created.iter().cloned());
        Ok(created)
    }

    async fn update(&self, id: i32, patch: T::Patch) -> AppResult<T> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|record| record.id() == id)
            .ok_or(AppError::NotFound)?;
        record.apply(patch, Utc::now());
        Ok(record.clone())
    }

    async fn update_many(&self, patches: Vec<(i32, T::Patch)>) -> AppResult<Vec<T>> {
        let mut records = self.records.write().await;
        if patches
            .iter()
            .any(|(id, _)| !records.iter().any(|record| record.id() == *id))
        {
            return Err(AppError::NotFound);
        }

        let now = Utc::now();
        let mut updated = Vec::with_capacity(patches.len());
        for (id, patch) in patches {
            if let Some(record) = records.iter_mut().find(|record| record.id() == id) {
                record.apply(patch, now);
                updated.push(record.clone());
            }
        }
        Ok(updated)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let mut records = self.records.write().await;
        let position = records
            .iter()
            .position(|record| record.id() == id)
            .ok_or(AppError::NotFound)?;
        records.remove(position);
        Ok(())
    }

    async fn delete_where(&self, predicate: &Predicate) -> AppResult<Vec<T>> {
        let mut records = self.records.write().await;
        let (doomed, kept): (Vec<T>, Vec<T>) = records
            .drain(..)
            .partition(|record| predicate.matches(record));
        *records = kept;
        Ok(doomed)
    }
}

#[async_trait]
impl AccountStore for MemoryStore<Account> {
    async fn increment_login_attempts(&self, id: i32) -> AppResult<i32> {
        let mut records = self.records.write().await;
        let account = records
            .iter_mut()
            .find(|account| account.id == id)
            .ok_or(AppError::NotFound)?;
        account.login_attempts += 1;
        account.updated_at = Utc::now();
        Ok(account.login_attempts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Bot, BotPatch, NewAccount, NewBot};
    use crate::query::{Direction, Value};
    use std::sync::Arc;

    fn new_bot(name: &str, active: bool) -> NewBot {
        NewBot {
            name: name.to_string(),
            description: None,
            is_active: Some(active),
        }
    }

    #[tokio::test]
    async fn test_ids_are_sequential() {
        let store = MemoryStore::<Bot>::new();
        let a = store.insert(new_bot("a", true)).await.unwrap();
        let b = store.insert(new_bot("b", true)).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));
    }

    #[tokio::test]
    async fn test_find_many_filters_sorts_and_pages() {
        let store = MemoryStore::<Bot>::new();
        for (name, active) in [("c", true), ("a", true), ("b", false), ("d", true)] {
            store.insert(new_bot(name, active)).await.unwrap();
        }

        let active = Predicate::Eq("isActive", Value::Boolean(true));
        let page = store
            .find_many(Some(&active), SortOrder::new("name", Direction::Desc), 1, 2)
            .await
            .unwrap();
        let names: Vec<_> = page.iter().map(|bot| bot.name.as_str()).collect();

        assert_eq!(names, ["c", "a"]);
        assert_eq!(store.count(Some(&active)).await.unwrap(), 3);
        assert_eq!(store.count(None).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_record() {
        let store = MemoryStore::<Bot>::new();
        assert!(matches!(
            store.update(9, BotPatch::default()).await,
            Err(AppError::NotFound)
        ));
        assert!(matches!(store.delete(9).await, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_update_many_is_all_or_nothing() {
        let store = MemoryStore::<Bot>::new();
        let bot = store.insert(new_bot("a", true)).await.unwrap();

        let patch = BotPatch {
            is_active: Some(false),
            ..Default::default()
        };
        let result = store
            .update_many(vec![(bot.id, patch.clone()), (42, patch)])
            .await;

        assert!(matches!(result, Err(AppError::NotFound)));
        assert!(store.find_by_id(bot.id).await.unwrap().unwrap().is_active);
    }

    #[tokio::test]
    async fn test_delete_where_returns_deleted() {
        let store = MemoryStore::<Bot>::new();
        store.insert(new_bot("a", true)).await.unwrap();
        store.insert(new_bot("b", false)).await.unwrap();

        let deleted = store
            .delete_where(&Predicate::Eq("isActive", Value::Boolean(false)))
            .await
            .unwrap();

        assert_eq!(deleted.len(), 1);
        assert_eq!(deleted[0].name, "b");
        assert_eq!(store.count(None).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_increments_are_not_lost() {
        let store = Arc::new(MemoryStore::<Account>::new());
        let account = store
            .insert(NewAccount {
                first_name: "Ada".into(),
                email: "ada@example.com".into(),
                ..Default::default()
            })
            .await
            .unwrap();

        let tasks: Vec<_> = (0..20)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.increment_login_attempts(account.id).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let stored = store.find_by_id(account.id).await.unwrap().unwrap();
        assert_eq!(stored.login_attempts, 20);
    }
}
