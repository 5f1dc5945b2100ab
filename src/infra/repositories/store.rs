//! Persistence capability shared by every backend.

use async_trait::async_trait;

use crate::domain::{Account, Record};
use crate::errors::AppResult;
use crate::query::{Predicate, SortOrder, ID_FIELD};

/// Generic store of one entity type.
///
/// Predicates and orderings refer to fields by their public names; a
/// backend resolves them to its own columns.
#[async_trait]
pub trait Store<T: Record>: Send + Sync {
    /// First record matching the predicate, if any
    async fn find_one(&self, predicate: &Predicate) -> AppResult<Option<T>>;

    /// Find a record by primary key
    async fn find_by_id(&self, id: i32) -> AppResult<Option<T>> {
        self.find_one(&Predicate::Eq(ID_FIELD, id.into())).await
    }

    /// One page of matching records in the given order
    async fn find_many(
        &self,
        predicate: Option<&Predicate>,
        order: SortOrder,
        offset: u64,
        limit: u64,
    ) -> AppResult<Vec<T>>;

    /// Number of matching records
    async fn count(&self, predicate: Option<&Predicate>) -> AppResult<u64>;

    async fn insert(&self, new: T::New) -> AppResult<T>;

    /// Insert all records or none of them
    async fn insert_many(&self, news: Vec<T::New>) -> AppResult<Vec<T>>;

    /// Apply a patch; `NotFound` when no record has this id
    async fn update(&self, id: i32, patch: T::Patch) -> AppResult<T>;

    /// Apply all patches or none of them
    async fn update_many(&self, patches: Vec<(i32, T::Patch)>) -> AppResult<Vec<T>>;

    /// Delete by primary key; `NotFound` when no record has this id
    async fn delete(&self, id: i32) -> AppResult<()>;

    /// Delete every record matching the predicate, returning the deleted ones
    async fn delete_where(&self, predicate: &Predicate) -> AppResult<Vec<T>>;
}

/// Account store with the atomic counter used by the login flow.
#[async_trait]
pub trait AccountStore: Store<Account> {
    /// Add one to the account's failed login counter in a single atomic
    /// step and return the new value.
    async fn increment_login_attempts(&self, id: i32) -> AppResult<i32>;
}
