//! SeaORM backed store.

use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr,
    EntityTrait, IntoActiveModel, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait,
};

use super::entities::account;
use super::store::{AccountStore, Store};
use crate::config::MAX_ROW_OFFSET;
use crate::domain::{Account, Record};
use crate::errors::{AppError, AppResult};
use crate::query::{Direction, Predicate, SortOrder, Value, ID_FIELD};

/// Maps a domain record onto its SeaORM entity.
pub trait SeaRecord: Record {
    type Entity: EntityTrait;
    type ActiveModel: ActiveModelTrait<Entity = Self::Entity> + ActiveModelBehavior + Send + 'static;

    /// Column behind a public field name
    fn column(field: &str) -> Option<<Self::Entity as EntityTrait>::Column>;

    fn from_model(model: <Self::Entity as EntityTrait>::Model) -> Self;

    fn insert_model(new: Self::New, now: DateTime<Utc>) -> Self::ActiveModel;

    /// Active model carrying the id and only the patched columns
    fn update_model(id: i32, patch: Self::Patch, now: DateTime<Utc>) -> Self::ActiveModel;
}

type ColumnOf<T> = <<T as SeaRecord>::Entity as EntityTrait>::Column;

impl From<Value> for sea_orm::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Text(text) => text.into(),
            Value::Integer(number) => number.into(),
            Value::Boolean(flag) => flag.into(),
            Value::Timestamp(ts) => ts.into(),
        }
    }
}

/// Store backed by a SeaORM connection
pub struct SeaStore<T> {
    db: DatabaseConnection,
    _record: PhantomData<fn() -> T>,
}

impl<T> SeaStore<T> {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            _record: PhantomData,
        }
    }
}

fn column<T: SeaRecord>(field: &str) -> AppResult<ColumnOf<T>> {
    T::column(field)
        .ok_or_else(|| AppError::internal(format!("{} has no column named {}", T::NAME, field)))
}

/// Escape LIKE wildcards so the needle only matches literally.
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Translate a predicate into a SeaORM condition. Values are always bound
/// as parameters.
fn condition<T: SeaRecord>(predicate: &Predicate) -> AppResult<Condition> {
    let condition = match predicate {
        Predicate::Eq(field, value) => {
            Condition::all().add(column::<T>(field)?.eq(sea_orm::Value::from(value.clone())))
        }
        Predicate::Ne(field, value) => {
            Condition::all().add(column::<T>(field)?.ne(sea_orm::Value::from(value.clone())))
        }
        Predicate::Contains(field, needle) => {
            let col = column::<T>(field)?;
            Condition::all().add(
                Expr::expr(Func::lower(Expr::col((T::Entity::default(), col))))
                    .like(LikeExpr::new(like_pattern(needle)).escape('\\')),
            )
        }
        Predicate::And(branches) => branches
            .iter()
            .try_fold(Condition::all(), |acc, branch| {
                Ok::<_, AppError>(acc.add(condition::<T>(branch)?))
            })?,
        Predicate::Or(branches) => branches
            .iter()
            .try_fold(Condition::any(), |acc, branch| {
                Ok::<_, AppError>(acc.add(condition::<T>(branch)?))
            })?,
    };
    Ok(condition)
}

fn filtered<T: SeaRecord>(predicate: Option<&Predicate>) -> AppResult<sea_orm::Select<T::Entity>> {
    let mut select = T::Entity::find();
    if let Some(predicate) = predicate {
        select = select.filter(condition::<T>(predicate)?);
    }
    Ok(select)
}

/// Ordered, bounded select for one page. The offset is clamped to what the
/// driver can bind.
fn page_select<T: SeaRecord>(
    predicate: Option<&Predicate>,
    order: SortOrder,
    offset: u64,
    limit: u64,
) -> AppResult<sea_orm::Select<T::Entity>> {
    let direction = match order.direction {
        Direction::Asc => Order::Asc,
        Direction::Desc => Order::Desc,
    };

    Ok(filtered::<T>(predicate)?
        .order_by(column::<T>(order.field)?, direction)
        .order_by(column::<T>(ID_FIELD)?, Order::Asc)
        .offset(offset.min(MAX_ROW_OFFSET))
        .limit(limit))
}

fn not_found_on_missing_row(err: DbErr) -> AppError {
    match err {
        DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => AppError::NotFound,
        other => AppError::from(other),
    }
}

#[async_trait]
impl<T> Store<T> for SeaStore<T>
where
    T: SeaRecord,
    <T::Entity as EntityTrait>::Model: IntoActiveModel<T::ActiveModel> + Send + Sync,
{
    async fn find_one(&self, predicate: &Predicate) -> AppResult<Option<T>> {
        let model = filtered::<T>(Some(predicate))?.one(&self.db).await?;
        Ok(model.map(T::from_model))
    }

    async fn find_many(
        &self,
        predicate: Option<&Predicate>,
        order: SortOrder,
        offset: u64,
        limit: u64,
    ) -> AppResult<Vec<T>> {
        let models = page_select::<T>(predicate, order, offset, limit)?
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(T::from_model).collect())
    }

    async fn count(&self, predicate: Option<&Predicate>) -> AppResult<u64> {
        Ok(filtered::<T>(predicate)?.count(&self.db).await?)
    }

    async fn insert(&self, new: T::New) -> AppResult<T> {
        let model = T::insert_model(new, Utc::now()).insert(&self.db).await?;
        Ok(T::from_model(model))
    }

    async fn insert_many(&self, news: Vec<T::New>) -> AppResult<Vec<T>> {
        let now = Utc::now();
        let txn = self.db.begin().await?;

        let mut created = Vec::with_capacity(news.len());
        for new in news {
            let model = T::insert_model(new, now).insert(&txn).await?;
            created.push(T::from_model(model));
        }

        txn.commit().await?;
        Ok(created)
    }

    async fn update(&self, id: i32, patch: T::Patch) -> AppResult<T> {
        let model = T::update_model(id, patch, Utc::now())
            .update(&self.db)
            .await
            .map_err(not_found_on_missing_row)?;
        Ok(T::from_model(model))
    }

    async fn update_many(&self, patches: Vec<(i32, T::Patch)>) -> AppResult<Vec<T>> {
        let now = Utc::now();
        let txn = self.db.begin().await?;

        let mut updated = Vec::with_capacity(patches.len());
        for (id, patch) in patches {
            let model = T::update_model(id, patch, now)
                .update(&txn)
                .await
                .map_err(not_found_on_missing_row)?;
            updated.push(T::from_model(model));
        }

        txn.commit().await?;
        Ok(updated)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = T::Entity::delete_many()
            .filter(column::<T>(ID_FIELD)?.eq(id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn delete_where(&self, predicate: &Predicate) -> AppResult<Vec<T>> {
        let condition = condition::<T>(predicate)?;
        let txn = self.db.begin().await?;

        let doomed = T::Entity::find()
            .filter(condition.clone())
            .all(&txn)
            .await?;
        T::Entity::delete_many().filter(condition).exec(&txn).await?;

        txn.commit().await?;
        Ok(doomed.into_iter().map(T::from_model).collect())
    }
}

#[async_trait]
impl AccountStore for SeaStore<Account> {
    async fn increment_login_attempts(&self, id: i32) -> AppResult<i32> {
        let updated = account::Entity::update_many()
            .col_expr(
                account::Column::LoginAttempts,
                Expr::col(account::Column::LoginAttempts).add(1),
            )
            .col_expr(account::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(account::Column::Id.eq(id))
            .exec_with_returning(&self.db)
            .await?;

        updated
            .into_iter()
            .next()
            .map(|model| model.login_attempts)
            .ok_or(AppError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Bot;
    use crate::query::{parse_list_options, ListLimits, ListQuery};
    use sea_orm::{DbBackend, QueryTrait};

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("Bot"), "%bot%");
        assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }

    #[test]
    fn test_page_select_binds_huge_offset_as_signed() {
        let query = ListQuery::from([("page", "100000000000000000"), ("limit", "100")]);
        let options = parse_list_options(&query, <Bot as Record>::schema(), ListLimits::LISTING);

        let statement = page_select::<Bot>(None, options.sort, options.offset(), options.limit)
            .unwrap()
            .build(DbBackend::Postgres);

        let values = statement.values.unwrap().0;
        assert!(values.contains(&sea_orm::Value::BigUnsigned(Some(MAX_ROW_OFFSET))));
        for value in values {
            if let sea_orm::Value::BigUnsigned(Some(bound)) = value {
                assert!(i64::try_from(bound).is_ok());
            }
        }

        // Past the cap the offset stops growing instead of overflowing
        let statement = page_select::<Bot>(None, options.sort, u64::MAX, 100)
            .unwrap()
            .build(DbBackend::Postgres);
        assert!(statement
            .values
            .unwrap()
            .0
            .contains(&sea_orm::Value::BigUnsigned(Some(MAX_ROW_OFFSET))));
    }

    #[test]
    fn test_condition_binds_values() {
        let predicate = Predicate::And(vec![
            Predicate::Eq("isActive", Value::Boolean(true)),
            Predicate::Or(vec![
                Predicate::Contains("name", "x'; DROP TABLE bots; --".into()),
                Predicate::Contains("description", "x".into()),
            ]),
        ]);

        let statement = filtered::<Bot>(Some(&predicate))
            .unwrap()
            .build(DbBackend::Postgres);

        assert!(!statement.sql.contains("DROP TABLE"));
        assert!(statement.sql.contains("LOWER"));
        assert!(statement.sql.contains(" OR "));
        assert_eq!(statement.values.unwrap().0.len(), 3);
    }

    #[test]
    fn test_unknown_column_is_an_error() {
        let predicate = Predicate::Eq("password", Value::Text("x".into()));
        assert!(matches!(
            filtered::<Bot>(Some(&predicate)),
            Err(AppError::Internal(_))
        ));
    }
}
