//! Relational data store backed by SeaORM
//!
//! Specifications built only from `Where` conditions and field orderings are
//! pushed down as SQL (`WHERE`, `ORDER BY`, `LIMIT`/`OFFSET`, `COUNT`).
//! Anything else falls back to loading the table and running the in-memory
//! evaluator, so both paths return the same rows.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, ColumnType, Condition, DatabaseConnection,
    DatabaseTransaction, DbErr, EntityTrait, IntoActiveModel, Iterable, PaginatorTrait,
    PrimaryKeyToColumn, PrimaryKeyTrait, QueryFilter, QueryOrder, QuerySelect, Select,
    TransactionTrait, Value,
};
use tracing::{debug, warn};

use crate::domain::query::{
    evaluate, Condition as Clause, Criteria, FieldValue, Operator, OrderRule, Specification,
};
use crate::domain::{DataStore, DomainError, DomainResult, Entity, StoredIn};

pub(crate) fn db_err(e: DbErr) -> DomainError {
    DomainError::Persistence(format!("Database error: {}", e))
}

/// SeaORM connection pool usable as a unit-of-work store.
#[derive(Clone)]
pub struct SeaOrmStore {
    db: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DataStore for SeaOrmStore {
    type Transaction = DatabaseTransaction;

    async fn begin(&self) -> DomainResult<DatabaseTransaction> {
        self.db.begin().await.map_err(db_err)
    }

    async fn commit(&self, tx: DatabaseTransaction) -> DomainResult<()> {
        tx.commit().await.map_err(db_err)
    }
}

type DbEntity<T> = <T as SeaOrmMapped>::Db;
type DbModel<T> = <DbEntity<T> as EntityTrait>::Model;
type DbColumn<T> = <DbEntity<T> as EntityTrait>::Column;
type DbKey<T> = <<DbEntity<T> as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType;

/// Maps a domain entity onto its SeaORM entity.
///
/// Field names used in criteria must match the column names.
pub trait SeaOrmMapped: Entity {
    type Db: EntityTrait;
    type Active: ActiveModelTrait<Entity = Self::Db> + ActiveModelBehavior + Send + 'static;

    fn from_model(model: DbModel<Self>) -> Self;

    /// Every column set, so the model can be inserted or fully updated.
    fn to_active_model(&self) -> Self::Active;

    fn primary_key(id: &Self::Id) -> DbKey<Self>;
}

/// Escapes LIKE wildcards so the needle matches literally.
fn like_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '%' | '_' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            c => out.push(c),
        }
    }
    out
}

fn like_contains(s: &str) -> LikeExpr {
    LikeExpr::new(format!("%{}%", like_escape(s))).escape('\\')
}

fn is_text(column_type: &ColumnType) -> bool {
    matches!(
        column_type,
        ColumnType::String(_) | ColumnType::Text | ColumnType::Char(_)
    )
}

fn to_value(value: &FieldValue) -> Option<Value> {
    Some(match value {
        FieldValue::Null => return None,
        FieldValue::Bool(v) => (*v).into(),
        FieldValue::Int(v) => (*v).into(),
        FieldValue::Decimal(v) => (*v).into(),
        FieldValue::Text(v) => v.clone().into(),
        FieldValue::Timestamp(v) => (*v).into(),
    })
}

/// SQL for one clause, with the same null handling as the in-memory
/// evaluator: `Ne` keeps null rows, ordered comparisons never match them.
fn clause_expr<C: ColumnTrait>(clause: &Clause) -> Option<SimpleExpr> {
    let column = C::from_str(clause.field).ok()?;

    if clause.op == Operator::Contains {
        let FieldValue::Text(needle) = &clause.value else {
            return None;
        };
        // never true in memory for non-text fields
        if !is_text(column.def().get_column_type()) {
            return None;
        }
        let pattern = like_contains(&needle.to_lowercase());
        return Some(Expr::expr(Func::lower(Expr::col(column))).like(pattern));
    }

    if clause.value == FieldValue::Null {
        return match clause.op {
            Operator::Eq => Some(column.is_null()),
            Operator::Ne => Some(column.is_not_null()),
            _ => None,
        };
    }

    let value = to_value(&clause.value)?;
    Some(match clause.op {
        Operator::Eq => column.eq(value),
        Operator::Ne => column.ne(value).or(column.is_null()),
        Operator::Gt => column.gt(value),
        Operator::Gte => column.gte(value),
        Operator::Lt => column.lt(value),
        Operator::Lte => column.lte(value),
        Operator::Contains => return None,
    })
}

/// `None` when any node cannot be expressed in SQL.
fn to_condition<T, C: ColumnTrait>(criteria: &Criteria<T>) -> Option<Condition> {
    match criteria {
        Criteria::Where(clause) => clause_expr::<C>(clause).map(|e| Condition::all().add(e)),
        Criteria::Custom(_) => None,
        Criteria::All(items) => items
            .iter()
            .try_fold(Condition::all(), |acc, c| Some(acc.add(to_condition::<T, C>(c)?))),
        Criteria::Any(items) if items.is_empty() => None,
        Criteria::Any(items) => items
            .iter()
            .try_fold(Condition::any(), |acc, c| Some(acc.add(to_condition::<T, C>(c)?))),
        Criteria::Not(inner) => to_condition::<T, C>(inner).map(Condition::not),
    }
}

fn order_column<T, C: ColumnTrait>(rule: &OrderRule<T>) -> Option<C> {
    match rule {
        OrderRule::Field(name) => C::from_str(name).ok(),
        OrderRule::Key(_) => None,
    }
}

fn filtered<T: SeaOrmMapped>(spec: &Specification<T>) -> Option<Select<DbEntity<T>>> {
    let select = <DbEntity<T> as EntityTrait>::find();
    match spec.criteria() {
        Some(criteria) => Some(select.filter(to_condition::<T, DbColumn<T>>(criteria)?)),
        None => Some(select),
    }
}

/// The whole specification as one query, or `None` to fall back.
///
/// Descending key first, then ascending, then primary key, which is the
/// order the in-memory evaluator produces.
fn translate<T: SeaOrmMapped>(spec: &Specification<T>) -> Option<Select<DbEntity<T>>> {
    let mut select = filtered(spec)?;

    if let Some(rule) = spec.order_by_descending() {
        select = select.order_by_desc(order_column::<T, DbColumn<T>>(rule)?);
    }
    if let Some(rule) = spec.order_by() {
        select = select.order_by_asc(order_column::<T, DbColumn<T>>(rule)?);
    }
    select = by_primary_key::<T>(select);

    if spec.is_paginated() {
        select = select.offset(spec.skip() as u64).limit(spec.take() as u64);
    }
    Some(select)
}

fn by_primary_key<T: SeaOrmMapped>(mut select: Select<DbEntity<T>>) -> Select<DbEntity<T>> {
    for key in <<DbEntity<T> as EntityTrait>::PrimaryKey as Iterable>::iter() {
        select = select.order_by_asc(key.into_column());
    }
    select
}

#[async_trait]
impl<T> StoredIn<SeaOrmStore> for T
where
    T: SeaOrmMapped,
    DbModel<T>: IntoActiveModel<T::Active> + Send + Sync,
{
    async fn fetch_all(store: &SeaOrmStore) -> DomainResult<Vec<T>> {
        let select = by_primary_key::<T>(<DbEntity<T> as EntityTrait>::find());
        let models = select.all(&store.db).await.map_err(db_err)?;
        Ok(models.into_iter().map(T::from_model).collect())
    }

    async fn fetch_by_id(store: &SeaOrmStore, id: &T::Id) -> DomainResult<Option<T>> {
        let model = <DbEntity<T> as EntityTrait>::find_by_id(T::primary_key(id))
            .one(&store.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(T::from_model))
    }

    async fn fetch_matching(store: &SeaOrmStore, spec: &Specification<T>) -> DomainResult<Vec<T>> {
        let Some(select) = translate(spec) else {
            debug!(entity = T::NAME, "Specification not translatable, evaluating in memory");
            let rows = Self::fetch_all(store).await?;
            return Ok(evaluate(rows, spec));
        };
        let models = select.all(&store.db).await.map_err(db_err)?;
        Ok(models.into_iter().map(T::from_model).collect())
    }

    async fn count_matching(store: &SeaOrmStore, spec: &Specification<T>) -> DomainResult<usize> {
        let Some(select) = filtered(spec) else {
            let rows = Self::fetch_all(store).await?;
            return Ok(crate::domain::query::count_matching(&rows, spec));
        };
        let count = select.count(&store.db).await.map_err(db_err)?;
        Ok(count as usize)
    }

    async fn insert(tx: &mut DatabaseTransaction, entity: T) -> DomainResult<()> {
        <DbEntity<T> as EntityTrait>::insert(entity.to_active_model())
            .exec_without_returning(&*tx)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn update(tx: &mut DatabaseTransaction, entity: T) -> DomainResult<()> {
        match entity.to_active_model().update(&*tx).await {
            Ok(_) => Ok(()),
            Err(DbErr::RecordNotUpdated) | Err(DbErr::RecordNotFound(_)) => {
                warn!(entity = T::NAME, id = %entity.id(), "Update matched no row");
                Err(DomainError::not_found(T::NAME, "id", entity.id()))
            }
            Err(e) => Err(db_err(e)),
        }
    }

    async fn delete(tx: &mut DatabaseTransaction, id: T::Id) -> DomainResult<()> {
        let result = <DbEntity<T> as EntityTrait>::delete_by_id(T::primary_key(&id))
            .exec(&*tx)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found(T::NAME, "id", &id));
        }
        Ok(())
    }
}
