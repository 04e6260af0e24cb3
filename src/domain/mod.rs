//! Domain entities mapped onto the questions schema.
//!
//! This module provides:
//! - Entity structs with typed ids: User, Question, Reply, QuestionFollow, Like
//! - Typed row decoding for every entity and aggregate row
//! - An id-indexed arena for reply threads

pub mod follow;
pub mod ids;
pub mod like;
pub mod question;
pub mod ranking;
pub mod reply;
pub mod reply_tree;
pub mod user;

pub use follow::QuestionFollow;
pub use ids::{FollowId, LikeId, QuestionId, ReplyId, UserId};
pub use like::Like;
pub use question::Question;
pub use ranking::{FullName, QuestionRanking};
pub use reply::Reply;
pub use reply_tree::ReplyTree;
pub use user::User;

use crate::db::{Database, Value};
use crate::error::{QuestionsError, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::FromRow;

/// A type decoded from one result row of a known table.
///
/// `COLUMNS` is table-qualified and aliased so the same list works in joins.
pub trait Record: for<'r> FromRow<'r, SqliteRow> {
    /// Name used in error messages.
    const ENTITY: &'static str;
    const TABLE: &'static str;
    const COLUMNS: &'static str;
}

/// Decode every row, rejecting the batch if any row is incomplete.
pub(crate) fn hydrate<T>(rows: &[SqliteRow]) -> Result<Vec<T>>
where
    T: for<'r> FromRow<'r, SqliteRow>,
{
    rows.iter()
        .map(|row| T::from_row(row).map_err(QuestionsError::from))
        .collect()
}

pub(crate) async fn fetch_many<T>(db: &Database, sql: &str, params: &[Value<'_>]) -> Result<Vec<T>>
where
    T: for<'r> FromRow<'r, SqliteRow>,
{
    let rows = db.fetch_all(sql, params).await?;
    hydrate(&rows)
}

/// Decode the first row, or `NotFound` when the query matched nothing.
pub(crate) async fn fetch_first<T: Record>(
    db: &Database,
    sql: &str,
    params: &[Value<'_>],
    key: impl std::fmt::Display,
) -> Result<T> {
    let rows = db.fetch_all(sql, params).await?;
    match rows.first() {
        Some(row) => Ok(T::from_row(row)?),
        None => Err(QuestionsError::not_found(T::ENTITY, key)),
    }
}

pub(crate) async fn find_by_id<T: Record>(db: &Database, id: i64) -> Result<T> {
    let sql = format!("SELECT {} FROM {} WHERE id = ?", T::COLUMNS, T::TABLE);
    fetch_first(db, &sql, &[Value::Integer(id)], format!("id = {}", id)).await
}

pub(crate) async fn all<T: Record>(db: &Database) -> Result<Vec<T>> {
    let sql = format!("SELECT {} FROM {} ORDER BY id ASC", T::COLUMNS, T::TABLE);
    fetch_many(db, &sql, &[]).await
}

/// Fail with `AlreadyPersisted` when `id` is already assigned.
pub(crate) fn ensure_transient(entity: &'static str, id: Option<i64>) -> Result<()> {
    match id {
        Some(id) => Err(QuestionsError::AlreadyPersisted { entity, id }),
        None => Ok(()),
    }
}

/// The assigned id, or `NotPersisted`.
pub(crate) fn require_id<I: Copy>(entity: &'static str, id: Option<I>) -> Result<I> {
    id.ok_or(QuestionsError::NotPersisted { entity })
}

/// Map an UPDATE that touched no row to `NotFound`.
pub(crate) fn ensure_updated(entity: &'static str, id: i64, rows_affected: u64) -> Result<()> {
    if rows_affected == 0 {
        tracing::warn!(entity, id, "update matched no row");
        return Err(QuestionsError::not_found(entity, format!("id = {}", id)));
    }
    Ok(())
}
