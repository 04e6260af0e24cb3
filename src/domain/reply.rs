//! Replies to questions, optionally nested under a parent reply.

use crate::db::Database;
use crate::domain::ids::{QuestionId, ReplyId, UserId};
use crate::domain::{self, Question, Record, User};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use tracing::debug;

/// A row of `replies`.
///
/// The parent link is an id, resolved through the database or a
/// [`ReplyTree`](crate::domain::ReplyTree); `None` marks a root reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    id: Option<ReplyId>,
    pub question_id: QuestionId,
    pub body: String,
    /// `replies.user_id`.
    pub author_id: UserId,
    /// `replies.reply_id`.
    pub parent_id: Option<ReplyId>,
}

impl Record for Reply {
    const ENTITY: &'static str = "reply";
    const TABLE: &'static str = "replies";
    const COLUMNS: &'static str = "replies.id AS id, replies.question_id AS question_id, \
         replies.body AS body, replies.user_id AS user_id, replies.reply_id AS reply_id";
}

impl<'r> FromRow<'r, SqliteRow> for Reply {
    fn from_row(row: &'r SqliteRow) -> std::result::Result<Self, sqlx::Error> {
        Ok(Reply {
            id: Some(ReplyId::new(row.try_get("id")?)),
            question_id: QuestionId::new(row.try_get("question_id")?),
            body: row.try_get("body")?,
            author_id: UserId::new(row.try_get("user_id")?),
            parent_id: row.try_get::<Option<i64>, _>("reply_id")?.map(ReplyId::new),
        })
    }
}

impl Reply {
    pub fn new(
        question_id: QuestionId,
        body: impl Into<String>,
        author_id: UserId,
        parent_id: Option<ReplyId>,
    ) -> Self {
        Reply {
            id: None,
            question_id,
            body: body.into(),
            author_id,
            parent_id,
        }
    }

    pub fn id(&self) -> Option<ReplyId> {
        self.id
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    fn persisted_id(&self) -> Result<ReplyId> {
        domain::require_id(Self::ENTITY, self.id)
    }

    pub async fn all(db: &Database) -> Result<Vec<Reply>> {
        domain::all(db).await
    }

    pub async fn find_by_id(db: &Database, id: ReplyId) -> Result<Reply> {
        domain::find_by_id(db, id.as_i64()).await
    }

    /// Direct children of `parent_id`, oldest first.
    pub async fn find_by_parent_id(db: &Database, parent_id: ReplyId) -> Result<Vec<Reply>> {
        let sql = format!(
            "SELECT {} FROM replies WHERE reply_id = ? ORDER BY id ASC",
            Self::COLUMNS
        );
        domain::fetch_many(db, &sql, &[parent_id.into()]).await
    }

    pub async fn find_by_user_id(db: &Database, user_id: UserId) -> Result<Vec<Reply>> {
        let sql = format!(
            "SELECT {} FROM replies WHERE user_id = ? ORDER BY id ASC",
            Self::COLUMNS
        );
        domain::fetch_many(db, &sql, &[user_id.into()]).await
    }

    pub async fn find_by_question_id(db: &Database, question_id: QuestionId) -> Result<Vec<Reply>> {
        let sql = format!(
            "SELECT {} FROM replies WHERE question_id = ? ORDER BY id ASC",
            Self::COLUMNS
        );
        domain::fetch_many(db, &sql, &[question_id.into()]).await
    }

    /// Insert this reply and assign its id.
    ///
    /// # Errors
    /// `AlreadyPersisted` if the reply already has an id.
    pub async fn create(&mut self, db: &Database) -> Result<ReplyId> {
        domain::ensure_transient(Self::ENTITY, self.id.map(|id| id.as_i64()))?;
        let id = db
            .insert(
                "INSERT INTO replies (question_id, body, user_id, reply_id) VALUES (?, ?, ?, ?)",
                &[
                    self.question_id.into(),
                    self.body.as_str().into(),
                    self.author_id.into(),
                    self.parent_id.into(),
                ],
            )
            .await?;
        let id = ReplyId::new(id);
        self.id = Some(id);
        debug!(reply_id = %id, question_id = %self.question_id, "created reply");
        Ok(id)
    }

    /// # Errors
    /// `NotPersisted` if the reply has no id, `NotFound` if its row is gone.
    pub async fn update(&self, db: &Database) -> Result<()> {
        let id = self.persisted_id()?;
        let changed = db
            .execute(
                r#"
                UPDATE replies
                SET question_id = ?, body = ?, user_id = ?, reply_id = ?
                WHERE id = ?
                "#,
                &[
                    self.question_id.into(),
                    self.body.as_str().into(),
                    self.author_id.into(),
                    self.parent_id.into(),
                    id.into(),
                ],
            )
            .await?;
        domain::ensure_updated(Self::ENTITY, id.as_i64(), changed)?;
        debug!(reply_id = %id, "updated reply");
        Ok(())
    }

    pub async fn author(&self, db: &Database) -> Result<User> {
        User::find_by_id(db, self.author_id).await
    }

    pub async fn question(&self, db: &Database) -> Result<Question> {
        Question::find_by_id(db, self.question_id).await
    }

    /// The reply this one answers, or `None` for a root reply.
    ///
    /// # Errors
    /// `NotFound` if the parent id points at no row.
    pub async fn parent_reply(&self, db: &Database) -> Result<Option<Reply>> {
        match self.parent_id {
            Some(parent_id) => Reply::find_by_id(db, parent_id).await.map(Some),
            None => Ok(None),
        }
    }

    pub async fn child_replies(&self, db: &Database) -> Result<Vec<Reply>> {
        Reply::find_by_parent_id(db, self.persisted_id()?).await
    }
}
