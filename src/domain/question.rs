//! Questions: lookup, CRUD, and navigation to authors, replies, followers and likers.

use crate::db::Database;
use crate::domain::ids::{QuestionId, UserId};
use crate::domain::{
    self, FullName, Like, QuestionFollow, QuestionRanking, Record, Reply, ReplyTree, User,
};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use tracing::debug;

/// A row of `questions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    id: Option<QuestionId>,
    pub title: String,
    pub body: String,
    /// `questions.user_id`.
    pub author_id: UserId,
}

impl Record for Question {
    const ENTITY: &'static str = "question";
    const TABLE: &'static str = "questions";
    const COLUMNS: &'static str = "questions.id AS id, questions.title AS title, \
         questions.body AS body, questions.user_id AS user_id";
}

impl<'r> FromRow<'r, SqliteRow> for Question {
    fn from_row(row: &'r SqliteRow) -> std::result::Result<Self, sqlx::Error> {
        Ok(Question {
            id: Some(QuestionId::new(row.try_get("id")?)),
            title: row.try_get("title")?,
            body: row.try_get("body")?,
            author_id: UserId::new(row.try_get("user_id")?),
        })
    }
}

impl Question {
    pub fn new(title: impl Into<String>, body: impl Into<String>, author_id: UserId) -> Self {
        Question {
            id: None,
            title: title.into(),
            body: body.into(),
            author_id,
        }
    }

    pub fn id(&self) -> Option<QuestionId> {
        self.id
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    fn persisted_id(&self) -> Result<QuestionId> {
        domain::require_id(Self::ENTITY, self.id)
    }

    pub async fn all(db: &Database) -> Result<Vec<Question>> {
        domain::all(db).await
    }

    pub async fn find_by_id(db: &Database, id: QuestionId) -> Result<Question> {
        domain::find_by_id(db, id.as_i64()).await
    }

    pub async fn find_by_author_id(db: &Database, author_id: UserId) -> Result<Vec<Question>> {
        let sql = format!(
            "SELECT {} FROM questions WHERE user_id = ? ORDER BY id ASC",
            Self::COLUMNS
        );
        domain::fetch_many(db, &sql, &[author_id.into()]).await
    }

    /// Insert this question and assign its id.
    ///
    /// # Errors
    /// `AlreadyPersisted` if the question already has an id.
    pub async fn create(&mut self, db: &Database) -> Result<QuestionId> {
        domain::ensure_transient(Self::ENTITY, self.id.map(|id| id.as_i64()))?;
        let id = db
            .insert(
                "INSERT INTO questions (title, body, user_id) VALUES (?, ?, ?)",
                &[
                    self.title.as_str().into(),
                    self.body.as_str().into(),
                    self.author_id.into(),
                ],
            )
            .await?;
        let id = QuestionId::new(id);
        self.id = Some(id);
        debug!(question_id = %id, author_id = %self.author_id, "created question");
        Ok(id)
    }

    /// # Errors
    /// `NotPersisted` if the question has no id, `NotFound` if its row is gone.
    pub async fn update(&self, db: &Database) -> Result<()> {
        let id = self.persisted_id()?;
        let changed = db
            .execute(
                "UPDATE questions SET title = ?, body = ?, user_id = ? WHERE id = ?",
                &[
                    self.title.as_str().into(),
                    self.body.as_str().into(),
                    self.author_id.into(),
                    id.into(),
                ],
            )
            .await?;
        domain::ensure_updated(Self::ENTITY, id.as_i64(), changed)?;
        debug!(question_id = %id, "updated question");
        Ok(())
    }

    pub async fn author(&self, db: &Database) -> Result<User> {
        User::find_by_id(db, self.author_id).await
    }

    pub async fn replies(&self, db: &Database) -> Result<Vec<Reply>> {
        Reply::find_by_question_id(db, self.persisted_id()?).await
    }

    /// All replies of this question arranged by parent.
    pub async fn reply_tree(&self, db: &Database) -> Result<ReplyTree> {
        ReplyTree::for_question(db, self.persisted_id()?).await
    }

    pub async fn followers(&self, db: &Database) -> Result<Vec<User>> {
        QuestionFollow::followers_for_question_id(db, self.persisted_id()?).await
    }

    pub async fn likers(&self, db: &Database) -> Result<Vec<FullName>> {
        Like::likers_for_question_id(db, self.persisted_id()?).await
    }

    /// Sum of like counts; 0 when nobody liked the question.
    pub async fn num_likes(&self, db: &Database) -> Result<i64> {
        Like::num_likes_for_question_id(db, self.persisted_id()?).await
    }

    pub async fn most_followed(db: &Database, n: u32) -> Result<Vec<QuestionRanking>> {
        QuestionFollow::most_followed_questions(db, n).await
    }

    pub async fn most_liked(db: &Database, n: u32) -> Result<Vec<QuestionRanking>> {
        Like::most_liked_questions(db, n).await
    }
}
