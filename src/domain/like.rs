//! Question likes: a like count given by a user to a question.

use crate::db::{Database, Value};
use crate::domain::ids::{LikeId, QuestionId, UserId};
use crate::domain::{self, FullName, QuestionRanking, Record};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use tracing::debug;

/// A row of `question_likes`.
///
/// A user may hold several like rows for one question; their counts add up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    id: Option<LikeId>,
    pub question_id: QuestionId,
    pub user_id: UserId,
    pub likes: i64,
}

impl Record for Like {
    const ENTITY: &'static str = "like";
    const TABLE: &'static str = "question_likes";
    const COLUMNS: &'static str = "question_likes.id AS id, \
         question_likes.question_id AS question_id, question_likes.user_id AS user_id, \
         question_likes.likes AS likes";
}

impl<'r> FromRow<'r, SqliteRow> for Like {
    fn from_row(row: &'r SqliteRow) -> std::result::Result<Self, sqlx::Error> {
        Ok(Like {
            id: Some(LikeId::new(row.try_get("id")?)),
            question_id: QuestionId::new(row.try_get("question_id")?),
            user_id: UserId::new(row.try_get("user_id")?),
            likes: row.try_get("likes")?,
        })
    }
}

impl Like {
    pub fn new(question_id: QuestionId, user_id: UserId, likes: i64) -> Self {
        Like {
            id: None,
            question_id,
            user_id,
            likes,
        }
    }

    pub fn id(&self) -> Option<LikeId> {
        self.id
    }

    fn persisted_id(&self) -> Result<LikeId> {
        domain::require_id(Self::ENTITY, self.id)
    }

    pub async fn all(db: &Database) -> Result<Vec<Like>> {
        domain::all(db).await
    }

    pub async fn find_by_id(db: &Database, id: LikeId) -> Result<Like> {
        domain::find_by_id(db, id.as_i64()).await
    }

    /// Insert this like and assign its id.
    ///
    /// # Errors
    /// `AlreadyPersisted` if the like already has an id.
    pub async fn create(&mut self, db: &Database) -> Result<LikeId> {
        domain::ensure_transient(Self::ENTITY, self.id.map(|id| id.as_i64()))?;
        let id = db
            .insert(
                "INSERT INTO question_likes (question_id, likes, user_id) VALUES (?, ?, ?)",
                &[
                    self.question_id.into(),
                    Value::Integer(self.likes),
                    self.user_id.into(),
                ],
            )
            .await?;
        let id = LikeId::new(id);
        self.id = Some(id);
        debug!(like_id = %id, question_id = %self.question_id, likes = self.likes, "created like");
        Ok(id)
    }

    /// # Errors
    /// `NotPersisted` if the like has no id, `NotFound` if its row is gone.
    pub async fn update(&self, db: &Database) -> Result<()> {
        let id = self.persisted_id()?;
        let changed = db
            .execute(
                "UPDATE question_likes SET question_id = ?, likes = ?, user_id = ? WHERE id = ?",
                &[
                    self.question_id.into(),
                    Value::Integer(self.likes),
                    self.user_id.into(),
                    id.into(),
                ],
            )
            .await?;
        domain::ensure_updated(Self::ENTITY, id.as_i64(), changed)?;
        debug!(like_id = %id, likes = self.likes, "updated like");
        Ok(())
    }

    /// Names of the users who liked `question_id`, in user id order.
    pub async fn likers_for_question_id(
        db: &Database,
        question_id: QuestionId,
    ) -> Result<Vec<FullName>> {
        domain::fetch_many(
            db,
            r#"
            SELECT DISTINCT users.id, users.fname AS fname, users.lname AS lname
            FROM question_likes
            JOIN users ON users.id = question_likes.user_id
            WHERE question_likes.question_id = ?
            ORDER BY users.id ASC
            "#,
            &[question_id.into()],
        )
        .await
    }

    /// Summed like count for `question_id`; 0 without likes.
    pub async fn num_likes_for_question_id(db: &Database, question_id: QuestionId) -> Result<i64> {
        let rows = db
            .fetch_all(
                "SELECT COALESCE(SUM(likes), 0) AS total FROM question_likes WHERE question_id = ?",
                &[question_id.into()],
            )
            .await?;
        match rows.first() {
            Some(row) => Ok(row.try_get::<i64, _>("total")?),
            None => Ok(0),
        }
    }

    /// Titles of the questions liked by `user_id`, in question id order.
    pub async fn liked_questions_for_user_id(
        db: &Database,
        user_id: UserId,
    ) -> Result<Vec<String>> {
        let rows = db
            .fetch_all(
                r#"
                SELECT DISTINCT questions.id, questions.title AS title
                FROM question_likes
                JOIN questions ON questions.id = question_likes.question_id
                WHERE question_likes.user_id = ?
                ORDER BY questions.id ASC
                "#,
                &[user_id.into()],
            )
            .await?;
        let titles = rows
            .iter()
            .map(|row| row.try_get::<String, _>("title"))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(titles)
    }

    /// The `n` questions with the highest summed like count.
    ///
    /// Equal sums are ordered by question id.
    pub async fn most_liked_questions(db: &Database, n: u32) -> Result<Vec<QuestionRanking>> {
        domain::fetch_many(
            db,
            r#"
            SELECT
                questions.id AS question_id,
                questions.title AS title,
                SUM(question_likes.likes) AS total
            FROM question_likes
            JOIN questions ON questions.id = question_likes.question_id
            GROUP BY questions.id, questions.title
            ORDER BY total DESC, questions.id ASC
            LIMIT ?
            "#,
            &[Value::Integer(i64::from(n))],
        )
        .await
    }
}
