//! Question follows: which users follow which questions.

use crate::db::{Database, Value};
use crate::domain::ids::{FollowId, QuestionId, UserId};
use crate::domain::{self, Question, QuestionRanking, Record, User};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use tracing::debug;

/// A row of `question_follows`.
///
/// Duplicate (user, question) rows are tolerated; every query counts a
/// follower once per question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionFollow {
    id: Option<FollowId>,
    pub question_id: QuestionId,
    pub user_id: UserId,
}

impl Record for QuestionFollow {
    const ENTITY: &'static str = "question follow";
    const TABLE: &'static str = "question_follows";
    const COLUMNS: &'static str = "question_follows.id AS id, \
         question_follows.question_id AS question_id, question_follows.user_id AS user_id";
}

impl<'r> FromRow<'r, SqliteRow> for QuestionFollow {
    fn from_row(row: &'r SqliteRow) -> std::result::Result<Self, sqlx::Error> {
        Ok(QuestionFollow {
            id: Some(FollowId::new(row.try_get("id")?)),
            question_id: QuestionId::new(row.try_get("question_id")?),
            user_id: UserId::new(row.try_get("user_id")?),
        })
    }
}

impl QuestionFollow {
    pub fn new(question_id: QuestionId, user_id: UserId) -> Self {
        QuestionFollow {
            id: None,
            question_id,
            user_id,
        }
    }

    pub fn id(&self) -> Option<FollowId> {
        self.id
    }

    pub async fn all(db: &Database) -> Result<Vec<QuestionFollow>> {
        domain::all(db).await
    }

    pub async fn find_by_id(db: &Database, id: FollowId) -> Result<QuestionFollow> {
        domain::find_by_id(db, id.as_i64()).await
    }

    /// Insert this follow and assign its id.
    ///
    /// # Errors
    /// `AlreadyPersisted` if the follow already has an id.
    pub async fn create(&mut self, db: &Database) -> Result<FollowId> {
        domain::ensure_transient(Self::ENTITY, self.id.map(|id| id.as_i64()))?;
        let id = db
            .insert(
                "INSERT INTO question_follows (question_id, user_id) VALUES (?, ?)",
                &[self.question_id.into(), self.user_id.into()],
            )
            .await?;
        let id = FollowId::new(id);
        self.id = Some(id);
        debug!(
            follow_id = %id,
            question_id = %self.question_id,
            user_id = %self.user_id,
            "created follow"
        );
        Ok(id)
    }

    /// Users following `question_id`, in user id order.
    pub async fn followers_for_question_id(
        db: &Database,
        question_id: QuestionId,
    ) -> Result<Vec<User>> {
        let sql = format!(
            r#"
            SELECT DISTINCT {}
            FROM question_follows
            JOIN users ON users.id = question_follows.user_id
            WHERE question_follows.question_id = ?
            ORDER BY users.id ASC
            "#,
            User::COLUMNS
        );
        domain::fetch_many(db, &sql, &[question_id.into()]).await
    }

    /// Questions followed by `user_id`, in question id order.
    pub async fn followed_questions_for_user_id(
        db: &Database,
        user_id: UserId,
    ) -> Result<Vec<Question>> {
        let sql = format!(
            r#"
            SELECT DISTINCT {}
            FROM question_follows
            JOIN users ON users.id = question_follows.user_id
            JOIN questions ON questions.id = question_follows.question_id
            WHERE question_follows.user_id = ?
            ORDER BY questions.id ASC
            "#,
            Question::COLUMNS
        );
        domain::fetch_many(db, &sql, &[user_id.into()]).await
    }

    /// The `n` questions with the most distinct followers.
    ///
    /// Equal counts are ordered by question id.
    pub async fn most_followed_questions(db: &Database, n: u32) -> Result<Vec<QuestionRanking>> {
        domain::fetch_many(
            db,
            r#"
            SELECT
                questions.id AS question_id,
                questions.title AS title,
                COUNT(DISTINCT question_follows.user_id) AS total
            FROM question_follows
            JOIN questions ON questions.id = question_follows.question_id
            GROUP BY questions.id, questions.title
            ORDER BY total DESC, questions.id ASC
            LIMIT ?
            "#,
            &[Value::Integer(i64::from(n))],
        )
        .await
    }
}
