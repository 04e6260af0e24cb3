//! Users and their authored, followed and liked content.

use crate::db::Database;
use crate::domain::ids::UserId;
use crate::domain::{self, Like, Question, QuestionFollow, Record, Reply};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use tracing::debug;

/// A row of `users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: Option<UserId>,
    pub fname: String,
    pub lname: String,
}

impl Record for User {
    const ENTITY: &'static str = "user";
    const TABLE: &'static str = "users";
    const COLUMNS: &'static str = "users.id AS id, users.fname AS fname, users.lname AS lname";
}

impl<'r> FromRow<'r, SqliteRow> for User {
    fn from_row(row: &'r SqliteRow) -> std::result::Result<Self, sqlx::Error> {
        Ok(User {
            id: Some(UserId::new(row.try_get("id")?)),
            fname: row.try_get("fname")?,
            lname: row.try_get("lname")?,
        })
    }
}

impl User {
    /// A transient user; `create` assigns the id.
    pub fn new(fname: impl Into<String>, lname: impl Into<String>) -> Self {
        User {
            id: None,
            fname: fname.into(),
            lname: lname.into(),
        }
    }

    pub fn id(&self) -> Option<UserId> {
        self.id
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    fn persisted_id(&self) -> Result<UserId> {
        domain::require_id(Self::ENTITY, self.id)
    }

    pub async fn all(db: &Database) -> Result<Vec<User>> {
        domain::all(db).await
    }

    /// Find a user by exact first and last name.
    ///
    /// When several users share the name, the one with the lowest id wins.
    pub async fn find_by_name(db: &Database, fname: &str, lname: &str) -> Result<User> {
        let sql = format!(
            "SELECT {} FROM users WHERE fname = ? AND lname = ? ORDER BY id ASC LIMIT 1",
            Self::COLUMNS
        );
        domain::fetch_first(
            db,
            &sql,
            &[fname.into(), lname.into()],
            format!("name = {} {}", fname, lname),
        )
        .await
    }

    pub async fn find_by_id(db: &Database, id: UserId) -> Result<User> {
        domain::find_by_id(db, id.as_i64()).await
    }

    /// Insert this user and assign its id.
    ///
    /// # Errors
    /// `AlreadyPersisted` if the user already has an id.
    pub async fn create(&mut self, db: &Database) -> Result<UserId> {
        domain::ensure_transient(Self::ENTITY, self.id.map(|id| id.as_i64()))?;
        let id = db
            .insert(
                "INSERT INTO users (fname, lname) VALUES (?, ?)",
                &[self.fname.as_str().into(), self.lname.as_str().into()],
            )
            .await?;
        let id = UserId::new(id);
        self.id = Some(id);
        debug!(user_id = %id, "created user");
        Ok(id)
    }

    /// Overwrite the stored names with the current ones.
    ///
    /// # Errors
    /// `NotPersisted` if the user has no id, `NotFound` if its row is gone.
    pub async fn update(&self, db: &Database) -> Result<()> {
        let id = self.persisted_id()?;
        let changed = db
            .execute(
                "UPDATE users SET fname = ?, lname = ? WHERE id = ?",
                &[self.fname.as_str().into(), self.lname.as_str().into(), id.into()],
            )
            .await?;
        domain::ensure_updated(Self::ENTITY, id.as_i64(), changed)?;
        debug!(user_id = %id, "updated user");
        Ok(())
    }

    pub async fn followed_questions(&self, db: &Database) -> Result<Vec<Question>> {
        QuestionFollow::followed_questions_for_user_id(db, self.persisted_id()?).await
    }

    /// Titles of the questions this user liked.
    pub async fn liked_questions(&self, db: &Database) -> Result<Vec<String>> {
        Like::liked_questions_for_user_id(db, self.persisted_id()?).await
    }

    pub async fn authored_questions(&self, db: &Database) -> Result<Vec<Question>> {
        Question::find_by_author_id(db, self.persisted_id()?).await
    }

    pub async fn authored_replies(&self, db: &Database) -> Result<Vec<Reply>> {
        Reply::find_by_user_id(db, self.persisted_id()?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::test_db;
    use crate::error::QuestionsError;

    #[tokio::test]
    async fn test_create_and_find_by_id() {
        let db = test_db().await;

        let mut user = User::new("Alice", "Smith");
        assert!(!user.is_persisted());
        let id = user.create(&db).await.expect("create failed");
        assert_eq!(user.id(), Some(id));

        let found = User::find_by_id(&db, id).await.expect("find failed");
        assert_eq!(found, user);
    }

    #[tokio::test]
    async fn test_create_twice_is_already_persisted() {
        let db = test_db().await;

        let mut user = User::new("Alice", "Smith");
        let id = user.create(&db).await.unwrap();

        match user.create(&db).await {
            Err(QuestionsError::AlreadyPersisted { entity, id: existing }) => {
                assert_eq!(entity, "user");
                assert_eq!(existing, id.as_i64());
            }
            other => panic!("Expected AlreadyPersisted, got {:?}", other),
        }
        assert_eq!(User::all(&db).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_transient_is_not_persisted() {
        let db = test_db().await;
        let user = User::new("Bob", "Jones");
        assert!(matches!(
            user.update(&db).await,
            Err(QuestionsError::NotPersisted { entity: "user" })
        ));
    }

    #[tokio::test]
    async fn test_update_overwrites_names() {
        let db = test_db().await;

        let mut user = User::new("Bob", "Jones");
        let id = user.create(&db).await.unwrap();
        user.fname = "Robert".to_string();
        user.update(&db).await.expect("update failed");

        let found = User::find_by_id(&db, id).await.unwrap();
        assert_eq!(found.fname, "Robert");
        assert_eq!(found.lname, "Jones");
    }

    #[tokio::test]
    async fn test_update_of_vanished_row_is_not_found() {
        let db = test_db().await;

        let mut user = User::new("Vera", "Gone");
        let id = user.create(&db).await.unwrap();
        db.execute("DELETE FROM users WHERE id = ?", &[id.into()])
            .await
            .unwrap();

        user.fname = "Vee".to_string();
        match user.update(&db).await {
            Err(QuestionsError::NotFound { entity, key }) => {
                assert_eq!(entity, "user");
                assert_eq!(key, format!("id = {}", id));
            }
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_find_by_id_missing_is_not_found() {
        let db = test_db().await;
        let err = User::find_by_id(&db, UserId::new(404)).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_find_by_name_prefers_lowest_id() {
        let db = test_db().await;

        let mut first = User::new("Sam", "Lee");
        first.create(&db).await.unwrap();
        let mut second = User::new("Sam", "Lee");
        second.create(&db).await.unwrap();

        let found = User::find_by_name(&db, "Sam", "Lee").await.unwrap();
        assert_eq!(found.id(), first.id());

        let err = User::find_by_name(&db, "Sam", "Nobody").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_all_returns_users_in_id_order() {
        let db = test_db().await;
        for (f, l) in [("A", "One"), ("B", "Two"), ("C", "Three")] {
            User::new(f, l).create(&db).await.unwrap();
        }

        let names: Vec<String> = User::all(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.fname)
            .collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_navigation_on_transient_user_fails() {
        let db = test_db().await;
        let user = User::new("Ghost", "User");
        assert!(matches!(
            user.authored_questions(&db).await,
            Err(QuestionsError::NotPersisted { .. })
        ));
        assert!(matches!(
            user.liked_questions(&db).await,
            Err(QuestionsError::NotPersisted { .. })
        ));
    }

    #[tokio::test]
    async fn test_authored_content() {
        let db = test_db().await;

        let mut alice = User::new("Alice", "Smith");
        let alice_id = alice.create(&db).await.unwrap();
        let mut bob = User::new("Bob", "Jones");
        let bob_id = bob.create(&db).await.unwrap();

        let mut q1 = Question::new("Q1", "B1", alice_id);
        let q1_id = q1.create(&db).await.unwrap();
        Question::new("Q2", "B2", bob_id).create(&db).await.unwrap();
        Reply::new(q1_id, "first!", alice_id, None)
            .create(&db)
            .await
            .unwrap();

        let questions = alice.authored_questions(&db).await.unwrap();
        assert_eq!(questions, vec![q1]);

        let replies = alice.authored_replies(&db).await.unwrap();
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].body, "first!");
        assert!(bob.authored_replies(&db).await.unwrap().is_empty());
    }

    #[test]
    fn test_user_serialization() {
        let user = User::new("Alice", "Smith");
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "id": null, "fname": "Alice", "lname": "Smith" })
        );
    }
}
