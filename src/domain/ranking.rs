//! Rows produced by the liker and ranking queries.

use crate::domain::ids::QuestionId;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

/// First and last name of a user, as returned by the likers query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullName {
    pub fname: String,
    pub lname: String,
}

impl FullName {
    pub fn new(fname: impl Into<String>, lname: impl Into<String>) -> Self {
        FullName {
            fname: fname.into(),
            lname: lname.into(),
        }
    }
}

impl<'r> FromRow<'r, SqliteRow> for FullName {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(FullName {
            fname: row.try_get("fname")?,
            lname: row.try_get("lname")?,
        })
    }
}

/// One entry of a most-followed or most-liked ranking.
///
/// `total` is the distinct follower count or the summed like count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRanking {
    pub question_id: QuestionId,
    pub title: String,
    pub total: i64,
}

impl<'r> FromRow<'r, SqliteRow> for QuestionRanking {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(QuestionRanking {
            question_id: QuestionId::new(row.try_get("question_id")?),
            title: row.try_get("title")?,
            total: row.try_get("total")?,
        })
    }
}
