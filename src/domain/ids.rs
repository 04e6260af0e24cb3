//! Typed primary keys: UserId, QuestionId, ReplyId, FollowId, LikeId.

use crate::db::Value;
use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            pub fn new(id: i64) -> Self {
                $name(id)
            }

            pub fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for Value<'_> {
            fn from(id: $name) -> Self {
                Value::Integer(id.0)
            }
        }
    };
}

entity_id!(
    /// Primary key of `users`.
    UserId
);
entity_id!(
    /// Primary key of `questions`.
    QuestionId
);
entity_id!(
    /// Primary key of `replies`.
    ReplyId
);
entity_id!(
    /// Primary key of `question_follows`.
    FollowId
);
entity_id!(
    /// Primary key of `question_likes`.
    LikeId
);
