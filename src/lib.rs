pub mod config;
pub mod db;
pub mod domain;
pub mod error;

pub use config::{Config, ConfigError};
pub use db::{Database, Value};
pub use domain::{
    FollowId, FullName, Like, LikeId, Question, QuestionFollow, QuestionId, QuestionRanking,
    Reply, ReplyId, ReplyTree, User, UserId,
};
pub use error::{QuestionsError, Result};
