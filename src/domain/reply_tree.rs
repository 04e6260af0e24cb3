//! Arena of replies indexed by id.
//!
//! Parent and child links stay as ids and are resolved through the arena, so
//! the tree never owns references to itself. A reply whose parent is not in
//! the arena is treated as a root.

use crate::db::Database;
use crate::domain::ids::{QuestionId, ReplyId};
use crate::domain::Reply;
use crate::error::Result;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct ReplyTree {
    replies: BTreeMap<ReplyId, Reply>,
    children: BTreeMap<ReplyId, Vec<ReplyId>>,
    roots: Vec<ReplyId>,
}

impl ReplyTree {
    /// Build a tree from persisted replies. Transient replies are skipped.
    pub fn from_replies(replies: impl IntoIterator<Item = Reply>) -> Self {
        let replies: BTreeMap<ReplyId, Reply> = replies
            .into_iter()
            .filter_map(|reply| reply.id().map(|id| (id, reply)))
            .collect();

        let mut children: BTreeMap<ReplyId, Vec<ReplyId>> = BTreeMap::new();
        let mut roots = Vec::new();
        for (id, reply) in &replies {
            match reply.parent_id.filter(|parent| replies.contains_key(parent)) {
                Some(parent) => children.entry(parent).or_default().push(*id),
                None => roots.push(*id),
            }
        }

        ReplyTree {
            replies,
            children,
            roots,
        }
    }

    /// Load every reply of `question_id`.
    pub async fn for_question(db: &Database, question_id: QuestionId) -> Result<Self> {
        let replies = Reply::find_by_question_id(db, question_id).await?;
        Ok(Self::from_replies(replies))
    }

    pub fn get(&self, id: ReplyId) -> Option<&Reply> {
        self.replies.get(&id)
    }

    /// Roots in id order.
    pub fn roots(&self) -> impl Iterator<Item = &Reply> + '_ {
        self.roots.iter().filter_map(|id| self.replies.get(id))
    }

    /// Direct children of `id` in id order.
    pub fn children(&self, id: ReplyId) -> impl Iterator<Item = &Reply> + '_ {
        self.children
            .get(&id)
            .into_iter()
            .flatten()
            .filter_map(|child| self.replies.get(child))
    }

    pub fn parent(&self, id: ReplyId) -> Option<&Reply> {
        self.replies
            .get(&id)
            .and_then(|reply| reply.parent_id)
            .and_then(|parent| self.replies.get(&parent))
    }

    pub fn len(&self) -> usize {
        self.replies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replies.is_empty()
    }
}
