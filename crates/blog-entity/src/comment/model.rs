//! Comment entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A comment on a post, optionally replying to another comment.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    /// Unique comment identifier.
    pub id: Uuid,
    /// Author.
    pub user_id: Uuid,
    /// The post this comment belongs to.
    pub post_id: Uuid,
    /// Parent comment when this is a reply.
    pub parent_id: Option<Uuid>,
    /// Comment body.
    pub text: String,
    /// Soft visibility flag.
    pub is_active: bool,
    /// When the comment was created.
    pub created_at: DateTime<Utc>,
    /// When the comment was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Whether the given user authored this comment.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

/// Data required to create a comment.
#[derive(Debug, Clone)]
pub struct CreateComment {
    /// Author.
    pub user_id: Uuid,
    /// Target post.
    pub post_id: Uuid,
    /// Parent comment for replies.
    pub parent_id: Option<Uuid>,
    /// Comment body.
    pub text: String,
}

/// A comment together with its nested replies.
#[derive(Debug, Clone, Serialize)]
pub struct CommentNode {
    /// The comment itself.
    #[serde(flatten)]
    pub comment: Comment,
    /// Direct replies, oldest first.
    pub replies: Vec<CommentNode>,
}

impl CommentNode {
    /// Arrange a flat list of comments of one post into reply trees.
    ///
    /// Comments whose parent is missing from the list are treated as roots.
    pub fn build_forest(mut comments: Vec<Comment>) -> Vec<CommentNode> {
        comments.sort_by_key(|c| c.created_at);
        let ids: std::collections::HashSet<Uuid> = comments.iter().map(|c| c.id).collect();

        let mut children: std::collections::HashMap<Uuid, Vec<Comment>> =
            std::collections::HashMap::new();
        let mut roots = Vec::new();
        for comment in comments {
            match comment.parent_id {
                Some(parent) if ids.contains(&parent) => {
                    children.entry(parent).or_default().push(comment)
                }
                _ => roots.push(comment),
            }
        }

        roots
            .into_iter()
            .map(|c| Self::attach(c, &mut children))
            .collect()
    }

    fn attach(
        comment: Comment,
        children: &mut std::collections::HashMap<Uuid, Vec<Comment>>,
    ) -> CommentNode {
        let replies = children
            .remove(&comment.id)
            .unwrap_or_default()
            .into_iter()
            .map(|c| Self::attach(c, children))
            .collect();
        CommentNode { comment, replies }
    }
}
