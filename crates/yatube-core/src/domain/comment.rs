use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Comment entity - a reply attached to exactly one post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub created: DateTime<Utc>,
}

/// Validated, client-writable comment fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentChanges {
    pub text: Option<String>,
}

impl Comment {
    pub fn new(post_id: Uuid, author_id: Uuid, changes: CommentChanges) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            author_id,
            text: changes.text.unwrap_or_default(),
            created: Utc::now(),
        }
    }

    pub fn apply(&mut self, changes: CommentChanges) {
        if let Some(text) = changes.text {
            self.text = text;
        }
    }
}
