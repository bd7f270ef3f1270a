use std::sync::Arc;

use yatube_shared::dto::{CommentRequest, CommentResponse};

use super::{WriteMode, check_text, username_of};
use crate::domain::{Comment, CommentChanges};
use crate::error::{DomainError, FieldErrors};
use crate::ports::UserRepository;

/// Comment payloads: only `text` is writable.
#[derive(Clone)]
pub struct CommentSerializer {
    users: Arc<dyn UserRepository>,
}

impl CommentSerializer {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub fn parse(
        &self,
        input: CommentRequest,
        mode: WriteMode,
    ) -> Result<CommentChanges, DomainError> {
        let mut errors = FieldErrors::new();
        let text = check_text(&mut errors, "text", input.text, mode);
        errors.into_result(CommentChanges { text })
    }

    pub async fn render(&self, comment: Comment) -> Result<CommentResponse, DomainError> {
        let mut rendered = self.render_many(vec![comment]).await?;
        rendered
            .pop()
            .ok_or_else(|| DomainError::Internal("comment lost while rendering".into()))
    }

    pub async fn render_many(
        &self,
        comments: Vec<Comment>,
    ) -> Result<Vec<CommentResponse>, DomainError> {
        let ids: Vec<_> = comments.iter().map(|c| c.author_id).collect();
        let names = self.users.usernames(&ids).await?;

        comments
            .into_iter()
            .map(|c| {
                Ok(CommentResponse {
                    id: c.id,
                    author: username_of(&names, c.author_id)?,
                    text: c.text,
                    created: c.created,
                    post: c.post_id,
                })
            })
            .collect()
    }
}
