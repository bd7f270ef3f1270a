use std::sync::Arc;

use yatube_shared::dto::{PostRequest, PostResponse};

use super::{WriteMode, check_text, username_of};
use crate::domain::{Post, PostChanges};
use crate::error::{DomainError, FieldErrors};
use crate::ports::{GroupRepository, UserRepository};

/// Post payloads: `text`, `image` and `group` are writable.
#[derive(Clone)]
pub struct PostSerializer {
    users: Arc<dyn UserRepository>,
    groups: Arc<dyn GroupRepository>,
}

impl PostSerializer {
    pub fn new(users: Arc<dyn UserRepository>, groups: Arc<dyn GroupRepository>) -> Self {
        Self { users, groups }
    }

    /// Validate an incoming payload. A non-null `group` must name an existing group.
    pub async fn parse(
        &self,
        input: PostRequest,
        mode: WriteMode,
    ) -> Result<PostChanges, DomainError> {
        let mut errors = FieldErrors::new();

        let text = check_text(&mut errors, "text", input.text, mode);

        // Blank image references mean "no image".
        let image = input
            .image
            .map(|image| image.filter(|reference| !reference.trim().is_empty()));

        if let Some(Some(group_id)) = input.group {
            if self.groups.find_by_id(group_id).await?.is_none() {
                errors.add(
                    "group",
                    format!("Invalid pk \"{}\" - object does not exist.", group_id),
                );
            }
        }

        errors.into_result(PostChanges {
            text,
            image,
            group_id: input.group,
        })
    }

    pub async fn render(&self, post: Post) -> Result<PostResponse, DomainError> {
        let mut rendered = self.render_many(vec![post]).await?;
        rendered
            .pop()
            .ok_or_else(|| DomainError::Internal("post lost while rendering".into()))
    }

    pub async fn render_many(&self, posts: Vec<Post>) -> Result<Vec<PostResponse>, DomainError> {
        let ids: Vec<_> = posts.iter().map(|p| p.author_id).collect();
        let names = self.users.usernames(&ids).await?;

        posts
            .into_iter()
            .map(|p| {
                Ok(PostResponse {
                    id: p.id,
                    text: p.text,
                    author: username_of(&names, p.author_id)?,
                    image: p.image,
                    pub_date: p.pub_date,
                    group: p.group_id,
                })
            })
            .collect()
    }
}
