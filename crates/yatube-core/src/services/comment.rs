use std::sync::Arc;

use uuid::Uuid;
use yatube_shared::dto::{CommentRequest, CommentResponse};

use super::vanished;
use crate::domain::{Comment, Post};
use crate::error::DomainError;
use crate::policy::{self, Actor};
use crate::ports::{CommentRepository, PostRepository, Repositories};
use crate::serializers::{CommentSerializer, WriteMode};

/// Comments nested under a post.
///
/// Every operation resolves the parent post first, so a missing post is always
/// `NotFound` regardless of who is asking or what they sent.
#[derive(Clone)]
pub struct CommentService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    serializer: CommentSerializer,
}

impl CommentService {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            posts: repos.posts.clone(),
            comments: repos.comments.clone(),
            serializer: CommentSerializer::new(repos.users.clone()),
        }
    }

    pub async fn list(
        &self,
        actor: Option<&Actor>,
        post_id: Uuid,
    ) -> Result<Vec<CommentResponse>, DomainError> {
        let post = self.post(post_id).await?;
        policy::authorize_read(actor, &post)?;

        let comments = self.comments.list_for_post(post_id).await?;
        self.serializer.render_many(comments).await
    }

    pub async fn retrieve(
        &self,
        actor: Option<&Actor>,
        post_id: Uuid,
        id: Uuid,
    ) -> Result<CommentResponse, DomainError> {
        let post = self.post(post_id).await?;
        policy::authorize_read(actor, &post)?;

        let comment = self.find(post_id, id).await?;
        policy::authorize_read(actor, &comment)?;
        self.serializer.render(comment).await
    }

    pub async fn create(
        &self,
        actor: Option<&Actor>,
        post_id: Uuid,
        input: CommentRequest,
    ) -> Result<CommentResponse, DomainError> {
        let post = self.post(post_id).await?;
        let actor = policy::require_actor(actor)?;
        let changes = self.serializer.parse(input, WriteMode::Create)?;

        let comment = self
            .comments
            .insert(Comment::new(post.id, actor.user_id, changes))
            .await?;
        tracing::info!(
            comment_id = %comment.id,
            post_id = %post_id,
            author = %actor.username,
            "Comment created"
        );

        self.serializer.render(comment).await
    }

    pub async fn update(
        &self,
        actor: Option<&Actor>,
        post_id: Uuid,
        id: Uuid,
        input: CommentRequest,
        partial: bool,
    ) -> Result<CommentResponse, DomainError> {
        self.post(post_id).await?;
        let mut comment = self.find(post_id, id).await?;
        let actor = policy::authorize_mutation(actor, &comment)?;
        let changes = self
            .serializer
            .parse(input, WriteMode::from_partial(partial))?;

        comment.apply(changes);
        let comment = self
            .comments
            .update(comment)
            .await
            .map_err(vanished("comment", id))?;
        tracing::info!(comment_id = %id, author = %actor.username, "Comment updated");

        self.serializer.render(comment).await
    }

    pub async fn delete(
        &self,
        actor: Option<&Actor>,
        post_id: Uuid,
        id: Uuid,
    ) -> Result<(), DomainError> {
        self.post(post_id).await?;
        let comment = self.find(post_id, id).await?;
        let actor = policy::authorize_mutation(actor, &comment)?;

        self.comments
            .delete(id)
            .await
            .map_err(vanished("comment", id))?;
        tracing::info!(comment_id = %id, author = %actor.username, "Comment deleted");
        Ok(())
    }

    /// The post a comment path points at. Every operation resolves it first.
    pub async fn post(&self, post_id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))
    }

    async fn find(&self, post_id: Uuid, id: Uuid) -> Result<Comment, DomainError> {
        self.comments
            .find_in_post(post_id, id)
            .await?
            .ok_or_else(|| DomainError::not_found("comment", id))
    }
}
