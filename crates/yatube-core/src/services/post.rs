use std::sync::Arc;

use uuid::Uuid;
use yatube_shared::dto::{PostRequest, PostResponse};

use super::vanished;
use crate::domain::Post;
use crate::error::DomainError;
use crate::pagination::{Listing, Pagination};
use crate::policy::{self, Actor};
use crate::ports::{PostFilter, PostRepository, Repositories};
use crate::serializers::{PostSerializer, WriteMode};

/// Raw listing parameters as they arrive in the query string.
#[derive(Debug, Clone, Default)]
pub struct PostQuery {
    pub search: Option<String>,
    pub author: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    serializer: PostSerializer,
    pagination: Pagination,
}

impl PostService {
    pub fn new(repos: &Repositories, pagination: Pagination) -> Self {
        Self {
            posts: repos.posts.clone(),
            serializer: PostSerializer::new(repos.users.clone(), repos.groups.clone()),
            pagination,
        }
    }

    pub async fn list(
        &self,
        _actor: Option<&Actor>,
        query: PostQuery,
    ) -> Result<Listing<PostResponse>, DomainError> {
        let page = self
            .pagination
            .resolve(query.limit.as_deref(), query.offset.as_deref());

        let filter = PostFilter {
            search: query.search.filter(|s| !s.trim().is_empty()),
            author_username: query.author.filter(|a| !a.trim().is_empty()),
            limit: page.map(|p| p.limit),
            offset: page.map_or(0, |p| p.offset),
        };

        let found = self.posts.list_posts(&filter).await?;
        let results = self.serializer.render_many(found.items).await?;

        Ok(match page {
            Some(request) => Listing::Page {
                count: found.total,
                request,
                results,
            },
            None => Listing::All(results),
        })
    }

    pub async fn retrieve(
        &self,
        actor: Option<&Actor>,
        id: Uuid,
    ) -> Result<PostResponse, DomainError> {
        let post = self.find(id).await?;
        policy::authorize_read(actor, &post)?;
        self.serializer.render(post).await
    }

    pub async fn create(
        &self,
        actor: Option<&Actor>,
        input: PostRequest,
    ) -> Result<PostResponse, DomainError> {
        let actor = policy::require_actor(actor)?;
        let changes = self.serializer.parse(input, WriteMode::Create).await?;

        let post = self.posts.insert(Post::new(actor.user_id, changes)).await?;
        tracing::info!(post_id = %post.id, author = %actor.username, "Post created");

        self.serializer.render(post).await
    }

    pub async fn update(
        &self,
        actor: Option<&Actor>,
        id: Uuid,
        input: PostRequest,
        partial: bool,
    ) -> Result<PostResponse, DomainError> {
        let mut post = self.find(id).await?;
        let actor = policy::authorize_mutation(actor, &post)?;
        let changes = self
            .serializer
            .parse(input, WriteMode::from_partial(partial))
            .await?;

        post.apply(changes);
        let post = self.posts.update(post).await.map_err(vanished("post", id))?;
        tracing::info!(post_id = %id, author = %actor.username, "Post updated");

        self.serializer.render(post).await
    }

    pub async fn delete(&self, actor: Option<&Actor>, id: Uuid) -> Result<(), DomainError> {
        let post = self.find(id).await?;
        let actor = policy::authorize_mutation(actor, &post)?;

        self.posts.delete(id).await.map_err(vanished("post", id))?;
        tracing::info!(post_id = %id, author = %actor.username, "Post deleted");
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", id))
    }
}
